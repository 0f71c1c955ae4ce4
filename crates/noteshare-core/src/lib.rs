pub mod config;
pub mod error;
pub mod types;

pub use error::{RecipientError, ShareError, ShareResult};
pub use types::{NoteDraft, SharePayload, SharedNote, StoredNote};
