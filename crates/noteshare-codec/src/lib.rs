//! noteshare-codec: payload bytes and their (optional) compression
//!
//! # Overview
//! - `payload`: SharePayload ⇄ canonical JSON bytes, with schema validation
//! - `deflate`: zlib-framed deflate that silently falls back to the input

pub mod deflate;
pub mod payload;

pub use deflate::Deflate;
pub use payload::{deserialize, serialize, validate};
