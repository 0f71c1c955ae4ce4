use thiserror::Error;

pub type ShareResult<T> = Result<T, ShareError>;

/// Every way a share-link encode or decode can fail.
///
/// The decode-side variants are deliberately distinct so tests and logs can
/// tell them apart. They must be collapsed into [`RecipientError`] before
/// anything is shown to the person opening a link.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("payload schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("invalid packet: {0}")]
    InvalidPacket(String),

    #[error("unsupported packet version: {0}")]
    UnsupportedVersion(u8),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("authentication failed: wrong key or tampered packet")]
    AuthenticationFailure,

    #[error("missing link parameter: {0}")]
    MissingParameter(&'static str),

    #[error("malformed link fragment: {0}")]
    MalformedFragment(String),

    #[error("share link fragment too long: {len} characters (limit {max})")]
    LinkTooLarge { len: usize, max: usize },

    #[error("encryption error: {0}")]
    Encryption(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShareError {
    /// Message for the person creating a link.
    ///
    /// `LinkTooLarge` is reported specifically; it says nothing about key or
    /// ciphertext validity.
    pub fn sender_message(&self) -> &'static str {
        match self {
            ShareError::LinkTooLarge { .. } => "Note is too large to share via link.",
            _ => "Failed to generate share link.",
        }
    }

    /// True for failures that can only happen while opening a link.
    pub fn is_decode_side(&self) -> bool {
        matches!(
            self,
            ShareError::SchemaMismatch(_)
                | ShareError::InvalidPacket(_)
                | ShareError::UnsupportedVersion(_)
                | ShareError::InvalidKey(_)
                | ShareError::AuthenticationFailure
                | ShareError::MissingParameter(_)
                | ShareError::MalformedFragment(_)
        )
    }
}

/// The only error a link recipient ever sees.
///
/// Carries no detail: corrupted, tampered, truncated, and wrong-key links all
/// look the same from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("This link is invalid, corrupted, or unsupported.")]
pub struct RecipientError;

impl From<ShareError> for RecipientError {
    fn from(_: ShareError) -> Self {
        RecipientError
    }
}
