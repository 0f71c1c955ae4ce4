//! The end-to-end share pipeline
//!
//! Every call is independent: a new key and nonce per encode, no caches, no
//! retries. A failed attempt is simply discarded; calling again produces
//! entirely fresh key material.

use noteshare_codec::{payload, Deflate};
use noteshare_core::config::LinkConfig;
use noteshare_core::{RecipientError, ShareError, ShareResult, SharePayload};
use noteshare_crypto::EncodedToken;
use tracing::{debug, warn};

use crate::fragment::extract_token;
use crate::link::{build_share_url, fragment_len};

/// Result of encoding a payload, with the sizes before and after compression.
#[derive(Debug, Clone)]
pub struct EncodedShare {
    pub token: EncodedToken,
    pub raw_size: usize,
    pub compressed_size: usize,
}

/// A share link that passed the size guard.
#[derive(Clone)]
pub struct ShareLink {
    pub url: String,
    pub fragment_len: usize,
    pub raw_size: usize,
    pub compressed_size: usize,
}

impl std::fmt::Debug for ShareLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareLink")
            .field("url", &"[REDACTED]")
            .field("fragment_len", &self.fragment_len)
            .field("raw_size", &self.raw_size)
            .field("compressed_size", &self.compressed_size)
            .finish()
    }
}

/// serialize → compress → encrypt
pub fn encode_payload(payload: &SharePayload, codec: &Deflate) -> ShareResult<EncodedShare> {
    let raw = payload::serialize(payload)?;
    let compressed = codec.compress(&raw);
    let token = noteshare_crypto::encrypt(&compressed)?;

    debug!(
        raw_size = raw.len(),
        compressed_size = compressed.len(),
        "encoded share payload"
    );

    Ok(EncodedShare {
        token,
        raw_size: raw.len(),
        compressed_size: compressed.len(),
    })
}

/// decrypt → decompress → deserialize
pub fn decode_payload(c: &str, k: &str) -> ShareResult<SharePayload> {
    let decrypted = noteshare_crypto::decrypt(c, k)?;
    let inflated = Deflate::default().decompress(&decrypted);
    payload::deserialize(&inflated)
}

/// Encode a payload and assemble its link, refusing links over the limit.
///
/// On `LinkTooLarge` the encoded output is dropped; nothing is shortened or
/// retried.
pub fn share_note(
    payload: &SharePayload,
    codec: &Deflate,
    config: &LinkConfig,
) -> ShareResult<ShareLink> {
    config.validate()?;

    let encoded = encode_payload(payload, codec)?;
    let url = build_share_url(&encoded.token, config);
    let len = fragment_len(&url);

    if len > config.max_fragment_length {
        debug!(len, max = config.max_fragment_length, "share link rejected: too long");
        return Err(ShareError::LinkTooLarge {
            len,
            max: config.max_fragment_length,
        });
    }

    Ok(ShareLink {
        url,
        fragment_len: len,
        raw_size: encoded.raw_size,
        compressed_size: encoded.compressed_size,
    })
}

/// Open a share URL (or bare fragment), keeping the precise failure.
///
/// For tests and diagnostics. Anything user-facing goes through
/// [`open_shared_link`].
pub fn decode_shared_link(input: &str) -> ShareResult<SharePayload> {
    let token = extract_token(input)?;
    decode_payload(&token.c, &token.k)
}

/// Open a share URL for a recipient.
///
/// Every failure, whatever the stage, becomes the same [`RecipientError`].
pub fn open_shared_link(input: &str) -> Result<SharePayload, RecipientError> {
    decode_shared_link(input).map_err(|e| {
        if e.is_decode_side() {
            debug!(error = %e, "shared link rejected");
        } else {
            warn!(error = %e, "shared link could not be opened");
        }
        RecipientError::from(e)
    })
}
