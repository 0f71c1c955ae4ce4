//! Single-use share keys

use noteshare_core::{ShareError, ShareResult};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::{base64url, KEY_SIZE};

/// A 256-bit key that encrypts exactly one share packet. Zeroized on drop.
#[derive(Clone)]
pub struct ShareKey {
    bytes: [u8; KEY_SIZE],
}

impl ShareKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Build a key from untrusted bytes (e.g. a decoded `k` parameter).
    pub fn from_slice(bytes: &[u8]) -> ShareResult<Self> {
        let bytes: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| {
            ShareError::InvalidKey(format!("expected {KEY_SIZE} bytes, got {}", bytes.len()))
        })?;
        Ok(Self { bytes })
    }

    /// Parse the `k` link parameter.
    pub fn from_base64url(text: &str) -> ShareResult<Self> {
        let mut raw = base64url::decode(text)
            .map_err(|e| ShareError::InvalidKey(format!("not base64url: {e}")))?;
        let key = Self::from_slice(&raw);
        raw.zeroize();
        key
    }

    /// Generate a fresh key from the given CSPRNG.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    pub fn to_base64url(&self) -> String {
        base64url::encode(&self.bytes)
    }
}

impl Drop for ShareKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for ShareKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a random 256-bit share key from the thread-local CSPRNG.
pub fn generate_share_key() -> ShareKey {
    ShareKey::generate_with(&mut rand::thread_rng())
}
