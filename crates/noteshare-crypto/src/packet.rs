//! Versioned AES-256-GCM share packets
//!
//! Packet format (binary):
//! ```text
//! [1 byte: version = 1][12 bytes: random nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! No associated data is bound. The version byte is checked before any
//! decryption is attempted, so an unknown version is reported as such even
//! when the rest of the packet is intact.
//!
//! Any change to a packet byte after the version fails authentication. A
//! change to the base64url text that leaves the bytes alone (unused trailing
//! bits, see [`crate::base64url`]) is not a change to the packet.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use noteshare_core::{ShareError, ShareResult};
use rand::{CryptoRng, RngCore};

use crate::keys::ShareKey;
use crate::{base64url, MIN_PACKET_SIZE, NONCE_SIZE, PACKET_VERSION};

/// The `(c, k)` pair carried in a share link fragment.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedToken {
    /// base64url of the packet
    pub c: String,
    /// base64url of the raw key
    pub k: String,
}

impl std::fmt::Debug for EncodedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedToken")
            .field("c", &self.c)
            .field("k", &"[REDACTED]")
            .finish()
    }
}

/// A borrowed view of a packet whose length and version have been checked.
#[derive(Debug, Clone, Copy)]
pub struct Packet<'a> {
    pub version: u8,
    pub nonce: &'a [u8; NONCE_SIZE],
    /// Ciphertext with the tag appended
    pub sealed: &'a [u8],
}

impl<'a> Packet<'a> {
    pub fn parse(bytes: &'a [u8]) -> ShareResult<Self> {
        if bytes.len() < MIN_PACKET_SIZE {
            return Err(ShareError::InvalidPacket(format!(
                "{} bytes (minimum {MIN_PACKET_SIZE})",
                bytes.len()
            )));
        }

        let version = bytes[0];
        if version != PACKET_VERSION {
            return Err(ShareError::UnsupportedVersion(version));
        }

        let (nonce, sealed) = bytes[1..].split_at(NONCE_SIZE);
        let nonce: &[u8; NONCE_SIZE] = nonce
            .try_into()
            .map_err(|_| ShareError::InvalidPacket("truncated nonce".into()))?;

        Ok(Self {
            version,
            nonce,
            sealed,
        })
    }

    /// Verify the tag and decrypt. Returns nothing at all on failure.
    pub fn open(&self, key: &ShareKey) -> ShareResult<Vec<u8>> {
        let cipher = Aes256Gcm::new(key.as_bytes().into());
        cipher
            .decrypt(Nonce::from_slice(self.nonce), self.sealed)
            .map_err(|_| ShareError::AuthenticationFailure)
    }
}

/// Encrypt `plaintext` under `key` with a fresh nonce drawn from `rng`.
///
/// Returns `[version][nonce][ciphertext][tag]`.
pub fn seal<R: RngCore + CryptoRng>(
    rng: &mut R,
    key: &ShareKey,
    plaintext: &[u8],
) -> ShareResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| ShareError::Encryption(format!("packet encryption failed: {e}")))?;

    let mut packet = Vec::with_capacity(1 + NONCE_SIZE + ciphertext.len());
    packet.push(PACKET_VERSION);
    packet.extend_from_slice(&nonce_bytes);
    packet.extend_from_slice(&ciphertext);
    Ok(packet)
}

/// Encrypt under a brand-new key, drawing key and nonce from `rng`.
pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    plaintext: &[u8],
) -> ShareResult<EncodedToken> {
    let key = ShareKey::generate_with(rng);
    let packet = seal(rng, &key, plaintext)?;
    tracing::trace!(packet_len = packet.len(), "sealed share packet");

    Ok(EncodedToken {
        c: base64url::encode(&packet),
        k: key.to_base64url(),
    })
}

/// Encrypt under a brand-new key from the thread-local CSPRNG.
pub fn encrypt(plaintext: &[u8]) -> ShareResult<EncodedToken> {
    encrypt_with_rng(&mut rand::thread_rng(), plaintext)
}

/// Reverse [`encrypt`].
///
/// Checks run in order: packet decodes and is long enough (`InvalidPacket`),
/// version is supported (`UnsupportedVersion`), key decodes to 32 bytes
/// (`InvalidKey`), tag verifies (`AuthenticationFailure`).
pub fn decrypt(c: &str, k: &str) -> ShareResult<Vec<u8>> {
    let bytes = base64url::decode(c)
        .map_err(|e| ShareError::InvalidPacket(format!("not base64url: {e}")))?;
    let packet = Packet::parse(&bytes)?;
    let key = ShareKey::from_base64url(k)?;
    packet.open(&key)
}
