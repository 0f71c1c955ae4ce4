//! noteshare-crypto: the encryption half of a share link
//!
//! Every share gets its own key. Nothing here keeps state between calls.
//!
//! ```text
//! plaintext ──AES-256-GCM(fresh key, fresh nonce)──▶ packet ──base64url──▶ c
//!                          └── raw key bytes ─────────────────base64url──▶ k
//! ```
//!
//! `c` and `k` travel together in the URL fragment, which browsers do not send
//! to the server hosting the page.

pub mod base64url;
pub mod keys;
pub mod packet;

pub use keys::{generate_share_key, ShareKey};
pub use packet::{decrypt, encrypt, encrypt_with_rng, EncodedToken, Packet};

/// Size of a share key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an AES-GCM nonce (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;

/// The only packet format version this build reads or writes
pub const PACKET_VERSION: u8 = 1;

/// Version byte + nonce + tag, i.e. the packet for an empty plaintext
pub const MIN_PACKET_SIZE: usize = 1 + NONCE_SIZE + TAG_SIZE;
