//! noteshare-link: zero-knowledge share links for notes
//!
//! Encode: payload → JSON → deflate → AES-256-GCM packet → base64url → URL
//! Decode: the mirror image, starting from the URL fragment.
//!
//! ```text
//! https://notes.example/shared#c=<packet>&k=<key>
//!                             └──── fragment: never sent to the server ────┘
//! ```

pub mod fragment;
pub mod link;
pub mod pipeline;

pub use fragment::{extract_token, parse_fragment};
pub use link::{build_share_url, fragment_len, is_hash_too_long};
pub use pipeline::{
    decode_payload, decode_shared_link, encode_payload, open_shared_link, share_note,
    EncodedShare, ShareLink,
};
