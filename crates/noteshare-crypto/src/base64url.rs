//! URL-fragment-safe base64
//!
//! Encoding is the standard alphabet with `+` → `-`, `/` → `_` and the `=`
//! padding dropped. Decoding undoes the mapping, pads back to a multiple of
//! four and decodes with the standard alphabet, so text already in the
//! standard alphabet is read too. Non-zero trailing bits are tolerated, as
//! browser `atob` does.
//!
//! So several spellings of `c` can decode to the same packet: flipping an
//! unused low bit of the last character changes the text but not the bytes.
//! Tamper detection is defined over packet bytes, and such a link opens to
//! the same plaintext as the original.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

pub use base64::DecodeError;

const PADDED_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let mut standard: String = text
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    let pad = (4 - standard.len() % 4) % 4;
    standard.extend(std::iter::repeat('=').take(pad));
    PADDED_STANDARD.decode(standard)
}
