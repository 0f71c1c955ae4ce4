//! Recipient-side fragment parsing
//!
//! Accepts a whole share URL, `#c=..&k=..`, or `c=..&k=..`. Pairs are joined
//! by `&`; keys and values are percent-decoded. Empty pairs and empty keys
//! are skipped, a bare key has an empty value, and a repeated key keeps its
//! last value.

use std::collections::HashMap;

use noteshare_core::{ShareError, ShareResult};
use noteshare_crypto::EncodedToken;

/// The raw (still percent-encoded) fragment of `input`.
///
/// Everything after the first `#`. Without a `#`, an absolute URL has no
/// fragment and anything else is taken as a bare `c=..&k=..` string.
pub fn fragment_of(input: &str) -> &str {
    match input.split_once('#') {
        Some((_, frag)) => frag,
        None if url::Url::parse(input).is_ok() => "",
        None => input,
    }
}

pub fn parse_fragment(fragment: &str) -> ShareResult<HashMap<String, String>> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut params = HashMap::new();

    for part in fragment.split('&') {
        if part.is_empty() {
            continue;
        }
        let (key, value) = part.split_once('=').unwrap_or((part, ""));
        if key.is_empty() {
            continue;
        }
        params.insert(percent_decode(key)?, percent_decode(value)?);
    }

    Ok(params)
}

/// Pull `(c, k)` out of a share URL or fragment.
///
/// Fails with `MissingParameter` when either is absent or empty; no
/// cryptographic work happens here.
pub fn extract_token(input: &str) -> ShareResult<EncodedToken> {
    let mut params = parse_fragment(fragment_of(input))?;
    let c = take_non_empty(&mut params, "c")?;
    let k = take_non_empty(&mut params, "k")?;
    Ok(EncodedToken { c, k })
}

fn take_non_empty(
    params: &mut HashMap<String, String>,
    name: &'static str,
) -> ShareResult<String> {
    params
        .remove(name)
        .filter(|v| !v.is_empty())
        .ok_or(ShareError::MissingParameter(name))
}

/// Strict percent-decoding: every `%` must start a two-digit hex escape and
/// the result must be UTF-8.
fn percent_decode(s: &str) -> ShareResult<String> {
    let bytes = s.as_bytes();
    for (i, _) in s.match_indices('%') {
        let escape = bytes.get(i + 1..i + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(ShareError::MalformedFragment(format!(
                "bad percent escape at offset {i}"
            )));
        }
    }

    percent_encoding::percent_decode_str(s)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ShareError::MalformedFragment(format!("escape is not UTF-8: {e}")))
}
