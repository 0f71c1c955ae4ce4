//! Share URL assembly and the fragment size guard

use noteshare_core::config::LinkConfig;
use noteshare_crypto::EncodedToken;

/// Path segment of the page that opens shared notes
pub const SHARED_PATH: &str = "shared";

/// `<origin><base-path>shared#c=<c>&k=<k>`
///
/// The key only ever appears after the `#`.
pub fn build_share_url(token: &EncodedToken, config: &LinkConfig) -> String {
    let origin = config.base_origin.trim_end_matches('/');
    let base_path = normalize_base_path(&config.base_path);
    format!(
        "{origin}{base_path}{SHARED_PATH}#c={}&k={}",
        token.c, token.k
    )
}

/// Force a leading and a trailing `/`; blank means the root.
pub fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Characters from the first `#` (inclusive) to the end; 0 without a `#`.
pub fn fragment_len(url: &str) -> usize {
    url.find('#').map_or(0, |i| url[i..].chars().count())
}

/// True when the fragment is longer than `max_len` characters.
///
/// Callers must not show, copy, or send a URL for which this holds.
pub fn is_hash_too_long(url: &str, max_len: usize) -> bool {
    fragment_len(url) > max_len
}
