use std::sync::LazyLock;

use regex::Regex;

static HTTP_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("scheme pattern"));

/// Returns the canonical, scheme-qualified form of a raw URL token.
///
/// Tokens already carrying an `http://` or `https://` scheme (any case)
/// pass through unchanged; everything else gets `http://` prepended. The
/// result is the deduplication key for the request pipeline.
pub fn normalize_url(raw: &str) -> String {
    if HTTP_SCHEME.is_match(raw) {
        raw.to_string()
    } else {
        format!("http://{raw}")
    }
}
