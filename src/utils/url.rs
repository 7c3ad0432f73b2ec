// src/utils/url.rs

//! Post URL recognition and rewriting.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Canonical host for post URLs.
pub const CANONICAL_HOST: &str = "x.com";

static STATUS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://(?:x|twitter)\.com/[a-zA-Z0-9_]+/status/[0-9]+")
        .expect("status URL pattern is valid")
});

/// Rewrite the legacy `twitter.com` host to the canonical one.
///
/// # Examples
/// ```
/// use memorials::utils::url::normalize_status_url;
///
/// assert_eq!(
///     normalize_status_url("https://twitter.com/foo/status/123"),
///     "https://x.com/foo/status/123"
/// );
/// ```
pub fn normalize_status_url(url: &str) -> String {
    match url.strip_prefix("https://twitter.com/") {
        Some(rest) => format!("https://{}/{}", CANONICAL_HOST, rest),
        None => url.to_string(),
    }
}

/// Extract every post URL from rendered page text.
///
/// Results are normalized to the canonical host and de-duplicated in
/// first-seen order.
pub fn extract_status_urls(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    STATUS_URL
        .find_iter(content)
        .map(|m| normalize_status_url(m.as_str()))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Replace the host of `url`, keeping scheme, path, and query.
///
/// Returns `None` if the URL cannot be parsed or the host is rejected.
pub fn with_host(url: &str, host: &str) -> Option<String> {
    let mut parsed = url::Url::parse(url).ok()?;
    parsed.set_host(Some(host)).ok()?;
    Some(parsed.to_string())
}
