//! Utility functions and helpers.

pub mod http;
pub mod log;
pub mod url;

use chrono::Utc;

/// Derive a record identifier from a display name.
///
/// Lowercases, trims, and joins whitespace-separated words with `-`.
/// Returns `None` when nothing is left.
pub fn slugify(name: &str) -> Option<String> {
    let slug = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    (!slug.is_empty()).then_some(slug)
}

/// Identifier used when a submission carries no usable name.
pub fn fallback_id() -> String {
    format!("submission-{}", Utc::now().timestamp_millis())
}

/// Today's date in ISO format (UTC).
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}
