// src/models/mod.rs

//! Domain models for the memorials application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod extraction;
pub(crate) mod memorial;
mod row;

// Re-export all public types
pub use config::{
    Config, DiscoveryConfig, ExtractionConfig, HttpConfig, PathsConfig, StoreConfig,
};
pub use extraction::ExtractedMemorial;
pub use memorial::{Coords, Media, MemorialDraft, MemorialEntry, Reference};
pub use row::MemorialRow;

/// Result of a write operation against the store.
///
/// Failures are reported as values so that callers in interactive and
/// unattended contexts handle them the same way.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WriteOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WriteOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failure carrying `message`, or a generic one when it is empty.
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            error: Some(if message.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                message
            }),
        }
    }
}

impl From<crate::error::Result<()>> for WriteOutcome {
    fn from(result: crate::error::Result<()>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

/// Totals reported at the end of a discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct DiscoverySummary {
    /// Entries already known before the run
    pub existing: usize,
    /// New candidate URLs harvested
    pub candidates: usize,
    /// Candidates submitted successfully
    pub added: usize,
    /// Candidates without a usable name
    pub skipped: usize,
    /// Candidates whose extraction or submission failed
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_failed_normalizes_empty_message() {
        let outcome = WriteOutcome::failed("");
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Unknown error"));
    }

    #[test]
    fn test_from_result() {
        assert_eq!(WriteOutcome::from(Ok(())), WriteOutcome::ok());

        let outcome = WriteOutcome::from(Err(AppError::store(400, "bad request")));
        assert_eq!(outcome.error.as_deref(), Some("bad request"));
    }
}
