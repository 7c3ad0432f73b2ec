// src/error.rs

//! Unified error handling for the memorials application.

use std::fmt;

use thiserror::Error;

/// Result type alias for memorial operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote store rejected a request
    #[error("{message}")]
    Store { status: u16, message: String },

    /// No store connection parameters were configured
    #[error("Store is not configured")]
    StoreUnavailable,

    /// A record with the same name or source post already exists
    #[error("A memorial with this name or URL already exists.")]
    Duplicate,

    /// Extraction collaborator failed for a post
    #[error("Extraction error for {url}: {message}")]
    Extraction { url: String, message: String },

    /// Discovery/harvesting error
    #[error("Discovery error: {0}")]
    Discovery(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a store error from an HTTP status and response message.
    pub fn store(status: u16, message: impl Into<String>) -> Self {
        Self::Store {
            status,
            message: message.into(),
        }
    }

    /// Create an extraction error with the post URL as context.
    pub fn extraction(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Extraction {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a discovery error.
    pub fn discovery(message: impl Into<String>) -> Self {
        Self::Discovery(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_displays_message_only() {
        let err = AppError::store(409, "duplicate key value");
        assert_eq!(err.to_string(), "duplicate key value");
    }

    #[test]
    fn test_duplicate_message() {
        assert_eq!(
            AppError::Duplicate.to_string(),
            "A memorial with this name or URL already exists."
        );
    }
}
