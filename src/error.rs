//! Error types for chatterm
//!
//! This module defines the error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for chatterm operations
///
/// Covers configuration loading, backend calls, local preference
/// storage, and composer attachment staging.
#[derive(Error, Debug)]
pub enum ChattermError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend answered with a non-2xx status
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code returned by the backend
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The request never produced a response (connect failure, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Local storage errors (preferences file, history file)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Attachment staging rejected a file
    #[error("Attachment error: {0}")]
    Attachment(String),

    /// Preference value could not be parsed
    #[error("Preference error: {0}")]
    Preferences(String),

    /// A CLI command could not be carried out
    #[error("{0}")]
    Command(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for chatterm operations
///
/// Uses `anyhow::Error` so callers can attach context while
/// propagating.
pub type Result<T> = anyhow::Result<T>;
