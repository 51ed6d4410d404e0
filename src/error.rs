//! Error types for Vidsum.

use thiserror::Error;

/// Library-level error type for Vidsum operations.
#[derive(Error, Debug)]
pub enum VidsumError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Video not found: {0}")]
    NotFound(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("Catalog conflict: {0}")]
    Conflict(String),

    #[error("Metadata provider error: {0}")]
    Metadata(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Vidsum operations.
pub type Result<T> = std::result::Result<T, VidsumError>;
