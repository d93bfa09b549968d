// src/error.rs

//! Unified error handling for the clanscan application.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for clanscan operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed at the transport layer
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Timestamp parsing failed
    #[error("Invalid timestamp '{value}': {message}")]
    Timestamp { value: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A cache file was requested with requery disabled, but does not exist
    #[error("Cannot read {label} from cache: file not found: {path}")]
    CacheMiss { label: String, path: PathBuf },

    /// The remote API answered with a non-success status
    #[error("Remote API yielded status code {status}: {body}")]
    Remote { status: u16, body: String },

    /// Building an HTTP client failed, which signals resource exhaustion
    #[error("HTTP client acquisition failed: {0}")]
    HandleAcquisition(String),
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

    /// Create a timestamp parse error.
    pub fn timestamp(value: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Timestamp {
            value: value.into(),
            message: message.to_string(),
        }
    }

    /// Create a cache miss error for a named document.
    pub fn cache_miss(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::CacheMiss {
            label: label.into(),
            path: path.into(),
        }
    }

    /// Create a remote protocol error from a status code and raw body.
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Process exit code for this error when it reaches the top level.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) => 2,
            Self::CacheMiss { .. } => 3,
            _ => 1,
        }
    }
}
