//! Error types for ABEDL
//!
//! One error enum covers HTTP scraping, yt-dlp process failures and
//! configuration problems. Messages are user-facing.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all ABEDL operations
#[derive(Error, Debug)]
pub enum AbedlError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem or process I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Output from a site or tool could not be understood
    #[error("Failed to parse: {0}")]
    ParseError(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No registered downloader accepts the URL
    #[error("No downloader found for URL: {0}")]
    NoDownloader(String),

    /// External tool missing from the system
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// External tool exited unsuccessfully
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// The site asked us to prove we are not a bot
    #[error("Bot detection triggered: {0}")]
    BotDetection(String),

    /// Requested format is not offered for the video
    #[error("Requested format is not available: {0}")]
    FormatUnavailable(String),

    /// Resource not found on server
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Bad configuration value or file
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AbedlError {
    /// Shorthand for a failed run of an external tool
    pub fn tool_failed(tool: &str, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.to_string(),
            message: message.into(),
        }
    }
}

impl Serialize for AbedlError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for ABEDL operations
pub type Result<T> = std::result::Result<T, AbedlError>;
