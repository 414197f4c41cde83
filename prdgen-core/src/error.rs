//! Error types for prdgen

use thiserror::Error;

/// Result type alias for prdgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for prdgen operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A line starts like a milestone or issue header but does not have its full shape
    #[error("Malformed header on line {line}: {text}")]
    MalformedHeader {
        /// 1-based line number
        line: usize,
        /// Raw line text
        text: String,
    },

    /// An issue header appeared before any milestone header
    #[error("Issue on line {line} does not belong to any milestone: {text}")]
    OrphanIssue {
        /// 1-based line number
        line: usize,
        /// Raw line text
        text: String,
    },

    /// PRD name cannot be used as a file stem
    #[error("Invalid PRD name: {0:?}")]
    InvalidName(String),

    /// Failed to persist a rendered document
    #[error("Output error: {0}")]
    Output(String),
}
