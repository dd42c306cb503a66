//! Error type for format shims and retrieval orchestration

use danmaku_core::CoreError;
use std::path::Path;
use thiserror::Error;

/// Errors from format conversion, track lookup and retrieval
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Error from the danmaku core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Requested subtitle track is not among the available ones
    #[error("Subtitle track '{requested}' not found (available: {})", .available.join(", "))]
    TrackNotFound {
        requested: String,
        available: Vec<String>,
    },

    /// Input that is not in the expected format at all
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Caption JSON that does not decode
    #[error("Invalid caption JSON: {0}")]
    Json(String),

    /// Upstream retrieval failure reported by a collaborator
    #[error("Retrieval failed: {0}")]
    Fetch(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl FormatError {
    /// Create I/O error with the path that failed
    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        Self::Io(format!("{}: {err}", path.display()))
    }

    /// Create retrieval error from message
    pub fn fetch<T: std::fmt::Display>(message: T) -> Self {
        Self::Fetch(message.to_string())
    }

    /// Check if this is an upstream lookup failure
    #[must_use]
    pub const fn is_track_not_found(&self) -> bool {
        matches!(self, Self::TrackNotFound { .. })
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = core::result::Result<T, FormatError>;
