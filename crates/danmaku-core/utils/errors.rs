//! Core error type for danmaku conversion
//!
//! Only whole-batch structural problems become a [`CoreError`]. Problems with a
//! single comment are recorded as report data by the parser and layout engine
//! and never abort a conversion.

use core::fmt;
use thiserror::Error;

/// Main error type for danmaku-core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Stage size with a zero dimension
    #[error("Invalid stage size {width}x{height}: both dimensions must be positive")]
    InvalidStage { width: u32, height: u32 },

    /// Canvas configuration value out of range
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Comment filter that does not compile as a regular expression
    #[error("Invalid filter pattern '{pattern}': {message}")]
    InvalidFilter { pattern: String, message: String },

    /// Comment container that cannot be read at all
    #[error("Unreadable comment input: {0}")]
    Input(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl CoreError {
    /// Create configuration error from message
    pub fn config<T: fmt::Display>(message: T) -> Self {
        Self::Config(message.to_string())
    }

    /// Create input error from message
    pub fn input<T: fmt::Display>(message: T) -> Self {
        Self::Input(message.to_string())
    }

    /// Create I/O error with the path that failed
    pub fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::Io(format!("{}: {err}", path.display()))
    }

    /// Check if the error was caused by caller-supplied settings
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidStage { .. } | Self::Config(_) | Self::InvalidFilter { .. }
        )
    }
}

/// Result type alias for convenience
pub type Result<T> = core::result::Result<T, CoreError>;
