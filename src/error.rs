//! Error types for icnskit
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using IcnsError
pub type Result<T> = std::result::Result<T, IcnsError>;

/// Unified error type for icnskit operations
#[derive(Debug, Error)]
pub enum IcnsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // State Errors
    // -------------------------------------------------------------------------
    #[error("The builder is closed")]
    BuilderClosed,

    #[error("Mark not set")]
    MarkNotSet,

    #[error("Mark/reset not supported")]
    MarkNotSupported,

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("Format error: {0}")]
    Format(String),
}

impl IcnsError {
    /// Operation is not valid in the current lifecycle state
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            IcnsError::BuilderClosed | IcnsError::MarkNotSet | IcnsError::MarkNotSupported
        )
    }

    /// A required argument was absent or malformed
    pub fn is_argument_error(&self) -> bool {
        matches!(self, IcnsError::InvalidArgument(_))
    }

    /// Underlying I/O failure
    pub fn is_environment_error(&self) -> bool {
        matches!(self, IcnsError::Io(_))
    }
}
