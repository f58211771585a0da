//! Error types for FlowGrid.
//!
//! The widget API itself is total: illegal-state cases (starting an edit
//! while another is in flight, committing from a cell that is not the
//! current editor, scrolling to an absent item) are guarded no-ops, not
//! failures. The only fallible surface is the signal layer.

use std::fmt;

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    InvalidConnection,
    /// The signal has been dropped and is no longer available.
    SignalDropped,
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConnection => write!(f, "Invalid or disconnected connection ID"),
            Self::SignalDropped => write!(f, "Signal has been dropped"),
        }
    }
}

impl std::error::Error for SignalError {}

/// A specialized Result type for FlowGrid operations.
pub type Result<T> = std::result::Result<T, SignalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            SignalError::InvalidConnection.to_string(),
            "Invalid or disconnected connection ID"
        );
        assert_eq!(SignalError::SignalDropped.to_string(), "Signal has been dropped");
    }
}
