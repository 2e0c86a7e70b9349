use thiserror::Error;

/// Result type for sacrl operations
pub type Result<T> = std::result::Result<T, SacError>;

/// Main error type for the sacrl library
#[derive(Debug, Clone, Error)]
pub enum SacError {
    /// Widths of policy output, critic input or environment action disagree
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Sampling from a store that holds nothing
    #[error("Empty buffer: {0}")]
    EmptyBuffer(String),

    /// Failure raised by an environment implementation
    #[error("Environment error: {0}")]
    Environment(String),

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for SacError {
    fn from(err: std::io::Error) -> Self {
        SacError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SacError {
    fn from(err: serde_json::Error) -> Self {
        SacError::Serialization(err.to_string())
    }
}

// Helper functions for common error patterns
impl SacError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        SacError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        SacError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
