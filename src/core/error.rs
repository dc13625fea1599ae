//! Precondition violations raised by the mismatch-and-correction operations.

use thiserror::Error;

/// Result alias for the pure signal operations.
pub type Result<T> = std::result::Result<T, PreconditionError>;

/// A caller supplied something the operation cannot work with.
///
/// Nothing here is recoverable: every variant describes bad input, surfaced
/// immediately to whoever made the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreconditionError {
    /// Configuration rejected before any sample is generated.
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// An operation received a sequence with no samples.
    #[error("Empty input provided for {context}")]
    EmptyInput { context: &'static str },

    /// Two sequences that must line up do not.
    #[error("Length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Linear interpolation needs at least two support samples.
    #[error("Interpolation needs at least {required} support samples, got {available}")]
    InsufficientSupport { required: usize, available: usize },
}

impl PreconditionError {
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    pub fn empty_input(context: &'static str) -> Self {
        Self::EmptyInput { context }
    }

    pub fn length_mismatch(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            context,
            expected,
            actual,
        }
    }
}

/// Reject an empty slice for the named operation.
pub fn ensure_non_empty(samples: &[f64], context: &'static str) -> Result<()> {
    if samples.is_empty() {
        return Err(PreconditionError::empty_input(context));
    }
    Ok(())
}
