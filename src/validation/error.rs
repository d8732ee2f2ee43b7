//! Error taxonomy for separation queries

use crate::provider::CommError;
use thiserror::Error;

/// Errors raised by geometry primitives and the separation engine.
///
/// An aircraft unknown to the position provider is not an error; it shows up
/// as a missing cell in the resulting matrix.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeparationError {
    /// An input failed a validation guard. Raised before any I/O.
    #[error("Invalid value {value} for {parameter}: {reason}")]
    InvalidArgument {
        parameter: String,
        value: String,
        reason: String,
    },
    /// The position provider could not be reached or answered with an error
    #[error("Communication error: {0}")]
    Communication(#[from] CommError),
}

impl SeparationError {
    pub fn invalid(parameter: &str, value: impl ToString, reason: &str) -> Self {
        SeparationError::InvalidArgument {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Name of the offending parameter for validation failures
    pub fn parameter(&self) -> Option<&str> {
        match self {
            SeparationError::InvalidArgument { parameter, .. } => Some(parameter),
            SeparationError::Communication(_) => None,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SeparationError::InvalidArgument { .. })
    }
}

/// Result type for separation operations
pub type SeparationResult<T> = Result<T, SeparationError>;
