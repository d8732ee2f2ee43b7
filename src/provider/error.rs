//! Communication error types for position providers

use thiserror::Error;

/// Failures talking to the position provider.
///
/// These are propagated unmodified; the separation engine never retries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommError {
    /// The service could not be reached
    #[error("Connection to {url} failed: {details}")]
    ConnectionFailed { url: String, details: String },
    /// The request did not complete within the client timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },
    /// The service answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },
    /// The response body could not be interpreted
    #[error("Invalid response: {details}")]
    InvalidResponse { details: String },
    /// The HTTP client could not be constructed
    #[error("HTTP client setup failed: {details}")]
    ClientSetup { details: String },
}

/// Result type for provider operations
pub type CommResult<T> = Result<T, CommError>;
