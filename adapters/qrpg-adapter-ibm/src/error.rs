//! Error types for the IBM Quantum adapter.

use qrpg_hal::HalError;
use thiserror::Error;

/// Result type for IBM operations.
pub type IbmResult<T> = Result<T, IbmError>;

/// Errors that can occur when talking to IBM Quantum.
#[derive(Debug, Error)]
pub enum IbmError {
    /// The service rejected the API token.
    #[error("Invalid IBM Quantum API token")]
    InvalidToken,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error.
    #[error("IBM Quantum API error: {message}")]
    ApiError {
        /// Error code from API.
        code: Option<String>,
        /// Error message.
        message: String,
    },

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Job finished but its payload could not be read.
    #[error("Unreadable job result: {0}")]
    MalformedResult(String),

    /// Circuit conversion error.
    #[error("Circuit conversion error: {0}")]
    CircuitError(#[from] qrpg_qasm3::EmitError),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<IbmError> for HalError {
    fn from(e: IbmError) -> Self {
        match e {
            IbmError::InvalidToken => HalError::AuthenticationFailed(e.to_string()),
            IbmError::HttpError(err) => HalError::Network(err),
            IbmError::JobNotFound(id) => HalError::JobNotFound(id),
            IbmError::CircuitError(err) => HalError::InvalidCircuit(err.to_string()),
            IbmError::JsonError(err) => HalError::Serialization(err),
            IbmError::ApiError { .. } | IbmError::MalformedResult(_) => {
                HalError::Backend(e.to_string())
            }
        }
    }
}
