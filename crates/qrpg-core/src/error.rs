//! Error types for password generation.

use qrpg_hal::HalError;
use thiserror::Error;

use crate::decode::DecodeError;

/// Result type for generator operations.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Everything that can stop a generation run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeneratorError {
    /// Requested length is outside the allowed set.
    #[error("Invalid password length {length}: must be an even number from 4 to 12")]
    InvalidLength { length: u32 },

    /// Remote backend chosen without a credential.
    #[error("An IBM Quantum API token is required for the remote backend")]
    MissingCredential,

    /// The remote service rejected the credential.
    #[error("Error occurred while loading the IBM Quantum account: {0}")]
    Credential(String),

    /// No remote device passed the filter.
    #[error("No eligible backend: {0}")]
    NoEligibleBackend(String),

    /// Submission, polling or result retrieval failed.
    ///
    /// The HAL message is folded into this one rather than chained as a source.
    #[error("Execution failed: {0}")]
    Execution(HalError),

    /// A measured outcome could not be decoded.
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// The backend returned a different number of shots than requested.
    #[error("Expected {expected} shots, backend returned {got}")]
    ShotMismatch { expected: u32, got: u64 },

    /// The circuit could not be built or emitted.
    #[error("Circuit error: {0}")]
    Circuit(String),
}

impl From<HalError> for GeneratorError {
    fn from(e: HalError) -> Self {
        match e {
            HalError::AuthenticationFailed(msg) => GeneratorError::Credential(msg),
            HalError::NoEligibleBackend(msg) => GeneratorError::NoEligibleBackend(msg),
            other => GeneratorError::Execution(other),
        }
    }
}

impl From<qrpg_ir::IrError> for GeneratorError {
    fn from(e: qrpg_ir::IrError) -> Self {
        GeneratorError::Circuit(e.to_string())
    }
}

impl From<qrpg_qasm3::EmitError> for GeneratorError {
    fn from(e: qrpg_qasm3::EmitError) -> Self {
        GeneratorError::Circuit(e.to_string())
    }
}
