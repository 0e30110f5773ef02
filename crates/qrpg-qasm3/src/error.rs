//! Error types for the QASM3 emitter.

use thiserror::Error;

/// Errors that can occur while emitting QASM.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// The circuit has no qubits to declare.
    #[error("Cannot emit a circuit without qubits")]
    EmptyCircuit,

    /// An instruction references an operand outside the declared registers.
    #[error("Instruction '{instruction}' references {operand}, register has size {size}")]
    OperandOutOfRange {
        instruction: String,
        operand: String,
        size: usize,
    },
}

/// Result type for emitting.
pub type EmitResult<T> = Result<T, EmitError>;
