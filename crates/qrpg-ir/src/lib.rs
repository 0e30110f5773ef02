//! QRPG Circuit Intermediate Representation
//!
//! Core data structures for the quantum circuits QRPG submits to backends.
//! The IR is deliberately flat: a circuit is an ordered list of
//! [`Instruction`]s over numbered qubits and classical bits, which is all
//! the simulator, the QASM emitter and the diagram renderer need.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`] for the built-in gate set
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Circuit**: [`Circuit`] builder API
//! - **Diagram**: [`CircuitDiagram`] ASCII rendering
//!
//! # Example: The password register
//!
//! ```rust
//! use qrpg_ir::{Circuit, PASSWORD_QUBITS};
//!
//! let circuit = Circuit::password_register().unwrap();
//! assert_eq!(circuit.num_qubits(), PASSWORD_QUBITS as usize);
//! assert_eq!(circuit.num_clbits(), PASSWORD_QUBITS as usize);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X` | 1 | Pauli-X gate |
//! | `CX` | 2 | Controlled-X (CNOT) |

pub mod circuit;
pub mod diagram;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::{Circuit, PASSWORD_QUBITS};
pub use diagram::CircuitDiagram;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
