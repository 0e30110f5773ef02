//! `OpenQASM` 3 Emitter for QRPG
//!
//! Serializes a [`qrpg_ir::Circuit`] into `OpenQASM` 3.0 source, the format
//! remote devices accept for sampler jobs.
//!
//! | Construct | Output |
//! |-----------|--------|
//! | Header | `OPENQASM 3.0;` + `include "stdgates.inc";` |
//! | Qubits | `qubit[5] q;` |
//! | Classical bits | `bit[5] c;` |
//! | Gates | `h q[0];`, `cx q[0], q[1];` |
//! | Barriers | `barrier q[0], q[1];` |
//! | Measurements | `c[0] = measure q[0];` |
//!
//! # Example
//!
//! ```rust
//! use qrpg_ir::Circuit;
//! use qrpg_qasm3::emit;
//!
//! let circuit = Circuit::password_register().unwrap();
//! let qasm = emit(&circuit).unwrap();
//! assert!(qasm.starts_with("OPENQASM 3.0;"));
//! assert!(qasm.contains("c[4] = measure q[4];"));
//! ```

mod emitter;
mod error;

pub use emitter::emit;
pub use error::{EmitError, EmitResult};
