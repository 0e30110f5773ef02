//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// Standard gates with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Controlled-X (CNOT) gate.
    CX,
}

impl StandardGate {
    /// OpenQASM 3 name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::CX => "cx",
        }
    }

    /// Number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX => 2,
            StandardGate::H | StandardGate::X => 1,
        }
    }

    /// Short label used by the circuit diagram.
    pub fn label(&self) -> &'static str {
        match self {
            StandardGate::H => "H",
            StandardGate::X | StandardGate::CX => "X",
        }
    }
}

impl std::fmt::Display for StandardGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
