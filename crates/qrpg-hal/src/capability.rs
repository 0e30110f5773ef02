//! Backend capability introspection.
//!
//! [`Capabilities`] describe what a backend accepts: qubit count, gate
//! names (OpenQASM 3 naming) and the shot limit. Backends cache them at
//! construction and check every submission against them.

use qrpg_ir::Circuit;
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Hardware capabilities of a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set.
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
    /// Additional capability flags, e.g. `"statevector"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            max_shots: 100_000,
            is_simulator: true,
            features: vec!["statevector".into(), "seedable".into()],
        }
    }

    /// Create capabilities for an IBM Quantum device.
    ///
    /// The device transpiles to its native set server-side, so every gate
    /// the IR can express is accepted.
    pub fn ibm(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gate_set: GateSet::universal().with_native(GateSet::ibm_native()),
            max_shots: 100_000,
            is_simulator: false,
            features: vec![],
        }
    }

    /// Check a submission against these capabilities.
    pub fn check_submission(&self, circuit: &Circuit, shots: u32) -> HalResult<()> {
        if shots == 0 {
            return Err(HalError::InvalidShots("shots must be at least 1".into()));
        }
        if shots > self.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} shots requested, {} allows at most {}",
                self.name, self.max_shots
            )));
        }
        if circuit.num_qubits() > self.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "circuit has {} qubits, {} has {}",
                circuit.num_qubits(),
                self.name,
                self.num_qubits
            )));
        }
        if let Some(gate) = circuit
            .instructions()
            .iter()
            .filter_map(|i| i.as_gate())
            .find(|g| !self.gate_set.contains(g.name()))
        {
            return Err(HalError::InvalidCircuit(format!(
                "gate '{}' not supported by {}",
                gate.name(),
                self.name
            )));
        }
        if circuit.num_clbits() == 0 {
            return Err(HalError::InvalidCircuit(
                "circuit has no classical bits to sample".into(),
            ));
        }
        Ok(())
    }
}

/// Gate set supported by a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Native gates (execute without decomposition on this backend).
    pub native: Vec<String>,
}

impl GateSet {
    /// Every gate the IR can express.
    pub fn universal() -> Self {
        let single = ["h", "x"];
        let two = ["cx"];
        Self {
            single_qubit: single.iter().map(|s| (*s).to_string()).collect(),
            two_qubit: two.iter().map(|s| (*s).to_string()).collect(),
            native: single.iter().chain(&two).map(|s| (*s).to_string()).collect(),
        }
    }

    /// IBM native basis gates.
    pub fn ibm_native() -> Vec<String> {
        ["rz", "sx", "x", "cx"]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }

    /// Replace the native gate list.
    pub fn with_native(mut self, native: Vec<String>) -> Self {
        self.native = native;
        self
    }

    /// Whether the gate set accepts a gate by OpenQASM name.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit.iter().any(|g| g == gate) || self.two_qubit.iter().any(|g| g == gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(20);
        assert!(caps.is_simulator);
        assert!(caps.gate_set.contains("h"));
        assert!(caps.gate_set.contains("cx"));
        assert!(!caps.gate_set.contains("rz"));
    }

    #[test]
    fn test_check_submission() {
        let caps = Capabilities::simulator(5);
        let circuit = Circuit::password_register().unwrap();
        assert!(caps.check_submission(&circuit, 8).is_ok());

        assert!(matches!(
            caps.check_submission(&circuit, 0),
            Err(HalError::InvalidShots(_))
        ));
        assert!(matches!(
            caps.check_submission(&circuit, 100_001),
            Err(HalError::InvalidShots(_))
        ));

        let small = Capabilities::simulator(4);
        assert!(matches!(
            small.check_submission(&circuit, 8),
            Err(HalError::CircuitTooLarge(_))
        ));
    }

    #[test]
    fn test_unmeasured_circuit_rejected() {
        let caps = Capabilities::simulator(5);
        let mut circuit = Circuit::with_size("bare", 1, 0);
        circuit.h(qrpg_ir::QubitId(0)).unwrap();
        assert!(matches!(
            caps.check_submission(&circuit, 1),
            Err(HalError::InvalidCircuit(_))
        ));
    }

    #[test]
    fn test_ibm_native_gates() {
        let caps = Capabilities::ibm("ibm_test", 27);
        assert!(!caps.is_simulator);
        assert!(caps.gate_set.native.contains(&"sx".to_string()));
        assert!(caps.gate_set.contains("h"));
    }
}
