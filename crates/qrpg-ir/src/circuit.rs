//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

/// Width of the password register: one measured outcome decodes to one character.
pub const PASSWORD_QUBITS: u32 = 5;

/// A quantum circuit.
///
/// Instructions are kept in program order. Every operand is checked against
/// the circuit's qubits and classical bits when the instruction is applied,
/// so a built circuit is always well formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit.
    clbits: Vec<Clbit>,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            instructions: vec![],
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.qubits.len() as u32);
        self.qubits.push(Qubit::new(id));
        id
    }

    /// Add a quantum register with multiple qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        (0..size)
            .map(|i| {
                let id = QubitId(self.qubits.len() as u32);
                self.qubits.push(Qubit::with_register(id, &name, i));
                id
            })
            .collect()
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.clbits.len() as u32);
        self.clbits.push(Clbit::new(id));
        id
    }

    /// Add a classical register with multiple bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        (0..size)
            .map(|i| {
                let id = ClbitId(self.clbits.len() as u32);
                self.clbits.push(Clbit::with_register(id, &name, i));
                id
            })
            .collect()
    }

    /// Append an instruction after validating its operands.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = instruction.as_gate().map(|g| g.name().to_string());

        if let Some(gate) = instruction.as_gate() {
            let got = instruction.qubits.len() as u32;
            if got != gate.num_qubits() {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got,
                });
            }
        }

        let mut seen = Vec::with_capacity(instruction.qubits.len());
        for &qubit in &instruction.qubits {
            if qubit.0 as usize >= self.qubits.len() {
                return Err(IrError::QubitNotFound { qubit, gate_name });
            }
            if seen.contains(&qubit) {
                return Err(IrError::DuplicateQubit { qubit, gate_name });
            }
            seen.push(qubit);
        }

        for &clbit in &instruction.clbits {
            if clbit.0 as usize >= self.clbits.len() {
                return Err(IrError::ClbitNotFound { clbit });
            }
        }

        if instruction.is_measure() && instruction.qubits.len() != instruction.clbits.len() {
            return Err(IrError::MeasureMismatch {
                qubits: instruction.qubits.len(),
                clbits: instruction.clbits.len(),
            });
        }

        Ok(())
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Measure every qubit, qubit `i` into classical bit `i`.
    ///
    /// A barrier across all qubits is inserted first. Missing classical bits
    /// are added as a `meas` register.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        self.barrier_all()?;
        let missing = self.qubits.len().saturating_sub(self.clbits.len());
        if missing > 0 {
            self.add_creg("meas", missing as u32);
        }

        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        let clbits: Vec<_> = self
            .clbits
            .iter()
            .map(|c| c.id)
            .take(qubits.len())
            .collect();
        self.apply(Instruction::measure_all(qubits, clbits)?)
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        self.barrier(qubits)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the qubits.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Get the instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions, barriers included.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Number of gate instructions (barriers and measurements excluded).
    pub fn gate_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Circuit depth, counting barriers as zero-width synchronization points.
    pub fn depth(&self) -> usize {
        let mut levels = vec![0usize; self.qubits.len()];
        for inst in &self.instructions {
            let start = inst
                .qubits
                .iter()
                .map(|q| levels[q.0 as usize])
                .max()
                .unwrap_or(0);
            let end = if inst.is_barrier() { start } else { start + 1 };
            for q in &inst.qubits {
                levels[q.0 as usize] = end;
            }
        }
        levels.into_iter().max().unwrap_or(0)
    }

    /// Whether every qubit is measured exactly once.
    pub fn measures_all_qubits(&self) -> bool {
        let mut measured = vec![0usize; self.qubits.len()];
        for inst in self.instructions.iter().filter(|i| i.is_measure()) {
            for q in &inst.qubits {
                measured[q.0 as usize] += 1;
            }
        }
        measured.iter().all(|&n| n == 1)
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// The password register: `q[0..5]` in uniform superposition, then measured.
    ///
    /// Each run of this circuit yields one of 32 equally likely 5-bit outcomes.
    pub fn password_register() -> IrResult<Self> {
        let mut circuit = Self::new("qrpg");
        let qubits = circuit.add_qreg("q", PASSWORD_QUBITS);
        for q in qubits {
            circuit.h(q)?;
        }
        circuit.measure_all()?;
        Ok(circuit)
    }
}
