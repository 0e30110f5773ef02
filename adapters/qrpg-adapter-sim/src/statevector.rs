//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;

use qrpg_ir::{Instruction, InstructionKind, StandardGate};

/// A statevector representing a quantum state.
///
/// Basis index bit `k` is the state of qubit `k`.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Apply an instruction. Measurements and barriers leave the state untouched.
    pub fn apply(&mut self, instruction: &Instruction) {
        if let InstructionKind::Gate(gate) = &instruction.kind {
            let qubits: Vec<_> = instruction.qubits.iter().map(|q| q.0 as usize).collect();
            self.apply_gate(*gate, &qubits);
        }
    }

    fn apply_gate(&mut self, gate: StandardGate, qubits: &[usize]) {
        match gate {
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
        }
    }

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        let c_mask = 1 << control;
        let t_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if i & c_mask != 0 && i & t_mask == 0 {
                self.amplitudes.swap(i, i | t_mask);
            }
        }
    }

    /// Probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }
}

/// Draws basis indices from a fixed distribution.
pub struct Sampler {
    cumulative: Vec<f64>,
}

impl Sampler {
    /// Build a sampler over `probabilities` (need not be exactly normalized).
    pub fn new(probabilities: &[f64]) -> Self {
        let mut total = 0.0;
        let cumulative = probabilities
            .iter()
            .map(|p| {
                total += p;
                total
            })
            .collect();
        Self { cumulative }
    }

    /// Draw one basis index.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let r: f64 = rng.r#gen::<f64>() * total;
        self.cumulative
            .iter()
            .position(|&c| r < c)
            .unwrap_or(self.cumulative.len().saturating_sub(1))
    }
}
