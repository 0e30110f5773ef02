//! QASM3 emitter for serializing circuits.

use qrpg_ir::{Circuit, ClbitId, Instruction, InstructionKind, QubitId};

use crate::error::{EmitError, EmitResult};

/// Emit a circuit as QASM3 source code.
///
/// Qubits are declared as one flat register `q` and classical bits as one
/// flat register `c`, indexed by their ids.
pub fn emit(circuit: &Circuit) -> EmitResult<String> {
    let mut emitter = Emitter::new(circuit);
    emitter.emit_circuit(circuit)?;
    Ok(emitter.output)
}

struct Emitter {
    output: String,
    num_qubits: usize,
    num_clbits: usize,
}

impl Emitter {
    fn new(circuit: &Circuit) -> Self {
        Self {
            output: String::new(),
            num_qubits: circuit.num_qubits(),
            num_clbits: circuit.num_clbits(),
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) -> EmitResult<()> {
        if self.num_qubits == 0 {
            return Err(EmitError::EmptyCircuit);
        }

        self.writeln("OPENQASM 3.0;");
        self.writeln("include \"stdgates.inc\";");
        self.writeln("");

        self.writeln(&format!("qubit[{}] q;", self.num_qubits));
        if self.num_clbits > 0 {
            self.writeln(&format!("bit[{}] c;", self.num_clbits));
        }
        self.writeln("");

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction)?;
        }

        Ok(())
    }

    fn emit_instruction(&mut self, instruction: &Instruction) -> EmitResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let qubits = self.emit_qubits(instruction)?;
                self.writeln(&format!("{} {qubits};", gate.name()));
            }

            InstructionKind::Measure => {
                // One statement per pair keeps the output valid for partial registers.
                for (q, c) in instruction.measured_pairs() {
                    let qubit = self.qubit_ref(instruction, q)?;
                    let clbit = self.clbit_ref(instruction, c)?;
                    self.writeln(&format!("{clbit} = measure {qubit};"));
                }
            }

            InstructionKind::Barrier => {
                let qubits = self.emit_qubits(instruction)?;
                if qubits.is_empty() {
                    self.writeln("barrier q;");
                } else {
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }

        Ok(())
    }

    fn emit_qubits(&self, instruction: &Instruction) -> EmitResult<String> {
        let refs = instruction
            .qubits
            .iter()
            .map(|&q| self.qubit_ref(instruction, q))
            .collect::<EmitResult<Vec<_>>>()?;
        Ok(refs.join(", "))
    }

    fn qubit_ref(&self, instruction: &Instruction, qubit: QubitId) -> EmitResult<String> {
        if qubit.0 as usize >= self.num_qubits {
            return Err(EmitError::OperandOutOfRange {
                instruction: instruction.name().to_string(),
                operand: qubit.to_string(),
                size: self.num_qubits,
            });
        }
        Ok(format!("q[{}]", qubit.0))
    }

    fn clbit_ref(&self, instruction: &Instruction, clbit: ClbitId) -> EmitResult<String> {
        if clbit.0 as usize >= self.num_clbits {
            return Err(EmitError::OperandOutOfRange {
                instruction: instruction.name().to_string(),
                operand: clbit.to_string(),
                size: self.num_clbits,
            });
        }
        Ok(format!("c[{}]", clbit.0))
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_password_register() {
        let circuit = Circuit::password_register().unwrap();
        let qasm = emit(&circuit).unwrap();

        let expected = "\
OPENQASM 3.0;
include \"stdgates.inc\";

qubit[5] q;
bit[5] c;

h q[0];
h q[1];
h q[2];
h q[3];
h q[4];
barrier q[0], q[1], q[2], q[3], q[4];
c[0] = measure q[0];
c[1] = measure q[1];
c[2] = measure q[2];
c[3] = measure q[3];
c[4] = measure q[4];
";
        assert_eq!(qasm, expected);
    }

    #[test]
    fn test_emit_two_qubit_gates() {
        let mut circuit = Circuit::with_size("test", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .cx(QubitId(1), QubitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(0))
            .unwrap();

        let qasm = emit(&circuit).unwrap();
        assert!(qasm.contains("cx q[0], q[1];"));
        assert!(qasm.contains("cx q[1], q[0];"));
        assert!(qasm.contains("c[0] = measure q[1];"));
    }

    #[test]
    fn test_emit_without_clbits() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.x(QubitId(0)).unwrap();

        let qasm = emit(&circuit).unwrap();
        assert!(!qasm.contains("bit["));
        assert!(qasm.contains("x q[0];"));
    }

    #[test]
    fn test_emit_empty_circuit_fails() {
        let circuit = Circuit::new("empty");
        assert!(matches!(emit(&circuit), Err(EmitError::EmptyCircuit)));
    }
}
