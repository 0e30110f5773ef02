//! Circuit command implementation.

use anyhow::Result;
use console::style;

use qrpg_ir::{Circuit, CircuitDiagram};

/// Execute the circuit command.
pub fn execute(qasm: bool) -> Result<()> {
    let circuit = Circuit::password_register()?;

    if qasm {
        print!("{}", qrpg_qasm3::emit(&circuit)?);
        return Ok(());
    }

    println!(
        "{} {}: {} qubits, {} clbits, depth {}",
        style("→").cyan().bold(),
        style(circuit.name()).green(),
        circuit.num_qubits(),
        circuit.num_clbits(),
        circuit.depth()
    );
    println!();
    println!("{}", CircuitDiagram::render(&circuit));
    Ok(())
}
