//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum random password generator",
        style("QRPG").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qrpg-ir           Circuit intermediate representation");
    println!("  qrpg-qasm3        OpenQASM 3 emitter");
    println!("  qrpg-hal          Hardware abstraction layer");
    println!("  qrpg-adapter-sim  Statevector simulator");
    println!("  qrpg-adapter-ibm  IBM Quantum adapter");
    println!("  qrpg-core         Password generation pipeline");
    println!("  qrpg-cli          Command-line interface");
    println!();
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
