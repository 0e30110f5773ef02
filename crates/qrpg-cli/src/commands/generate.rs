//! Generate command implementation.

use anyhow::Result;
use console::style;

use qrpg_core::{
    BackendChoice, GenerationRequest, PasswordGenerator, PasswordLength, QrpgConfig,
};
use qrpg_hal::NoopObserver;
use qrpg_ir::{Circuit, CircuitDiagram};

use super::common::{SpinnerObserver, print_report};

/// Execute the generate command.
pub async fn execute(
    config: &QrpgConfig,
    backend: BackendChoice,
    length: u32,
    token: Option<String>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let request = GenerationRequest {
        backend,
        token,
        length: PasswordLength::new(length)?,
        seed,
    };
    let generator = PasswordGenerator::from_config(config);

    if json {
        let report = generator.generate(&request, &NoopObserver).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Generating a {}-character password on the {}",
        style("→").cyan().bold(),
        request.length,
        style(backend.label()).yellow()
    );
    println!();
    println!("{}", CircuitDiagram::render(&Circuit::password_register()?));
    println!();

    let observer = SpinnerObserver::start("Preparing backend...");
    let outcome = generator.generate(&request, &observer).await;
    observer.finish();

    print_report(&outcome?);
    Ok(())
}
