//! Backends command implementation.

use anyhow::Result;
use console::style;

use qrpg_core::{PasswordGenerator, QrpgConfig};

/// Execute the backends command.
pub async fn execute(config: &QrpgConfig, token: Option<&str>) -> Result<()> {
    let generator = PasswordGenerator::from_config(config);
    let report = generator.devices(token).await?;

    println!(
        "{} {} devices ({}):\n",
        style("QRPG").cyan().bold(),
        report.provider,
        style(&report.filter).dim()
    );

    for summary in &report.devices {
        let device = &summary.device;
        let marker = if summary.eligible {
            style("●").green()
        } else {
            style("○").dim()
        };
        let least_busy = report.least_busy.as_deref() == Some(device.name.as_str());

        println!(
            "  {} {}{}",
            marker,
            style(&device.name).bold(),
            if least_busy {
                style(" (least busy)").cyan().to_string()
            } else {
                String::new()
            }
        );
        println!("    Qubits: {}", device.num_qubits);
        match device.pending_jobs {
            Some(pending) => println!("    Pending jobs: {pending}"),
            None => println!("    Pending jobs: unknown"),
        }
        if device.simulator {
            println!("    Simulator");
        }
        if !device.operational {
            println!(
                "    Status: {}",
                device.status_msg.as_deref().unwrap_or("offline")
            );
        }
        println!();
    }

    match report.least_busy {
        Some(name) => println!("A remote run would use {}.", style(name).green().bold()),
        None => println!(
            "{} No eligible device; remote runs will fail.",
            style("!").yellow().bold()
        ),
    }
    Ok(())
}
