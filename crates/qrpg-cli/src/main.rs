//! QRPG Command-Line Interface
//!
//! Generates passwords from measured qubits, on the local simulator or on
//! the least busy IBM Quantum device.
//!
//! ```text
//! qrpg generate --length 10
//! qrpg generate --backend ibm --token $IBM_QUANTUM_TOKEN
//! qrpg circuit --qasm
//! qrpg backends
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use qrpg_core::{BackendChoice, PasswordLength, QrpgConfig};

mod commands;

use commands::{backends, circuit, generate, version};

/// QRPG - quantum random password generator
#[derive(Parser)]
#[command(name = "qrpg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ~/.qrpg/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a password
    Generate {
        /// Where to run the circuit (simulator, ibm)
        #[arg(short, long, default_value = "simulator")]
        backend: BackendChoice,

        /// Password length (4-12, even)
        #[arg(short, long, default_value_t = PasswordLength::DEFAULT)]
        length: u32,

        /// IBM Quantum API token (falls back to the saved token)
        #[arg(short, long)]
        token: Option<String>,

        /// Simulator seed for a reproducible password
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the password circuit
    Circuit {
        /// Print OpenQASM 3 instead of the diagram
        #[arg(long)]
        qasm: bool,
    },

    /// List remote devices and the one a run would use
    Backends {
        /// IBM Quantum API token (falls back to the saved token)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; -v flags win over RUST_LOG
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("{}", error_line(&e));
        std::process::exit(1);
    }

    Ok(())
}

/// Format a top-level error. Library errors already fold their causes into
/// their own message, so only the outermost one is printed.
fn error_line(e: &anyhow::Error) -> String {
    format!("{} {}", style("Error:").red().bold(), e)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            backend,
            length,
            token,
            seed,
            json,
        } => {
            let config = QrpgConfig::load(cli.config.as_deref())?;
            generate::execute(&config, backend, length, token, seed, json).await
        }

        Commands::Circuit { qasm } => circuit::execute(qasm),

        Commands::Backends { token } => {
            let config = QrpgConfig::load(cli.config.as_deref())?;
            backends::execute(&config, token.as_deref()).await
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
