//! QRPG Local Statevector Simulator
//!
//! An in-process backend that runs circuits without network access or
//! credentials. The circuit is simulated once and the resulting
//! distribution is sampled once per shot.
//!
//! # Features
//!
//! - **Exact Simulation**: full statevector over `Complex64` amplitudes
//! - **All Standard Gates**: every gate in `qrpg-ir`
//! - **Seedable**: [`SimulatorBackend::with_seed`] makes runs reproducible
//!
//! # Bit order
//!
//! Outcome bitstrings list classical bits most-significant first
//! (`c[n-1] … c[0]`): the final character is `c[0]`.
//!
//! # Example
//!
//! ```ignore
//! use qrpg_adapter_sim::SimulatorBackend;
//! use qrpg_hal::Backend;
//! use qrpg_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::with_seed(42);
//!     let circuit = Circuit::password_register()?;
//!     let job_id = backend.submit(&circuit, 8).await?;
//!     let result = backend.wait(&job_id).await?;
//!     assert_eq!(result.counts.total_shots(), Some(8));
//!     Ok(())
//! }
//! ```

mod simulator;
mod statevector;

pub use simulator::{SimulatorBackend, SimulatorConfig};
