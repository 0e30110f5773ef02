//! QRPG Hardware Abstraction Layer
//!
//! A unified interface over the places QRPG can run its circuit: the
//! in-process simulator and remote quantum devices.
//!
//! # Overview
//!
//! - [`Backend`]: submit a circuit, poll its job, fetch [`Counts`]
//! - [`Capabilities`]: what a backend accepts, checked on every submission
//! - [`Provider`] / [`ProviderConnector`]: credential → device catalog → backend
//! - [`DeviceFilter`] and [`least_busy`]: pick the device with the shortest queue
//! - [`JobObserver`] and [`WaitOptions`]: progress reporting while waiting
//!
//! # Supported Backends
//!
//! | Backend | Crate | Authentication |
//! |---------|-------|----------------|
//! | Local Simulator | `qrpg-adapter-sim` | None |
//! | IBM Quantum | `qrpg-adapter-ibm` | `IBM_QUANTUM_TOKEN` env var or explicit token |
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use qrpg_hal::{Backend, RecordingObserver, WaitOptions};
//! use qrpg_adapter_sim::SimulatorBackend;
//! use qrpg_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let circuit = Circuit::password_register()?;
//!     let backend = SimulatorBackend::with_seed(7);
//!
//!     let job_id = backend.submit(&circuit, 8).await?;
//!     let observer = RecordingObserver::new();
//!     let result = backend
//!         .wait_with(&job_id, &observer, WaitOptions::default())
//!         .await?;
//!
//!     for (bitstring, count) in result.counts.iter() {
//!         println!("{bitstring}: {count}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod backend;
pub mod capability;
pub mod device;
pub mod error;
pub mod job;
pub mod observer;
pub mod provider;
pub mod result;

pub use auth::{ApiToken, IBM_TOKEN_ENV};
pub use backend::Backend;
pub use capability::{Capabilities, GateSet};
pub use device::{DeviceFilter, DeviceInfo, least_busy};
pub use error::{HalError, HalResult};
pub use job::{JobId, JobStatus};
pub use observer::{JobObserver, NoopObserver, RecordingObserver, WaitOptions};
pub use provider::{Provider, ProviderConnector};
pub use result::{Counts, ExecutionResult};
