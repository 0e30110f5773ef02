//! IBM Quantum provider for QRPG.
//!
//! Connects with an account token, lists the account's devices, and runs the
//! password circuit on one of them through the Sampler primitive.
//!
//! # Example
//!
//! ```ignore
//! use qrpg_adapter_ibm::IbmConnector;
//! use qrpg_hal::{ApiToken, DeviceFilter, ProviderConnector, IBM_TOKEN_ENV};
//!
//! let token = ApiToken::from_env(IBM_TOKEN_ENV).expect("token");
//! let provider = IbmConnector::new().connect(&token).await?;
//! let (device, backend) = provider
//!     .select_least_busy(&DeviceFilter::password_devices())
//!     .await?;
//! ```
//!
//! Result bitstrings are normalised to the circuit's classical width and
//! written most significant bit first, matching the simulator.

mod api;
mod backend;
mod error;
mod provider;

pub use api::{BackendInfo, BackendStatus, IbmClient, LEGACY_ENDPOINT};
pub use backend::IbmBackend;
pub use error::{IbmError, IbmResult};
pub use provider::{IbmConnector, IbmProvider};
