//! QRPG core: quantum random passwords.
//!
//! Runs a five-qubit Hadamard circuit for one shot per requested character
//! and maps each 5-bit outcome onto printable ASCII.
//!
//! ```
//! use qrpg_core::{decode_outcome, PasswordLength};
//!
//! assert_eq!(decode_outcome("00000").unwrap(), '@');
//! assert_eq!(decode_outcome("00001").unwrap(), '!');
//! assert_eq!(PasswordLength::default().shots(), 8);
//! ```
//!
//! Running the pipeline against the simulator:
//!
//! ```ignore
//! use qrpg_core::{GenerationRequest, PasswordGenerator, PasswordLength, QrpgConfig};
//! use qrpg_hal::NoopObserver;
//!
//! let generator = PasswordGenerator::from_config(&QrpgConfig::default());
//! let request = GenerationRequest::simulator(PasswordLength::new(12)?).with_seed(7);
//! let report = generator.generate(&request, &NoopObserver).await?;
//! println!("{}", report.password);
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod generator;
pub mod password;
pub mod report;

pub use config::{ConfigError, QrpgConfig};
pub use decode::{DecodeError, OUTCOME_BITS, decode_counts, decode_outcome, decode_value};
pub use error::{GeneratorError, GeneratorResult};
pub use generator::{BackendChoice, GenerationRequest, GeneratorSettings, PasswordGenerator};
pub use password::{Password, PasswordLength};
pub use report::{DeviceReport, DeviceSummary, GenerationReport, Histogram, HistogramEntry};
