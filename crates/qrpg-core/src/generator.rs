//! The password generation pipeline.
//!
//! ```text
//!   build circuit ──→ choose backend ──→ submit (shots = length) ──→ wait ──→ decode
//! ```
//!
//! Every run is independent: the generator holds only configuration, and a
//! fresh simulator or provider session is opened per call.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use qrpg_adapter_ibm::IbmConnector;
use qrpg_adapter_sim::{SimulatorBackend, SimulatorConfig};
use qrpg_hal::{
    ApiToken, Backend, DeviceFilter, HalError, JobId, JobObserver, JobStatus, ProviderConnector,
    RecordingObserver, WaitOptions, least_busy,
};
use qrpg_ir::{Circuit, CircuitDiagram};

use crate::config::QrpgConfig;
use crate::decode::decode_counts;
use crate::error::{GeneratorError, GeneratorResult};
use crate::password::PasswordLength;
use crate::report::{DeviceReport, DeviceSummary, GenerationReport, Histogram};

/// Where the circuit runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// In-process simulator.
    #[default]
    Simulator,
    /// Least busy real device of the remote provider.
    #[serde(rename = "ibm", alias = "remote")]
    Remote,
}

impl BackendChoice {
    /// Label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            BackendChoice::Simulator => "Simulator",
            BackendChoice::Remote => "IBM Quantum device",
        }
    }
}

impl fmt::Display for BackendChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendChoice::Simulator => write!(f, "simulator"),
            BackendChoice::Remote => write!(f, "ibm"),
        }
    }
}

impl FromStr for BackendChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simulator" | "sim" => Ok(BackendChoice::Simulator),
            "ibm" | "remote" => Ok(BackendChoice::Remote),
            other => Err(format!(
                "unknown backend '{other}', expected 'simulator' or 'ibm'"
            )),
        }
    }
}

/// Inputs of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Where to run.
    #[serde(default)]
    pub backend: BackendChoice,
    /// Remote credential; blank falls back to the saved token.
    #[serde(default)]
    pub token: Option<String>,
    /// Password length.
    #[serde(default)]
    pub length: PasswordLength,
    /// Simulator seed.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GenerationRequest {
    /// A simulator run.
    pub fn simulator(length: PasswordLength) -> Self {
        Self {
            backend: BackendChoice::Simulator,
            length,
            ..Self::default()
        }
    }

    /// A remote run with an explicit token.
    pub fn remote(length: PasswordLength, token: impl Into<String>) -> Self {
        Self {
            backend: BackendChoice::Remote,
            token: Some(token.into()),
            length,
            ..Self::default()
        }
    }

    /// Fix the simulator seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Knobs the generator takes from configuration.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// Environment variable holding a saved remote token.
    pub token_env: String,
    /// Polling parameters.
    pub wait: WaitOptions,
    /// Seed used when a request carries none.
    pub default_seed: Option<u64>,
    /// Widest circuit the simulator accepts.
    pub simulator_max_qubits: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::from(&QrpgConfig::default())
    }
}

impl From<&QrpgConfig> for GeneratorSettings {
    fn from(config: &QrpgConfig) -> Self {
        Self {
            token_env: config.remote.token_env.clone(),
            wait: config.wait_options(),
            default_seed: config.simulator.seed,
            simulator_max_qubits: config.simulator.max_qubits,
        }
    }
}

/// Runs the password circuit and decodes the outcome.
#[derive(Clone)]
pub struct PasswordGenerator {
    connector: Arc<dyn ProviderConnector>,
    settings: GeneratorSettings,
}

impl fmt::Debug for PasswordGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordGenerator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl PasswordGenerator {
    /// Generator using `connector` for remote runs and default settings.
    pub fn new(connector: Arc<dyn ProviderConnector>) -> Self {
        Self {
            connector,
            settings: GeneratorSettings::default(),
        }
    }

    /// Generator wired to IBM Quantum as configured.
    pub fn from_config(config: &QrpgConfig) -> Self {
        Self::new(Arc::new(IbmConnector::with_endpoint(&config.remote.endpoint)))
            .with_settings(GeneratorSettings::from(config))
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: GeneratorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Current settings.
    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Run one generation, reporting progress to `observer`.
    #[instrument(skip_all, fields(backend = %request.backend, length = %request.length))]
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        observer: &dyn JobObserver,
    ) -> GeneratorResult<GenerationReport> {
        let relay = Relay::new(observer);

        let circuit = Circuit::password_register()?;
        let circuit_diagram = CircuitDiagram::render(&circuit).to_string();
        let qasm = qrpg_qasm3::emit(&circuit)?;

        let backend = self.choose_backend(request, &relay).await?;
        relay.on_message(&format!("Backend Chosen: {}", backend.name()));

        let shots = request.length.shots();
        let started = std::time::Instant::now();
        let job_id = backend.submit(&circuit, shots).await?;
        relay.on_message(&format!("Job submitted: {job_id}"));

        let result = backend
            .wait_with(&job_id, &relay, self.settings.wait)
            .await?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let total = result.counts.total_shots().ok_or_else(|| {
            GeneratorError::Execution(HalError::Backend(
                "measurement counts overflow a 64-bit total".into(),
            ))
        })?;
        if total != u64::from(shots) {
            return Err(GeneratorError::ShotMismatch {
                expected: shots,
                got: total,
            });
        }

        let password = decode_counts(&result.counts)?;
        let histogram = Histogram::from_counts(&result.counts)?;
        info!(
            backend = backend.name(),
            job_id = %job_id,
            outcomes = histogram.entries().len(),
            elapsed_ms,
            "password generated"
        );

        Ok(GenerationReport {
            password,
            backend: backend.name().to_string(),
            job_id: job_id.0,
            circuit_diagram,
            qasm,
            histogram,
            shots,
            messages: relay.into_messages(),
            elapsed_ms,
        })
    }

    async fn choose_backend(
        &self,
        request: &GenerationRequest,
        observer: &dyn JobObserver,
    ) -> GeneratorResult<Arc<dyn Backend>> {
        match request.backend {
            BackendChoice::Simulator => {
                let config = SimulatorConfig {
                    seed: request.seed.or(self.settings.default_seed),
                    max_qubits: self.settings.simulator_max_qubits,
                };
                Ok(Arc::new(SimulatorBackend::from_config(config)))
            }
            BackendChoice::Remote => {
                let token = self.resolve_token(request.token.as_deref())?;
                let provider = self.connector.connect(&token).await?;
                observer.on_message("Account loaded");

                let (_, backend) = provider
                    .select_least_busy(&DeviceFilter::password_devices())
                    .await?;
                Ok(backend)
            }
        }
    }

    /// List the remote devices an account can see, marking the eligible ones.
    #[instrument(skip_all)]
    pub async fn devices(&self, token: Option<&str>) -> GeneratorResult<DeviceReport> {
        let token = self.resolve_token(token)?;
        let provider = self.connector.connect(&token).await?;
        let devices = provider.devices().await?;

        let filter = DeviceFilter::password_devices();
        let chosen = least_busy(&devices, &filter).ok().map(|d| d.name.clone());
        let devices = devices
            .into_iter()
            .map(|device| DeviceSummary {
                eligible: filter.matches(&device),
                device,
            })
            .collect();

        Ok(DeviceReport {
            provider: provider.name().to_string(),
            filter: filter.to_string(),
            devices,
            least_busy: chosen,
        })
    }

    fn resolve_token(&self, explicit: Option<&str>) -> GeneratorResult<ApiToken> {
        ApiToken::resolve(explicit, &self.settings.token_env)
            .ok_or(GeneratorError::MissingCredential)
    }
}

/// Forwards progress to the caller's observer and keeps a copy for the report.
struct Relay<'a> {
    outer: &'a dyn JobObserver,
    record: RecordingObserver,
}

impl<'a> Relay<'a> {
    fn new(outer: &'a dyn JobObserver) -> Self {
        Self {
            outer,
            record: RecordingObserver::new(),
        }
    }

    fn into_messages(self) -> Vec<String> {
        self.record.take()
    }
}

impl JobObserver for Relay<'_> {
    fn on_status(&self, job_id: &JobId, status: &JobStatus) {
        self.record.on_status(job_id, status);
        self.outer.on_status(job_id, status);
    }

    fn on_message(&self, message: &str) {
        self.record.on_message(message);
        self.outer.on_message(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_choice_parse() {
        assert_eq!("simulator".parse::<BackendChoice>(), Ok(BackendChoice::Simulator));
        assert_eq!("IBM".parse::<BackendChoice>(), Ok(BackendChoice::Remote));
        assert_eq!("remote".parse::<BackendChoice>(), Ok(BackendChoice::Remote));
        assert!("aer".parse::<BackendChoice>().is_err());
    }

    #[test]
    fn test_backend_choice_serde() {
        assert_eq!(
            serde_json::to_string(&BackendChoice::Remote).unwrap(),
            "\"ibm\""
        );
        let choice: BackendChoice = serde_json::from_str("\"remote\"").unwrap();
        assert_eq!(choice, BackendChoice::Remote);
        let choice: BackendChoice = serde_json::from_str("\"simulator\"").unwrap();
        assert_eq!(choice, BackendChoice::Simulator);
    }

    #[test]
    fn test_request_defaults() {
        let request: GenerationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.backend, BackendChoice::Simulator);
        assert_eq!(request.length.get(), 8);
        assert!(request.token.is_none());
    }

    #[test]
    fn test_request_rejects_bad_length() {
        assert!(serde_json::from_str::<GenerationRequest>(r#"{"length": 5}"#).is_err());
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = QrpgConfig::default();
        config.simulator.seed = Some(3);
        config.remote.token_env = "QRPG_TEST_TOKEN".into();
        let settings = GeneratorSettings::from(&config);
        assert_eq!(settings.default_seed, Some(3));
        assert_eq!(settings.token_env, "QRPG_TEST_TOKEN");
    }
}
