//! Configuration for QRPG surfaces.
//!
//! Sources, highest precedence first:
//! 1. Environment variables (`QRPG_` prefix, `.env` loaded first)
//! 2. YAML configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use qrpg_adapter_ibm::LEGACY_ENDPOINT;
use qrpg_hal::{IBM_TOKEN_ENV, WaitOptions};

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QrpgConfig {
    /// Dashboard server.
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote provider.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Job polling.
    #[serde(default)]
    pub polling: PollingConfig,
    /// Local simulator.
    #[serde(default)]
    pub simulator: SimulatorSettings,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dashboard server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8501")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// Remote provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// REST endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Environment variable holding a saved token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

/// Job polling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Delay between status polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Give up after this many seconds. `0` waits indefinitely.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Local simulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorSettings {
    /// Fixed RNG seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Widest circuit the simulator accepts.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format: "console" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_bind_address() -> String {
    "127.0.0.1:8501".to_string()
}

fn default_endpoint() -> String {
    LEGACY_ENDPOINT.to_string()
}

fn default_token_env() -> String {
    IBM_TOKEN_ENV.to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    30 * 60
}

fn default_max_qubits() -> u32 {
    20
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token_env: default_token_env(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            seed: None,
            max_qubits: default_max_qubits(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl QrpgConfig {
    /// Default config file location, `~/.qrpg/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".qrpg").join("config.yaml"))
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: QrpgConfig =
            serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. `.env` file, if present, feeds the environment
    /// 2. `config_file`, or `~/.qrpg/config.yaml` if it exists, or defaults
    /// 3. `QRPG_*` environment overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            },
        };

        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `QRPG_*` environment variables that are set.
    fn merge_env(mut self) -> Self {
        if let Ok(v) = std::env::var("QRPG_BIND_ADDRESS") {
            self.server.bind_address = v;
        }

        if let Ok(v) = std::env::var("QRPG_REMOTE_ENDPOINT") {
            self.remote.endpoint = v;
        }
        if let Ok(v) = std::env::var("QRPG_TOKEN_ENV") {
            self.remote.token_env = v;
        }

        if let Ok(v) = std::env::var("QRPG_POLL_INTERVAL_MS") {
            if let Ok(val) = v.parse() {
                self.polling.poll_interval_ms = val;
            }
        }
        if let Ok(v) = std::env::var("QRPG_TIMEOUT_SECS") {
            if let Ok(val) = v.parse() {
                self.polling.timeout_secs = val;
            }
        }

        if let Ok(v) = std::env::var("QRPG_SIMULATOR_SEED") {
            if let Ok(val) = v.parse() {
                self.simulator.seed = Some(val);
            }
        }
        if let Ok(v) = std::env::var("QRPG_SIMULATOR_MAX_QUBITS") {
            if let Ok(val) = v.parse() {
                self.simulator.max_qubits = val;
            }
        }

        if let Ok(v) = std::env::var("QRPG_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Ok(v) = std::env::var("QRPG_LOG_FORMAT") {
            self.logging.format = v;
        }

        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address()?;

        if self.polling.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.simulator.max_qubits < qrpg_ir::PASSWORD_QUBITS {
            return Err(ConfigError::ValidationError(format!(
                "simulator.max_qubits must be at least {}",
                qrpg_ir::PASSWORD_QUBITS
            )));
        }

        if self.remote.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "remote.endpoint must not be empty".to_string(),
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        Ok(())
    }

    /// Get the parsed dashboard bind address.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_address.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "Invalid bind address: {}",
                self.server.bind_address
            ))
        })
    }

    /// Polling parameters for job waits.
    pub fn wait_options(&self) -> WaitOptions {
        let timeout = match self.polling.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        WaitOptions::default()
            .with_poll_interval(Duration::from_millis(self.polling.poll_interval_ms))
            .with_timeout(timeout)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
