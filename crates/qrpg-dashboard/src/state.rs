//! Application state for the dashboard server.

use std::net::SocketAddr;

use qrpg_core::{ConfigError, PasswordGenerator, QrpgConfig};

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,
    /// Environment variable consulted when the token field is blank.
    pub token_env: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_address: ([127, 0, 0, 1], 8501).into(),
            token_env: qrpg_hal::IBM_TOKEN_ENV.to_string(),
        }
    }
}

/// Shared application state.
///
/// Read-only after startup; each request runs its own generation.
#[derive(Debug)]
pub struct AppState {
    /// Generation pipeline.
    pub generator: PasswordGenerator,
    /// Dashboard configuration.
    pub config: DashboardConfig,
}

impl AppState {
    /// State around an existing generator.
    pub fn new(generator: PasswordGenerator, config: DashboardConfig) -> Self {
        Self { generator, config }
    }

    /// State built from a loaded configuration.
    pub fn from_config(config: &QrpgConfig) -> Result<Self, ConfigError> {
        let dashboard = DashboardConfig {
            bind_address: config.bind_address()?,
            token_env: config.remote.token_env.clone(),
        };
        Ok(Self::new(PasswordGenerator::from_config(config), dashboard))
    }
}
