//! Data Transfer Objects for the dashboard API.

use serde::{Deserialize, Serialize};

use qrpg_core::{BackendChoice, GenerationRequest, GeneratorError, PasswordLength};
use qrpg_ir::{Circuit, CircuitDiagram};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Form body of `POST /api/generate`.
///
/// `length` stays a plain integer here so out-of-range values produce a
/// descriptive 400 instead of a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub backend: BackendChoice,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TryFrom<GenerateRequest> for GenerationRequest {
    type Error = GeneratorError;

    fn try_from(body: GenerateRequest) -> Result<Self, Self::Error> {
        let length = match body.length {
            Some(length) => PasswordLength::new(length)?,
            None => PasswordLength::default(),
        };
        Ok(GenerationRequest {
            backend: body.backend,
            token: body.token,
            length,
            seed: body.seed,
        })
    }
}

/// The password circuit, ready for display.
#[derive(Debug, Serialize, Deserialize)]
pub struct CircuitView {
    pub name: String,
    pub num_qubits: usize,
    pub num_clbits: usize,
    pub depth: usize,
    pub num_ops: usize,
    pub diagram: String,
    pub qasm: String,
}

impl CircuitView {
    /// Describe `circuit`.
    pub fn new(circuit: &Circuit, qasm: String) -> Self {
        Self {
            name: circuit.name().to_string(),
            num_qubits: circuit.num_qubits(),
            num_clbits: circuit.num_clbits(),
            depth: circuit.depth(),
            num_ops: circuit.num_ops(),
            diagram: CircuitDiagram::render(circuit).to_string(),
            qasm,
        }
    }
}

/// Slider bounds for the length input.
#[derive(Debug, Serialize, Deserialize)]
pub struct LengthOptions {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default: u32,
}

/// One radio button of the backend choice.
#[derive(Debug, Serialize, Deserialize)]
pub struct BackendOption {
    pub value: BackendChoice,
    pub label: String,
    pub requires_token: bool,
}

/// Everything the form needs to render its inputs.
#[derive(Debug, Serialize, Deserialize)]
pub struct OptionsResponse {
    pub length: LengthOptions,
    pub backends: Vec<BackendOption>,
    /// Variable read when the token field is left blank.
    pub token_env: String,
}

impl OptionsResponse {
    /// Options for a server that falls back to `token_env`.
    pub fn new(token_env: impl Into<String>) -> Self {
        let backends = [BackendChoice::Simulator, BackendChoice::Remote]
            .into_iter()
            .map(|choice| BackendOption {
                value: choice,
                label: choice.label().to_string(),
                requires_token: choice == BackendChoice::Remote,
            })
            .collect();

        Self {
            length: LengthOptions {
                min: PasswordLength::MIN,
                max: PasswordLength::MAX,
                step: PasswordLength::STEP,
                default: PasswordLength::DEFAULT,
            },
            backends,
            token_env: token_env.into(),
        }
    }
}
