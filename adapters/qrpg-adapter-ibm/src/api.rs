//! IBM Quantum REST client.
//!
//! Covers the calls a password run needs, all in direct-token mode:
//! - Listing backends and their queue state
//! - Submitting a Sampler job
//! - Polling job status and retrieving results

use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use qrpg_hal::{ApiToken, DeviceInfo};

use crate::error::{IbmError, IbmResult};

/// Legacy IBM Quantum API endpoint, which accepts the account token directly.
pub const LEGACY_ENDPOINT: &str = "https://api.quantum-computing.ibm.com";

const USER_AGENT: &str = concat!("qrpg/", env!("CARGO_PKG_VERSION"));

/// IBM Quantum API client.
pub struct IbmClient {
    client: Client,
    endpoint: String,
}

impl fmt::Debug for IbmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IbmClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl IbmClient {
    /// Create a client that authenticates every request with `token`.
    pub fn new(endpoint: impl Into<String>, token: &ApiToken) -> IbmResult<Self> {
        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .map_err(|_| IbmError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// List all backends visible to the account.
    pub async fn list_backends(&self) -> IbmResult<Vec<BackendInfo>> {
        let url = format!("{}/v1/backends", self.endpoint);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let list: BackendList = response.json().await?;
        Ok(list.backends)
    }

    /// Submit OpenQASM circuits to the Sampler primitive.
    pub async fn submit_sampler_job(
        &self,
        backend: &str,
        circuits: Vec<String>,
        shots: u32,
    ) -> IbmResult<SubmitResponse> {
        let url = format!("{}/v1/jobs", self.endpoint);
        let body = SamplerJobRequest {
            program_id: "sampler".into(),
            backend: backend.to_string(),
            params: SamplerParams {
                circuits,
                shots,
                skip_transpilation: false,
            },
        };

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response.json().await.map_err(IbmError::from)
    }

    /// Get job status.
    pub async fn get_job_status(&self, job_id: &str) -> IbmResult<JobStatusResponse> {
        let url = format!("{}/v1/jobs/{}", self.endpoint, job_id);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(IbmError::JobNotFound(job_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response.json().await.map_err(IbmError::from)
    }

    /// Get job results.
    pub async fn get_job_results(&self, job_id: &str) -> IbmResult<JobResultResponse> {
        let url = format!("{}/v1/jobs/{}/results", self.endpoint, job_id);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(IbmError::JobNotFound(job_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response.json().await.map_err(IbmError::from)
    }
}

/// Turn a non-success response into an error, reading the body if there is one.
async fn api_error(response: reqwest::Response) -> IbmError {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return IbmError::InvalidToken;
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "no body".to_string());
    parse_api_error(status, &body)
}

fn parse_api_error(status: StatusCode, body: &str) -> IbmError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(ApiErrorResponse {
            code,
            message: Some(message),
        }) => IbmError::ApiError { code, message },
        _ => IbmError::ApiError {
            code: Some(status.as_u16().to_string()),
            message: if body.is_empty() {
                status.to_string()
            } else {
                body.to_string()
            },
        },
    }
}

// API request/response types

#[derive(Debug, Serialize)]
struct SamplerJobRequest {
    program_id: String,
    backend: String,
    params: SamplerParams,
}

#[derive(Debug, Serialize)]
struct SamplerParams {
    circuits: Vec<String>,
    shots: u32,
    skip_transpilation: bool,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BackendList {
    backends: Vec<BackendInfo>,
}

/// Backend information.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendInfo {
    /// Backend name.
    pub name: String,
    /// Number of qubits.
    #[serde(alias = "n_qubits")]
    pub num_qubits: u32,
    /// Backend status.
    #[serde(default)]
    pub status: BackendStatus,
    /// Processor family, e.g. "Heron".
    #[serde(default)]
    pub processor_type: Option<serde_json::Value>,
    /// Basis gates.
    #[serde(default)]
    pub basis_gates: Vec<String>,
    /// Whether this is a simulator.
    #[serde(default)]
    pub simulator: bool,
    /// Maximum shots per job.
    #[serde(default)]
    pub max_shots: Option<u32>,
}

impl BackendInfo {
    /// Catalog entry used for device selection.
    pub fn to_device_info(&self) -> DeviceInfo {
        DeviceInfo {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            simulator: self.simulator,
            operational: self.status.operational,
            pending_jobs: self.status.pending_jobs,
            status_msg: self.status.status_msg.clone(),
        }
    }
}

/// Backend status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendStatus {
    /// Whether the backend is operational.
    #[serde(default)]
    pub operational: bool,
    /// Status message.
    #[serde(default)]
    pub status_msg: Option<String>,
    /// Number of pending jobs.
    #[serde(default)]
    pub pending_jobs: Option<u32>,
}

/// Job submission response.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    /// Job ID.
    pub id: String,
    /// Initial status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Job status response.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    /// Job ID.
    pub id: String,
    /// Job status.
    pub status: String,
    /// Backend name.
    #[serde(default)]
    pub backend: Option<String>,
    /// Error information (if failed).
    #[serde(default)]
    pub error: Option<JobError>,
    /// Extended state (newer API responses).
    #[serde(default)]
    pub state: Option<JobState>,
}

impl JobStatusResponse {
    fn normalized(&self) -> String {
        self.status.to_uppercase()
    }

    /// Check if job completed successfully.
    pub fn is_completed(&self) -> bool {
        self.normalized() == "COMPLETED"
    }

    /// Check if job failed.
    pub fn is_failed(&self) -> bool {
        matches!(self.normalized().as_str(), "FAILED" | "ERROR")
    }

    /// Check if job was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.normalized() == "CANCELLED"
    }

    /// Best available failure description.
    pub fn error_message(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|e| e.message.clone())
            .or_else(|| self.state.as_ref().and_then(|s| s.reason.clone()))
    }
}

/// Job error information.
#[derive(Debug, Clone, Deserialize)]
pub struct JobError {
    /// Error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Error message.
    pub message: String,
}

/// Extended job state.
#[derive(Debug, Clone, Deserialize)]
pub struct JobState {
    /// State name.
    #[serde(default)]
    pub status: Option<String>,
    /// Reason for the state.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Job results response.
#[derive(Debug, Clone, Deserialize)]
pub struct JobResultResponse {
    /// One entry per submitted circuit.
    #[serde(default)]
    pub results: Vec<SamplerResult>,
}

/// Result of one Sampler circuit.
#[derive(Debug, Clone, Deserialize)]
pub struct SamplerResult {
    /// Per-register raw samples (V2 Sampler).
    #[serde(default)]
    pub data: Option<HashMap<String, ClassicalRegisterData>>,
    /// Pre-aggregated counts (V1 Sampler).
    #[serde(default)]
    pub counts: Option<HashMap<String, u64>>,
    /// Quasi-probability distributions (V1 Sampler).
    #[serde(default)]
    pub quasi_dists: Option<Vec<HashMap<String, f64>>>,
    /// Execution metadata.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Raw samples of one classical register.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassicalRegisterData {
    /// Hex-encoded shot outcomes, e.g. `"0x1a"`.
    pub samples: Vec<String>,
}
