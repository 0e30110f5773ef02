//! IBM Quantum backend for a single named device.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tracing::info;

use qrpg_hal::{
    Backend, Capabilities, Counts, ExecutionResult, HalError, HalResult, JobId, JobStatus,
};
use qrpg_ir::Circuit;

use crate::api::{BackendInfo, IbmClient, JobResultResponse, JobStatusResponse};
use crate::error::{IbmError, IbmResult};

/// Runs jobs on one IBM Quantum device.
pub struct IbmBackend {
    client: Arc<IbmClient>,
    capabilities: Capabilities,
    /// Classical width of each submitted circuit, keyed by job id.
    clbit_widths: Mutex<FxHashMap<String, usize>>,
}

impl IbmBackend {
    /// Create a backend for `device` sharing an authenticated client.
    pub fn new(client: Arc<IbmClient>, device: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            client,
            capabilities: Capabilities::ibm(device, num_qubits),
            clbit_widths: Mutex::new(FxHashMap::default()),
        }
    }

    /// Create a backend from a catalog entry, honouring its shot limit.
    pub fn from_info(client: Arc<IbmClient>, info: BackendInfo) -> Self {
        let mut capabilities = Capabilities::ibm(&info.name, info.num_qubits);
        if let Some(max_shots) = info.max_shots {
            capabilities.max_shots = max_shots;
        }
        Self {
            client,
            capabilities,
            clbit_widths: Mutex::new(FxHashMap::default()),
        }
    }

    fn clbit_width(&self, job_id: &JobId) -> Option<usize> {
        self.clbit_widths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&job_id.0)
            .copied()
    }
}

#[async_trait]
impl Backend for IbmBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        self.capabilities.check_submission(circuit, shots)?;
        let qasm = qrpg_qasm3::emit(circuit).map_err(IbmError::from)?;

        let response = self
            .client
            .submit_sampler_job(self.name(), vec![qasm], shots)
            .await
            .map_err(|e| match e {
                IbmError::InvalidToken => HalError::from(e),
                other => HalError::SubmissionFailed(other.to_string()),
            })?;

        info!(backend = self.name(), job_id = %response.id, shots, "submitted job");
        self.clbit_widths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(response.id.clone(), circuit.num_clbits());
        Ok(JobId::new(response.id))
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let status = self.client.get_job_status(&job_id.0).await?;
        Ok(map_status(&status))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let status = self.client.get_job_status(&job_id.0).await?;
        if !status.is_completed() {
            if status.is_failed() {
                let msg = status
                    .error_message()
                    .unwrap_or_else(|| "Job failed".to_string());
                return Err(HalError::JobFailed(msg));
            }
            if status.is_cancelled() {
                return Err(HalError::JobCancelled);
            }
            return Err(HalError::Backend(format!(
                "Job {} not yet completed",
                job_id.0
            )));
        }

        let results = self.client.get_job_results(&job_id.0).await?;
        let counts = results_to_counts(&results, self.clbit_width(job_id))?;
        let shots = u32::try_from(checked_total(&counts)?).unwrap_or(u32::MAX);
        Ok(ExecutionResult::new(counts, shots))
    }
}

/// Map a service job state onto [`JobStatus`]. Unknown states count as running.
fn map_status(status: &JobStatusResponse) -> JobStatus {
    match status.status.to_uppercase().as_str() {
        "QUEUED" | "INITIALIZING" => JobStatus::Queued,
        "VALIDATING" | "RUNNING" => JobStatus::Running,
        "COMPLETED" => JobStatus::Completed,
        "FAILED" | "ERROR" => JobStatus::Failed(
            status
                .error_message()
                .unwrap_or_else(|| "Unknown error".to_string()),
        ),
        "CANCELLED" => JobStatus::Cancelled,
        _ => JobStatus::Running,
    }
}

/// Convert a Sampler payload into [`Counts`] with keys written `c[n-1] … c[0]`.
///
/// `width` is the circuit's classical width; without it the width is
/// inferred from the largest outcome.
fn results_to_counts(results: &JobResultResponse, width: Option<usize>) -> IbmResult<Counts> {
    let result = results
        .results
        .first()
        .ok_or_else(|| IbmError::MalformedResult("no circuit results".into()))?;

    let mut outcomes: Vec<(u64, u64)> = Vec::new();
    if let Some(data) = &result.data {
        for register in data.values() {
            for sample in &register.samples {
                outcomes.push((parse_hex(sample)?, 1));
            }
        }
    } else if let Some(raw) = &result.counts {
        for (key, &count) in raw {
            outcomes.push((parse_count_key(key)?, count));
        }
    } else if let Some(dist) = result.quasi_dists.as_ref().and_then(|d| d.first()) {
        let shots = result
            .metadata
            .as_ref()
            .and_then(|m| m.get("shots"))
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| IbmError::MalformedResult("quasi distribution without shots".into()))?;
        outcomes = allocate_shots(dist, shots)?;
    } else {
        return Err(IbmError::MalformedResult("no samples or counts".into()));
    }

    let width = width.unwrap_or_else(|| infer_bit_width(outcomes.iter().map(|(v, _)| *v)));
    let mut counts = Counts::new();
    for (value, count) in outcomes {
        if width < 64 && value >> width != 0 {
            return Err(IbmError::MalformedResult(format!(
                "outcome {value} does not fit in {width} bits"
            )));
        }
        counts.insert(format!("{value:0width$b}"), count);
    }
    Ok(counts)
}

/// Total shots across `counts`, rejecting payloads whose counts overflow `u64`.
fn checked_total(counts: &Counts) -> IbmResult<u64> {
    counts
        .total_shots()
        .ok_or_else(|| IbmError::MalformedResult("counts overflow a 64-bit total".into()))
}

/// Split `shots` across a quasi-probability distribution by largest remainder.
///
/// Negative quasi-probabilities are clipped to zero and the rest renormalised,
/// so the returned counts always sum to `shots`. Ties on the remainder go to the
/// smaller outcome.
fn allocate_shots(dist: &HashMap<String, f64>, shots: u64) -> IbmResult<Vec<(u64, u64)>> {
    let mut entries = dist
        .iter()
        .map(|(key, &prob)| {
            key.parse::<u64>()
                .map(|value| (value, prob.max(0.0)))
                .map_err(|_| IbmError::MalformedResult(format!("outcome key '{key}'")))
        })
        .collect::<IbmResult<Vec<_>>>()?;
    entries.sort_unstable_by_key(|(value, _)| *value);

    let mass: f64 = entries.iter().map(|(_, p)| p).sum();
    if !mass.is_finite() || mass <= 0.0 {
        return Err(IbmError::MalformedResult(
            "quasi distribution has no positive mass".into(),
        ));
    }

    let mut allocated = Vec::with_capacity(entries.len());
    let mut remainders = Vec::with_capacity(entries.len());
    for (i, &(value, prob)) in entries.iter().enumerate() {
        let exact = prob / mass * shots as f64;
        let floor = exact.floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = floor as u64;
        allocated.push((value, count));
        remainders.push((i, exact - floor));
    }

    let assigned: u64 = allocated.iter().map(|(_, c)| c).sum();
    let leftover = usize::try_from(shots.saturating_sub(assigned)).unwrap_or(usize::MAX);
    remainders.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    for &(i, _) in remainders.iter().cycle().take(leftover) {
        allocated[i].1 += 1;
    }

    allocated.retain(|&(_, count)| count > 0);
    Ok(allocated)
}

fn parse_hex(sample: &str) -> IbmResult<u64> {
    let digits = sample.strip_prefix("0x").unwrap_or(sample);
    u64::from_str_radix(digits, 16)
        .map_err(|_| IbmError::MalformedResult(format!("sample '{sample}'")))
}

/// Count keys are either hex (`0x1a`) or bitstrings, possibly space-separated by register.
fn parse_count_key(key: &str) -> IbmResult<u64> {
    if key.starts_with("0x") {
        return parse_hex(key);
    }
    let bits: String = key.chars().filter(|c| !c.is_whitespace()).collect();
    u64::from_str_radix(&bits, 2).map_err(|_| IbmError::MalformedResult(format!("count key '{key}'")))
}

/// Smallest width that holds every outcome, at least one bit.
fn infer_bit_width(values: impl Iterator<Item = u64>) -> usize {
    let max = values.max().unwrap_or(0);
    (64 - max.leading_zeros() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClassicalRegisterData, SamplerResult};
    use std::collections::HashMap;

    fn sampler(result: SamplerResult) -> JobResultResponse {
        JobResultResponse {
            results: vec![result],
        }
    }

    fn empty_result() -> SamplerResult {
        SamplerResult {
            data: None,
            counts: None,
            quasi_dists: None,
            metadata: None,
        }
    }

    fn status(json: &str) -> JobStatusResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_map_status() {
        assert_eq!(
            map_status(&status(r#"{"id": "j", "status": "Queued"}"#)),
            JobStatus::Queued
        );
        assert_eq!(
            map_status(&status(r#"{"id": "j", "status": "RUNNING"}"#)),
            JobStatus::Running
        );
        assert_eq!(
            map_status(&status(r#"{"id": "j", "status": "Completed"}"#)),
            JobStatus::Completed
        );
        assert_eq!(
            map_status(&status(r#"{"id": "j", "status": "Cancelled"}"#)),
            JobStatus::Cancelled
        );
        assert_eq!(
            map_status(&status(r#"{"id": "j", "status": "Calibrating"}"#)),
            JobStatus::Running
        );
    }

    #[test]
    fn test_map_status_failed_carries_message() {
        let s = status(r#"{"id": "j", "status": "Failed", "error": {"message": "too deep"}}"#);
        assert_eq!(map_status(&s), JobStatus::Failed("too deep".into()));
    }

    #[test]
    fn test_v2_samples_padded_to_circuit_width() {
        let mut data = HashMap::new();
        data.insert(
            "meas".to_string(),
            ClassicalRegisterData {
                samples: vec!["0x1".into(), "0x1f".into(), "0x1".into(), "0x0".into()],
            },
        );
        let results = sampler(SamplerResult {
            data: Some(data),
            ..empty_result()
        });

        let counts = results_to_counts(&results, Some(5)).unwrap();
        assert_eq!(counts.get("00001"), Some(2));
        assert_eq!(counts.get("11111"), Some(1));
        assert_eq!(counts.get("00000"), Some(1));
        assert_eq!(counts.total_shots(), Some(4));
    }

    #[test]
    fn test_v1_counts_hex_and_binary_keys() {
        let mut raw = HashMap::new();
        raw.insert("0x3".to_string(), 3u64);
        raw.insert("101".to_string(), 2u64);
        let results = sampler(SamplerResult {
            counts: Some(raw),
            ..empty_result()
        });

        let counts = results_to_counts(&results, Some(5)).unwrap();
        assert_eq!(counts.get("00011"), Some(3));
        assert_eq!(counts.get("00101"), Some(2));
    }

    #[test]
    fn test_quasi_dists_scaled_by_shots() {
        let mut dist = HashMap::new();
        dist.insert("0".to_string(), 0.25);
        dist.insert("31".to_string(), 0.75);
        let results = sampler(SamplerResult {
            quasi_dists: Some(vec![dist]),
            metadata: Some(serde_json::json!({"shots": 8})),
            ..empty_result()
        });

        let counts = results_to_counts(&results, Some(5)).unwrap();
        assert_eq!(counts.get("00000"), Some(2));
        assert_eq!(counts.get("11111"), Some(6));
    }

    #[test]
    fn test_quasi_dists_preserve_total_shots() {
        let third = 1.0 / 3.0;
        let mut dist = HashMap::new();
        dist.insert("0".to_string(), third);
        dist.insert("1".to_string(), third);
        dist.insert("2".to_string(), third);
        let results = sampler(SamplerResult {
            quasi_dists: Some(vec![dist]),
            metadata: Some(serde_json::json!({"shots": 8})),
            ..empty_result()
        });

        let counts = results_to_counts(&results, Some(5)).unwrap();
        assert_eq!(counts.total_shots(), Some(8));
        assert_eq!(counts.get("00000"), Some(3));
        assert_eq!(counts.get("00001"), Some(3));
        assert_eq!(counts.get("00010"), Some(2));
    }

    #[test]
    fn test_quasi_dists_negative_entries_clipped() {
        let mut dist = HashMap::new();
        dist.insert("0".to_string(), 0.55);
        dist.insert("1".to_string(), 0.5);
        dist.insert("2".to_string(), -0.05);

        let allocated = allocate_shots(&dist, 10).unwrap();
        let total: u64 = allocated.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 10);
        assert!(allocated.iter().all(|&(value, _)| value != 2));
    }

    #[test]
    fn test_quasi_dists_without_mass_rejected() {
        let mut dist = HashMap::new();
        dist.insert("0".to_string(), -0.1);
        assert!(matches!(
            allocate_shots(&dist, 4),
            Err(IbmError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_overflowing_counts_rejected() {
        let mut raw = HashMap::new();
        raw.insert("0x0".to_string(), u64::MAX);
        raw.insert("0x1".to_string(), 9u64);
        let results = sampler(SamplerResult {
            counts: Some(raw),
            ..empty_result()
        });

        let counts = results_to_counts(&results, Some(5)).unwrap();
        assert!(matches!(
            checked_total(&counts),
            Err(IbmError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_width_inferred_when_unknown() {
        let mut data = HashMap::new();
        data.insert(
            "c".to_string(),
            ClassicalRegisterData {
                samples: vec!["0x0".into(), "0x3".into()],
            },
        );
        let results = sampler(SamplerResult {
            data: Some(data),
            ..empty_result()
        });

        let counts = results_to_counts(&results, None).unwrap();
        assert_eq!(counts.get("00"), Some(1));
        assert_eq!(counts.get("11"), Some(1));
    }

    #[test]
    fn test_outcome_wider_than_circuit_rejected() {
        let mut raw = HashMap::new();
        raw.insert("0x40".to_string(), 1u64);
        let results = sampler(SamplerResult {
            counts: Some(raw),
            ..empty_result()
        });
        assert!(matches!(
            results_to_counts(&results, Some(5)),
            Err(IbmError::MalformedResult(_))
        ));
    }

    #[test]
    fn test_empty_payload_rejected() {
        assert!(results_to_counts(&sampler(empty_result()), Some(5)).is_err());
        assert!(results_to_counts(&JobResultResponse { results: vec![] }, Some(5)).is_err());
    }

    #[test]
    fn test_infer_bit_width() {
        assert_eq!(infer_bit_width([0u64].into_iter()), 1);
        assert_eq!(infer_bit_width([3u64, 1].into_iter()), 2);
        assert_eq!(infer_bit_width([31u64].into_iter()), 5);
    }

    #[test]
    fn test_backend_from_info_uses_device_limits() {
        let info: BackendInfo = serde_json::from_str(
            r#"{"name": "ibm_kyiv", "num_qubits": 127, "max_shots": 20000,
                "status": {"operational": true, "pending_jobs": 4}}"#,
        )
        .unwrap();
        let token = qrpg_hal::ApiToken::new("t").unwrap();
        let client = Arc::new(IbmClient::new(crate::api::LEGACY_ENDPOINT, &token).unwrap());

        let backend = IbmBackend::from_info(client, info);
        assert_eq!(backend.name(), "ibm_kyiv");
        assert_eq!(backend.capabilities().num_qubits, 127);
        assert_eq!(backend.capabilities().max_shots, 20000);
        assert!(!backend.capabilities().is_simulator);
    }
}
