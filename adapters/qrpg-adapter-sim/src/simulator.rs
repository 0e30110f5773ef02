//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use qrpg_hal::{
    Backend, Capabilities, Counts, ExecutionResult, HalError, HalResult, JobId, JobStatus,
};
use qrpg_ir::Circuit;

use crate::statevector::{Sampler, Statevector};

/// Default qubit limit; 2^20 amplitudes stay well under 20 MB.
const DEFAULT_MAX_QUBITS: u32 = 20;

/// Simulator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Widest circuit accepted.
    pub max_qubits: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }
}

/// Local simulator backend.
///
/// Jobs run to completion inside `submit`, so `status` reports `Completed`
/// immediately afterwards.
pub struct SimulatorBackend {
    capabilities: Capabilities,
    rng: Mutex<StdRng>,
    /// Finished results keyed by job id.
    jobs: Mutex<FxHashMap<String, ExecutionResult>>,
}

impl SimulatorBackend {
    /// Create a simulator seeded from OS entropy.
    pub fn new() -> Self {
        Self::from_config(SimulatorConfig::default())
    }

    /// Create a simulator whose samples are reproducible for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_config(SimulatorConfig {
            seed: Some(seed),
            ..SimulatorConfig::default()
        })
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::from_config(SimulatorConfig {
            max_qubits,
            ..SimulatorConfig::default()
        })
    }

    /// Create a simulator from settings.
    pub fn from_config(config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            capabilities: Capabilities::simulator(config.max_qubits),
            rng: Mutex::new(rng),
            jobs: Mutex::new(FxHashMap::default()),
        }
    }

    /// Simulate once, then sample `shots` outcomes.
    #[instrument(skip(self, circuit))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let start = Instant::now();
        let num_qubits = circuit.num_qubits();
        debug!("Starting simulation: {} qubits, {} shots", num_qubits, shots);

        let mut sv = Statevector::new(num_qubits);
        for inst in circuit.instructions() {
            sv.apply(inst);
        }
        let sampler = Sampler::new(&sv.probabilities());

        let mut histogram = vec![0u64; 1 << num_qubits];
        {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            for _ in 0..shots {
                histogram[sampler.sample(&mut *rng)] += 1;
            }
        }

        let readout = Readout::new(circuit);
        let mut counts = Counts::new();
        for (index, &count) in histogram.iter().enumerate() {
            if count > 0 {
                counts.insert(readout.bitstring(index), count);
            }
        }

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        ExecutionResult::new(counts, shots)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a sampled basis index to the classical register contents.
struct Readout {
    /// `(qubit, clbit)` for every measurement.
    pairs: Vec<(usize, usize)>,
    num_clbits: usize,
}

impl Readout {
    fn new(circuit: &Circuit) -> Self {
        let pairs = circuit
            .instructions()
            .iter()
            .filter(|i| i.is_measure())
            .flat_map(|i| i.measured_pairs())
            .map(|(q, c)| (q.0 as usize, c.0 as usize))
            .collect();
        Self {
            pairs,
            num_clbits: circuit.num_clbits(),
        }
    }

    /// Classical bits written `c[n-1] … c[0]`; unmeasured bits read `0`.
    fn bitstring(&self, index: usize) -> String {
        let mut bits = vec![b'0'; self.num_clbits];
        for &(qubit, clbit) in &self.pairs {
            if (index >> qubit) & 1 == 1 {
                bits[self.num_clbits - 1 - clbit] = b'1';
            }
        }
        bits.into_iter().map(char::from).collect()
    }
}

/// Gates may not act on a qubit after it has been measured.
fn check_terminal_measurements(circuit: &Circuit) -> HalResult<()> {
    let mut measured = vec![false; circuit.num_qubits()];
    for inst in circuit.instructions() {
        if inst.is_measure() {
            for q in &inst.qubits {
                measured[q.0 as usize] = true;
            }
        } else if inst.is_gate() {
            if let Some(q) = inst.qubits.iter().find(|q| measured[q.0 as usize]) {
                return Err(HalError::InvalidCircuit(format!(
                    "gate '{}' on {q} after measurement is not supported by the simulator",
                    inst.name()
                )));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        self.capabilities.check_submission(circuit, shots)?;
        check_terminal_measurements(circuit)?;

        let job_id = JobId::new(Uuid::new_v4().to_string());
        debug!("Submitted job: {}", job_id);

        let result = self.run_simulation(circuit, shots);
        self.jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(job_id.0.clone(), result);

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if jobs.contains_key(&job_id.0) {
            Ok(JobStatus::Completed)
        } else {
            Err(HalError::JobNotFound(job_id.0.clone()))
        }
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.get(&job_id.0)
            .cloned()
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrpg_ir::{ClbitId, QubitId};

    #[test]
    fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 20);
        assert_eq!(backend.name(), "simulator");
    }

    #[tokio::test]
    async fn test_password_register_counts() {
        let backend = SimulatorBackend::with_seed(7);
        let circuit = Circuit::password_register().unwrap();

        let job_id = backend.submit(&circuit, 12).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);

        let result = backend.wait(&job_id).await.unwrap();
        assert_eq!(result.shots, 12);
        assert_eq!(result.counts.total_shots(), Some(12));
        for (bitstring, _) in result.counts.iter() {
            assert_eq!(bitstring.len(), 5);
            assert!(bitstring.chars().all(|c| c == '0' || c == '1'));
        }
    }

    #[tokio::test]
    async fn test_seeded_runs_reproducible() {
        let circuit = Circuit::password_register().unwrap();

        let run = |seed| {
            let circuit = circuit.clone();
            async move {
                let backend = SimulatorBackend::with_seed(seed);
                let job = backend.submit(&circuit, 64).await.unwrap();
                backend.result(&job).await.unwrap().counts
            }
        };

        assert_eq!(run(1234).await, run(1234).await);
    }

    #[tokio::test]
    async fn test_bit_order_last_char_is_clbit_zero() {
        let backend = SimulatorBackend::with_seed(0);
        let mut circuit = Circuit::with_size("x0", 5, 5);
        circuit.x(QubitId(0)).unwrap();
        for i in 0..5 {
            circuit.measure(QubitId(i), ClbitId(i)).unwrap();
        }

        let job = backend.submit(&circuit, 4).await.unwrap();
        let result = backend.result(&job).await.unwrap();
        assert_eq!(result.counts.get("00001"), Some(4));
    }

    #[tokio::test]
    async fn test_bell_state_correlated() {
        let backend = SimulatorBackend::with_seed(3);
        let mut circuit = Circuit::with_size("bell", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();

        let job = backend.submit(&circuit, 200).await.unwrap();
        let counts = backend.result(&job).await.unwrap().counts;
        assert_eq!(
            counts.get("00").unwrap_or(0) + counts.get("11").unwrap_or(0),
            200
        );
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);
        let mut circuit = Circuit::with_size("test", 10, 0);
        circuit.measure_all().unwrap();

        let result = backend.submit(&circuit, 100).await;
        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
    }

    #[tokio::test]
    async fn test_zero_shots_rejected() {
        let backend = SimulatorBackend::new();
        let circuit = Circuit::password_register().unwrap();
        let result = backend.submit(&circuit, 0).await;
        assert!(matches!(result, Err(HalError::InvalidShots(_))));
    }

    #[tokio::test]
    async fn test_gate_after_measure_rejected() {
        let backend = SimulatorBackend::new();
        let mut circuit = Circuit::with_size("mid", 1, 1);
        circuit
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap();
        let result = backend.submit(&circuit, 1).await;
        assert!(matches!(result, Err(HalError::InvalidCircuit(_))));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatorBackend::new();
        let missing = JobId::new("nope");
        assert!(matches!(
            backend.status(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(matches!(
            backend.result(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
    }
}
