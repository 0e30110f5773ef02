//! Display data for a finished run.

use serde::{Deserialize, Serialize};

use qrpg_hal::{Counts, DeviceInfo};

use crate::decode::{DecodeError, decode_value, outcome_value};
use crate::password::Password;

/// One bar of the outcome histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramEntry {
    /// Outcome bitstring, most significant bit first.
    pub bitstring: String,
    /// Integer value of the bitstring.
    pub value: u8,
    /// Shots that produced this outcome.
    pub count: u64,
    /// Character this outcome decodes to.
    pub character: char,
}

/// Outcome histogram in bitstring order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Histogram {
    entries: Vec<HistogramEntry>,
}

impl Histogram {
    /// Build from backend counts.
    pub fn from_counts(counts: &Counts) -> Result<Self, DecodeError> {
        let entries = counts
            .iter()
            .map(|(bitstring, count)| {
                let value = outcome_value(bitstring)?;
                Ok(HistogramEntry {
                    bitstring: bitstring.to_string(),
                    value,
                    count,
                    character: char::from(decode_value(value)),
                })
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;
        Ok(Self { entries })
    }

    /// The bars.
    pub fn entries(&self) -> &[HistogramEntry] {
        &self.entries
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Tallest bar.
    pub fn max_count(&self) -> u64 {
        self.entries.iter().map(|e| e.count).max().unwrap_or(0)
    }

    /// Text bars scaled so the tallest is `width` blocks wide.
    pub fn render_bars(&self, width: usize) -> Vec<String> {
        let max = self.max_count().max(1);
        self.entries
            .iter()
            .map(|e| {
                let len = usize::try_from(e.count.saturating_mul(width as u64) / max)
                    .unwrap_or(width)
                    .max(1);
                format!(
                    "{} ({:>2}) {:<width$} {} '{}'",
                    e.bitstring,
                    e.value,
                    "█".repeat(len),
                    e.count,
                    e.character,
                )
            })
            .collect()
    }
}

/// Everything a surface needs to show a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    /// The password.
    pub password: Password,
    /// Backend that ran the job.
    pub backend: String,
    /// Job identifier on that backend.
    pub job_id: String,
    /// Text diagram of the circuit.
    pub circuit_diagram: String,
    /// OpenQASM 3 source of the circuit.
    pub qasm: String,
    /// Outcome histogram.
    pub histogram: Histogram,
    /// Shots requested.
    pub shots: u32,
    /// Progress messages in the order they were reported.
    pub messages: Vec<String>,
    /// Wall time from submission to result.
    pub elapsed_ms: u64,
}

/// A device and whether it can run the password circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSummary {
    #[serde(flatten)]
    pub device: DeviceInfo,
    pub eligible: bool,
}

/// Device catalog of a remote account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceReport {
    /// Provider name.
    pub provider: String,
    /// Filter used for eligibility.
    pub filter: String,
    /// Every device the account can see.
    pub devices: Vec<DeviceSummary>,
    /// Device a run would pick right now.
    pub least_busy: Option<String>,
}
