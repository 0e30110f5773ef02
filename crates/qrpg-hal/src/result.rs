//! Execution results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Measurement outcome counts, keyed by bitstring.
///
/// Bitstrings are written most-significant classical bit first, so the last
/// character is `c[0]`. Iteration order is the lexical order of the
/// bitstrings, which makes any downstream concatenation deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`, accumulating with any existing entry.
    ///
    /// Accumulation saturates at `u64::MAX`; a saturated histogram then has no
    /// [`total_shots`](Self::total_shots) unless it holds that single entry.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        let entry = self.counts.entry(bitstring.into()).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Occurrences of a bitstring, if it was observed.
    pub fn get(&self, bitstring: &str) -> Option<u64> {
        self.counts.get(bitstring).copied()
    }

    /// Sum of all occurrences, `None` if it does not fit in a `u64`.
    pub fn total_shots(&self) -> Option<u64> {
        self.counts
            .values()
            .try_fold(0u64, |total, &count| total.checked_add(count))
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (bitstring, count) in iter {
            counts.insert(bitstring, count);
        }
        counts
    }
}

/// Result of executing a circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement counts.
    pub counts: Counts,
    /// Number of shots requested.
    pub shots: u32,
}

impl ExecutionResult {
    /// Create a new result.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self { counts, shots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.insert("00001", 2);
        counts.insert("00001", 1);
        counts.insert("11111", 4);

        assert_eq!(counts.get("00001"), Some(3));
        assert_eq!(counts.get("00000"), None);
        assert_eq!(counts.total_shots(), Some(7));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_counts_ordering() {
        let counts: Counts = [("10000", 1), ("00011", 1), ("00000", 2)]
            .into_iter()
            .collect();

        let keys: Vec<_> = counts.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["00000", "00011", "10000"]);
    }

    #[test]
    fn test_total_shots_overflow_is_none() {
        let counts: Counts = [("00000", u64::MAX), ("00001", 9)].into_iter().collect();
        assert_eq!(counts.total_shots(), None);

        let single: Counts = [("00000", u64::MAX)].into_iter().collect();
        assert_eq!(single.total_shots(), Some(u64::MAX));
    }

    #[test]
    fn test_insert_saturates() {
        let mut counts = Counts::new();
        counts.insert("11111", u64::MAX);
        counts.insert("11111", 3);
        assert_eq!(counts.get("11111"), Some(u64::MAX));
    }

    #[test]
    fn test_counts_serialize_as_map() {
        let counts: Counts = [("00001", 3u64)].into_iter().collect();
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"00001":3}"#);
    }

    #[test]
    fn test_execution_result() {
        let result = ExecutionResult::new(Counts::new(), 8);
        assert_eq!(result.shots, 8);
        assert!(result.counts.is_empty());
    }
}
