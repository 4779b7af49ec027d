//! Aggregation of measurements across trials

use std::collections::HashMap;

use crate::parser::Measurement;

/// Mapping from test identifier to every elapsed value recorded for it,
/// in trial-index order then line order within a trial.
///
/// Keys are created lazily on first sighting and iteration follows that
/// first-seen order, so reports are deterministic. The set only grows
/// during sampling and is frozen before statistics run.
#[derive(Debug, Default)]
pub struct ResultSet {
    /// Values keyed by test identifier
    values: HashMap<String, Vec<u64>>,
    /// Identifiers in order of first appearance
    order: Vec<String>,
}

impl ResultSet {
    /// Create an empty result set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one measurement, creating the key if absent
    pub fn record(&mut self, measurement: Measurement) {
        let Measurement { test_id, elapsed } = measurement;
        match self.values.get_mut(&test_id) {
            Some(seq) => seq.push(elapsed),
            None => {
                self.order.push(test_id.clone());
                self.values.insert(test_id, vec![elapsed]);
            }
        }
    }

    /// Fold one trial's parsed measurements, possibly empty
    pub fn record_trial(&mut self, measurements: impl IntoIterator<Item = Measurement>) {
        for measurement in measurements {
            self.record(measurement);
        }
    }

    /// Values recorded for a test identifier, if it was ever seen
    pub fn values(&self, test_id: &str) -> Option<&[u64]> {
        self.values.get(test_id).map(Vec::as_slice)
    }

    /// Iterate entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.order
            .iter()
            .map(|id| (id.as_str(), self.values[id].as_slice()))
    }

    /// Number of distinct test identifiers
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no measurement was ever recorded
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(test_id: &str, elapsed: u64) -> Measurement {
        Measurement {
            test_id: test_id.to_string(),
            elapsed,
        }
    }

    #[test]
    fn test_record_appends_in_order() {
        let mut results = ResultSet::new();
        results.record(m("Cache1", 10));
        results.record(m("Cache1", 30));
        results.record(m("Cache1", 20));

        assert_eq!(results.values("Cache1"), Some(&[10, 30, 20][..]));
    }

    #[test]
    fn test_keys_created_lazily() {
        let mut results = ResultSet::new();
        assert!(results.is_empty());
        assert_eq!(results.values("Cache1"), None);

        results.record(m("Cache1", 1));
        assert_eq!(results.len(), 1);
        assert_eq!(results.values("Cache1"), Some(&[1][..]));
    }

    #[test]
    fn test_iteration_is_first_seen_order() {
        let mut results = ResultSet::new();
        results.record(m("Zeta", 1));
        results.record(m("Alpha", 2));
        results.record(m("Zeta", 3));
        results.record(m("Mid", 4));

        let ids: Vec<&str> = results.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_record_trial_folds_all_measurements() {
        let mut results = ResultSet::new();
        results.record_trial(vec![m("A", 1), m("B", 2), m("A", 3)]);
        results.record_trial(Vec::new());
        results.record_trial(vec![m("B", 4)]);

        assert_eq!(results.values("A"), Some(&[1, 3][..]));
        assert_eq!(results.values("B"), Some(&[2, 4][..]));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_no_deduplication() {
        let mut results = ResultSet::new();
        results.record(m("A", 7));
        results.record(m("A", 7));
        results.record(m("A", 7));
        assert_eq!(results.values("A"), Some(&[7, 7, 7][..]));
    }

    #[test]
    fn test_value_count_matches_matching_lines() {
        // One value per matching line across trials, including repeats
        // within a single trial.
        let mut results = ResultSet::new();
        results.record_trial(vec![m("Cache1", 10)]);
        results.record_trial(vec![m("Cache1", 20), m("Cache1", 21)]);
        results.record_trial(vec![m("Cache2", 5)]);

        assert_eq!(results.values("Cache1").map(|v| v.len()), Some(3));
        assert_eq!(results.values("Cache2").map(|v| v.len()), Some(1));
    }
}
