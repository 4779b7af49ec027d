//! Summary statistics per test identifier
//!
//! Means are exact `u64` sums divided in `f64`; run-level totals use
//! Trueno SIMD sums. Empty sequences yield undefined (`None`) statistics
//! instead of dividing by zero.

use crate::aggregate::ResultSet;

/// Summary statistics for one test identifier
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStat {
    pub test_id: String,
    /// Ascending permutation of every value recorded for this identifier
    pub sorted_values: Vec<u64>,
    /// Arithmetic mean; `None` when no value was recorded
    pub mean: Option<f64>,
    /// Mean of the fastest floor(n/2) values; falls back to `mean` at n = 1,
    /// `None` when no value was recorded
    pub fastest_half_mean: Option<f64>,
}

/// Run-level totals across all test identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTotals {
    pub total_samples: u64,
    pub total_elapsed: u64,
}

/// Summarize every entry of a frozen result set, in first-seen order
pub fn summarize(results: &ResultSet) -> Vec<SummaryStat> {
    results
        .iter()
        .map(|(test_id, values)| summary_for(test_id, values))
        .collect()
}

/// Summarize one value sequence
pub fn summary_for(test_id: &str, values: &[u64]) -> SummaryStat {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    if n == 0 {
        return SummaryStat {
            test_id: test_id.to_string(),
            sorted_values: sorted,
            mean: None,
            fastest_half_mean: None,
        };
    }

    let mean = mean_of(&sorted);
    let half = n / 2;
    // At n = 1 the fastest-half slice is empty; use the single sample
    // rather than averaging nothing.
    let fastest_half_mean = if half == 0 { mean } else { mean_of(&sorted[..half]) };

    SummaryStat {
        test_id: test_id.to_string(),
        sorted_values: sorted,
        mean: Some(mean),
        fastest_half_mean: Some(fastest_half_mean),
    }
}

fn mean_of(values: &[u64]) -> f64 {
    let sum: u128 = values.iter().map(|&v| u128::from(v)).sum();
    sum as f64 / values.len() as f64
}

/// Calculate run totals using Trueno for SIMD-accelerated sums
pub fn calculate_totals(results: &ResultSet) -> RunTotals {
    if results.is_empty() {
        return RunTotals {
            total_samples: 0,
            total_elapsed: 0,
        };
    }

    let counts: Vec<f32> = results.iter().map(|(_, v)| v.len() as f32).collect();
    let sums: Vec<f32> = results
        .iter()
        .map(|(_, v)| v.iter().sum::<u64>() as f32)
        .collect();

    let total_samples = trueno::Vector::from_slice(&counts).sum().unwrap_or(0.0) as u64;
    let total_elapsed = trueno::Vector::from_slice(&sums).sum().unwrap_or(0.0) as u64;

    RunTotals {
        total_samples,
        total_elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Measurement;

    fn result_set(entries: &[(&str, &[u64])]) -> ResultSet {
        let mut results = ResultSet::new();
        for (test_id, values) in entries {
            for &elapsed in *values {
                results.record(Measurement {
                    test_id: test_id.to_string(),
                    elapsed,
                });
            }
        }
        results
    }

    #[test]
    fn test_three_trials_example() {
        // 10, 20, 30 -> mean 20, fastest half = mean of first floor(3/2)=1
        let stat = summary_for("Cache1", &[10, 20, 30]);
        assert_eq!(stat.sorted_values, vec![10, 20, 30]);
        assert_eq!(stat.mean, Some(20.0));
        assert_eq!(stat.fastest_half_mean, Some(10.0));
    }

    #[test]
    fn test_sort_is_ascending_permutation() {
        let stat = summary_for("T", &[30, 10, 20, 10]);
        assert_eq!(stat.sorted_values, vec![10, 10, 20, 30]);
    }

    #[test]
    fn test_sorting_sorted_input_is_noop() {
        let stat = summary_for("T", &[1, 2, 3, 4]);
        assert_eq!(stat.sorted_values, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_single_sample_falls_back_to_mean() {
        let stat = summary_for("T", &[42]);
        assert_eq!(stat.mean, Some(42.0));
        assert_eq!(stat.fastest_half_mean, Some(42.0));
    }

    #[test]
    fn test_two_samples_fastest_half_is_minimum() {
        let stat = summary_for("T", &[10, 5]);
        assert_eq!(stat.mean, Some(7.5));
        assert_eq!(stat.fastest_half_mean, Some(5.0));
    }

    #[test]
    fn test_empty_sequence_is_undefined() {
        let stat = summary_for("T", &[]);
        assert!(stat.sorted_values.is_empty());
        assert_eq!(stat.mean, None);
        assert_eq!(stat.fastest_half_mean, None);
    }

    #[test]
    fn test_fastest_half_discounts_slow_outliers() {
        // One scheduling-noise outlier should not move the fastest half.
        let stat = summary_for("T", &[10, 11, 12, 900]);
        assert_eq!(stat.fastest_half_mean, Some(10.5));
        assert_eq!(stat.mean, Some(233.25));
    }

    #[test]
    fn test_large_values_keep_exact_mean() {
        let v = 1_u64 << 40;
        let stat = summary_for("T", &[v, v]);
        assert_eq!(stat.mean, Some(v as f64));
    }

    #[test]
    fn test_summarize_keeps_first_seen_order() {
        let results = result_set(&[("B", &[2]), ("A", &[1])]);
        let summaries = summarize(&results);
        let ids: Vec<&str> = summaries.iter().map(|s| s.test_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_totals_empty() {
        let results = ResultSet::new();
        assert_eq!(
            calculate_totals(&results),
            RunTotals {
                total_samples: 0,
                total_elapsed: 0
            }
        );
    }

    #[test]
    fn test_totals_use_trueno_sums() {
        let results = result_set(&[("A", &[10, 20]), ("B", &[30])]);
        let totals = calculate_totals(&results);
        assert_eq!(totals.total_samples, 3);
        assert_eq!(totals.total_elapsed, 60);
    }
}
