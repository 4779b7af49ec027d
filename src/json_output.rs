//! JSON output format for the collection report

use serde::{Deserialize, Serialize};

use crate::runner::RunOutcome;
use crate::stats;

/// Summary statistics for one test identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTestStat {
    /// Benchmark case name
    pub test_id: String,
    /// Every recorded value, ascending
    pub sorted_values: Vec<u64>,
    /// Arithmetic mean (absent when undefined)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    /// Mean of the fastest half (absent when undefined)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fastest_half_mean: Option<f64>,
}

/// Complete report for one collection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub trials_run: usize,
    pub failed_trials: usize,
    pub total_samples: u64,
    pub total_elapsed: u64,
    /// Per-test statistics in first-seen order
    pub tests: Vec<JsonTestStat>,
}

impl JsonReport {
    /// Build the report from a finished run
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        let totals = stats::calculate_totals(&outcome.results);
        let tests = stats::summarize(&outcome.results)
            .into_iter()
            .map(|stat| JsonTestStat {
                test_id: stat.test_id,
                sorted_values: stat.sorted_values,
                mean: stat.mean,
                fastest_half_mean: stat.fastest_half_mean,
            })
            .collect();
        Self {
            trials_run: outcome.trials_run,
            failed_trials: outcome.failed_trials,
            total_samples: totals.total_samples,
            total_elapsed: totals.total_elapsed,
            tests,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
