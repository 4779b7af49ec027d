//! Trial driver: repeats trials sequentially or with a bounded worker pool
//!
//! Regardless of scheduling, trial outputs are merged into the result set
//! in trial-index order, so summaries are deterministic for a given set of
//! outputs. A cancel token stops new trials from being dispatched while
//! letting in-flight trials finish or time out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::aggregate::ResultSet;
use crate::parser::LineGrammar;
use crate::sampler::{SampleError, Sampler, TrialOutcome, TrialOutput};

/// Shared flag that stops new trials from being launched
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Configuration for one collection run
#[derive(Debug)]
pub struct RunConfig {
    pub sampler: Sampler,
    pub grammar: LineGrammar,
    pub trials: usize,
    pub jobs: usize,
    pub cancel: CancelToken,
}

/// Aggregated result of one collection run
#[derive(Debug)]
pub struct RunOutcome {
    pub results: ResultSet,
    pub trials_run: usize,
    pub failed_trials: usize,
}

/// Run all trials and fold their parsed measurements into a result set
pub fn collect(config: &RunConfig) -> Result<RunOutcome, SampleError> {
    let outputs = if config.jobs > 1 {
        collect_parallel(config)?
    } else {
        collect_sequential(config)?
    };
    Ok(merge_outputs(outputs, &config.grammar))
}

fn collect_sequential(config: &RunConfig) -> Result<Vec<TrialOutput>, SampleError> {
    let mut outputs = Vec::with_capacity(config.trials);
    for index in 0..config.trials {
        if config.cancel.is_cancelled() {
            tracing::warn!("cancelled after {} of {} trials", index, config.trials);
            break;
        }
        let output = config.sampler.run_trial(index)?;
        tracing::debug!("trial {} of {} complete", index + 1, config.trials);
        outputs.push(output);
    }
    Ok(outputs)
}

fn collect_parallel(config: &RunConfig) -> Result<Vec<TrialOutput>, SampleError> {
    let jobs = config.jobs.min(config.trials);
    let (index_tx, index_rx) = crossbeam::channel::unbounded::<usize>();
    let (output_tx, output_rx) = crossbeam::channel::unbounded::<Result<TrialOutput, SampleError>>();

    for index in 0..config.trials {
        // Unbounded channel; send cannot fail while index_rx is alive.
        let _ = index_tx.send(index);
    }
    drop(index_tx);

    std::thread::scope(|scope| {
        for _ in 0..jobs {
            let index_rx = index_rx.clone();
            let output_tx = output_tx.clone();
            let sampler = &config.sampler;
            let cancel = config.cancel.clone();
            scope.spawn(move || {
                for index in index_rx.iter() {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let result = sampler.run_trial(index);
                    let fatal = result.is_err();
                    if output_tx.send(result).is_err() || fatal {
                        break;
                    }
                }
            });
        }
        drop(output_tx);

        let mut outputs = Vec::with_capacity(config.trials);
        let mut launch_failure = None;
        for result in output_rx.iter() {
            match result {
                Ok(output) => {
                    tracing::debug!("trial {} of {} complete", output.index + 1, config.trials);
                    outputs.push(output);
                }
                Err(err) => {
                    // No trial can ever succeed; stop the other workers.
                    config.cancel.cancel();
                    launch_failure = Some(err);
                }
            }
        }
        match launch_failure {
            Some(err) => Err(err),
            None => Ok(outputs),
        }
    })
}

/// Merge trial outputs in trial-index order, parsing each line best-effort
fn merge_outputs(mut outputs: Vec<TrialOutput>, grammar: &LineGrammar) -> RunOutcome {
    outputs.sort_by_key(|output| output.index);

    let mut results = ResultSet::new();
    let mut failed_trials = 0;
    let trials_run = outputs.len();
    for output in &outputs {
        if let TrialOutcome::Failed(reason) = &output.outcome {
            tracing::warn!("trial {} failed: {}", output.index, reason);
            failed_trials += 1;
        }
        results.record_trial(output.stdout.lines().filter_map(|line| grammar.parse_line(line)));
    }

    RunOutcome {
        results,
        trials_run,
        failed_trials,
    }
}
