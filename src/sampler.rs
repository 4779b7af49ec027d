//! Scoped execution of the benchmark executable, one trial at a time
//!
//! Each trial launches the executable with a gtest filter argument, drains
//! its stdout on a dedicated thread, and polls for exit under a per-trial
//! deadline. The child is killed and reaped on every exit path, including
//! timeout. Launch failure is the only fatal error; everything else is
//! recorded on the trial and sampling continues.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Poll cadence while waiting for a trial to exit
const WAIT_POLL: Duration = Duration::from_millis(50);

/// Fatal sampling errors; per-trial failures live in [`TrialOutcome`] instead
#[derive(Debug, Error)]
pub enum SampleError {
    /// The executable could not be launched at all; no trial can ever
    /// succeed, so the whole collection run aborts.
    #[error("failed to launch {}: {}", .binary.display(), .source)]
    Launch {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why an individual trial failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// Process exited nonzero (code, or `None` when signal-terminated)
    #[error("nonzero exit status {0:?}")]
    NonzeroExit(Option<i32>),
    /// Per-trial deadline exceeded; the child was killed and reaped
    #[error("per-trial deadline exceeded")]
    Timeout,
    /// Waiting on the child or capturing its output failed
    #[error("wait/capture failed: {0}")]
    Wait(String),
}

/// Execution outcome of one trial
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialOutcome {
    Completed,
    Failed(FailureReason),
}

/// Captured output of one trial
///
/// Failed trials still carry whatever stdout was captured before the
/// failure, for best-effort parsing.
#[derive(Debug)]
pub struct TrialOutput {
    pub index: usize,
    pub stdout: String,
    pub outcome: TrialOutcome,
}

/// Launches the benchmark executable once per trial
#[derive(Debug, Clone)]
pub struct Sampler {
    binary: PathBuf,
    filter_arg: String,
    timeout: Duration,
}

impl Sampler {
    /// Create a sampler for a benchmark executable and filter pattern
    pub fn new(binary: impl Into<PathBuf>, filter_pattern: &str, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            filter_arg: format!("--gtest_filter={filter_pattern}"),
            timeout,
        }
    }

    /// Run one trial: launch, capture stdout to exit, enforce the deadline
    pub fn run_trial(&self, index: usize) -> Result<TrialOutput, SampleError> {
        let mut child = Command::new(&self.binary)
            .arg(&self.filter_arg)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SampleError::Launch {
                binary: self.binary.clone(),
                source,
            })?;

        // Drain stdout concurrently so a chatty child never blocks on a
        // full pipe while we poll for exit.
        let reader = {
            let mut pipe = child.stdout.take();
            thread::spawn(move || -> std::io::Result<Vec<u8>> {
                let mut buf = Vec::new();
                if let Some(pipe) = pipe.as_mut() {
                    pipe.read_to_end(&mut buf)?;
                }
                Ok(buf)
            })
        };

        let started = Instant::now();
        let waited: Result<ExitStatus, FailureReason> = loop {
            match child.try_wait() {
                Ok(Some(status)) => break Ok(status),
                Ok(None) => {}
                Err(err) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    break Err(FailureReason::Wait(err.to_string()));
                }
            }
            if started.elapsed() > self.timeout {
                if let Err(err) = child.kill() {
                    tracing::debug!("failed to kill timed-out trial {index}: {err}");
                }
                let _ = child.wait();
                break Err(FailureReason::Timeout);
            }
            thread::sleep(WAIT_POLL);
        };

        // Killing the child closes the pipe, so the reader always finishes.
        let (stdout, capture_err) = match reader.join() {
            Ok(Ok(bytes)) => (String::from_utf8_lossy(&bytes).into_owned(), None),
            Ok(Err(err)) => (String::new(), Some(err.to_string())),
            Err(_) => (String::new(), Some("stdout reader panicked".to_string())),
        };

        let outcome = match (waited, capture_err) {
            (Ok(status), None) if status.success() => TrialOutcome::Completed,
            (Ok(status), None) => TrialOutcome::Failed(FailureReason::NonzeroExit(status.code())),
            (Err(reason), _) => TrialOutcome::Failed(reason),
            (Ok(_), Some(msg)) => TrialOutcome::Failed(FailureReason::Wait(msg)),
        };

        Ok(TrialOutput {
            index,
            stdout,
            outcome,
        })
    }

    /// The filter argument handed to the executable
    pub fn filter_arg(&self) -> &str {
        &self.filter_arg
    }
}
