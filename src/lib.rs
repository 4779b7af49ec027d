//! Medidor - benchmark trial sampler with robust timing statistics
//!
//! This library repeatedly runs an external benchmark executable, extracts
//! per-test timing measurements from its standard output, aggregates them
//! across trials, and computes mean and fastest-half-mean summaries used to
//! judge performance stability of the subsystem under test.

pub mod aggregate;
pub mod cli;
pub mod json_output;
pub mod parser;
pub mod report;
pub mod runner;
pub mod sampler;
pub mod stats;
