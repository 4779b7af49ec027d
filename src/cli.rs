//! CLI argument parsing for Medidor

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Which line grammar extracts measurements from trial output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GrammarKind {
    /// Whitespace tokens of gtest `[       OK ]` result lines
    Token,
    /// Fixture-prefixed `Fixture.Test (123 ns)` pattern lines
    Pattern,
}

/// Report mode for the text output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportMode {
    /// Mean and fastest-half mean per test
    Summary,
    /// Raw sorted distributions per test
    Raw,
}

/// Output format for the final report
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "medidor")]
#[command(version)]
#[command(about = "Benchmark trial sampler with robust timing statistics", long_about = None)]
pub struct Cli {
    /// Path to the benchmark test executable
    pub binary: PathBuf,

    /// Test filter passed to the executable as --gtest_filter=PATTERN
    #[arg(short = 'f', long = "filter", value_name = "PATTERN", default_value = "*")]
    pub filter: String,

    /// Number of repeated trials
    #[arg(short = 'n', long = "trials", value_name = "N", default_value = "32")]
    pub trials: usize,

    /// Line grammar active for the session
    #[arg(long = "grammar", value_enum, default_value = "token")]
    pub grammar: GrammarKind,

    /// Fixture-name prefix recognized by the pattern grammar
    #[arg(long = "fixture", value_name = "NAME", default_value = "OperationsFixture")]
    pub fixture: String,

    /// Report mode (summary statistics or raw distributions)
    #[arg(long = "report", value_enum, default_value = "summary")]
    pub report: ReportMode,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Number of trials to run concurrently
    #[arg(short = 'j', long = "jobs", value_name = "N", default_value = "1")]
    pub jobs: usize,

    /// Per-trial deadline in seconds
    #[arg(long = "timeout", value_name = "SECS", default_value = "300")]
    pub timeout_secs: u64,

    /// Enable TRACE-level debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_binary_path() {
        let cli = Cli::parse_from(["medidor", "/path/to/bench"]);
        assert_eq!(cli.binary, PathBuf::from("/path/to/bench"));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["medidor", "bench"]);
        assert_eq!(cli.filter, "*");
        assert_eq!(cli.trials, 32);
        assert_eq!(cli.jobs, 1);
        assert_eq!(cli.timeout_secs, 300);
        assert_eq!(cli.fixture, "OperationsFixture");
        assert!(matches!(cli.grammar, GrammarKind::Token));
        assert!(matches!(cli.report, ReportMode::Summary));
        assert!(matches!(cli.format, OutputFormat::Text));
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_filter_flag() {
        let cli = Cli::parse_from(["medidor", "-f", "CoreModule*Cache*", "bench"]);
        assert_eq!(cli.filter, "CoreModule*Cache*");
    }

    #[test]
    fn test_cli_trial_count() {
        let cli = Cli::parse_from(["medidor", "-n", "64", "bench"]);
        assert_eq!(cli.trials, 64);
    }

    #[test]
    fn test_cli_pattern_grammar_with_fixture() {
        let cli = Cli::parse_from([
            "medidor",
            "--grammar",
            "pattern",
            "--fixture",
            "CachePerf",
            "bench",
        ]);
        assert!(matches!(cli.grammar, GrammarKind::Pattern));
        assert_eq!(cli.fixture, "CachePerf");
    }

    #[test]
    fn test_cli_raw_report_mode() {
        let cli = Cli::parse_from(["medidor", "--report", "raw", "bench"]);
        assert!(matches!(cli.report, ReportMode::Raw));
    }

    #[test]
    fn test_cli_json_format() {
        let cli = Cli::parse_from(["medidor", "--format", "json", "bench"]);
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn test_cli_jobs_and_timeout() {
        let cli = Cli::parse_from(["medidor", "-j", "4", "--timeout", "30", "bench"]);
        assert_eq!(cli.jobs, 4);
        assert_eq!(cli.timeout_secs, 30);
    }

    #[test]
    fn test_cli_requires_binary() {
        assert!(Cli::try_parse_from(["medidor"]).is_err());
    }
}
