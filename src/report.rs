//! Deterministic text report over the aggregated results

use std::io::{self, Write};

use crate::cli::ReportMode;
use crate::runner::RunOutcome;
use crate::stats::{self, SummaryStat};

/// Render the report for one collection run
///
/// Rows follow the result set's first-seen order; statistics that are
/// undefined (no recorded value) print as `undefined`.
pub fn print_report(
    out: &mut impl Write,
    outcome: &RunOutcome,
    mode: ReportMode,
) -> io::Result<()> {
    let summaries = stats::summarize(&outcome.results);

    match mode {
        ReportMode::Summary => print_summary_rows(out, &summaries)?,
        ReportMode::Raw => print_raw_rows(out, &summaries)?,
    }

    let totals = stats::calculate_totals(&outcome.results);
    writeln!(
        out,
        "{} trials, {} failed; {} samples, {} total recorded",
        outcome.trials_run, outcome.failed_trials, totals.total_samples, totals.total_elapsed
    )?;
    Ok(())
}

fn print_summary_rows(out: &mut impl Write, summaries: &[SummaryStat]) -> io::Result<()> {
    writeln!(
        out,
        "{:<28} {:>12} {:>13} {:>6}",
        "test", "mean", "fastest-half", "n"
    )?;
    writeln!(
        out,
        "---------------------------- ------------ ------------- ------"
    )?;
    for stat in summaries {
        writeln!(
            out,
            "{:<28} {:>12} {:>13} {:>6}",
            stat.test_id,
            format_stat(stat.mean),
            format_stat(stat.fastest_half_mean),
            stat.sorted_values.len()
        )?;
    }
    writeln!(
        out,
        "---------------------------- ------------ ------------- ------"
    )?;
    Ok(())
}

fn print_raw_rows(out: &mut impl Write, summaries: &[SummaryStat]) -> io::Result<()> {
    for stat in summaries {
        writeln!(out, "{:<28} {:?}", stat.test_id, stat.sorted_values)?;
    }
    Ok(())
}

fn format_stat(stat: Option<f64>) -> String {
    match stat {
        Some(value) => format!("{value:.2}"),
        None => "undefined".to_string(),
    }
}
