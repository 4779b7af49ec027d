use std::io;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use medidor::cli::{Cli, GrammarKind, OutputFormat};
use medidor::json_output::JsonReport;
use medidor::parser::LineGrammar;
use medidor::report;
use medidor::runner::{self, CancelToken, RunConfig};
use medidor::sampler::Sampler;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Token shared with the SIGINT handler
static CANCEL: OnceLock<CancelToken> = OnceLock::new();

extern "C" fn handle_sigint(_signal: libc::c_int) {
    if let Some(token) = CANCEL.get() {
        token.cancel();
    }
}

fn install_sigint_handler() -> Result<()> {
    use nix::sys::signal::{self, SigHandler, Signal};
    unsafe { signal::signal(Signal::SIGINT, SigHandler::Handler(handle_sigint)) }
        .context("failed to install SIGINT handler")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    if args.trials == 0 {
        anyhow::bail!("Invalid value for --trials: 0 (must be >= 1)");
    }
    if args.jobs == 0 {
        anyhow::bail!("Invalid value for --jobs: 0 (must be >= 1)");
    }

    init_tracing(args.debug);

    let cancel = CancelToken::new();
    let _ = CANCEL.set(cancel.clone());
    install_sigint_handler()?;

    let grammar = match args.grammar {
        GrammarKind::Token => LineGrammar::token(),
        GrammarKind::Pattern => LineGrammar::pattern(&args.fixture)
            .context("failed to build pattern grammar")?,
    };

    let config = RunConfig {
        sampler: Sampler::new(
            &args.binary,
            &args.filter,
            Duration::from_secs(args.timeout_secs),
        ),
        grammar,
        trials: args.trials,
        jobs: args.jobs,
        cancel,
    };

    let outcome = runner::collect(&config)?;

    match args.format {
        OutputFormat::Text => {
            let stdout = io::stdout();
            report::print_report(&mut stdout.lock(), &outcome, args.report)
                .context("failed to write report")?;
        }
        OutputFormat::Json => {
            let json = JsonReport::from_outcome(&outcome)
                .to_json()
                .context("failed to serialize JSON")?;
            println!("{json}");
        }
    }

    Ok(())
}
