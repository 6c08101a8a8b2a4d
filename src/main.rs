use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rmatgen::cli::{Cli, run_cli};
use rmatgen::logging::{self, LoggingError};
use tracing::{error, info};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(&cli)
        .with_context(|| format!("failed to generate edge list into `{}`", cli.output.display()))?;

    info!(
        entities = summary.ingested.entities,
        edges = summary.ingested.edges,
        lines = summary.report.lines_written,
        failed_lines = summary.report.failed.len(),
        "done"
    );
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        error!(error = %format!("{err:#}"), "run failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
