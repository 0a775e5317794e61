//! Entry point for the `renyi` binary.
//!
//! Parses arguments with clap, runs the requested threshold sweep, prints the
//! CSV table to stdout unless `--output` was given, and maps failures to a
//! non-zero exit code. Logging is initialised first so every later step can
//! emit structured diagnostics.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use renyi_core::ExperimentError;
use renyi_cli::{
    cli::{Cli, CliError, render_table, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field, info};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    if let Some(path) = &summary.written_to {
        info!(path = %path.display(), "results written");
        return Ok(());
    }
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_table(&summary.table, &mut writer).context("failed to render results")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let cli_error = err.downcast_ref::<CliError>();
        let core = cli_error.and_then(CliError::experiment);
        let code_field = core.map(|core| field::display(core.code().as_str()));
        let partial = core.and_then(ExperimentError::partial_results);
        let saved = matches!(cli_error, Some(CliError::PartialWritten { .. }));
        let incomplete: Option<Vec<usize>> =
            partial.map(|table| table.incomplete_points().collect());

        error!(
            error = %err,
            code = code_field,
            incomplete_points = incomplete.as_ref().map(field::debug),
            "command execution failed"
        );
        if let Some(table) = partial
            && !saved
            && let Err(render_err) = render_table(table, io::stdout().lock())
        {
            error!(error = %render_err, "failed to render partial results");
        }
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
