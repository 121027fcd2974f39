//! CLI entry point for the grafbench driver.
//!
//! Parses command-line arguments with clap, executes the sampling or import
//! pipeline, renders the summary to stdout, and maps errors to appropriate
//! exit codes. Logging is initialized eagerly so subsequent operations can
//! emit structured diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use grafbench_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse CLI arguments, execute the command, render the summary, and flush
/// the output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let (code, store_code) = err
            .downcast_ref::<CliError>()
            .and_then(|cli_error| match cli_error {
                CliError::Sample(sample) => Some((Some(sample.code().as_str()), None)),
                CliError::Import(import) => Some((
                    Some(import.code().as_str()),
                    import.store_code().map(|code| code.as_str()),
                )),
                _ => None,
            })
            .unwrap_or((None, None));

        let code_field = code.map(field::display);
        let store_code_field = store_code.map(field::display);

        error!(
            error = %err,
            code = code_field,
            store_code = store_code_field,
            "command execution failed"
        );
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
