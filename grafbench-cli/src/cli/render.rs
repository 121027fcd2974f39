//! Human-readable rendering of command summaries.

use std::io::{self, Write};

use super::commands::{ExecutionSummary, ImportSummary, SampleSummary};

const BYTE_UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
const COUNT_UNITS: [&str; 5] = ["", "K", "M", "G", "T"];

/// Renders a byte size with a binary-prefixed unit, e.g. `1.500KiB`.
///
/// # Examples
/// ```
/// use grafbench_cli::cli::format_bytes;
///
/// assert_eq!(format_bytes(512.0), "512.000B");
/// assert_eq!(format_bytes(2048.0), "2.000KiB");
/// ```
#[must_use]
pub fn format_bytes(size: f64) -> String {
    format_scaled(size, 1024.0, &BYTE_UNITS)
}

/// Renders a count with a decimal-prefixed unit, e.g. `3.200K`.
///
/// # Examples
/// ```
/// use grafbench_cli::cli::format_count;
///
/// assert_eq!(format_count(950.0), "950.000");
/// assert_eq!(format_count(1_500_000.0), "1.500M");
/// ```
#[must_use]
pub fn format_count(count: f64) -> String {
    format_scaled(count, 1000.0, &COUNT_UNITS)
}

fn format_scaled(value: f64, step: f64, units: &[&str]) -> String {
    let mut scaled = value;
    let mut chosen = units.last().copied().unwrap_or_default();
    for unit in units {
        if scaled < step {
            chosen = unit;
            break;
        }
        scaled /= step;
    }
    format!("{scaled:.3}{chosen}")
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Sample(sample) => render_sample(sample, &mut writer),
        ExecutionSummary::Import(import) => render_import(import, &mut writer),
    }
}

fn render_sample(summary: &SampleSummary, writer: &mut impl Write) -> io::Result<()> {
    let workload = &summary.workload;
    writeln!(writer, "source: {}", summary.source)?;
    writeln!(writer, "edges to query: {}", workload.edges_to_query.len())?;
    writeln!(writer, "nodes to query: {}", workload.nodes_to_query.len())?;
    writeln!(writer, "nodes to analyze: {}", workload.nodes_to_analyze.len())?;
    writeln!(writer, "edges to change: {}", workload.edges_to_change_one.len())?;
    writeln!(
        writer,
        "mutation batches: {}",
        workload.edges_to_change_batched.len()
    )?;
    Ok(())
}

fn render_import(summary: &ImportSummary, writer: &mut impl Write) -> io::Result<()> {
    let secs = summary.elapsed.as_secs_f64();
    let per_second = if secs > 0.0 {
        summary.added as f64 / secs
    } else {
        0.0
    };
    writeln!(writer, "dataset: {}", summary.dataset)?;
    writeln!(writer, "file size: {}", format_bytes(summary.file_size as f64))?;
    writeln!(writer, "edges added: {}", format_count(summary.added as f64))?;
    writeln!(writer, "elapsed: {secs:.3}s")?;
    writeln!(writer, "edges/second: {}", format_count(per_second))?;
    Ok(())
}
