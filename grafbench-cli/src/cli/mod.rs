//! Command-line interface orchestration for the grafbench driver.
//!
//! The CLI offers two commands: `sample`, which derives a benchmark workload
//! from a dataset file or a synthetic distribution, and `import`, which
//! bulk-loads an edge-list dataset into the in-memory reference store through
//! the staged write pipeline.

mod commands;
mod render;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, FileArgs, ImportCommand, ImportMode, ImportSummary,
    MergeKeyArg, SampleCommand, SampleSource, SampleSummary, SyntheticArgs, run_cli,
};
pub use render::{format_bytes, format_count, render_summary};
