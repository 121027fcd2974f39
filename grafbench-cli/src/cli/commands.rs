//! Command implementations and argument parsing for the grafbench CLI.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand, ValueEnum};
use grafbench_core::{
    ImportError, MergeKey, SampleError, SamplerConfig, StagedBulkWriter, TaskSampler, Workload,
};
use grafbench_providers_edgelist::{EdgeListError, EdgeListSource};
use grafbench_providers_memory::MemoryStore;
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_COUNT_FINDS: usize = 128;
const DEFAULT_COUNT_ANALYTICS: usize = 64;
const DEFAULT_COUNT_CHANGES: usize = 128;
const DEFAULT_SEED: u64 = 42;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "grafbench",
    about = "Sample benchmark workloads and bulk-import graph datasets."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Derive a fixed benchmark workload from edge data.
    Sample(SampleCommand),
    /// Bulk-import an edge-list dataset into the reference store.
    Import(ImportCommand),
}

/// Options accepted by the `sample` command.
#[derive(Debug, Args, Clone)]
pub struct SampleCommand {
    /// Number of point-lookup tasks to sample.
    #[arg(long = "finds", default_value_t = DEFAULT_COUNT_FINDS)]
    pub count_finds: usize,

    /// Number of analytic-node tasks to sample.
    #[arg(long = "analytics", default_value_t = DEFAULT_COUNT_ANALYTICS)]
    pub count_analytics: usize,

    /// Number of mutation tasks to sample.
    #[arg(long = "changes", default_value_t = DEFAULT_COUNT_CHANGES)]
    pub count_changes: usize,

    /// RNG seed; equal seeds reproduce equal workloads.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Edge data to sample from.
    #[command(subcommand)]
    pub source: SampleSource,
}

/// Input edge data supported by the `sample` command.
#[derive(Debug, Subcommand, Clone)]
pub enum SampleSource {
    /// Sample from a line-oriented edge-list dataset file.
    File(FileArgs),
    /// Synthesize tasks from a uniform node distribution.
    Synthetic(SyntheticArgs),
}

/// Dataset file arguments.
#[derive(Debug, Args, Clone)]
pub struct FileArgs {
    /// Path to an edge-list dataset, one `from to [weight]` row per line.
    pub path: PathBuf,
}

/// Synthetic distribution arguments.
#[derive(Debug, Args, Clone)]
pub struct SyntheticArgs {
    /// Exclusive upper bound of the node identifier range.
    #[arg(long = "nodes")]
    pub node_count: u64,
}

/// Options accepted by the `import` command.
#[derive(Debug, Args, Clone)]
pub struct ImportCommand {
    /// Path to an edge-list dataset, one `from to [weight]` row per line.
    pub path: PathBuf,

    /// Conflict policy for the bulk merge.
    #[arg(long, value_enum, default_value_t = ImportMode::Insert)]
    pub mode: ImportMode,

    /// Merge key used by upsert imports.
    #[arg(long = "merge-key", value_enum, default_value_t = MergeKeyArg::Endpoints)]
    pub merge_key: MergeKeyArg,

    /// Override the store's staged batch ceiling.
    #[arg(long = "batch-size")]
    pub batch_size: Option<usize>,
}

/// Bulk merge conflict policies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportMode {
    /// Fresh import assigning sequential identifiers.
    Insert,
    /// Insert-or-replace keyed by `--merge-key`.
    Upsert,
}

/// Merge keys selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MergeKeyArg {
    /// Merge on dataset-assigned edge identifiers.
    Id,
    /// Merge on the `(from, to)` natural key.
    Endpoints,
}

impl MergeKeyArg {
    const fn into_merge_key(self) -> MergeKey {
        match self {
            Self::Id => MergeKey::EdgeId,
            Self::Endpoints => MergeKey::Endpoints,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File metadata could not be read.
    #[error("failed to inspect `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Opening the dataset failed.
    #[error(transparent)]
    Dataset(#[from] EdgeListError),
    /// Task sampling failed.
    #[error(transparent)]
    Sample(#[from] SampleError),
    /// Bulk import failed.
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Outcome of a `sample` run.
    Sample(SampleSummary),
    /// Outcome of an `import` run.
    Import(ImportSummary),
}

/// Workload sizes produced by a `sample` run.
#[derive(Debug, Clone)]
pub struct SampleSummary {
    /// Name derived from the sampled source.
    pub source: String,
    /// The sampled workload snapshot.
    pub workload: Workload,
}

/// Figures produced by an `import` run.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    /// Name derived from the dataset path.
    pub dataset: String,
    /// Number of edges the merge added to the primary table.
    pub added: u64,
    /// Dataset file size in bytes.
    pub file_size: u64,
    /// Wall-clock duration of the import.
    pub elapsed: Duration,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when parsing or execution fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use grafbench_cli::cli::{
/// #     Cli, Command, ExecutionSummary, SampleCommand, SampleSource, SyntheticArgs, run_cli,
/// # };
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let cli = Cli {
///     command: Command::Sample(SampleCommand {
///         count_finds: 4,
///         count_analytics: 2,
///         count_changes: 3,
///         seed: 42,
///         source: SampleSource::Synthetic(SyntheticArgs { node_count: 100 }),
///     }),
/// };
/// let ExecutionSummary::Sample(summary) = run_cli(cli)? else {
///     panic!("sample command must yield a sample summary");
/// };
/// assert_eq!(summary.workload.edges_to_query.len(), 4);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Sample(sample) => {
            Span::current().record("command", field::display("sample"));
            Ok(ExecutionSummary::Sample(run_sample(sample)?))
        }
        Command::Import(import) => {
            Span::current().record("command", field::display("import"));
            Ok(ExecutionSummary::Import(run_import(import)?))
        }
    }
}

#[instrument(
    name = "cli.sample",
    err,
    skip(command),
    fields(finds = field::Empty, analytics = field::Empty, changes = field::Empty, source = field::Empty),
)]
pub(super) fn run_sample(command: SampleCommand) -> Result<SampleSummary, CliError> {
    let span = Span::current();
    span.record("finds", field::display(command.count_finds));
    span.record("analytics", field::display(command.count_analytics));
    span.record("changes", field::display(command.count_changes));

    let mut sampler = TaskSampler::new(SamplerConfig {
        count_finds: command.count_finds,
        count_analytics: command.count_analytics,
        count_changes: command.count_changes,
        seed: command.seed,
    });

    let (source, workload) = match command.source {
        SampleSource::File(args) => {
            span.record("source", field::display("file"));
            let name = derive_dataset_name(&args.path);
            let mut stream = EdgeListSource::try_from_path(&args.path)?;
            (name, sampler.sample_stream(&mut stream)?)
        }
        SampleSource::Synthetic(args) => {
            span.record("source", field::display("synthetic"));
            let name = format!("synthetic-{}", args.node_count);
            (name, sampler.sample_distribution(args.node_count)?)
        }
    };

    info!(
        source = source.as_str(),
        tasks = workload.task_count(),
        "sampling completed"
    );
    Ok(SampleSummary { source, workload })
}

#[instrument(
    name = "cli.import",
    err,
    skip(command),
    fields(path = field::Empty, mode = field::Empty),
)]
pub(super) fn run_import(command: ImportCommand) -> Result<ImportSummary, CliError> {
    let span = Span::current();
    span.record("path", field::display(command.path.display()));
    let mode_label = match command.mode {
        ImportMode::Insert => "insert",
        ImportMode::Upsert => "upsert",
    };
    span.record("mode", field::display(mode_label));

    let file_size = std::fs::metadata(&command.path)
        .map_err(|source| CliError::Io {
            path: command.path.clone(),
            source,
        })?
        .len();

    let mut store = command
        .batch_size
        .map_or_else(MemoryStore::new, MemoryStore::with_max_batch_size);
    let mut stream = EdgeListSource::try_from_path(&command.path)?;
    let mut writer = StagedBulkWriter::new(&mut store);

    let started = Instant::now();
    let added = match command.mode {
        ImportMode::Insert => writer.insert_edges(&mut stream)?,
        ImportMode::Upsert => {
            writer.upsert_edges(&mut stream, command.merge_key.into_merge_key())?
        }
    };
    let elapsed = started.elapsed();

    let dataset = derive_dataset_name(&command.path);
    info!(
        dataset = dataset.as_str(),
        added,
        elapsed_ms = elapsed.as_millis() as u64,
        "import completed"
    );
    Ok(ImportSummary {
        dataset,
        added,
        file_size,
        elapsed,
    })
}

pub(super) fn derive_dataset_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "dataset".to_owned())
}
