//! Argument parsing and sweep execution for the `renyi` CLI.

use std::fs::File;
use std::io::{self, BufWriter};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use renyi_core::{
    AnalysisKind, Comparison, DEFAULT_VERTEX_COUNT, DiameterTest, ExperimentError,
    ExperimentHarness, ProgressSink, ProgressUpdate, RandomSource, ResultsSink, ResultsTable,
    SeededSource, SweepDesign, build_threshold_sweep,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

use super::output::CsvSink;

const DEFAULT_TRIALS: usize = 500;
const DEFAULT_JUMP_PCT: f64 = 10.0;
const DEFAULT_DIAMETER_BOUND: usize = 2;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "renyi",
    about = "Estimate phase-transition thresholds of Erdős–Rényi random graphs."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a ten-point sweep around an analysis threshold.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Vertices per random graph.
    #[arg(long, default_value_t = DEFAULT_VERTEX_COUNT)]
    pub vertices: usize,

    /// Trials per probability point.
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    pub trials: usize,

    /// Base seed; drawn from OS entropy and logged when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads; the global rayon pool is used when omitted.
    #[arg(long)]
    pub threads: Option<usize>,

    /// Threshold probability to bracket instead of the theoretical one.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Step below the threshold, in percent of the threshold.
    #[arg(long = "down-jump", default_value_t = DEFAULT_JUMP_PCT)]
    pub down_jump: f64,

    /// Step above the threshold, in percent of the threshold.
    #[arg(long = "up-jump", default_value_t = DEFAULT_JUMP_PCT)]
    pub up_jump: f64,

    /// Write the CSV table here instead of stdout. Aborted sweeps write
    /// their partial table here too.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Graph property to measure.
    #[command(subcommand)]
    pub experiment: Experiment,
}

/// Analyses selectable from the command line.
#[derive(Debug, Subcommand, Clone)]
pub enum Experiment {
    /// Probability that the graph is connected.
    Connectivity,
    /// Probability that some vertex has no edges.
    Isolation,
    /// Probability that the diameter satisfies a comparison.
    Diameter(DiameterArgs),
}

/// Arguments of the `diameter` experiment.
#[derive(Debug, Args, Clone)]
pub struct DiameterArgs {
    /// How the diameter is compared with the bound.
    #[arg(long, value_enum, default_value_t = ComparisonArg::Greater)]
    pub comparison: ComparisonArg,

    /// Right-hand side of the comparison.
    #[arg(long, default_value_t = DEFAULT_DIAMETER_BOUND)]
    pub bound: usize,
}

/// Diameter comparisons accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComparisonArg {
    /// Diameter strictly greater than the bound, or disconnected.
    Greater,
    /// Diameter exactly equal to the bound.
    Equal,
}

impl From<ComparisonArg> for Comparison {
    fn from(value: ComparisonArg) -> Self {
        match value {
            ComparisonArg::Greater => Self::Greater,
            ComparisonArg::Equal => Self::Equal,
        }
    }
}

impl From<&Experiment> for AnalysisKind {
    fn from(value: &Experiment) -> Self {
        match value {
            Experiment::Connectivity => Self::Connectivity,
            Experiment::Isolation => Self::Isolation,
            Experiment::Diameter(args) => Self::Diameter(DiameterTest {
                comparison: args.comparison.into(),
                bound: args.bound,
            }),
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The results file could not be created or written.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// No theoretical threshold exists and none was supplied.
    #[error("no threshold exists for {vertices} vertices; pass --threshold")]
    MissingThreshold {
        /// Requested vertex count.
        vertices: usize,
    },
    /// Sweep configuration or execution failed.
    #[error(transparent)]
    Core(#[from] ExperimentError),
    /// The sweep aborted and its partial table was saved to `--output`.
    #[error("{source}; partial results written to `{path}`")]
    PartialWritten {
        /// File holding the partial table.
        path: PathBuf,
        /// Failure that aborted the sweep.
        #[source]
        source: ExperimentError,
    },
}

impl CliError {
    /// Returns the core failure behind this error, if any.
    #[must_use]
    pub const fn experiment(&self) -> Option<&ExperimentError> {
        match self {
            Self::Core(source) | Self::PartialWritten { source, .. } => Some(source),
            Self::Io { .. } | Self::MissingThreshold { .. } => None,
        }
    }
}

/// Outcome of a `run` command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Analysis that was measured.
    pub analysis: AnalysisKind,
    /// Threshold the sweep bracketed.
    pub threshold: f64,
    /// Base seed, for replaying the run with `--seed`.
    pub seed: u64,
    /// Filled results table.
    pub table: ResultsTable,
    /// File the table was written to, when `--output` was given.
    pub written_to: Option<PathBuf>,
}

/// [`ProgressSink`] that logs each completed point.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn point_completed(&mut self, update: &ProgressUpdate) {
        info!(
            completed = update.point_index + 1,
            total = update.total_points,
            elapsed_ms = u64::try_from(update.elapsed.as_millis()).unwrap_or(u64::MAX),
            "sweep progress"
        );
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when configuration is rejected, the sweep aborts, or
/// the output file cannot be written.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use renyi_cli::cli::{Cli, Command, Experiment, RunCommand, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         vertices: 30,
///         trials: 8,
///         seed: Some(11),
///         threads: Some(2),
///         threshold: None,
///         down_jump: 10.0,
///         up_jump: 10.0,
///         output: None,
///         experiment: Experiment::Connectivity,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.seed, 11);
/// assert!(summary.table.is_complete());
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(analysis = field::Empty, vertices = command.vertices, threshold = field::Empty),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let analysis = AnalysisKind::from(&command.experiment);
    let threshold = resolve_threshold(analysis, command.vertices, command.threshold)?;
    let span = Span::current();
    span.record("analysis", field::display(analysis));
    span.record("threshold", threshold);

    let trial_count = NonZeroUsize::new(command.trials).ok_or(ExperimentError::InvalidTrialCount {
        got: command.trials,
    })?;
    let design = SweepDesign {
        threshold,
        down_jump_pct: command.down_jump,
        up_jump_pct: command.up_jump,
        trial_count,
        expected_above: analysis.expected_above_threshold(),
    };
    let points = build_threshold_sweep(&design)?;

    let mut builder = ExperimentHarness::builder()
        .with_vertex_count(command.vertices)
        .with_analysis(analysis);
    if let Some(threads) = command.threads {
        builder = builder.with_threads(threads);
    }
    let harness = builder.build()?;

    let source = command.seed.map_or_else(SeededSource::from_entropy, SeededSource::new);
    let table = harness
        .run_sweep(&points, &source, &mut LogProgress)
        .map_err(|err| persist_partial(err, command.output.as_deref()))?;

    if let Some(path) = &command.output {
        write_csv(path, &table)?;
    }

    info!(
        source = source.name(),
        seed = source.seed(),
        complete = table.is_complete(),
        "command completed"
    );
    Ok(ExecutionSummary {
        analysis,
        threshold,
        seed: source.seed(),
        table,
        written_to: command.output,
    })
}

pub(super) fn resolve_threshold(
    analysis: AnalysisKind,
    vertices: usize,
    explicit: Option<f64>,
) -> Result<f64, CliError> {
    match explicit {
        Some(threshold) => Ok(threshold),
        None => analysis
            .theoretical_threshold(vertices)
            .ok_or(CliError::MissingThreshold { vertices }),
    }
}

/// Saves the partial table of an aborted sweep to `output`.
///
/// Without an output path, or when writing fails, the error is returned as
/// [`CliError::Core`] so the caller can print the table instead.
pub(super) fn persist_partial(err: ExperimentError, output: Option<&Path>) -> CliError {
    let (Some(path), Some(table)) = (output, err.partial_results()) else {
        return CliError::Core(err);
    };
    match write_csv(path, table) {
        Ok(()) => CliError::PartialWritten {
            path: path.to_path_buf(),
            source: err,
        },
        Err(write_err) => {
            warn!(error = %write_err, "could not save partial results");
            CliError::Core(err)
        }
    }
}

#[instrument(name = "cli.write_csv", err, skip(table), fields(path = %path.display()))]
pub(super) fn write_csv(path: &Path, table: &ResultsTable) -> Result<(), CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    CsvSink::new(BufWriter::new(file))
        .write_table(table)
        .map_err(io_error)
}
