//! Unit tests for argument parsing, sweep execution, and CSV output.

use super::commands::{persist_partial, resolve_threshold, run_command, write_csv};
use super::{
    CSV_HEADER, Cli, CliError, Command, ComparisonArg, CsvSink, DiameterArgs, Experiment,
    RunCommand, render_table, run_cli,
};

use std::fs;
use std::sync::Arc;

use clap::Parser;
use renyi_core::{
    AnalysisKind, Comparison, DiameterTest, ExperimentError, ExperimentHarness, NoProgress,
    PointStatus, ProbabilityPoint, RandomSource, ResultsSink, SeededSource, SeededStream,
    SourceError, TrialKey,
};
use rstest::{fixture, rstest};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use renyi_test_support::tracing::RecordingLayer;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[fixture]
fn small_run() -> RunCommand {
    RunCommand {
        vertices: 20,
        trials: 6,
        seed: Some(42),
        threads: Some(2),
        threshold: None,
        down_jump: 10.0,
        up_jump: 10.0,
        output: None,
        experiment: Experiment::Connectivity,
    }
}

fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// Seeded source that goes offline from `offline_from` onwards.
struct FailingFrom {
    inner: SeededSource,
    offline_from: usize,
}

impl RandomSource for FailingFrom {
    type Stream = SeededStream;

    fn name(&self) -> &str {
        "failing"
    }

    fn stream(&self, key: TrialKey) -> Result<Self::Stream, SourceError> {
        if key.point_index >= self.offline_from {
            return Err(SourceError::Unavailable {
                name: Arc::from("failing"),
                reason: "device removed".to_owned(),
            });
        }
        self.inner.stream(key)
    }
}

fn aborted_sweep() -> ExperimentError {
    let harness = ExperimentHarness::builder()
        .with_vertex_count(5)
        .build()
        .expect("configuration must be valid");
    let points = [
        ProbabilityPoint::new(1.0, true, 3).expect("valid point"),
        ProbabilityPoint::new(1.0, true, 3).expect("valid point"),
    ];
    let source = FailingFrom {
        inner: SeededSource::new(1),
        offline_from: 1,
    };
    harness
        .run_sweep(&points, &source, &mut NoProgress)
        .expect_err("second point cannot open streams")
}

fn expect_error(command: RunCommand, panic_msg: &str) -> CliError {
    match run_command(command) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

#[rstest]
fn parse_applies_defaults() {
    let cli = Cli::try_parse_from(["renyi", "run", "connectivity"]).expect("arguments must parse");
    let Command::Run(run) = cli.command;
    assert_eq!(run.vertices, 1000);
    assert_eq!(run.trials, 500);
    assert_eq!(run.seed, None);
    assert_eq!(run.threads, None);
    assert_eq!(run.threshold, None);
    assert!((run.down_jump - 10.0).abs() < f64::EPSILON);
    assert!((run.up_jump - 10.0).abs() < f64::EPSILON);
    assert!(matches!(run.experiment, Experiment::Connectivity));
}

#[rstest]
#[case::diameter_default(&["renyi", "run", "diameter"], AnalysisKind::Diameter(DiameterTest::default()))]
#[case::diameter_equal(
    &["renyi", "run", "diameter", "--comparison", "equal", "--bound", "3"],
    AnalysisKind::Diameter(DiameterTest { comparison: Comparison::Equal, bound: 3 }),
)]
#[case::isolation(&["renyi", "run", "--vertices", "50", "isolation"], AnalysisKind::Isolation)]
fn parse_selects_analysis(#[case] args: &[&str], #[case] expected: AnalysisKind) {
    let cli = Cli::try_parse_from(args).expect("arguments must parse");
    let Command::Run(run) = cli.command;
    assert_eq!(AnalysisKind::from(&run.experiment), expected);
}

#[rstest]
fn parse_rejects_unknown_comparison() {
    let result = Cli::try_parse_from(["renyi", "run", "diameter", "--comparison", "less"]);
    assert!(result.is_err());
}

#[rstest]
fn comparison_arg_maps_to_core() {
    assert_eq!(Comparison::from(ComparisonArg::Greater), Comparison::Greater);
    assert_eq!(Comparison::from(ComparisonArg::Equal), Comparison::Equal);
}

#[rstest]
#[case::explicit(AnalysisKind::Connectivity, 1, Some(0.25), Some(0.25))]
#[case::theoretical(AnalysisKind::Isolation, 100, None, Some(100_f64.ln() / 100.0))]
#[case::undefined(AnalysisKind::Connectivity, 1, None, None)]
fn resolve_threshold_prefers_explicit_value(
    #[case] analysis: AnalysisKind,
    #[case] vertices: usize,
    #[case] explicit: Option<f64>,
    #[case] expected: Option<f64>,
) {
    let resolved = resolve_threshold(analysis, vertices, explicit).ok();
    assert_eq!(resolved, expected);
}

#[rstest]
fn run_produces_complete_ten_point_table(small_run: RunCommand) -> TestResult {
    let summary = run_cli(Cli {
        command: Command::Run(small_run),
    })?;
    assert_eq!(summary.seed, 42);
    assert_eq!(summary.analysis, AnalysisKind::Connectivity);
    assert_eq!(summary.table.rows().len(), 10);
    assert!(summary.table.is_complete());
    assert!(summary.written_to.is_none());
    for (index, row) in summary.table.rows().iter().enumerate() {
        assert_eq!(row.completed_trials(), 6);
        assert_eq!(row.point().expected(), index >= 5);
    }
    Ok(())
}

#[rstest]
fn identical_seeds_replay_identical_tables(small_run: RunCommand) -> TestResult {
    let mut single = small_run.clone();
    single.threads = Some(1);
    let first = run_command(small_run)?;
    let second = run_command(single)?;
    assert_eq!(first.table, second.table);
    Ok(())
}

#[rstest]
fn run_writes_csv_to_output_file(mut small_run: RunCommand) -> TestResult {
    let dir = temp_dir();
    let path = dir.path().join("results.csv");
    small_run.output = Some(path.clone());
    let summary = run_command(small_run)?;
    assert_eq!(summary.written_to.as_deref(), Some(path.as_path()));

    let contents = fs::read_to_string(&path)?;
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|row| row.ends_with(",complete")));
    Ok(())
}

#[rstest]
fn run_rejects_zero_trials(mut small_run: RunCommand) {
    small_run.trials = 0;
    let err = expect_error(small_run, "zero trials must fail");
    assert!(matches!(
        err,
        CliError::Core(ExperimentError::InvalidTrialCount { got: 0 })
    ));
}

#[rstest]
fn run_rejects_zero_threads(mut small_run: RunCommand) {
    small_run.threads = Some(0);
    let err = expect_error(small_run, "zero threads must fail");
    assert!(matches!(err, CliError::Core(ExperimentError::InvalidThreads)));
}

#[rstest]
fn run_rejects_oversized_down_jump(mut small_run: RunCommand) {
    small_run.down_jump = 30.0;
    let err = expect_error(small_run, "down jump beyond 20% must fail");
    assert!(matches!(
        err,
        CliError::Core(ExperimentError::InvalidSweep { .. })
    ));
}

#[rstest]
fn run_requires_threshold_for_tiny_graphs(mut small_run: RunCommand) {
    small_run.vertices = 1;
    let err = expect_error(small_run, "a single vertex has no threshold");
    assert!(matches!(err, CliError::MissingThreshold { vertices: 1 }));
}

#[rstest]
fn run_reports_unwritable_output(mut small_run: RunCommand) {
    let dir = temp_dir();
    small_run.output = Some(dir.path().join("missing").join("results.csv"));
    let err = expect_error(small_run, "missing parent directory must fail");
    assert!(matches!(err, CliError::Io { .. }));
}

#[rstest]
fn diameter_run_uses_configured_comparison(mut small_run: RunCommand) -> TestResult {
    small_run.experiment = Experiment::Diameter(DiameterArgs {
        comparison: ComparisonArg::Equal,
        bound: 2,
    });
    let summary = run_command(small_run)?;
    assert_eq!(
        summary.analysis,
        AnalysisKind::Diameter(DiameterTest {
            comparison: Comparison::Equal,
            bound: 2,
        })
    );
    assert!(!summary.table.rows()[0].point().expected());
    assert!(summary.table.rows()[9].point().expected());
    Ok(())
}

#[rstest]
fn run_records_spans_and_progress(small_run: RunCommand) -> TestResult {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || {
        run_cli(Cli {
            command: Command::Run(small_run),
        })
    })?;

    let execute = layer.span("cli.execute").expect("cli.execute span must exist");
    assert_eq!(execute.fields.get("analysis"), Some(&"connectivity".to_owned()));
    assert_eq!(execute.fields.get("vertices"), Some(&"20".to_owned()));
    assert!(execute.fields.contains_key("threshold"));

    let run = layer.span("cli.run").expect("cli.run span must exist");
    assert_eq!(run.fields.get("command"), Some(&"run".to_owned()));

    let progress = layer.events_with(Level::INFO, "sweep progress");
    assert_eq!(progress.len(), 10);
    assert_eq!(progress[9].field("completed"), Some("10"));
    assert_eq!(progress[9].field("total"), Some("10"));
    Ok(())
}

#[rstest]
fn write_csv_round_trips_header_and_statuses() -> TestResult {
    let harness = ExperimentHarness::builder().with_vertex_count(5).build()?;
    let points = [
        ProbabilityPoint::new(0.0, false, 3)?,
        ProbabilityPoint::new(1.0, true, 3)?,
    ];
    let table = harness.run_sweep(&points, &SeededSource::new(1), &mut NoProgress)?;
    let dir = temp_dir();
    let path = dir.path().join("table.csv");
    write_csv(&path, &table)?;
    assert_eq!(
        fs::read_to_string(&path)?,
        format!("{CSV_HEADER}\n0,false,3,3,1,complete\n1,true,3,3,1,complete\n")
    );
    Ok(())
}

#[rstest]
fn csv_leaves_rate_empty_for_pending_rows() -> TestResult {
    let token = renyi_core::CancellationToken::new();
    token.cancel();
    let harness = ExperimentHarness::builder()
        .with_vertex_count(5)
        .with_cancellation(token)
        .build()?;
    let points = [ProbabilityPoint::new(0.5, true, 4)?];
    let table = harness.run_sweep(&points, &SeededSource::new(1), &mut NoProgress)?;
    assert_eq!(table.rows()[0].status(), PointStatus::Pending);

    let mut sink = CsvSink::new(Vec::new());
    sink.write_table(&table)?;
    let rendered = String::from_utf8(sink.into_inner())?;
    assert_eq!(rendered, format!("{CSV_HEADER}\n0.5,true,0,0,,pending\n"));

    let mut buffer = Vec::new();
    render_table(&table, &mut buffer)?;
    assert_eq!(String::from_utf8(buffer)?, rendered);
    Ok(())
}

#[rstest]
fn aborted_sweep_saves_partial_table_to_output() -> TestResult {
    let dir = temp_dir();
    let path = dir.path().join("partial.csv");
    let err = persist_partial(aborted_sweep(), Some(&path));

    assert!(matches!(
        &err,
        CliError::PartialWritten { path: written, .. } if written == &path
    ));
    let core = err.experiment().expect("core failure is kept");
    assert!(matches!(
        core,
        ExperimentError::SourceUnavailable { point_index: 1, .. }
    ));
    assert_eq!(
        fs::read_to_string(&path)?,
        format!("{CSV_HEADER}\n1,true,3,3,1,complete\n1,true,0,0,,partial\n")
    );
    Ok(())
}

#[rstest]
fn aborted_sweep_without_output_stays_a_core_error() {
    let err = persist_partial(aborted_sweep(), None);
    assert!(matches!(
        err,
        CliError::Core(ExperimentError::SourceUnavailable { .. })
    ));
}

#[rstest]
fn unwritable_partial_output_falls_back_to_core_error() {
    let dir = temp_dir();
    let path = dir.path().join("missing").join("partial.csv");
    let err = persist_partial(aborted_sweep(), Some(&path));
    assert!(matches!(err, CliError::Core(_)));
    assert!(err.experiment().and_then(ExperimentError::partial_results).is_some());
}
