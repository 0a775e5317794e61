//! Setup helpers shared by the Criterion benchmarks.
//!
//! Benchmarks sit at the sharp threshold of their analysis, where graphs are
//! sparse enough to be cheap yet BFS still has to walk most of the vertices.

use std::num::NonZeroUsize;

use renyi_core::{
    AnalysisKind, Comparison, DiameterTest, ExperimentHarness, Graph, ProbabilityPoint,
    RandomSource, SeededSource, SeededStream, SweepDesign, TrialKey, build_threshold_sweep,
};

use crate::error::BenchSetupError;
use crate::params::{SweepBenchParams, TrialBenchParams};

/// Analyses exercised by the trial benchmark.
pub const ANALYSES: [AnalysisKind; 3] = [
    AnalysisKind::Connectivity,
    AnalysisKind::Isolation,
    AnalysisKind::Diameter(DiameterTest {
        comparison: Comparison::Greater,
        bound: 2,
    }),
];

/// Returns the theoretical threshold of `analysis` for `vertex_count`.
///
/// # Errors
/// Returns [`BenchSetupError::NoThreshold`] below two vertices.
pub fn threshold_probability(
    analysis: AnalysisKind,
    vertex_count: usize,
) -> Result<f64, BenchSetupError> {
    analysis
        .theoretical_threshold(vertex_count)
        .ok_or(BenchSetupError::NoThreshold { vertex_count })
}

/// Opens the stream used for a benchmark graph.
///
/// # Errors
/// Returns [`BenchSetupError::Source`] if the source refuses the stream.
pub fn trial_stream(seed: u64) -> Result<SeededStream, BenchSetupError> {
    let key = TrialKey {
        point_index: 0,
        trial_index: 0,
    };
    Ok(SeededSource::new(seed).stream(key)?)
}

/// Builds one graph at the threshold of `params.analysis`.
///
/// # Errors
/// Returns [`BenchSetupError`] when no threshold exists or randomisation
/// fails.
pub fn threshold_graph(params: &TrialBenchParams) -> Result<Graph, BenchSetupError> {
    let probability = threshold_probability(params.analysis, params.vertex_count)?;
    let mut stream = trial_stream(params.seed)?;
    Ok(Graph::random(params.vertex_count, probability, &mut stream)?)
}

/// Builds the connectivity sweep described by `params`.
///
/// # Errors
/// Returns [`BenchSetupError`] when `params.trials` is zero or the sweep
/// cannot be generated.
pub fn connectivity_sweep(
    params: &SweepBenchParams,
) -> Result<Vec<ProbabilityPoint>, BenchSetupError> {
    let analysis = AnalysisKind::Connectivity;
    let threshold = threshold_probability(analysis, params.vertex_count)?;
    let trial_count = NonZeroUsize::new(params.trials)
        .ok_or(BenchSetupError::ZeroValue { context: "trials" })?;
    let design = SweepDesign {
        trial_count,
        ..SweepDesign::new(threshold, analysis.expected_above_threshold())
    };
    Ok(build_threshold_sweep(&design)?)
}

/// Builds a connectivity harness for `params`.
///
/// # Errors
/// Returns [`BenchSetupError::Experiment`] when the configuration is rejected.
pub fn connectivity_harness(
    params: &SweepBenchParams,
) -> Result<ExperimentHarness, BenchSetupError> {
    let builder = ExperimentHarness::builder()
        .with_vertex_count(params.vertex_count)
        .with_analysis(AnalysisKind::Connectivity);
    let configured = match params.threads {
        Some(threads) => builder.with_threads(threads),
        None => builder,
    };
    Ok(configured.build()?)
}
