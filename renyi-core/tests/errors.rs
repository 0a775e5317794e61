//! Stable error codes and their mapping from failure sites.

use std::sync::Arc;

use renyi_core::{
    ExperimentError, ExperimentErrorCode, Graph, GraphError, GraphErrorCode, HarnessBuilder,
    ProbabilityPoint, SourceError, SweepDesign, build_threshold_sweep,
};
use rstest::rstest;

fn offline() -> SourceError {
    SourceError::Unavailable {
        name: Arc::from("offline"),
        reason: "gone".to_owned(),
    }
}

#[rstest]
#[case::out_of_range(GraphError::VertexOutOfRange { vertex: 4, vertex_count: 2 }, "GRAPH_VERTEX_OUT_OF_RANGE")]
#[case::self_loop(GraphError::SelfLoop { vertex: 1 }, "GRAPH_SELF_LOOP")]
#[case::probability(GraphError::InvalidProbability { probability: 2.0 }, "GRAPH_INVALID_PROBABILITY")]
#[case::source(GraphError::Source(offline()), "GRAPH_SOURCE_UNAVAILABLE")]
fn graph_codes_are_stable(#[case] err: GraphError, #[case] expected: &str) {
    assert_eq!(err.code().as_str(), expected);
    assert_eq!(err.code().to_string(), expected);
}

#[rstest]
#[case::probability(ExperimentError::InvalidProbability { probability: -1.0 }, "EXPERIMENT_INVALID_PROBABILITY")]
#[case::trials(ExperimentError::InvalidTrialCount { got: 0 }, "EXPERIMENT_INVALID_TRIAL_COUNT")]
#[case::sweep(ExperimentError::InvalidSweep { reason: "bad".into() }, "EXPERIMENT_INVALID_SWEEP")]
#[case::threads(ExperimentError::InvalidThreads, "EXPERIMENT_INVALID_THREADS")]
#[case::pool(ExperimentError::ThreadPool { reason: "busy".into() }, "EXPERIMENT_THREAD_POOL")]
fn experiment_codes_are_stable(#[case] err: ExperimentError, #[case] expected: &str) {
    assert_eq!(err.code().as_str(), expected);
    assert!(err.partial_results().is_none());
}

#[rstest]
#[case::negative(-0.1)]
#[case::above_one(1.5)]
#[case::nan(f64::NAN)]
fn probability_points_reject_out_of_range(#[case] probability: f64) {
    let err = ProbabilityPoint::new(probability, true, 1).expect_err("must reject");
    assert_eq!(err.code(), ExperimentErrorCode::InvalidProbability);
}

#[test]
fn probability_points_reject_zero_trials() {
    let err = ProbabilityPoint::new(0.5, true, 0).expect_err("must reject");
    assert_eq!(err, ExperimentError::InvalidTrialCount { got: 0 });
}

#[test]
fn oversized_down_jump_is_an_invalid_sweep() {
    let mut design = SweepDesign::new(0.01, true);
    design.down_jump_pct = 25.0;
    let err = build_threshold_sweep(&design).expect_err("threshold would go negative");
    assert_eq!(err.code(), ExperimentErrorCode::InvalidSweep);
}

#[test]
fn zero_threads_is_rejected_at_build_time() {
    let err = HarnessBuilder::new()
        .with_threads(0)
        .build()
        .expect_err("must reject");
    assert_eq!(err.code(), ExperimentErrorCode::InvalidThreads);
}

#[rstest]
#[case::self_loop(2, 2, GraphErrorCode::SelfLoop)]
#[case::first_out_of_range(5, 1, GraphErrorCode::VertexOutOfRange)]
#[case::second_out_of_range(1, 3, GraphErrorCode::VertexOutOfRange)]
fn add_edge_reports_codes(#[case] u: usize, #[case] v: usize, #[case] code: GraphErrorCode) {
    let mut graph = Graph::new(3);
    let err = graph.add_edge(u, v).expect_err("edge must be rejected");
    assert_eq!(err.code(), code);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn source_errors_display_their_origin() {
    let err = GraphError::from(offline());
    assert_eq!(
        err.to_string(),
        "random source `offline` is unavailable: gone"
    );
}
