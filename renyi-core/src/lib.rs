//! Renyi core library.
//!
//! Estimates threshold behaviour of Erdős–Rényi G(n, p) random graphs by
//! running many independent randomised trials per edge probability and
//! counting how often a graph predicate matches its expected outcome.
//!
//! # Metrics
//!
//! When the `metrics` feature is enabled the harness emits, per completed
//! point:
//!
//! - `renyi_trials_completed` (counter)
//! - `renyi_trials_matched` (counter)
//! - `renyi_point_duration_seconds` (histogram, seconds)
#![cfg_attr(docsrs, feature(doc_cfg))]

mod analysis;
mod builder;
mod error;
mod graph;
mod harness;
mod random;
mod result;
mod sweep;
mod trial;

#[cfg(test)]
mod test_utils;

pub use crate::{
    analysis::{Diameter, Distances, bfs_distances, diameter, is_connected, is_isolated},
    builder::{DEFAULT_VERTEX_COUNT, HarnessBuilder},
    error::{
        ExperimentError, ExperimentErrorCode, GraphError, GraphErrorCode, Result, SourceError,
    },
    graph::Graph,
    harness::{CancellationToken, ExperimentHarness, NoProgress, ProgressSink, ProgressUpdate},
    random::{RandomSource, SeededSource, SeededStream, TrialKey, UnitStream},
    result::{PointResult, PointStatus, ResultsSink, ResultsTable},
    sweep::{
        DEFAULT_TRIAL_COUNT, POINTS_PER_SIDE, ProbabilityPoint, SweepDesign,
        build_threshold_sweep,
    },
    trial::{AnalysisKind, Comparison, DiameterTest, TrialSpec, run_trial},
};
