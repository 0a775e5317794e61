//! Benchmark setup error type.
//!
//! Lets setup helpers propagate failures with `?` so benchmark files only
//! need a single `expect` at their boundary.

use renyi_core::{ExperimentError, GraphError, SourceError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// The random source refused to open a stream.
    #[error("random source failed: {0}")]
    Source(#[from] SourceError),
    /// Graph randomisation failed.
    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),
    /// Sweep or harness configuration was rejected.
    #[error("experiment setup failed: {0}")]
    Experiment(#[from] ExperimentError),
    /// The analysis has no threshold at this graph size.
    #[error("no theoretical threshold for {vertex_count} vertices")]
    NoThreshold {
        /// Requested vertex count.
        vertex_count: usize,
    },
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
}
