//! Builder utilities for configuring [`ExperimentHarness`] instances.
//!
//! Validates worker-pool settings and carries the analysis and graph size
//! shared by every trial of a sweep.

use std::sync::Arc;

use rayon::ThreadPoolBuilder;

use crate::{
    error::{ExperimentError, Result},
    harness::{CancellationToken, ExperimentHarness},
    trial::AnalysisKind,
};

/// Number of vertices per trial graph unless configured otherwise.
pub const DEFAULT_VERTEX_COUNT: usize = 1000;

/// Configures and constructs [`ExperimentHarness`] instances.
///
/// # Examples
/// ```
/// use renyi_core::{AnalysisKind, HarnessBuilder};
///
/// let harness = HarnessBuilder::new()
///     .with_vertex_count(200)
///     .with_analysis(AnalysisKind::Isolation)
///     .with_threads(2)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(harness.vertex_count(), 200);
/// assert_eq!(harness.analysis(), AnalysisKind::Isolation);
/// ```
#[derive(Debug, Clone)]
pub struct HarnessBuilder {
    vertex_count: usize,
    analysis: AnalysisKind,
    threads: Option<usize>,
    cancellation: Option<CancellationToken>,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            vertex_count: DEFAULT_VERTEX_COUNT,
            analysis: AnalysisKind::Connectivity,
            threads: None,
            cancellation: None,
        }
    }
}

impl HarnessBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use renyi_core::{AnalysisKind, HarnessBuilder};
    ///
    /// let builder = HarnessBuilder::new();
    /// assert_eq!(builder.vertex_count(), 1000);
    /// assert_eq!(builder.analysis(), AnalysisKind::Connectivity);
    /// assert_eq!(builder.threads(), None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of vertices per trial graph.
    #[must_use]
    pub fn with_vertex_count(mut self, vertex_count: usize) -> Self {
        self.vertex_count = vertex_count;
        self
    }

    /// Returns the configured vertex count.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Selects the predicate every trial evaluates.
    #[must_use]
    pub fn with_analysis(mut self, analysis: AnalysisKind) -> Self {
        self.analysis = analysis;
        self
    }

    /// Returns the configured analysis.
    #[must_use]
    pub fn analysis(&self) -> AnalysisKind {
        self.analysis
    }

    /// Runs trials on a dedicated pool of `threads` workers instead of the
    /// global `rayon` pool.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Returns the dedicated worker count, if one was requested.
    #[must_use]
    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    /// Shares `token` with the harness so callers can stop a running sweep.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Validates the configuration and constructs an [`ExperimentHarness`].
    ///
    /// # Errors
    /// Returns [`ExperimentError::InvalidThreads`] when zero threads were
    /// requested and [`ExperimentError::ThreadPool`] when the dedicated pool
    /// cannot be created.
    ///
    /// # Examples
    /// ```
    /// use renyi_core::{ExperimentError, HarnessBuilder};
    ///
    /// let err = HarnessBuilder::new().with_threads(0).build().unwrap_err();
    /// assert_eq!(err, ExperimentError::InvalidThreads);
    /// ```
    pub fn build(self) -> Result<ExperimentHarness> {
        let pool = match self.threads {
            None => None,
            Some(0) => return Err(ExperimentError::InvalidThreads),
            Some(threads) => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|index| format!("renyi-trial-{index}"))
                    .build()
                    .map_err(|error| ExperimentError::ThreadPool {
                        reason: error.to_string(),
                    })?;
                Some(Arc::new(pool))
            }
        };

        Ok(ExperimentHarness::new(
            self.vertex_count,
            self.analysis,
            pool,
            self.cancellation.unwrap_or_default(),
        ))
    }
}
