//! Concurrent Monte-Carlo sweep execution.
//!
//! Points are processed in order. The trials of one point fan out over
//! `rayon`; every matching trial bumps the point's atomic counter exactly once
//! and the harness waits for the whole point before finalising its row and
//! reporting progress. Graphs are owned by the trial that built them, so the
//! counters are the only shared mutable state.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

use rayon::{ThreadPool, prelude::*};
use tracing::{error, info, instrument, warn};

use crate::{
    builder::HarnessBuilder,
    error::{ExperimentError, Result, SourceError},
    random::{RandomSource, TrialKey},
    result::ResultsTable,
    sweep::ProbabilityPoint,
    trial::{AnalysisKind, TrialSpec, run_trial},
};

/// Shared flag that stops a sweep from dispatching further trials.
///
/// # Examples
/// ```
/// use renyi_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
/// token.cancel();
/// assert!(observer.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Trials already running finish normally.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Progress notification emitted after each completed point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Index of the point that just completed.
    pub point_index: usize,
    /// Number of points in the sweep.
    pub total_points: usize,
    /// Time spent on the completed point.
    pub point_elapsed: Duration,
    /// Time since the sweep started.
    pub elapsed: Duration,
}

/// Observer of sweep progress. Purely observational.
pub trait ProgressSink {
    /// Called once per completed point, in sweep order.
    fn point_completed(&mut self, update: &ProgressUpdate);
}

/// [`ProgressSink`] that discards every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn point_completed(&mut self, _update: &ProgressUpdate) {}
}

impl<F: FnMut(&ProgressUpdate)> ProgressSink for F {
    fn point_completed(&mut self, update: &ProgressUpdate) {
        self(update);
    }
}

/// Runs probability sweeps for one analysis and graph size.
///
/// # Examples
/// ```
/// use renyi_core::{
///     AnalysisKind, ExperimentHarness, NoProgress, SeededSource, SweepDesign,
///     build_threshold_sweep,
/// };
///
/// let harness = ExperimentHarness::builder()
///     .with_vertex_count(50)
///     .with_analysis(AnalysisKind::Connectivity)
///     .build()?;
/// let threshold = AnalysisKind::Connectivity
///     .theoretical_threshold(50)
///     .expect("n >= 2");
/// let mut design = SweepDesign::new(threshold, true);
/// design.trial_count = std::num::NonZeroUsize::new(20).expect("non-zero");
/// let points = build_threshold_sweep(&design)?;
/// let table = harness.run_sweep(&points, &SeededSource::new(9), &mut NoProgress)?;
/// assert!(table.is_complete());
/// assert_eq!(table.rows().len(), 10);
/// # Ok::<(), renyi_core::ExperimentError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ExperimentHarness {
    vertex_count: usize,
    analysis: AnalysisKind,
    pool: Option<Arc<ThreadPool>>,
    cancellation: CancellationToken,
}

struct PointTally {
    successes: usize,
    completed: usize,
    failure: Option<SourceError>,
}

impl ExperimentHarness {
    pub(crate) fn new(
        vertex_count: usize,
        analysis: AnalysisKind,
        pool: Option<Arc<ThreadPool>>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            vertex_count,
            analysis,
            pool,
            cancellation,
        }
    }

    /// Returns a [`HarnessBuilder`] with default settings.
    #[must_use]
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::new()
    }

    /// Returns the number of vertices per trial graph.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns the predicate every trial evaluates.
    #[must_use]
    pub fn analysis(&self) -> AnalysisKind {
        self.analysis
    }

    /// Returns the token observed by this harness.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Runs every trial of every point and returns the filled table.
    ///
    /// When the cancellation token fires, no further trials are dispatched
    /// and the partially filled table is returned with its unfinished rows
    /// marked `Partial` or `Pending`.
    ///
    /// # Errors
    /// Returns [`ExperimentError::SourceUnavailable`] carrying the partial
    /// table when `source` fails. Source failures are never retried.
    #[instrument(
        name = "harness.run_sweep",
        skip_all,
        fields(
            analysis = %self.analysis,
            vertex_count = self.vertex_count,
            points = points.len(),
            source = source.name(),
        ),
    )]
    pub fn run_sweep<S, P>(
        &self,
        points: &[ProbabilityPoint],
        source: &S,
        progress: &mut P,
    ) -> Result<ResultsTable>
    where
        S: RandomSource,
        P: ProgressSink + ?Sized,
    {
        let mut table = ResultsTable::pending(self.analysis, self.vertex_count, points);
        let total_points = points.len();
        let sweep_started = Instant::now();

        for (point_index, point) in points.iter().enumerate() {
            if self.cancellation.is_cancelled() {
                warn!(point_index, "sweep cancelled before point was dispatched");
                return Ok(table);
            }

            let point_started = Instant::now();
            let tally = self.run_point(point_index, point, source);
            let point_elapsed = point_started.elapsed();
            #[cfg(feature = "metrics")]
            record_point_metrics(&tally, point_elapsed);

            if let Some(row) = table.row_mut(point_index) {
                row.record(tally.successes, tally.completed);
            }

            if let Some(failure) = tally.failure {
                error!(
                    point_index,
                    completed = tally.completed,
                    error = %failure,
                    "random source failed; aborting sweep"
                );
                return Err(ExperimentError::SourceUnavailable {
                    point_index,
                    error: failure,
                    partial: Box::new(table),
                });
            }

            if tally.completed < point.trial_count().get() {
                warn!(
                    point_index,
                    completed = tally.completed,
                    trials = point.trial_count().get(),
                    "sweep cancelled mid-point"
                );
                return Ok(table);
            }

            info!(
                point_index,
                probability = point.probability(),
                expected = point.expected(),
                successes = tally.successes,
                trials = tally.completed,
                elapsed_ms = u64::try_from(point_elapsed.as_millis()).unwrap_or(u64::MAX),
                "probability point completed"
            );
            progress.point_completed(&ProgressUpdate {
                point_index,
                total_points,
                point_elapsed,
                elapsed: sweep_started.elapsed(),
            });
        }

        info!(
            elapsed_ms = u64::try_from(sweep_started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "sweep completed"
        );
        Ok(table)
    }

    fn run_point<S: RandomSource>(
        &self,
        point_index: usize,
        point: &ProbabilityPoint,
        source: &S,
    ) -> PointTally {
        let spec = TrialSpec {
            vertex_count: self.vertex_count,
            probability: point.probability(),
            kind: self.analysis,
            expected: point.expected(),
        };
        let successes = AtomicUsize::new(0);
        let completed = AtomicUsize::new(0);

        let fan_out = || {
            (0..point.trial_count().get())
                .into_par_iter()
                .try_for_each(|trial_index| {
                    if self.cancellation.is_cancelled() {
                        return Ok(());
                    }
                    let key = TrialKey {
                        point_index,
                        trial_index,
                    };
                    let mut stream = source.stream(key)?;
                    if run_trial(&spec, &mut stream)? {
                        successes.fetch_add(1, Ordering::Relaxed);
                    }
                    completed.fetch_add(1, Ordering::Relaxed);
                    Ok::<(), SourceError>(())
                })
        };

        let outcome = match &self.pool {
            Some(pool) => pool.install(fan_out),
            None => fan_out(),
        };

        PointTally {
            successes: successes.into_inner(),
            completed: completed.into_inner(),
            failure: outcome.err(),
        }
    }
}

#[cfg(feature = "metrics")]
fn record_point_metrics(tally: &PointTally, elapsed: Duration) {
    let as_u64 = |value: usize| u64::try_from(value).unwrap_or(u64::MAX);
    metrics::counter!("renyi_trials_completed").increment(as_u64(tally.completed));
    metrics::counter!("renyi_trials_matched").increment(as_u64(tally.successes));
    metrics::histogram!("renyi_point_duration_seconds").record(elapsed.as_secs_f64());
}
