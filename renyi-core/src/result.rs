//! Sweep results and the sink boundary they are handed to.

use crate::{sweep::ProbabilityPoint, trial::AnalysisKind};

/// Lifecycle of one probability point when the table was snapshotted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PointStatus {
    /// No trial of the point was dispatched.
    Pending,
    /// The point was started but not all of its trials completed.
    Partial,
    /// Every trial of the point completed.
    Complete,
}

impl PointStatus {
    /// Return the lowercase label used in tabular exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Complete => "complete",
        }
    }
}

/// Aggregated outcome of the trials run for one [`ProbabilityPoint`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointResult {
    point: ProbabilityPoint,
    successes: usize,
    completed_trials: usize,
    status: PointStatus,
}

impl PointResult {
    pub(crate) const fn pending(point: ProbabilityPoint) -> Self {
        Self {
            point,
            successes: 0,
            completed_trials: 0,
            status: PointStatus::Pending,
        }
    }

    pub(crate) fn record(&mut self, successes: usize, completed_trials: usize) {
        self.successes = successes;
        self.completed_trials = completed_trials;
        self.status = if completed_trials == self.point.trial_count().get() {
            PointStatus::Complete
        } else {
            PointStatus::Partial
        };
    }

    /// Returns the point this row describes.
    #[must_use]
    pub const fn point(&self) -> &ProbabilityPoint {
        &self.point
    }

    /// Returns the number of trials whose outcome matched the expectation.
    #[must_use]
    pub const fn successes(&self) -> usize {
        self.successes
    }

    /// Returns the number of trials that ran to completion.
    #[must_use]
    pub const fn completed_trials(&self) -> usize {
        self.completed_trials
    }

    /// Returns the point's lifecycle status.
    #[must_use]
    pub const fn status(&self) -> PointStatus {
        self.status
    }

    /// Returns `successes / completed_trials`, or `None` when no trial ran.
    ///
    /// # Examples
    /// ```
    /// use renyi_core::{
    ///     AnalysisKind, ExperimentHarness, NoProgress, ProbabilityPoint, SeededSource,
    /// };
    ///
    /// let harness = ExperimentHarness::builder()
    ///     .with_vertex_count(8)
    ///     .with_analysis(AnalysisKind::Connectivity)
    ///     .build()?;
    /// let points = [ProbabilityPoint::new(1.0, true, 4)?];
    /// let table = harness.run_sweep(&points, &SeededSource::new(1), &mut NoProgress)?;
    /// assert_eq!(table.rows()[0].success_rate(), Some(1.0));
    /// # Ok::<(), renyi_core::ExperimentError>(())
    /// ```
    #[must_use]
    pub fn success_rate(&self) -> Option<f64> {
        ratio(self.successes, self.completed_trials)
    }

    /// Returns the fraction of completed trials in which the analysed
    /// predicate held, independent of the expected outcome.
    #[must_use]
    pub fn predicate_rate(&self) -> Option<f64> {
        let held = if self.point.expected() {
            self.successes
        } else {
            self.completed_trials - self.successes
        };
        ratio(held, self.completed_trials)
    }
}

#[expect(clippy::cast_precision_loss, reason = "trial counts are far below 2^52")]
fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

/// Snapshot of a sweep: one [`PointResult`] per requested point, in sweep
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultsTable {
    kind: AnalysisKind,
    vertex_count: usize,
    rows: Vec<PointResult>,
}

impl ResultsTable {
    pub(crate) fn pending(
        kind: AnalysisKind,
        vertex_count: usize,
        points: &[ProbabilityPoint],
    ) -> Self {
        Self {
            kind,
            vertex_count,
            rows: points.iter().copied().map(PointResult::pending).collect(),
        }
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> Option<&mut PointResult> {
        self.rows.get_mut(index)
    }

    /// Returns the analysis the sweep measured.
    #[must_use]
    pub const fn kind(&self) -> AnalysisKind {
        self.kind
    }

    /// Returns the number of vertices per trial graph.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns every row in sweep order.
    #[must_use]
    pub fn rows(&self) -> &[PointResult] {
        &self.rows
    }

    /// Returns whether every point completed all of its trials.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.status() == PointStatus::Complete)
    }

    /// Iterates over the indices of points that did not complete.
    pub fn incomplete_points(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.status() != PointStatus::Complete)
            .map(|(index, _)| index)
    }
}

/// Destination for a finished [`ResultsTable`].
///
/// Serialisation lives with the implementor; the core only hands the table
/// over.
pub trait ResultsSink {
    /// Error produced while persisting the table.
    type Error;

    /// Persists `table`.
    ///
    /// # Errors
    /// Returns the sink's error when the table cannot be written.
    fn write_table(&mut self, table: &ResultsTable) -> Result<(), Self::Error>;
}
