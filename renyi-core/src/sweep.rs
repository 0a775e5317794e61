//! Probability points and the threshold-bracketing sweep design.

use std::num::NonZeroUsize;

use crate::error::{ExperimentError, Result};

/// Number of points generated on each side of the threshold.
pub const POINTS_PER_SIDE: usize = 5;

/// Trials run per point unless configured otherwise.
pub const DEFAULT_TRIAL_COUNT: NonZeroUsize = match NonZeroUsize::new(500) {
    Some(count) => count,
    None => panic!("default trial count must be non-zero"),
};

/// One cell of a sweep: an edge probability, the outcome expected there, and
/// how many trials to run.
///
/// # Examples
/// ```
/// use renyi_core::ProbabilityPoint;
///
/// let point = ProbabilityPoint::new(0.25, true, 100)?;
/// assert_eq!(point.probability(), 0.25);
/// assert!(point.expected());
/// assert_eq!(point.trial_count().get(), 100);
/// assert!(ProbabilityPoint::new(1.25, true, 100).is_err());
/// # Ok::<(), renyi_core::ExperimentError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbabilityPoint {
    probability: f64,
    expected: bool,
    trial_count: NonZeroUsize,
}

impl ProbabilityPoint {
    /// Creates a point after validating its arguments.
    ///
    /// # Errors
    /// Returns [`ExperimentError::InvalidProbability`] when `probability` is
    /// NaN or outside `[0, 1]`, and [`ExperimentError::InvalidTrialCount`]
    /// when `trial_count` is zero.
    pub fn new(probability: f64, expected: bool, trial_count: usize) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ExperimentError::InvalidProbability { probability });
        }
        let trial_count = NonZeroUsize::new(trial_count)
            .ok_or(ExperimentError::InvalidTrialCount { got: trial_count })?;
        Ok(Self {
            probability,
            expected,
            trial_count,
        })
    }

    /// Returns the edge probability.
    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }

    /// Returns the outcome a trial is compared against.
    #[must_use]
    pub const fn expected(&self) -> bool {
        self.expected
    }

    /// Returns the number of trials run for this point.
    #[must_use]
    pub const fn trial_count(&self) -> NonZeroUsize {
        self.trial_count
    }
}

/// Parameters that turn one threshold constant into a bracketing sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepDesign {
    /// Theoretical threshold probability.
    pub threshold: f64,
    /// Step below the threshold, in percent of the threshold.
    pub down_jump_pct: f64,
    /// Step above the threshold, in percent of the threshold.
    pub up_jump_pct: f64,
    /// Trials per generated point.
    pub trial_count: NonZeroUsize,
    /// Outcome expected above the threshold; the opposite is expected below.
    pub expected_above: bool,
}

impl SweepDesign {
    /// Creates a design with 10% steps and [`DEFAULT_TRIAL_COUNT`] trials.
    #[must_use]
    pub const fn new(threshold: f64, expected_above: bool) -> Self {
        Self {
            threshold,
            down_jump_pct: 10.0,
            up_jump_pct: 10.0,
            trial_count: DEFAULT_TRIAL_COUNT,
            expected_above,
        }
    }
}

/// Builds ten points bracketing `design.threshold`, in ascending order.
///
/// Below the threshold the points are `t * (1 - k * down / 100)` for
/// `k = 5, 4, 3, 2, 1`; above it they are `t * (1 + k * up / 100)` for
/// `k = 1..=5`.
///
/// # Errors
/// Returns [`ExperimentError::InvalidSweep`] when an input is negative or not
/// finite, when the down step would drive a probability below zero, or when
/// the up step would exceed one.
///
/// # Examples
/// ```
/// use renyi_core::{SweepDesign, build_threshold_sweep};
///
/// let points = build_threshold_sweep(&SweepDesign::new(0.1, true))?;
/// assert_eq!(points.len(), 10);
/// assert!(!points[4].expected());
/// assert!(points[5].expected());
/// assert!((points[0].probability() - 0.05).abs() < 1e-12);
/// assert!((points[9].probability() - 0.15).abs() < 1e-12);
/// # Ok::<(), renyi_core::ExperimentError>(())
/// ```
pub fn build_threshold_sweep(design: &SweepDesign) -> Result<Vec<ProbabilityPoint>> {
    validate_design(design)?;
    let trials = design.trial_count.get();
    let below = (1..=POINTS_PER_SIDE)
        .rev()
        .map(|step| scaled(design.threshold, -design.down_jump_pct, step));
    let above =
        (1..=POINTS_PER_SIDE).map(|step| scaled(design.threshold, design.up_jump_pct, step));

    let below_points = below.map(|p| point(p, !design.expected_above, trials));
    let above_points = above.map(|p| point(p, design.expected_above, trials));
    below_points.chain(above_points).collect()
}

fn scaled(threshold: f64, pct: f64, step: usize) -> f64 {
    #[expect(clippy::cast_precision_loss, reason = "step is at most POINTS_PER_SIDE")]
    let factor = 1.0 + pct * step as f64 / 100.0;
    (threshold * factor).max(0.0)
}

fn point(probability: f64, expected: bool, trials: usize) -> Result<ProbabilityPoint> {
    ProbabilityPoint::new(probability, expected, trials).map_err(|_| ExperimentError::InvalidSweep {
        reason: format!("generated probability {probability} lies outside [0, 1]"),
    })
}

fn validate_design(design: &SweepDesign) -> Result<()> {
    let fields = [
        ("threshold", design.threshold),
        ("down_jump_pct", design.down_jump_pct),
        ("up_jump_pct", design.up_jump_pct),
    ];
    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(ExperimentError::InvalidSweep {
                reason: format!("{name} must be finite and non-negative (got {value})"),
            });
        }
    }
    #[expect(clippy::cast_precision_loss, reason = "POINTS_PER_SIDE is tiny")]
    let deepest = design.down_jump_pct * POINTS_PER_SIDE as f64;
    if deepest > 100.0 {
        return Err(ExperimentError::InvalidSweep {
            reason: format!(
                "down_jump_pct {} would step {deepest}% below the threshold",
                design.down_jump_pct
            ),
        });
    }
    Ok(())
}
