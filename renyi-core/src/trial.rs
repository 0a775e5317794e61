//! Single randomised trials and the predicates they evaluate.

use std::fmt;

use tracing::debug;

use crate::{
    analysis::{diameter, is_connected, is_isolated},
    error::{GraphError, SourceError},
    graph::Graph,
    random::UnitStream,
};

/// Comparison applied to a graph's diameter.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Comparison {
    /// Holds when the diameter is strictly greater than the bound. A
    /// disconnected graph always satisfies it.
    #[default]
    Greater,
    /// Holds when the diameter equals the bound exactly.
    Equal,
}

/// Diameter predicate evaluated by [`AnalysisKind::Diameter`].
///
/// # Examples
/// ```
/// use renyi_core::{Comparison, Diameter, DiameterTest};
///
/// let test = DiameterTest::default();
/// assert_eq!(test.comparison, Comparison::Greater);
/// assert_eq!(test.bound, 2);
/// assert!(test.holds(Diameter::Disconnected));
/// assert!(!test.holds(Diameter::Finite(2)));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DiameterTest {
    /// Comparison operator.
    pub comparison: Comparison,
    /// Right-hand side of the comparison.
    pub bound: usize,
}

impl Default for DiameterTest {
    fn default() -> Self {
        Self {
            comparison: Comparison::Greater,
            bound: 2,
        }
    }
}

impl DiameterTest {
    /// Evaluates the predicate against `value`.
    #[must_use]
    pub const fn holds(self, value: crate::Diameter) -> bool {
        match self.comparison {
            Comparison::Greater => value.exceeds(self.bound),
            Comparison::Equal => matches!(value, crate::Diameter::Finite(d) if d == self.bound),
        }
    }
}

/// Graph property measured by a trial.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum AnalysisKind {
    /// Every vertex is reachable from every other.
    #[default]
    Connectivity,
    /// At least one vertex has degree zero.
    Isolation,
    /// The diameter satisfies a configured comparison.
    Diameter(DiameterTest),
}

impl AnalysisKind {
    /// Evaluates the predicate on `graph`.
    ///
    /// # Examples
    /// ```
    /// use renyi_core::{AnalysisKind, Graph};
    ///
    /// let graph = Graph::new(3);
    /// assert!(!AnalysisKind::Connectivity.evaluate(&graph));
    /// assert!(AnalysisKind::Isolation.evaluate(&graph));
    /// ```
    #[must_use]
    pub fn evaluate(self, graph: &Graph) -> bool {
        match self {
            Self::Connectivity => is_connected(graph),
            Self::Isolation => is_isolated(graph),
            Self::Diameter(test) => test.holds(diameter(graph)),
        }
    }

    /// Returns the predicate value expected well above the threshold.
    ///
    /// Dense graphs are connected, have no isolated vertex, and shrink to
    /// diameter at most two.
    #[must_use]
    pub const fn expected_above_threshold(self) -> bool {
        match self {
            Self::Connectivity => true,
            Self::Isolation => false,
            Self::Diameter(DiameterTest {
                comparison: Comparison::Greater,
                ..
            }) => false,
            Self::Diameter(DiameterTest {
                comparison: Comparison::Equal,
                ..
            }) => true,
        }
    }

    /// Returns the sharp-threshold edge probability for `vertex_count`
    /// vertices.
    ///
    /// Connectivity and isolation share `ln(n) / n`; the diameter-two law sits
    /// at `sqrt(2 ln(n) / n)`. Returns `None` below two vertices where no
    /// threshold exists.
    ///
    /// # Examples
    /// ```
    /// use renyi_core::AnalysisKind;
    ///
    /// let p = AnalysisKind::Connectivity
    ///     .theoretical_threshold(1000)
    ///     .expect("n >= 2");
    /// assert!((p - 0.0069).abs() < 1e-4);
    /// ```
    #[must_use]
    pub fn theoretical_threshold(self, vertex_count: usize) -> Option<f64> {
        if vertex_count < 2 {
            return None;
        }
        #[expect(clippy::cast_precision_loss, reason = "vertex counts are far below 2^52")]
        let n = vertex_count as f64;
        let connectivity = n.ln() / n;
        match self {
            Self::Connectivity | Self::Isolation => Some(connectivity),
            Self::Diameter(_) => Some((2.0 * connectivity).sqrt()),
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connectivity => f.write_str("connectivity"),
            Self::Isolation => f.write_str("isolation"),
            Self::Diameter(DiameterTest {
                comparison: Comparison::Greater,
                bound,
            }) => write!(f, "diameter>{bound}"),
            Self::Diameter(DiameterTest {
                comparison: Comparison::Equal,
                bound,
            }) => write!(f, "diameter=={bound}"),
        }
    }
}

/// Parameters of one randomised trial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrialSpec {
    /// Number of vertices in the generated graph.
    pub vertex_count: usize,
    /// Edge probability.
    pub probability: f64,
    /// Predicate evaluated on the graph.
    pub kind: AnalysisKind,
    /// Outcome the trial is compared against.
    pub expected: bool,
}

/// Builds a fresh G(n, p) graph, evaluates the predicate, and reports whether
/// it matched the expected outcome.
///
/// Argument errors count as a non-match and are only logged at `debug`: a
/// trial is a statistical sample, not a correctness-critical operation.
///
/// # Errors
/// Returns [`SourceError`] when the stream fails; the caller must treat this
/// as fatal for the sweep.
///
/// # Examples
/// ```
/// use renyi_core::{AnalysisKind, RandomSource, SeededSource, TrialKey, TrialSpec, run_trial};
///
/// let spec = TrialSpec {
///     vertex_count: 20,
///     probability: 1.0,
///     kind: AnalysisKind::Connectivity,
///     expected: true,
/// };
/// let mut stream = SeededSource::new(5).stream(TrialKey { point_index: 0, trial_index: 0 })?;
/// assert!(run_trial(&spec, &mut stream)?);
/// # Ok::<(), renyi_core::SourceError>(())
/// ```
pub fn run_trial<S: UnitStream + ?Sized>(
    spec: &TrialSpec,
    stream: &mut S,
) -> Result<bool, SourceError> {
    match Graph::random(spec.vertex_count, spec.probability, stream) {
        Ok(graph) => Ok(spec.kind.evaluate(&graph) == spec.expected),
        Err(GraphError::Source(error)) => Err(error),
        Err(error) => {
            debug!(
                code = %error.code(),
                %error,
                "trial rejected by graph construction; counting as non-match"
            );
            Ok(false)
        }
    }
}
