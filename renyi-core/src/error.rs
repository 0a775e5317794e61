//! Error types for the renyi core library.
//!
//! Graph construction, random sources, and the experiment harness each expose
//! their own error enum. Graph and harness errors carry stable
//! machine-readable codes so drivers can report failures without matching on
//! display strings.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::result::ResultsTable;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Failure reported by a [`crate::RandomSource`] or one of its streams.
///
/// Source failures are systemic: they abort the whole sweep instead of being
/// absorbed into a single trial's outcome.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SourceError {
    /// The source can no longer produce draws.
    #[error("random source `{name}` is unavailable: {reason}")]
    Unavailable {
        /// Name reported by the failing source.
        name: Arc<str>,
        /// Human-readable explanation supplied by the source.
        reason: String,
    },
}

/// Errors raised while building or randomising a [`crate::Graph`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// A vertex index fell outside `[0, vertex_count)`.
    #[error("vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    VertexOutOfRange {
        /// The offending vertex index.
        vertex: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
    /// An edge was requested from a vertex to itself.
    #[error("self-loop on vertex {vertex} is not permitted")]
    SelfLoop {
        /// Vertex named at both ends of the edge.
        vertex: usize,
    },
    /// The edge probability was NaN or outside `[0, 1]`.
    #[error("edge probability must lie in [0, 1] (got {probability})")]
    InvalidProbability {
        /// Probability supplied by the caller.
        probability: f64,
    },
    /// The random source failed while drawing edges.
    #[error(transparent)]
    Source(#[from] SourceError),
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// A vertex index fell outside the graph.
        VertexOutOfRange => VertexOutOfRange { .. } => "GRAPH_VERTEX_OUT_OF_RANGE",
        /// An edge was requested from a vertex to itself.
        SelfLoop => SelfLoop { .. } => "GRAPH_SELF_LOOP",
        /// The edge probability was outside `[0, 1]`.
        InvalidProbability => InvalidProbability { .. } => "GRAPH_INVALID_PROBABILITY",
        /// The random source failed while drawing edges.
        SourceUnavailable => Source(..) => "GRAPH_SOURCE_UNAVAILABLE",
    }
}

/// Error type produced when configuring or running an experiment.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExperimentError {
    /// A probability point was constructed with a value outside `[0, 1]`.
    #[error("probability must lie in [0, 1] (got {probability})")]
    InvalidProbability {
        /// Probability supplied by the caller.
        probability: f64,
    },
    /// A probability point requested zero trials.
    #[error("trial_count must be at least 1 (got {got})")]
    InvalidTrialCount {
        /// The invalid trial count.
        got: usize,
    },
    /// The threshold sweep parameters cannot produce a valid sweep.
    #[error("invalid threshold sweep: {reason}")]
    InvalidSweep {
        /// Explanation of the rejected parameter.
        reason: String,
    },
    /// A dedicated worker pool was requested with zero threads.
    #[error("threads must be at least 1 when set explicitly")]
    InvalidThreads,
    /// The worker pool could not be constructed.
    #[error("failed to build worker pool: {reason}")]
    ThreadPool {
        /// Message reported by the pool builder.
        reason: String,
    },
    /// The random source failed and the sweep was aborted.
    #[error("sweep aborted at point {point_index}: {error}")]
    SourceUnavailable {
        /// Index of the point whose trials observed the failure.
        point_index: usize,
        /// Failure reported by the source.
        error: SourceError,
        /// Rows collected before the abort.
        partial: Box<ResultsTable>,
    },
}

define_error_codes! {
    /// Stable codes describing [`ExperimentError`] variants.
    enum ExperimentErrorCode for ExperimentError {
        /// A probability point was outside `[0, 1]`.
        InvalidProbability => InvalidProbability { .. } => "EXPERIMENT_INVALID_PROBABILITY",
        /// A probability point requested zero trials.
        InvalidTrialCount => InvalidTrialCount { .. } => "EXPERIMENT_INVALID_TRIAL_COUNT",
        /// The threshold sweep parameters were rejected.
        InvalidSweep => InvalidSweep { .. } => "EXPERIMENT_INVALID_SWEEP",
        /// Zero worker threads were requested.
        InvalidThreads => InvalidThreads => "EXPERIMENT_INVALID_THREADS",
        /// The worker pool could not be constructed.
        ThreadPool => ThreadPool { .. } => "EXPERIMENT_THREAD_POOL",
        /// The random source failed mid-sweep.
        SourceUnavailable => SourceUnavailable { .. } => "EXPERIMENT_SOURCE_UNAVAILABLE",
    }
}

impl ExperimentError {
    /// Returns the partially filled table when the sweep was aborted.
    ///
    /// # Examples
    /// ```
    /// use renyi_core::ExperimentError;
    ///
    /// let err = ExperimentError::InvalidThreads;
    /// assert!(err.partial_results().is_none());
    /// ```
    #[must_use]
    pub fn partial_results(&self) -> Option<&ResultsTable> {
        match self {
            Self::SourceUnavailable { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

/// Convenient result alias for experiment operations.
pub type Result<T> = core::result::Result<T, ExperimentError>;
