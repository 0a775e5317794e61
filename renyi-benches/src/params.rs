//! Benchmark parameter types.
//!
//! `Display` renders the compact labels Criterion uses as benchmark IDs.

use std::fmt;

use renyi_core::AnalysisKind;

/// Parameters for timing one trial at the analysis threshold.
#[derive(Clone, Copy, Debug)]
pub struct TrialBenchParams {
    /// Vertices in the random graph.
    pub vertex_count: usize,
    /// Predicate evaluated after randomisation.
    pub analysis: AnalysisKind,
    /// Seed for the graph's edge draws.
    pub seed: u64,
}

impl fmt::Display for TrialBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},n={}", self.analysis, self.vertex_count)
    }
}

/// Parameters for timing a full ten-point sweep.
#[derive(Clone, Copy, Debug)]
pub struct SweepBenchParams {
    /// Vertices per random graph.
    pub vertex_count: usize,
    /// Trials per probability point.
    pub trials: usize,
    /// Dedicated worker threads, or `None` for the global pool.
    pub threads: Option<usize>,
    /// Base seed of the random source.
    pub seed: u64,
}

impl fmt::Display for SweepBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let threads = self
            .threads
            .map_or_else(|| "global".to_owned(), |threads| threads.to_string());
        write!(
            f,
            "n={},trials={},threads={threads}",
            self.vertex_count, self.trials
        )
    }
}
