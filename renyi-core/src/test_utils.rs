//! Shared test utilities for `renyi-core`.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use proptest::test_runner::Config as ProptestConfig;
use renyi_test_support::proptest_profile::PropertyRunProfile;

use crate::{
    error::SourceError,
    random::{RandomSource, TrialKey, UnitStream},
};

/// Builds a proptest configuration honouring the shared run profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = PropertyRunProfile::from_env(default_cases);
    ProptestConfig {
        cases: profile.cases(),
        ..ProptestConfig::default()
    }
}

/// Stream that returns the same value forever and counts draws.
#[derive(Clone, Debug)]
pub(crate) struct FixedStream {
    value: f64,
    draws: usize,
}

impl FixedStream {
    pub(crate) fn new(value: f64) -> Self {
        Self { value, draws: 0 }
    }

    pub(crate) fn draws(&self) -> usize {
        self.draws
    }
}

impl UnitStream for FixedStream {
    fn next_unit(&mut self) -> Result<f64, SourceError> {
        self.draws += 1;
        Ok(self.value)
    }
}

/// Stream that replays a fixed script and fails once it runs dry.
#[derive(Clone, Debug)]
pub(crate) struct ScriptedStream {
    script: std::vec::IntoIter<f64>,
}

impl ScriptedStream {
    pub(crate) fn new(script: Vec<f64>) -> Self {
        Self {
            script: script.into_iter(),
        }
    }
}

impl UnitStream for ScriptedStream {
    fn next_unit(&mut self) -> Result<f64, SourceError> {
        self.script.next().ok_or_else(|| SourceError::Unavailable {
            name: Arc::from("scripted"),
            reason: "script exhausted".to_owned(),
        })
    }
}

/// [`RandomSource`] that hands out constant streams until a stream budget is
/// spent, then reports itself unavailable.
#[derive(Debug)]
pub(crate) struct BudgetSource {
    value: f64,
    remaining: AtomicUsize,
}

impl BudgetSource {
    pub(crate) fn new(value: f64, streams: usize) -> Self {
        Self {
            value,
            remaining: AtomicUsize::new(streams),
        }
    }

    pub(crate) fn unlimited(value: f64) -> Self {
        Self::new(value, usize::MAX)
    }
}

impl RandomSource for BudgetSource {
    type Stream = FixedStream;

    fn name(&self) -> &str {
        "budget"
    }

    fn stream(&self, _key: TrialKey) -> Result<Self::Stream, SourceError> {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |left| {
                left.checked_sub(1)
            })
            .map(|_| FixedStream::new(self.value))
            .map_err(|_| SourceError::Unavailable {
                name: Arc::from(self.name()),
                reason: "stream budget exhausted".to_owned(),
            })
    }
}
