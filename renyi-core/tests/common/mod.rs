use std::sync::Arc;

use renyi_core::{RandomSource, SourceError, TrialKey, UnitStream};

/// Source whose streams all replay the same constant draw.
#[derive(Clone, Copy, Debug)]
pub struct ConstantSource(pub f64);

impl RandomSource for ConstantSource {
    type Stream = ConstantStream;

    fn name(&self) -> &str {
        "constant"
    }

    fn stream(&self, _key: TrialKey) -> Result<Self::Stream, SourceError> {
        Ok(ConstantStream(self.0))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ConstantStream(f64);

impl UnitStream for ConstantStream {
    fn next_unit(&mut self) -> Result<f64, SourceError> {
        Ok(self.0)
    }
}

/// Source that refuses every stream for one point and serves the rest.
#[derive(Clone, Copy, Debug)]
pub struct OfflineAtPoint {
    pub point_index: usize,
    pub draw: f64,
}

impl RandomSource for OfflineAtPoint {
    type Stream = ConstantStream;

    fn name(&self) -> &str {
        "offline"
    }

    fn stream(&self, key: TrialKey) -> Result<Self::Stream, SourceError> {
        if key.point_index == self.point_index {
            return Err(SourceError::Unavailable {
                name: Arc::from(self.name()),
                reason: "entropy device unplugged".to_owned(),
            });
        }
        Ok(ConstantStream(self.draw))
    }
}
