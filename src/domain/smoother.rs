//! Confidence-gated exponential moving average over landmark coordinates.
//!
//! The one stateful, in-place component of the pipeline. Each session owns its
//! own smoother; frames must be fed from a single processing path.

use crate::domain::entities::{Landmark, LandmarkSet};
use crate::domain::settings::SmoothingParams;

/// x, y, z per joint.
const COORDS: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct LandmarkSmoother {
    params: SmoothingParams,
    /// Flat `[x0, y0, z0, x1, ...]` buffer, sized lazily.
    state: Vec<f64>,
    initialized: bool,
}

impl LandmarkSmoother {
    pub fn new(params: SmoothingParams) -> Self {
        Self {
            params,
            state: Vec::new(),
            initialized: false,
        }
    }

    pub fn params(&self) -> SmoothingParams {
        self.params
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Drop all history. The next frame is taken verbatim.
    pub fn reset(&mut self) {
        self.state.clear();
        self.initialized = false;
    }

    /// Smooth with the configured parameters.
    pub fn smooth(&mut self, raw: &[Landmark]) -> LandmarkSet {
        let SmoothingParams {
            alpha,
            min_confidence,
        } = self.params;
        self.smooth_with(raw, alpha, min_confidence)
    }

    /// Advance the filter by one frame and return a copy of the smoothed set.
    ///
    /// A change in joint count re-initializes the buffer. Joints whose confidence is
    /// below `min_confidence` keep their previous smoothed position. Visibility and
    /// presence are copied from `raw`.
    pub fn smooth_with(&mut self, raw: &[Landmark], alpha: f64, min_confidence: f64) -> LandmarkSet {
        let needed = raw.len() * COORDS;
        if self.state.len() != needed {
            self.state = vec![0.0; needed];
            self.initialized = false;
        }

        if !self.initialized {
            for (slot, lm) in self.state.chunks_exact_mut(COORDS).zip(raw) {
                slot.copy_from_slice(&[lm.x, lm.y, lm.z]);
            }
            self.initialized = true;
        } else {
            let keep = 1.0 - alpha;
            for (slot, lm) in self.state.chunks_exact_mut(COORDS).zip(raw) {
                if lm.confidence() < min_confidence {
                    continue;
                }
                slot[0] = alpha * lm.x + keep * slot[0];
                slot[1] = alpha * lm.y + keep * slot[1];
                slot[2] = alpha * lm.z + keep * slot[2];
            }
        }

        self.state
            .chunks_exact(COORDS)
            .zip(raw)
            .map(|(slot, lm)| Landmark {
                x: slot[0],
                y: slot[1],
                z: slot[2],
                visibility: lm.visibility,
                presence: lm.presence,
            })
            .collect::<Vec<_>>()
            .into()
    }
}
