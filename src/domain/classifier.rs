//! Instantaneous per-frame comparison against the baseline.
//!
//! Holds no temporal state: smoothing happens upstream, episode tracking downstream.

use crate::domain::baseline::BaselineProfile;
use crate::domain::entities::{ClassificationEvent, PostureDescriptor, PostureReason};
use crate::domain::settings::ClassifierThresholds;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PostureClassifier {
    thresholds: ClassifierThresholds,
}

impl PostureClassifier {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> ClassifierThresholds {
        self.thresholds
    }

    /// Classify one frame. A reason is raised when `|current - baseline|` exceeds that
    /// dimension's threshold; unavailable descriptors never raise one.
    ///
    /// Returns `None` only when no descriptor is available at all.
    pub fn classify(
        &self,
        baseline: &BaselineProfile,
        current: &PostureDescriptor,
        timestamp_ms: i64,
    ) -> Option<ClassificationEvent> {
        if current.is_empty() {
            return None;
        }

        let checks = [
            (
                PostureReason::ForwardHead,
                current.nose_to_shoulder_angle,
                baseline.nose_to_shoulder_angle(),
                self.thresholds.forward_head_deg,
            ),
            (
                PostureReason::TiltedHead,
                current.ears_to_shoulder_angle,
                baseline.ears_to_shoulder_angle(),
                self.thresholds.tilt_deg,
            ),
            (
                PostureReason::ShoulderLean,
                current.shoulder_lean_angle,
                baseline.shoulder_lean_angle(),
                self.thresholds.lean_deg,
            ),
        ];

        let reasons: BTreeSet<PostureReason> = checks
            .into_iter()
            .filter_map(|(reason, angle, reference, threshold)| {
                let delta = (angle? - reference).abs();
                (delta > threshold).then_some(reason)
            })
            .collect();

        Some(ClassificationEvent::new(reasons, timestamp_ms))
    }
}
