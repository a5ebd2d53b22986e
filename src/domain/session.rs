//! Per-session analysis pipeline.
//!
//! raw landmarks -> smoother -> motion gate + features -> classifier -> stats.
//! Every stateful component is owned here; sessions share nothing.

use crate::domain::baseline::BaselineProfile;
use crate::domain::classifier::PostureClassifier;
use crate::domain::entities::{
    BodyPart, ClassificationEvent, LandmarkSet, POSE_LANDMARK_COUNT, PoseFrame,
};
use crate::domain::errors::FrameSkip;
use crate::domain::features;
use crate::domain::motion_gate::MotionGate;
use crate::domain::settings::AnalysisSettings;
use crate::domain::smoother::LandmarkSmoother;
use crate::domain::stats::{SessionStats, SessionStatsAggregator};
use tracing::{debug, info};

/// Frames that produced no classification, by reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkippedFrames {
    pub missing_input: u64,
    pub low_confidence: u64,
    pub degenerate_geometry: u64,
}

impl SkippedFrames {
    pub fn total(&self) -> u64 {
        self.missing_input + self.low_confidence + self.degenerate_geometry
    }

    fn count(&mut self, skip: FrameSkip) {
        match skip {
            FrameSkip::MissingInput { .. } => self.missing_input += 1,
            FrameSkip::LowConfidence => self.low_confidence += 1,
            FrameSkip::DegenerateGeometry => self.degenerate_geometry += 1,
        }
    }
}

pub struct PostureSession {
    baseline: BaselineProfile,
    settings: AnalysisSettings,
    smoother: LandmarkSmoother,
    gate: MotionGate,
    classifier: PostureClassifier,
    aggregator: SessionStatsAggregator,
    skipped: SkippedFrames,
    processed: u64,
}

impl PostureSession {
    pub fn new(baseline: BaselineProfile, settings: AnalysisSettings) -> Self {
        Self {
            baseline,
            settings,
            smoother: LandmarkSmoother::new(settings.smoothing),
            gate: MotionGate::new(settings.arm_raise_margin),
            classifier: PostureClassifier::new(settings.thresholds),
            aggregator: SessionStatsAggregator::new(),
            skipped: SkippedFrames::default(),
            processed: 0,
        }
    }

    pub fn baseline(&self) -> &BaselineProfile {
        &self.baseline
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn stats(&self) -> SessionStats {
        self.aggregator.snapshot()
    }

    pub fn skipped_frames(&self) -> SkippedFrames {
        self.skipped
    }

    /// Frames that produced a classification.
    pub fn processed_frames(&self) -> u64 {
        self.processed
    }

    pub fn first_timestamp_ms(&self) -> Option<i64> {
        self.aggregator.first_timestamp_ms()
    }

    pub fn duration_ms(&self) -> u64 {
        self.aggregator.duration_ms()
    }

    /// Run one frame through the pipeline. `None` means the frame contributed nothing;
    /// accumulated statistics are never reset by a bad frame.
    pub fn process_frame(&mut self, frame: &PoseFrame) -> Option<ClassificationEvent> {
        match self.evaluate(frame) {
            Ok(event) => {
                self.processed += 1;
                if self.aggregator.record(&event) {
                    info!(
                        ts = event.timestamp_ms,
                        warnings = self.aggregator.snapshot().warning_count,
                        reasons = ?event.reasons,
                        "bad posture episode started"
                    );
                }
                Some(event)
            }
            Err(skip) => {
                debug!(ts = frame.timestamp_ms, reason = %skip, "frame skipped");
                self.skipped.count(skip);
                None
            }
        }
    }

    fn evaluate(&mut self, frame: &PoseFrame) -> Result<ClassificationEvent, FrameSkip> {
        if frame.landmarks.len() < POSE_LANDMARK_COUNT {
            return Err(FrameSkip::MissingInput {
                found: frame.landmarks.len(),
                expected: POSE_LANDMARK_COUNT,
            });
        }

        let min_confidence = self.settings.smoothing.min_confidence;
        let raw = LandmarkSet::new(frame.landmarks.clone());
        let smoothed = self.smoother.smooth(&frame.landmarks);
        if !raw.any_confident(&BodyPart::POSTURE_JOINTS, min_confidence) {
            return Err(FrameSkip::LowConfidence);
        }

        let arms_raised = self.gate.arms_raised(&smoothed);
        let descriptor =
            features::describe(&smoothed, arms_raised).ok_or(FrameSkip::DegenerateGeometry)?;
        self.classifier
            .classify(&self.baseline, &descriptor, frame.timestamp_ms)
            .ok_or(FrameSkip::DegenerateGeometry)
    }

    /// Start over with the same baseline: fresh smoother history and zeroed counters.
    pub fn restart(&mut self) {
        self.smoother.reset();
        self.aggregator.reset();
        self.skipped = SkippedFrames::default();
        self.processed = 0;
    }

    /// Close any open episode and return the final counters.
    pub fn finish(&mut self) -> SessionStats {
        self.aggregator.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::baseline::BaselineBuilder;
    use crate::domain::baseline::tests::upright_landmarks;
    use crate::domain::entities::{Landmark, PostureReason};

    fn frame(timestamp_ms: i64, landmarks: Vec<Landmark>) -> PoseFrame {
        PoseFrame {
            timestamp_ms,
            landmarks,
            world_landmarks: Vec::new(),
        }
    }

    fn calibrated_session() -> PostureSession {
        let settings = AnalysisSettings::default();
        let mut builder = BaselineBuilder::new(&settings);
        builder.push(&frame(0, upright_landmarks())).unwrap();
        PostureSession::new(builder.finish().unwrap(), settings)
    }

    fn slouched() -> Vec<Landmark> {
        let mut lms = upright_landmarks();
        // Head drops and juts off the shoulder axis.
        lms[BodyPart::Nose.index()].x = 0.62;
        lms[BodyPart::Nose.index()].y = 0.48;
        lms[BodyPart::LeftEar.index()].y = 0.46;
        lms[BodyPart::RightEar.index()].y = 0.46;
        lms
    }

    /// Right arm overhead; the right shoulder landmark is dragged upward with it.
    fn arm_raised() -> Vec<Landmark> {
        let mut lms = upright_landmarks();
        lms[BodyPart::RightShoulder.index()].y = 0.52;
        lms[BodyPart::RightElbow.index()].y = 0.35;
        lms[BodyPart::RightWrist.index()].y = 0.15;
        lms
    }

    #[test]
    fn test_upright_is_good() {
        let mut session = calibrated_session();
        let event = session.process_frame(&frame(0, upright_landmarks())).unwrap();
        assert!(!event.is_bad_posture);
        assert_eq!(session.stats().warning_count, 0);
    }

    #[test]
    fn test_sustained_slouch_raises_one_warning() {
        let mut session = calibrated_session();
        session.process_frame(&frame(0, upright_landmarks()));
        let mut events = Vec::new();
        for i in 1..=30 {
            events.push(session.process_frame(&frame(i * 33, slouched())).unwrap());
        }
        let last = events.last().unwrap();
        assert!(last.is_bad_posture);
        assert!(last.reasons.contains(&PostureReason::ForwardHead));
        // Smoothing delays the first bad frame.
        assert!(!events[0].is_bad_posture);
        assert_eq!(session.stats().warning_count, 1);
        assert!(session.stats().currently_unfocused);
    }

    #[test]
    fn test_raised_arm_is_not_lean() {
        let mut session = calibrated_session();
        for i in 0..20 {
            let event = session.process_frame(&frame(i * 33, arm_raised())).unwrap();
            assert!(
                !event.reasons.contains(&PostureReason::ShoulderLean),
                "frame {} flagged lean",
                i
            );
        }
    }

    #[test]
    fn test_same_shoulder_shift_without_arm_is_lean() {
        let mut session = calibrated_session();
        let mut lms = upright_landmarks();
        lms[BodyPart::RightShoulder.index()].y = 0.52;
        let event = session.process_frame(&frame(0, lms)).unwrap();
        assert!(event.reasons.contains(&PostureReason::ShoulderLean));
    }

    #[test]
    fn test_missing_input_keeps_totals() {
        let mut session = calibrated_session();
        for i in 0..30 {
            session.process_frame(&frame(i * 33, slouched()));
        }
        let before = session.stats();
        assert_eq!(session.process_frame(&frame(2000, Vec::new())), None);
        assert_eq!(
            session.process_frame(&frame(2033, upright_landmarks()[..20].to_vec())),
            None
        );
        assert_eq!(session.stats(), before);
        assert_eq!(session.skipped_frames().missing_input, 2);
    }

    #[test]
    fn test_all_posture_joints_unconfident_is_skipped() {
        let mut session = calibrated_session();
        let lms: Vec<Landmark> = upright_landmarks()
            .into_iter()
            .map(|lm| lm.with_confidence(0.1, 0.1))
            .collect();
        assert_eq!(session.process_frame(&frame(0, lms)), None);
        assert_eq!(session.skipped_frames().low_confidence, 1);
    }

    #[test]
    fn test_degenerate_geometry_is_skipped() {
        let mut session = calibrated_session();
        let mut lms = upright_landmarks();
        lms[BodyPart::RightShoulder.index()] = lms[BodyPart::LeftShoulder.index()];
        assert_eq!(session.process_frame(&frame(0, lms)), None);
        assert_eq!(session.skipped_frames().degenerate_geometry, 1);
    }

    #[test]
    fn test_finish_and_restart() {
        let mut session = calibrated_session();
        session.process_frame(&frame(0, upright_landmarks()));
        for i in 1..=30 {
            session.process_frame(&frame(i * 100, slouched()));
        }
        let stats = session.finish();
        assert_eq!(stats.warning_count, 1);
        assert!(stats.unfocused_ms > 0);
        assert!(!stats.currently_unfocused);

        session.restart();
        assert_eq!(session.stats(), SessionStats::default());
        assert_eq!(session.processed_frames(), 0);
    }
}
