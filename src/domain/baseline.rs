//! Baseline ("correct posture") profile and the calibration window that produces it.

use crate::domain::entities::{
    BodyPart, LandmarkSet, POSE_LANDMARK_COUNT, Point, PoseFrame, PostureDescriptor,
};
use crate::domain::errors::{CalibrationRejection, DomainError};
use crate::domain::features;
use crate::domain::motion_gate::MotionGate;
use crate::domain::settings::AnalysisSettings;
use serde::{Deserialize, Serialize};

/// Reference descriptors captured once per session. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineProfile {
    nose_to_shoulder_angle: f64,
    ears_to_shoulder_angle: f64,
    shoulder_lean_angle: f64,
    shoulder_center: Point,
    shoulder_width: f64,
    #[serde(default)]
    captured_at_ms: i64,
    #[serde(default)]
    frame_count: usize,
}

impl BaselineProfile {
    pub fn new(
        nose_to_shoulder_angle: f64,
        ears_to_shoulder_angle: f64,
        shoulder_lean_angle: f64,
        shoulder_center: Point,
        shoulder_width: f64,
    ) -> Self {
        Self {
            nose_to_shoulder_angle,
            ears_to_shoulder_angle,
            shoulder_lean_angle,
            shoulder_center,
            shoulder_width,
            captured_at_ms: 0,
            frame_count: 1,
        }
    }

    pub fn nose_to_shoulder_angle(&self) -> f64 {
        self.nose_to_shoulder_angle
    }

    pub fn ears_to_shoulder_angle(&self) -> f64 {
        self.ears_to_shoulder_angle
    }

    pub fn shoulder_lean_angle(&self) -> f64 {
        self.shoulder_lean_angle
    }

    pub fn shoulder_center(&self) -> Point {
        self.shoulder_center
    }

    pub fn shoulder_width(&self) -> f64 {
        self.shoulder_width
    }

    /// Timestamp of the last frame in the calibration window.
    pub fn captured_at_ms(&self) -> i64 {
        self.captured_at_ms
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn descriptor(&self) -> PostureDescriptor {
        PostureDescriptor {
            nose_to_shoulder_angle: Some(self.nose_to_shoulder_angle),
            ears_to_shoulder_angle: Some(self.ears_to_shoulder_angle),
            shoulder_lean_angle: Some(self.shoulder_lean_angle),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    nose: f64,
    ears: f64,
    lean: f64,
    shoulder_center: Point,
    shoulder_width: f64,
}

/// Accumulates a short window of good-posture frames and averages them into a
/// [`BaselineProfile`].
///
/// Frames are rejected when joints are missing or unconfident, when an arm is
/// raised, or when any descriptor is undefined.
#[derive(Debug, Clone)]
pub struct BaselineBuilder {
    gate: MotionGate,
    min_confidence: f64,
    samples: Vec<Sample>,
    rejected: usize,
    last_timestamp_ms: i64,
}

impl BaselineBuilder {
    pub fn new(settings: &AnalysisSettings) -> Self {
        Self {
            gate: MotionGate::new(settings.arm_raise_margin),
            min_confidence: settings.smoothing.min_confidence,
            samples: Vec::new(),
            rejected: 0,
            last_timestamp_ms: 0,
        }
    }

    pub fn accepted(&self) -> usize {
        self.samples.len()
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn push(&mut self, frame: &PoseFrame) -> Result<(), CalibrationRejection> {
        let res = self.sample(frame);
        match res {
            Ok(sample) => {
                self.samples.push(sample);
                self.last_timestamp_ms = frame.timestamp_ms;
                Ok(())
            }
            Err(reason) => {
                self.rejected += 1;
                Err(reason)
            }
        }
    }

    fn sample(&self, frame: &PoseFrame) -> Result<Sample, CalibrationRejection> {
        if frame.landmarks.len() < POSE_LANDMARK_COUNT {
            return Err(CalibrationRejection::MissingInput {
                found: frame.landmarks.len(),
                expected: POSE_LANDMARK_COUNT,
            });
        }
        let set = LandmarkSet::new(frame.landmarks.clone());
        if !set.all_confident(&BodyPart::POSTURE_JOINTS, self.min_confidence) {
            return Err(CalibrationRejection::LowConfidence);
        }
        if self.gate.arms_raised(&set) {
            return Err(CalibrationRejection::ArmsRaised);
        }

        let descriptor =
            features::describe(&set, false).ok_or(CalibrationRejection::DegenerateGeometry)?;
        let (shoulder_center, shoulder_width) =
            features::shoulder_frame(&set).ok_or(CalibrationRejection::DegenerateGeometry)?;
        match (
            descriptor.nose_to_shoulder_angle,
            descriptor.ears_to_shoulder_angle,
            descriptor.shoulder_lean_angle,
        ) {
            (Some(nose), Some(ears), Some(lean)) => Ok(Sample {
                nose,
                ears,
                lean,
                shoulder_center,
                shoulder_width,
            }),
            _ => Err(CalibrationRejection::DegenerateGeometry),
        }
    }

    /// Average the accepted frames. Fails when nothing was accepted.
    pub fn finish(&self) -> Result<BaselineProfile, DomainError> {
        if self.samples.is_empty() {
            return Err(DomainError::Calibration(format!(
                "no usable frame captured ({} rejected); sit upright with arms down and retry",
                self.rejected
            )));
        }
        let n = self.samples.len() as f64;
        let mean = |f: fn(&Sample) -> f64| self.samples.iter().map(f).sum::<f64>() / n;

        Ok(BaselineProfile {
            nose_to_shoulder_angle: mean(|s| s.nose),
            ears_to_shoulder_angle: mean(|s| s.ears),
            shoulder_lean_angle: mean(|s| s.lean),
            shoulder_center: Point::new(
                mean(|s| s.shoulder_center.x),
                mean(|s| s.shoulder_center.y),
            ),
            shoulder_width: mean(|s| s.shoulder_width),
            captured_at_ms: self.last_timestamp_ms,
            frame_count: self.samples.len(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::entities::Landmark;

    /// Upright subject facing the camera, arms resting.
    pub(crate) fn upright_landmarks() -> Vec<Landmark> {
        let mut lms = vec![Landmark::new(0.5, 0.5, 0.0); POSE_LANDMARK_COUNT];
        let mut set = |part: BodyPart, x: f64, y: f64| lms[part.index()] = Landmark::new(x, y, 0.0);
        set(BodyPart::Nose, 0.5, 0.3);
        set(BodyPart::LeftEar, 0.45, 0.28);
        set(BodyPart::RightEar, 0.55, 0.28);
        set(BodyPart::LeftShoulder, 0.35, 0.6);
        set(BodyPart::RightShoulder, 0.65, 0.6);
        set(BodyPart::LeftElbow, 0.3, 0.8);
        set(BodyPart::RightElbow, 0.7, 0.8);
        set(BodyPart::LeftWrist, 0.32, 0.95);
        set(BodyPart::RightWrist, 0.68, 0.95);
        set(BodyPart::LeftHip, 0.4, 0.95);
        set(BodyPart::RightHip, 0.6, 0.95);
        lms
    }

    fn frame(timestamp_ms: i64, landmarks: Vec<Landmark>) -> PoseFrame {
        PoseFrame {
            timestamp_ms,
            landmarks,
            world_landmarks: Vec::new(),
        }
    }

    #[test]
    fn test_capture_from_upright_frames() {
        let mut builder = BaselineBuilder::new(&AnalysisSettings::default());
        for ts in [0, 33, 66] {
            builder.push(&frame(ts, upright_landmarks())).unwrap();
        }
        let profile = builder.finish().unwrap();
        assert_eq!(profile.frame_count(), 3);
        assert_eq!(profile.captured_at_ms(), 66);
        assert!((profile.shoulder_width() - 0.3).abs() < 1e-9);
        assert!((profile.shoulder_center().x - 0.5).abs() < 1e-9);
        assert!(profile.shoulder_lean_angle().abs() < 1e-9);
        assert!(profile.ears_to_shoulder_angle().abs() < 1e-9);
        // nose straight above the shoulder center
        assert!(profile.nose_to_shoulder_angle().abs() < 1e-9);
    }

    #[test]
    fn test_rejects_raised_arms() {
        let mut builder = BaselineBuilder::new(&AnalysisSettings::default());
        let mut lms = upright_landmarks();
        lms[BodyPart::LeftWrist.index()].y = 0.2;
        assert_eq!(
            builder.push(&frame(0, lms)),
            Err(CalibrationRejection::ArmsRaised)
        );
        assert_eq!(builder.rejected(), 1);
        assert!(matches!(builder.finish(), Err(DomainError::Calibration(_))));
    }

    #[test]
    fn test_rejects_low_confidence_and_short_frames() {
        let mut builder = BaselineBuilder::new(&AnalysisSettings::default());
        let mut lms = upright_landmarks();
        lms[BodyPart::Nose.index()] = lms[BodyPart::Nose.index()].with_confidence(0.2, 1.0);
        assert_eq!(
            builder.push(&frame(0, lms)),
            Err(CalibrationRejection::LowConfidence)
        );
        assert_eq!(
            builder.push(&frame(1, Vec::new())),
            Err(CalibrationRejection::MissingInput {
                found: 0,
                expected: POSE_LANDMARK_COUNT
            })
        );
        builder.push(&frame(2, upright_landmarks())).unwrap();
        assert_eq!(builder.accepted(), 1);
        assert_eq!(builder.rejected(), 2);
        assert!(builder.finish().is_ok());
    }

    #[test]
    fn test_rejects_collapsed_shoulders() {
        let mut builder = BaselineBuilder::new(&AnalysisSettings::default());
        let mut lms = upright_landmarks();
        lms[BodyPart::RightShoulder.index()] = lms[BodyPart::LeftShoulder.index()];
        assert_eq!(
            builder.push(&frame(0, lms)),
            Err(CalibrationRejection::DegenerateGeometry)
        );
    }

    #[test]
    fn test_profile_serde() {
        let profile = BaselineProfile::new(5.0, 2.0, 0.0, Point::new(0.5, 0.6), 0.3);
        let json = serde_json::to_string(&profile).unwrap();
        let back: BaselineProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
        assert_eq!(back.descriptor().nose_to_shoulder_angle, Some(5.0));
    }
}
