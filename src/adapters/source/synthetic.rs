//! Synthetic landmark stream for running without a recorded estimator output.
//!
//! Deterministic script: upright, forward head, recovery, raised arm, lateral lean,
//! recovery. Adds small jitter, an occluded wrist and a few dropped frames so the
//! smoothing and gating paths are exercised.

use crate::adapters::source::ScriptedSource;
use crate::domain::{BodyPart, DomainError, Landmark, POSE_LANDMARK_COUNT, PoseFrame};
use crate::ports::LandmarkSource;
use std::time::Duration;
use tracing::info;

/// Default synthetic capture rate.
pub const DEFAULT_SYNTHETIC_FPS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Upright,
    ForwardHead,
    ArmRaised,
    Lean,
}

/// (phase, seconds)
const SCRIPT: [(Phase, u32); 7] = [
    (Phase::Upright, 3),
    (Phase::ForwardHead, 4),
    (Phase::Upright, 2),
    (Phase::ArmRaised, 3),
    (Phase::Upright, 2),
    (Phase::Lean, 3),
    (Phase::Upright, 2),
];

/// Every Nth frame is delivered empty (estimator returned no person).
const DROP_EVERY: usize = 97;

/// Replays the demo script. With `realtime` frames are paced at `fps`.
pub struct SyntheticLandmarkSource {
    inner: ScriptedSource,
}

impl SyntheticLandmarkSource {
    pub fn new(fps: u32, realtime: bool) -> Self {
        let fps = fps.max(1);
        let frames = demo_script(fps);
        info!(frames = frames.len(), fps, realtime, "using synthetic landmark stream");
        let inner = ScriptedSource::new(frames);
        let inner = if realtime {
            inner.with_frame_delay(Duration::from_millis(1000 / u64::from(fps)))
        } else {
            inner
        };
        Self { inner }
    }
}

#[async_trait::async_trait]
impl LandmarkSource for SyntheticLandmarkSource {
    async fn next_frame(&self) -> Result<Option<PoseFrame>, DomainError> {
        self.inner.next_frame().await
    }
}

/// The full demo script as frames.
pub fn demo_script(fps: u32) -> Vec<PoseFrame> {
    let fps = fps.max(1);
    let frame_ms = 1000.0 / f64::from(fps);
    let mut frames = Vec::new();
    let mut index = 0usize;

    for (phase, seconds) in SCRIPT {
        for _ in 0..seconds * fps {
            let timestamp_ms = (index as f64 * frame_ms).round() as i64;
            let landmarks = if index > 0 && index % DROP_EVERY == 0 {
                Vec::new()
            } else {
                pose(phase, index)
            };
            let world_landmarks = landmarks.iter().map(to_world).collect();
            frames.push(PoseFrame {
                timestamp_ms,
                landmarks,
                world_landmarks,
            });
            index += 1;
        }
    }
    frames
}

fn pose(phase: Phase, index: usize) -> Vec<Landmark> {
    let mut lms = vec![Landmark::new(0.5, 0.5, 0.0); POSE_LANDMARK_COUNT];
    let t = index as f64;
    let mut put = |part: BodyPart, x: f64, y: f64| {
        // deterministic sensor noise, ~±0.003
        let jitter = 0.003 * (t * 0.9 + part.index() as f64 * 1.7).sin();
        lms[part.index()] = Landmark::new(x + jitter, y - jitter, 0.0);
    };

    // Forward head: the head drops and the nose juts off the shoulder axis.
    let (head_drop, nose_shift) = if phase == Phase::ForwardHead {
        (0.18, 0.12)
    } else {
        (0.0, 0.0)
    };
    let (left_shoulder_y, right_shoulder_y) = match phase {
        Phase::ArmRaised => (0.6, 0.575),
        Phase::Lean => (0.64, 0.56),
        _ => (0.6, 0.6),
    };

    put(BodyPart::Nose, 0.5 + nose_shift, 0.3 + head_drop);
    put(BodyPart::LeftEar, 0.45, 0.28 + head_drop);
    put(BodyPart::RightEar, 0.55, 0.28 + head_drop);
    put(BodyPart::LeftShoulder, 0.35, left_shoulder_y);
    put(BodyPart::RightShoulder, 0.65, right_shoulder_y);
    put(BodyPart::LeftElbow, 0.3, 0.8);
    put(BodyPart::LeftWrist, 0.32, 0.95);
    if phase == Phase::ArmRaised {
        put(BodyPart::RightElbow, 0.72, 0.4);
        put(BodyPart::RightWrist, 0.7, 0.18);
    } else {
        put(BodyPart::RightElbow, 0.7, 0.8);
        put(BodyPart::RightWrist, 0.68, 0.95);
    }
    put(BodyPart::LeftHip, 0.4, 0.95);
    put(BodyPart::RightHip, 0.6, 0.95);

    // The left wrist drifts out of frame now and then.
    if index % 40 < 5 {
        let wrist = &mut lms[BodyPart::LeftWrist.index()];
        *wrist = wrist.with_confidence(0.2, 0.9);
    }
    lms
}

/// Rough metric coordinates centred on the hips, y up.
fn to_world(lm: &Landmark) -> Landmark {
    Landmark {
        x: (lm.x - 0.5) * 1.2,
        y: (0.95 - lm.y) * 1.2,
        z: lm.z,
        visibility: lm.visibility,
        presence: lm.presence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisSettings, BaselineBuilder, PostureReason, PostureSession};

    #[test]
    fn test_script_length_and_timestamps() {
        let frames = demo_script(10);
        assert_eq!(frames.len(), 19 * 10);
        assert_eq!(frames[1].timestamp_ms, 100);
        assert!(frames.iter().any(|f| f.landmarks.is_empty()));
        assert!(frames.windows(2).all(|w| w[0].timestamp_ms < w[1].timestamp_ms));
    }

    #[tokio::test]
    async fn test_source_yields_whole_script() {
        let source = SyntheticLandmarkSource::new(5, false);
        let mut count = 0;
        while source.next_frame().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 19 * 5);
    }

    #[test]
    fn test_script_drives_expected_classifications() {
        let frames = demo_script(30);
        let settings = AnalysisSettings::default();
        let mut builder = BaselineBuilder::new(&settings);
        for f in frames.iter().skip(10).take(15) {
            let _ = builder.push(f);
        }
        let mut session = PostureSession::new(builder.finish().unwrap(), settings);

        let mut seen = std::collections::BTreeSet::new();
        for f in &frames {
            if let Some(event) = session.process_frame(f) {
                seen.extend(event.reasons);
            }
        }
        let stats = session.finish();

        assert!(seen.contains(&PostureReason::ForwardHead));
        assert!(seen.contains(&PostureReason::ShoulderLean));
        // forward head episode + lean episode; the raised arm adds none
        assert_eq!(stats.warning_count, 2);
        assert!(session.skipped_frames().missing_input > 0);
    }
}
