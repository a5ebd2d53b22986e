//! Domain entities. Pure data structures for the posture core.
//!
//! No estimator/camera types here. Adapters map their payloads into these.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Number of joints in the body model produced by the pose estimator.
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Fixed joint enumeration of the 33-point body model. The discriminant is the
/// landmark index in every frame and is never reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyPart {
    /// Joints every posture descriptor is derived from.
    pub const POSTURE_JOINTS: [BodyPart; 7] = [
        BodyPart::Nose,
        BodyPart::LeftEar,
        BodyPart::RightEar,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftHip,
        BodyPart::RightHip,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

fn full_confidence() -> f64 {
    1.0
}

/// One joint estimate in normalized image coordinates (origin top-left, y grows downward).
///
/// Confidence fields default to 1.0 when the estimator omits them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default = "full_confidence")]
    pub visibility: f64,
    #[serde(default = "full_confidence")]
    pub presence: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility: 1.0,
            presence: 1.0,
        }
    }

    pub fn with_confidence(mut self, visibility: f64, presence: f64) -> Self {
        self.visibility = visibility;
        self.presence = presence;
        self
    }

    /// The weaker of visibility and presence.
    pub fn confidence(&self) -> f64 {
        self.visibility.min(self.presence)
    }

    pub fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

/// 2D point in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Read-only landmark sequence indexed by [`BodyPart`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet(Vec<Landmark>);

impl LandmarkSet {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self(landmarks)
    }

    pub fn get(&self, part: BodyPart) -> Option<&Landmark> {
        self.0.get(part.index())
    }

    /// Position of `part`, if the set is long enough to hold it.
    pub fn point(&self, part: BodyPart) -> Option<Point> {
        self.get(part).map(Landmark::point)
    }

    pub fn as_slice(&self) -> &[Landmark] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every joint in `parts` is present with confidence at or above `min_confidence`.
    pub fn all_confident(&self, parts: &[BodyPart], min_confidence: f64) -> bool {
        parts.iter().all(|&p| {
            self.get(p)
                .is_some_and(|lm| lm.confidence() >= min_confidence)
        })
    }

    /// True when at least one joint in `parts` passes the confidence gate.
    pub fn any_confident(&self, parts: &[BodyPart], min_confidence: f64) -> bool {
        parts.iter().any(|&p| {
            self.get(p)
                .is_some_and(|lm| lm.confidence() >= min_confidence)
        })
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self(landmarks)
    }
}

/// One estimator result as delivered at the input boundary.
///
/// `world_landmarks` (3D, metric) are carried through untouched for 3D viewers;
/// they play no part in classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseFrame {
    pub timestamp_ms: i64,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
    #[serde(default)]
    pub world_landmarks: Vec<Landmark>,
}

/// Per-frame posture descriptors in degrees. `None` marks a descriptor that could
/// not be derived this frame; it counts as no evidence, never as a violation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PostureDescriptor {
    pub nose_to_shoulder_angle: Option<f64>,
    pub ears_to_shoulder_angle: Option<f64>,
    pub shoulder_lean_angle: Option<f64>,
}

impl PostureDescriptor {
    pub fn is_empty(&self) -> bool {
        self.nose_to_shoulder_angle.is_none()
            && self.ears_to_shoulder_angle.is_none()
            && self.shoulder_lean_angle.is_none()
    }
}

/// Why a frame was classified as bad posture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostureReason {
    ForwardHead,
    TiltedHead,
    ShoulderLean,
}

impl fmt::Display for PostureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PostureReason::ForwardHead => "forward head",
            PostureReason::TiltedHead => "tilted head",
            PostureReason::ShoulderLean => "shoulder lean",
        };
        f.write_str(label)
    }
}

/// Classification of one processed frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationEvent {
    pub is_bad_posture: bool,
    pub reasons: BTreeSet<PostureReason>,
    pub timestamp_ms: i64,
}

impl ClassificationEvent {
    /// Builds an event; `is_bad_posture` follows from whether any reason is present.
    pub fn new(reasons: BTreeSet<PostureReason>, timestamp_ms: i64) -> Self {
        Self {
            is_bad_posture: !reasons.is_empty(),
            reasons,
            timestamp_ms,
        }
    }

    pub fn good(timestamp_ms: i64) -> Self {
        Self::new(BTreeSet::new(), timestamp_ms)
    }
}
