//! Pure geometry turning landmarks into posture descriptors.
//!
//! All angles are in degrees. Lengths are normalized by shoulder width so the
//! descriptors do not change as the subject moves toward or away from the camera.
//! Degenerate geometry yields `None` instead of NaN/Inf.

use crate::domain::entities::{BodyPart, LandmarkSet, Point, PostureDescriptor};

/// Segments shorter than this (normalized image units) are treated as degenerate.
pub const MIN_SEGMENT_LENGTH: f64 = 1e-4;

/// Midpoint of two points.
pub fn center(a: Point, b: Point) -> Point {
    Point {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}

/// Euclidean distance in the image plane (z ignored).
pub fn distance_2d(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

fn usable_width(shoulder_width: f64) -> Option<f64> {
    (shoulder_width.is_finite() && shoulder_width >= MIN_SEGMENT_LENGTH).then_some(shoulder_width)
}

fn finite(angle: f64) -> Option<f64> {
    angle.is_finite().then_some(angle)
}

/// Forward-head proxy: signed angle from vertical of the vector from the shoulder
/// center to the nose, both components in shoulder widths. Zero with the nose
/// straight above the shoulder center; positive when it sits toward larger x.
pub fn nose_to_shoulder_angle(nose: Point, shoulder_center: Point, shoulder_width: f64) -> Option<f64> {
    let width = usable_width(shoulder_width)?;
    if !(nose.is_finite() && shoulder_center.is_finite()) {
        return None;
    }
    let dx = (nose.x - shoulder_center.x) / width;
    let up = (shoulder_center.y - nose.y) / width;
    finite(dx.atan2(up).to_degrees())
}

/// Head tilt proxy: signed angle from vertical of the vector from the shoulder
/// center to the ear midpoint, both components in shoulder widths. Positive when
/// the head sits toward larger x.
pub fn ears_to_shoulder_angle(
    left_ear: Point,
    right_ear: Point,
    shoulder_center: Point,
    shoulder_width: f64,
) -> Option<f64> {
    let width = usable_width(shoulder_width)?;
    let ears = center(left_ear, right_ear);
    if !(ears.is_finite() && shoulder_center.is_finite()) {
        return None;
    }
    let dx = (ears.x - shoulder_center.x) / width;
    let up = (shoulder_center.y - ears.y) / width;
    finite(dx.atan2(up).to_degrees())
}

/// Lateral lean: angle of the shoulder line relative to the hip line, wrapped to (-180, 180].
///
/// With `suppress_arm_signal` the reading is withheld: a raised arm drags its
/// shoulder landmark upward, so the shoulder line no longer reflects the torso.
pub fn shoulder_lean_angle(
    left_shoulder: Point,
    right_shoulder: Point,
    left_hip: Point,
    right_hip: Point,
    suppress_arm_signal: bool,
) -> Option<f64> {
    if suppress_arm_signal {
        return None;
    }
    if distance_2d(left_shoulder, right_shoulder) < MIN_SEGMENT_LENGTH
        || distance_2d(left_hip, right_hip) < MIN_SEGMENT_LENGTH
    {
        return None;
    }
    let shoulders = (right_shoulder.y - left_shoulder.y).atan2(right_shoulder.x - left_shoulder.x);
    let hips = (right_hip.y - left_hip.y).atan2(right_hip.x - left_hip.x);
    finite(wrap_degrees((shoulders - hips).to_degrees()))
}

fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Shoulder midpoint and width, the reference frame for the head descriptors.
pub fn shoulder_frame(set: &LandmarkSet) -> Option<(Point, f64)> {
    let left = set.point(BodyPart::LeftShoulder)?;
    let right = set.point(BodyPart::RightShoulder)?;
    Some((center(left, right), distance_2d(left, right)))
}

/// Derive all descriptors from one landmark set.
///
/// Returns `None` when the set is too short to hold the posture joints. Individual
/// descriptors may still be `None` for degenerate geometry.
pub fn describe(set: &LandmarkSet, suppress_arm_signal: bool) -> Option<PostureDescriptor> {
    let nose = set.point(BodyPart::Nose)?;
    let left_ear = set.point(BodyPart::LeftEar)?;
    let right_ear = set.point(BodyPart::RightEar)?;
    let left_shoulder = set.point(BodyPart::LeftShoulder)?;
    let right_shoulder = set.point(BodyPart::RightShoulder)?;
    let left_hip = set.point(BodyPart::LeftHip)?;
    let right_hip = set.point(BodyPart::RightHip)?;

    let shoulder_center = center(left_shoulder, right_shoulder);
    let shoulder_width = distance_2d(left_shoulder, right_shoulder);

    Some(PostureDescriptor {
        nose_to_shoulder_angle: nose_to_shoulder_angle(nose, shoulder_center, shoulder_width),
        ears_to_shoulder_angle: ears_to_shoulder_angle(
            left_ear,
            right_ear,
            shoulder_center,
            shoulder_width,
        ),
        shoulder_lean_angle: shoulder_lean_angle(
            left_shoulder,
            right_shoulder,
            left_hip,
            right_hip,
            suppress_arm_signal,
        ),
    })
}
