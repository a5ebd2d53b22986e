//! Detects arm elevation, which perturbs the shoulder landmarks and would
//! otherwise read as lateral lean.

use crate::domain::entities::{BodyPart, LandmarkSet};
use crate::domain::settings::DEFAULT_ARM_RAISE_MARGIN;

/// Which arms are above their own-side shoulder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RaisedArms {
    pub left: bool,
    pub right: bool,
}

impl RaisedArms {
    pub fn any(&self) -> bool {
        self.left || self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionGate {
    margin: f64,
}

impl MotionGate {
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn raised_arms(&self, set: &LandmarkSet) -> RaisedArms {
        RaisedArms {
            left: self.side_raised(
                set,
                BodyPart::LeftShoulder,
                BodyPart::LeftElbow,
                BodyPart::LeftWrist,
            ),
            right: self.side_raised(
                set,
                BodyPart::RightShoulder,
                BodyPart::RightElbow,
                BodyPart::RightWrist,
            ),
        }
    }

    /// True when either arm is raised.
    pub fn arms_raised(&self, set: &LandmarkSet) -> bool {
        self.raised_arms(set).any()
    }

    // y grows downward: "above" means smaller y. Missing joints never count as raised.
    fn side_raised(
        &self,
        set: &LandmarkSet,
        shoulder: BodyPart,
        elbow: BodyPart,
        wrist: BodyPart,
    ) -> bool {
        let Some(shoulder) = set.get(shoulder) else {
            return false;
        };
        let limit = shoulder.y - self.margin;
        [wrist, elbow]
            .into_iter()
            .filter_map(|part| set.get(part))
            .any(|lm| lm.y < limit)
    }
}

impl Default for MotionGate {
    fn default() -> Self {
        Self::new(DEFAULT_ARM_RAISE_MARGIN)
    }
}
