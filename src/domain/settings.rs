//! Tuning knobs for the analysis pipeline, grouped into one validated object.
//!
//! The degree thresholds are tuning parameters, not structural contracts.

use crate::domain::DomainError;
use serde::{Deserialize, Serialize};

/// Default EMA weight on the newest sample (~4-frame effective memory).
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.25;
/// Default confidence gate for smoothing updates.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;
/// Default wrist/elbow margin above the shoulder, in normalized image units.
pub const DEFAULT_ARM_RAISE_MARGIN: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub min_confidence: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_SMOOTHING_ALPHA,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

/// Per-dimension tolerance bands, in degrees of deviation from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierThresholds {
    pub forward_head_deg: f64,
    pub tilt_deg: f64,
    pub lean_deg: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            forward_head_deg: 10.0,
            tilt_deg: 8.0,
            lean_deg: 6.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    pub smoothing: SmoothingParams,
    pub arm_raise_margin: f64,
    pub thresholds: ClassifierThresholds,
}

impl AnalysisSettings {
    pub fn new(
        smoothing: SmoothingParams,
        arm_raise_margin: f64,
        thresholds: ClassifierThresholds,
    ) -> Result<Self, DomainError> {
        let settings = Self {
            smoothing,
            arm_raise_margin,
            thresholds,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let alpha = self.smoothing.alpha;
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(DomainError::Config(format!(
                "smoothing alpha must be in (0, 1], got {}",
                alpha
            )));
        }
        let min_conf = self.smoothing.min_confidence;
        if !(0.0..=1.0).contains(&min_conf) {
            return Err(DomainError::Config(format!(
                "min confidence must be in [0, 1], got {}",
                min_conf
            )));
        }
        if !(self.arm_raise_margin.is_finite() && self.arm_raise_margin >= 0.0) {
            return Err(DomainError::Config(format!(
                "arm raise margin must be a non-negative number, got {}",
                self.arm_raise_margin
            )));
        }
        let t = &self.thresholds;
        for (name, value) in [
            ("forward head", t.forward_head_deg),
            ("tilt", t.tilt_deg),
            ("lean", t.lean_deg),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(DomainError::Config(format!(
                    "{} threshold must be a positive number of degrees, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            smoothing: SmoothingParams::default(),
            arm_raise_margin: DEFAULT_ARM_RAISE_MARGIN,
            thresholds: ClassifierThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AnalysisSettings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_alpha() {
        for alpha in [0.0, -0.1, 1.5, f64::NAN] {
            let smoothing = SmoothingParams {
                alpha,
                min_confidence: 0.5,
            };
            let res = AnalysisSettings::new(smoothing, 0.02, ClassifierThresholds::default());
            assert!(matches!(res, Err(DomainError::Config(_))), "alpha {}", alpha);
        }
        let smoothing = SmoothingParams {
            alpha: 1.0,
            min_confidence: 0.5,
        };
        assert!(AnalysisSettings::new(smoothing, 0.02, ClassifierThresholds::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_thresholds() {
        let thresholds = ClassifierThresholds {
            lean_deg: 0.0,
            ..ClassifierThresholds::default()
        };
        let res = AnalysisSettings::new(SmoothingParams::default(), 0.02, thresholds);
        assert!(matches!(res, Err(DomainError::Config(msg)) if msg.contains("lean")));
    }
}
