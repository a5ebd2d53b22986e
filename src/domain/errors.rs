//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. Per-frame problems are
//! recovered inside the frame and surface as [`FrameSkip`], never as `DomainError`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Landmark source error: {0}")]
    Source(String),

    #[error("Baseline store error: {0}")]
    Baseline(String),

    #[error("History store error: {0}")]
    History(String),

    /// No usable calibration frame was captured; the caller must retry.
    #[error("Calibration failed: {0}")]
    Calibration(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("UI error: {0}")]
    Ui(String),
}

/// Why a frame produced no classification. Recovered locally; session totals are untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSkip {
    #[error("frame carried {found} landmarks, expected at least {expected}")]
    MissingInput { found: usize, expected: usize },

    #[error("no posture joint passed the confidence gate")]
    LowConfidence,

    #[error("no posture descriptor could be derived")]
    DegenerateGeometry,
}

/// Why a calibration frame was not accepted into the baseline window.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationRejection {
    #[error("frame carried {found} landmarks, expected at least {expected}")]
    MissingInput { found: usize, expected: usize },

    #[error("posture joints below the confidence gate")]
    LowConfidence,

    #[error("arms raised above the shoulders")]
    ArmsRaised,

    #[error("degenerate shoulder or hip geometry")]
    DegenerateGeometry,
}
