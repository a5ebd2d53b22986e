//! Core domain layer. No external I/O dependencies.
//!
//! Landmark model, smoothing, geometry, classification and session statistics.
//! Dependencies flow inward.

pub mod baseline;
pub mod classifier;
pub mod entities;
pub mod errors;
pub mod features;
pub mod history;
pub mod motion_gate;
pub mod session;
pub mod settings;
pub mod smoother;
pub mod stats;

pub use baseline::{BaselineBuilder, BaselineProfile};
pub use classifier::PostureClassifier;
pub use entities::{
    BodyPart, ClassificationEvent, Landmark, LandmarkSet, POSE_LANDMARK_COUNT, Point, PoseFrame,
    PostureDescriptor, PostureReason,
};
pub use errors::{CalibrationRejection, DomainError, FrameSkip};
pub use history::{HistorySummary, SessionRecord, TrendPoint};
pub use motion_gate::{MotionGate, RaisedArms};
pub use session::{PostureSession, SkippedFrames};
pub use settings::{
    AnalysisSettings, ClassifierThresholds, DEFAULT_ARM_RAISE_MARGIN, DEFAULT_MIN_CONFIDENCE,
    DEFAULT_SMOOTHING_ALPHA, SmoothingParams,
};
pub use smoother::LandmarkSmoother;
pub use stats::{SessionStats, SessionStatsAggregator};
