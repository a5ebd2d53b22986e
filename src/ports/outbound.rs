//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    BaselineProfile, ClassificationEvent, DomainError, Landmark, PoseFrame, SessionRecord,
    SessionStats,
};

/// Per-frame landmark stream from the external pose estimator.
#[async_trait::async_trait]
pub trait LandmarkSource: Send + Sync {
    /// Next estimator result. `Ok(None)` means the stream has ended.
    ///
    /// An `Err` covers one frame only (estimator hiccup, unreadable record); callers
    /// treat it as a missing frame and may keep reading.
    async fn next_frame(&self) -> Result<Option<PoseFrame>, DomainError>;
}

/// Stores the calibrated baseline between calibration and monitoring runs.
#[async_trait::async_trait]
pub trait BaselineStore: Send + Sync {
    /// Load the saved baseline, if any.
    async fn load(&self) -> Result<Option<BaselineProfile>, DomainError>;

    async fn save(&self, profile: &BaselineProfile) -> Result<(), DomainError>;
}

/// Session history persistence. Receives finalized sessions only.
#[async_trait::async_trait]
pub trait HistoryPort: Send + Sync {
    async fn append_session(&self, record: &SessionRecord) -> Result<(), DomainError>;

    /// All stored sessions in insertion order.
    async fn list_sessions(&self) -> Result<Vec<SessionRecord>, DomainError>;
}

/// What presentation receives for every processed frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub timestamp_ms: i64,
    /// `None` when the frame produced no classification.
    pub event: Option<ClassificationEvent>,
    pub stats: SessionStats,
    /// 3D world landmarks passed through untouched.
    pub world_landmarks: Vec<Landmark>,
}

/// Display collaborator (status card, live stats, 3D view).
#[async_trait::async_trait]
pub trait PresentationPort: Send + Sync {
    async fn publish(&self, report: &FrameReport) -> Result<(), DomainError>;

    /// Called once when a session ends.
    async fn session_finished(&self, record: &SessionRecord) -> Result<(), DomainError>;
}
