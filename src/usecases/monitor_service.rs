//! Monitoring use case: drive one posture session from the landmark stream.
//!
//! Pulls frames from LandmarkSource, runs them through PostureSession, publishes a
//! report per frame and stores the finished session. Frames are processed strictly
//! one at a time.

use crate::domain::{
    AnalysisSettings, BaselineProfile, DomainError, PostureSession, SessionRecord,
};
use crate::ports::{FrameReport, HistoryPort, LandmarkSource, PresentationPort};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Consecutive source errors tolerated before the session is ended.
const MAX_CONSECUTIVE_SOURCE_ERRORS: usize = 30;

pub struct MonitorService {
    source: Arc<dyn LandmarkSource>,
    presenter: Arc<dyn PresentationPort>,
    history: Arc<dyn HistoryPort>,
    settings: AnalysisSettings,
}

impl MonitorService {
    pub fn new(
        source: Arc<dyn LandmarkSource>,
        presenter: Arc<dyn PresentationPort>,
        history: Arc<dyn HistoryPort>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            source,
            presenter,
            history,
            settings,
        }
    }

    /// Run a session until the stream ends or `stop` flips to true (dropping the
    /// sender also stops it). The finished session is appended to history.
    pub async fn run(
        &self,
        baseline: BaselineProfile,
        mut stop: watch::Receiver<bool>,
    ) -> Result<SessionRecord, DomainError> {
        let started_at = Utc::now();
        let mut session = PostureSession::new(baseline, self.settings);
        let mut consecutive_errors = 0usize;
        let mut source_failed = false;

        info!("monitoring started");
        while !*stop.borrow() {
            let next = tokio::select! {
                biased;
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                next = self.source.next_frame() => next,
            };

            let frame = match next {
                Ok(Some(frame)) => {
                    consecutive_errors = 0;
                    frame
                }
                Ok(None) => {
                    info!("landmark stream ended");
                    break;
                }
                Err(e) => {
                    consecutive_errors += 1;
                    warn!(error = %e, consecutive_errors, "frame unavailable; skipping");
                    if consecutive_errors >= MAX_CONSECUTIVE_SOURCE_ERRORS {
                        source_failed = true;
                        break;
                    }
                    continue;
                }
            };

            let event = session.process_frame(&frame);
            let report = FrameReport {
                timestamp_ms: frame.timestamp_ms,
                event,
                stats: session.stats(),
                world_landmarks: frame.world_landmarks,
            };
            if let Err(e) = self.presenter.publish(&report).await {
                warn!(error = %e, "presentation update failed");
            }
        }

        let stats = session.finish();
        let record = SessionRecord::new(started_at, session.duration_ms(), &stats);
        let skipped = session.skipped_frames();
        info!(
            processed = session.processed_frames(),
            skipped = skipped.total(),
            warnings = record.warning_count,
            unfocused_ms = record.unfocused_ms,
            duration_ms = record.duration_ms,
            "monitoring finished"
        );

        if session.processed_frames() > 0 {
            self.history.append_session(&record).await?;
        } else {
            warn!("no frame was classified; session not stored");
        }
        if let Err(e) = self.presenter.session_finished(&record).await {
            warn!(error = %e, "presentation summary failed");
        }

        if source_failed {
            return Err(DomainError::Source(format!(
                "{} consecutive frames unavailable; session ended",
                MAX_CONSECUTIVE_SOURCE_ERRORS
            )));
        }
        Ok(record)
    }
}
