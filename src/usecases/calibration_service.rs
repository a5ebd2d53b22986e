//! Calibration use case: capture a short window of good-posture frames and store
//! the resulting baseline.

use crate::domain::{AnalysisSettings, BaselineBuilder, BaselineProfile, DomainError};
use crate::ports::{BaselineStore, LandmarkSource};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default number of accepted frames averaged into a baseline.
pub const DEFAULT_CALIBRATION_FRAMES: usize = 15;

/// Read at most this many frames per accepted frame before giving up.
const MAX_FRAMES_PER_SAMPLE: usize = 4;

/// Consecutive source errors tolerated before calibration is abandoned.
const MAX_CONSECUTIVE_SOURCE_ERRORS: usize = 30;

pub struct CalibrationService {
    source: Arc<dyn LandmarkSource>,
    store: Arc<dyn BaselineStore>,
    settings: AnalysisSettings,
    window: usize,
}

impl CalibrationService {
    pub fn new(
        source: Arc<dyn LandmarkSource>,
        store: Arc<dyn BaselineStore>,
        settings: AnalysisSettings,
        window: usize,
    ) -> Self {
        Self {
            source,
            store,
            settings,
            window: window.max(1),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Capture and persist a baseline. `progress` is called with the accepted-frame
    /// count after every accepted frame.
    pub async fn calibrate<F>(&self, mut progress: F) -> Result<BaselineProfile, DomainError>
    where
        F: FnMut(usize) + Send,
    {
        let mut builder = BaselineBuilder::new(&self.settings);
        let budget = self.window * MAX_FRAMES_PER_SAMPLE;
        let mut read = 0usize;
        let mut consecutive_errors = 0usize;

        while builder.accepted() < self.window && read < budget {
            let frame = match self.source.next_frame().await {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    debug!(read, "landmark stream ended during calibration");
                    break;
                }
                Err(e) => {
                    consecutive_errors += 1;
                    warn!(error = %e, "calibration frame unavailable");
                    if consecutive_errors >= MAX_CONSECUTIVE_SOURCE_ERRORS {
                        return Err(e);
                    }
                    continue;
                }
            };
            consecutive_errors = 0;
            read += 1;

            match builder.push(&frame) {
                Ok(()) => progress(builder.accepted()),
                Err(reason) => debug!(ts = frame.timestamp_ms, %reason, "calibration frame rejected"),
            }
        }

        let profile = builder.finish()?;
        self.store.save(&profile).await?;
        info!(
            accepted = builder.accepted(),
            rejected = builder.rejected(),
            nose_deg = profile.nose_to_shoulder_angle(),
            ears_deg = profile.ears_to_shoulder_angle(),
            lean_deg = profile.shoulder_lean_angle(),
            "baseline captured"
        );
        Ok(profile)
    }
}
