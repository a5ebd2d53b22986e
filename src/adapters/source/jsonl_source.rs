//! Implements LandmarkSource by replaying a recorded estimator stream.
//! One `PoseFrame` JSON object per line: `{"timestampMs":..,"landmarks":[..],"worldLandmarks":[..]}`.
//! Reads lazily line by line; a malformed line fails that frame only.

use crate::domain::{DomainError, PoseFrame};
use crate::ports::LandmarkSource;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Upper bound on a single real-time pacing sleep. Gaps in a recording are not replayed.
pub const MAX_PACING_GAP: Duration = Duration::from_secs(1);

struct ReplayState {
    lines: Lines<BufReader<File>>,
    lineno: usize,
    last_timestamp_ms: Option<i64>,
}

pub struct JsonlLandmarkSource {
    path: PathBuf,
    realtime: bool,
    state: Mutex<ReplayState>,
}

impl JsonlLandmarkSource {
    pub async fn open(path: impl AsRef<Path>, realtime: bool) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .await
            .map_err(|e| DomainError::Source(format!("open {}: {}", path.display(), e)))?;
        info!(path = %path.display(), realtime, "replaying landmark recording");
        Ok(Self {
            path,
            realtime,
            state: Mutex::new(ReplayState {
                lines: BufReader::new(file).lines(),
                lineno: 0,
                last_timestamp_ms: None,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Sleep needed to reproduce the recorded inter-frame gap.
fn pacing_delay(previous_ms: Option<i64>, current_ms: i64) -> Duration {
    match previous_ms {
        Some(prev) if current_ms > prev => {
            Duration::from_millis(current_ms.abs_diff(prev)).min(MAX_PACING_GAP)
        }
        _ => Duration::ZERO,
    }
}

#[async_trait::async_trait]
impl LandmarkSource for JsonlLandmarkSource {
    async fn next_frame(&self) -> Result<Option<PoseFrame>, DomainError> {
        let mut state = self.state.lock().await;
        loop {
            let line = state
                .lines
                .next_line()
                .await
                .map_err(|e| DomainError::Source(format!("read {}: {}", self.path.display(), e)))?;
            let Some(line) = line else {
                debug!(lines = state.lineno, "landmark recording exhausted");
                return Ok(None);
            };
            state.lineno += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let frame: PoseFrame = serde_json::from_str(trimmed).map_err(|e| {
                DomainError::Source(format!("line {}: malformed frame: {}", state.lineno, e))
            })?;

            if self.realtime {
                let delay = pacing_delay(state.last_timestamp_ms, frame.timestamp_ms);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            state.last_timestamp_ms = Some(frame.timestamp_ms);
            return Ok(Some(frame));
        }
    }
}
