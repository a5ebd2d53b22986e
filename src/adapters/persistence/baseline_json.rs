//! Implements BaselineStore using a JSON file.
//!
//! Holds the calibrated profile between a calibration run and monitoring runs.

use crate::domain::{BaselineProfile, DomainError};
use crate::ports::BaselineStore;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

pub struct BaselineJson {
    path: PathBuf,
}

impl BaselineJson {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl BaselineStore for BaselineJson {
    async fn load(&self) -> Result<Option<BaselineProfile>, DomainError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DomainError::Baseline(e.to_string())),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| DomainError::Baseline(format!("corrupt baseline file: {}", e)))
    }

    /// Atomic save: write a temp file, sync it, then rename over the target so a
    /// crash never leaves a half-written baseline.
    async fn save(&self, profile: &BaselineProfile) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Baseline(format!("create dir: {}", e)))?;
        }
        let json = serde_json::to_string_pretty(profile)
            .map_err(|e| DomainError::Baseline(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Baseline(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Baseline(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Baseline(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Baseline(format!("atomic rename failed: {}", e)))?;

        info!(path = %self.path.display(), frames = profile.frame_count(), "baseline saved");
        Ok(())
    }
}
