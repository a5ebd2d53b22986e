//! History use case: summaries and exports over stored sessions.

use crate::adapters::persistence::history_csv::trend_to_csv;
use crate::domain::{DomainError, HistorySummary, SessionRecord, TrendPoint, history};
use crate::ports::HistoryPort;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::info;

pub struct HistoryService {
    history: Arc<dyn HistoryPort>,
}

impl HistoryService {
    pub fn new(history: Arc<dyn HistoryPort>) -> Self {
        Self { history }
    }

    pub async fn sessions(&self) -> Result<Vec<SessionRecord>, DomainError> {
        self.history.list_sessions().await
    }

    pub async fn summary(&self) -> Result<HistorySummary, DomainError> {
        let records = self.history.list_sessions().await?;
        Ok(HistorySummary::from_records(&records))
    }

    pub async fn trend(&self) -> Result<Vec<TrendPoint>, DomainError> {
        let records = self.history.list_sessions().await?;
        Ok(history::trend(&records))
    }

    /// Write the per-session trend as CSV into `dir`. Returns the file path.
    pub async fn export_csv(&self, dir: &Path) -> Result<PathBuf, DomainError> {
        let points = self.trend().await?;
        let csv = trend_to_csv(&points).map_err(|e| DomainError::History(e.to_string()))?;

        fs::create_dir_all(dir)
            .await
            .map_err(|e| DomainError::History(format!("Failed to create export dir: {}", e)))?;
        let path = dir.join(format!("history_{}.csv", chrono::Utc::now().format("%Y%m%d_%H%M%S")));
        fs::write(&path, csv)
            .await
            .map_err(|e| DomainError::History(format!("Failed to write export: {}", e)))?;

        info!(path = %path.display(), sessions = points.len(), "history exported");
        Ok(path)
    }
}
