//! Implements HistoryPort. One finished session per line (JSON Lines).
//!
//! Append-only writes; reads skip blank and unparseable lines.

use crate::domain::{DomainError, SessionRecord};
use crate::ports::HistoryPort;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

pub struct HistoryJsonl {
    path: PathBuf,
}

impl HistoryJsonl {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl HistoryPort for HistoryJsonl {
    async fn append_session(&self, record: &SessionRecord) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::History(e.to_string()))?;
        }
        let mut line =
            serde_json::to_string(record).map_err(|e| DomainError::History(e.to_string()))?;
        line.push('\n');

        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| DomainError::History(e.to_string()))?;
        f.write_all(line.as_bytes())
            .await
            .map_err(|e| DomainError::History(e.to_string()))?;
        f.flush()
            .await
            .map_err(|e| DomainError::History(e.to_string()))?;

        info!(
            path = %self.path.display(),
            warnings = record.warning_count,
            unfocused_ms = record.unfocused_ms,
            "session saved to history (JSONL)"
        );
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionRecord>, DomainError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(DomainError::History(e.to_string())),
        };

        let mut records = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<SessionRecord>(trimmed) {
                Ok(r) => records.push(r),
                Err(e) => warn!(line = lineno + 1, error = %e, "skipping unreadable history line"),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(warnings: u32) -> SessionRecord {
        SessionRecord {
            started_at: Utc::now(),
            duration_ms: 1000,
            warning_count: warnings,
            unfocused_ms: 250,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryJsonl::new(dir.path().join("none.jsonl"));
        assert!(store.list_sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_and_list_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryJsonl::new(dir.path().join("nested").join("history.jsonl"));
        store.append_session(&record(1)).await.unwrap();
        store.append_session(&record(2)).await.unwrap();

        let records = store.list_sessions().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].warning_count, 1);
        assert_eq!(records[1].warning_count, 2);
    }

    #[tokio::test]
    async fn test_corrupt_line_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let store = HistoryJsonl::new(&path);
        store.append_session(&record(3)).await.unwrap();
        let mut f = fs::OpenOptions::new().append(true).open(&path).await.unwrap();
        f.write_all(b"{not json\n\n").await.unwrap();
        f.flush().await.unwrap();
        store.append_session(&record(4)).await.unwrap();

        let records = store.list_sessions().await.unwrap();
        assert_eq!(
            records.iter().map(|r| r.warning_count).collect::<Vec<_>>(),
            vec![3, 4]
        );
    }
}
