//! File-backed history store — one pretty-printed JSON array.
//!
//! Storage location: `~/.switchbot/chat_history.json` by default.
//! The file is human-inspectable and holds records newest-first.
//! Writes go to a sibling temp file which is then renamed over the
//! original, so readers never observe a half-written ledger.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use switchbot_core::error::HistoryError;
use switchbot_core::history::{HistoryRecord, HistoryStore};
use tracing::{debug, warn};

/// A history store persisted as a JSON array on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "chat_history.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl HistoryStore for JsonFileStore {
    fn name(&self) -> &str {
        "json_file"
    }

    async fn load(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(HistoryError::Storage(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<serde_json::Value> = serde_json::from_str(&content).map_err(|e| {
            HistoryError::Serialization(format!("Corrupt history file {}: {e}", self.path.display()))
        })?;

        let total = entries.len();
        let records: Vec<HistoryRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(path = %self.path.display(), index, error = %e, "Skipping unreadable history record");
                    None
                }
            })
            .collect();

        if records.len() < total {
            warn!(kept = records.len(), total, "History file contained unreadable records");
        }
        Ok(records)
    }

    async fn save(&self, records: &[HistoryRecord]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                HistoryError::Storage(format!("Failed to create history directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(records)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, content.as_bytes())
            .await
            .map_err(|e| HistoryError::Storage(format!("Failed to write history file: {e}")))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| HistoryError::Storage(format!("Failed to replace history file: {e}")))?;

        debug!(path = %self.path.display(), count = records.len(), "History saved");
        Ok(())
    }
}
