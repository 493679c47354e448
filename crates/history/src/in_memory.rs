//! In-memory history store — useful for testing and ephemeral runs.

use async_trait::async_trait;
use std::sync::Arc;
use switchbot_core::error::HistoryError;
use switchbot_core::history::{HistoryRecord, HistoryStore};
use tokio::sync::RwLock;

/// A history store that keeps records in a Vec.
pub struct InMemoryStore {
    records: Arc<RwLock<Vec<HistoryRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn load(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        Ok(self.records.read().await.clone())
    }

    async fn save(&self, records: &[HistoryRecord]) -> Result<(), HistoryError> {
        *self.records.write().await = records.to_vec();
        Ok(())
    }
}
