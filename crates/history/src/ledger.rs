//! The history ledger — bounded, newest-first record of completed exchanges.
//!
//! Every mutation is a full read-modify-write of the backing store, so the
//! ledger serializes them behind a single async mutex. Reads that fail
//! (absent or corrupt store) degrade to an empty history: the ledger is
//! never load-bearing for a request's correctness.

use chrono::Utc;
use std::sync::Arc;
use switchbot_core::brand::Brand;
use switchbot_core::error::HistoryError;
use switchbot_core::history::{DEFAULT_MAX_RECORDS, HistoryRecord, HistoryStore};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// The content of a completed exchange, before it is stamped with an id.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub query: String,
    pub brand: Brand,
    pub answer: String,
    pub warnings: Vec<String>,
}

/// Capped, mutex-guarded view over a [`HistoryStore`].
pub struct HistoryLedger {
    store: Arc<dyn HistoryStore>,
    max_records: usize,
    write_lock: Mutex<()>,
}

impl HistoryLedger {
    /// Create a ledger with the default cap of 100 records.
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self::with_max_records(store, DEFAULT_MAX_RECORDS)
    }

    pub fn with_max_records(store: Arc<dyn HistoryStore>, max_records: usize) -> Self {
        Self {
            store,
            max_records: max_records.max(1),
            write_lock: Mutex::new(()),
        }
    }

    /// The backing store's name.
    pub fn backend(&self) -> &str {
        self.store.name()
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    /// All records, newest first. Store failures read as empty.
    pub async fn load(&self) -> Vec<HistoryRecord> {
        match self.store.load().await {
            Ok(records) => records,
            Err(e) => {
                warn!(backend = self.store.name(), "History unavailable, treating as empty: {e}");
                Vec::new()
            }
        }
    }

    /// Look up one record by id.
    pub async fn get(&self, id: &str) -> Option<HistoryRecord> {
        self.load().await.into_iter().find(|r| r.id == id)
    }

    /// Atomically replace the durable set, keeping at most the cap.
    pub async fn save(&self, records: &[HistoryRecord]) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().await;
        let keep = records.len().min(self.max_records);
        self.store.save(&records[..keep]).await
    }

    /// Prepend `record`, evicting the oldest records beyond the cap.
    pub async fn append(&self, record: HistoryRecord) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().await;
        let records = self.load().await;
        self.prepend_locked(record, records).await
    }

    /// Stamp `exchange` with a fresh id and prepend it.
    ///
    /// The id is minted while the lock is held and is strictly greater than
    /// every id already in the ledger.
    pub async fn record(&self, exchange: Exchange) -> Result<HistoryRecord, HistoryError> {
        let _guard = self.write_lock.lock().await;
        let records = self.load().await;

        let newest = records.iter().max_by(|a, b| a.id.cmp(&b.id));
        let record = HistoryRecord::stamped(
            exchange.query,
            exchange.brand,
            exchange.answer,
            exchange.warnings,
            Utc::now(),
            newest,
        );

        self.prepend_locked(record.clone(), records).await?;
        Ok(record)
    }

    /// Remove the record with `id`. Returns whether anything was removed.
    pub async fn delete(&self, id: &str) -> Result<bool, HistoryError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.store.save(&records).await?;
        debug!(id, remaining = records.len(), "History record deleted");
        Ok(true)
    }

    async fn prepend_locked(
        &self,
        record: HistoryRecord,
        mut records: Vec<HistoryRecord>,
    ) -> Result<(), HistoryError> {
        records.insert(0, record);
        records.truncate(self.max_records);
        self.store.save(&records).await?;
        debug!(count = records.len(), "History record appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryStore, JsonFileStore};

    fn exchange(query: &str) -> Exchange {
        Exchange {
            query: query.into(),
            brand: Brand::Cisco,
            answer: "1. enable\n2. configure terminal".into(),
            warnings: vec![],
        }
    }

    fn ledger() -> HistoryLedger {
        HistoryLedger::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn records_are_newest_first_with_increasing_ids() {
        let ledger = ledger();
        let first = ledger.record(exchange("one")).await.unwrap();
        let second = ledger.record(exchange("two")).await.unwrap();
        assert!(second.id > first.id);

        let all = ledger.load().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[tokio::test]
    async fn cap_evicts_oldest() {
        let ledger = ledger();
        let mut ids = Vec::new();
        for i in 0..105 {
            ids.push(ledger.record(exchange(&format!("q{i}"))).await.unwrap().id);
        }

        let all = ledger.load().await;
        assert_eq!(all.len(), 100);
        assert_eq!(all[0].query, "q104");
        assert_eq!(all[99].query, "q5");
        for evicted in &ids[..5] {
            assert!(all.iter().all(|r| &r.id != evicted));
        }
    }

    #[tokio::test]
    async fn delete_after_append_restores_previous_state() {
        let ledger = ledger();
        ledger.record(exchange("a")).await.unwrap();
        ledger.record(exchange("b")).await.unwrap();
        let before = ledger.load().await;

        let added = ledger.record(exchange("c")).await.unwrap();
        assert!(ledger.delete(&added.id).await.unwrap());
        assert_eq!(ledger.load().await, before);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_false() {
        let ledger = ledger();
        ledger.record(exchange("a")).await.unwrap();
        assert!(!ledger.delete("19990101000000000000").await.unwrap());
        assert_eq!(ledger.load().await.len(), 1);
    }

    #[tokio::test]
    async fn append_prepends_given_record() {
        let ledger = ledger();
        let existing = ledger.record(exchange("a")).await.unwrap();
        let manual =
            HistoryRecord::stamped("manual", Brand::Juniper, "1. configure", vec![], Utc::now(), Some(&existing));
        ledger.append(manual.clone()).await.unwrap();

        assert_eq!(ledger.get(&manual.id).await, Some(manual.clone()));
        assert_eq!(ledger.load().await[0], manual);
    }

    #[tokio::test]
    async fn save_overwrites_and_caps() {
        let ledger = HistoryLedger::with_max_records(Arc::new(InMemoryStore::new()), 2);
        let a = HistoryRecord::stamped("a", Brand::Cisco, "x", vec![], Utc::now(), None);
        let b = HistoryRecord::stamped("b", Brand::Cisco, "x", vec![], Utc::now(), Some(&a));
        let c = HistoryRecord::stamped("c", Brand::Cisco, "x", vec![], Utc::now(), Some(&b));
        ledger.save(&[c.clone(), b.clone(), a]).await.unwrap();
        assert_eq!(ledger.load().await, vec![c, b]);
    }

    #[tokio::test]
    async fn corrupt_store_reads_empty_and_recovers_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "garbage").unwrap();

        let ledger = HistoryLedger::new(Arc::new(JsonFileStore::new(path.clone())));
        assert!(ledger.load().await.is_empty());

        let rec = ledger.record(exchange("fresh")).await.unwrap();
        let reopened = HistoryLedger::new(Arc::new(JsonFileStore::new(path)));
        assert_eq!(reopened.load().await, vec![rec]);
    }

    #[tokio::test]
    async fn offsetless_history_survives_a_new_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(
            &path,
            r#"[
  {"id":"20260105120001","query":"vlan juniper","brand":"Juniper","answer":"1. configure","warnings":[],"timestamp":"2026-01-05T12:00:01.123456"},
  {"id":"20260105120000","query":"vlan cisco","brand":"Cisco","answer":"1. enable","warnings":[],"timestamp":"2026-01-05T12:00:00.123456"}
]"#,
        )
        .unwrap();

        let ledger = HistoryLedger::new(Arc::new(JsonFileStore::new(path.clone())));
        assert_eq!(ledger.load().await.len(), 2);

        let rec = ledger.record(exchange("fresh")).await.unwrap();
        let reopened = HistoryLedger::new(Arc::new(JsonFileStore::new(path)));
        let ids: Vec<String> = reopened.load().await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, [rec.id, "20260105120001".into(), "20260105120000".into()]);
    }

    #[tokio::test]
    async fn concurrent_writers_do_not_lose_updates() {
        let ledger = Arc::new(ledger());
        let mut handles = Vec::new();
        for i in 0..20 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger.record(exchange(&format!("q{i}"))).await.unwrap()
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let all = ledger.load().await;
        assert_eq!(all.len(), 20);
        let mut ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }
}
