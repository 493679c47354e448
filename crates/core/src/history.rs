//! History records — durable, immutable copies of completed exchanges.
//!
//! A record's lifetime is independent of the session that produced it.
//! Record ids are the record's UTC timestamp rendered as
//! `YYYYMMDDhhmmss` + microseconds (20 digits), so lexicographic order is
//! creation order.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::brand::Brand;
use crate::error::HistoryError;

/// Default cap on the number of stored records.
pub const DEFAULT_MAX_RECORDS: usize = 100;

/// `strftime` pattern of a record id.
pub const RECORD_ID_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// One completed exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Sortable timestamp token, unique within a ledger
    pub id: String,

    /// The user's request as submitted
    pub query: String,

    /// Brand the answer was generated for
    pub brand: Brand,

    /// Generated answer (or the user-facing generator failure message)
    pub answer: String,

    /// Advisory structure warnings
    #[serde(default)]
    pub warnings: Vec<String>,

    /// Creation time. Offset-less ISO-8601 text is read as UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Parse an ISO-8601 timestamp, with or without a UTC offset.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| text.parse::<NaiveDateTime>().ok().map(|t| t.and_utc()))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO-8601 timestamp: {text}")))
}

impl HistoryRecord {
    /// Build a record stamped at `now`, bumped past `newest` when the clock
    /// has not advanced beyond it at microsecond resolution.
    pub fn stamped(
        query: impl Into<String>,
        brand: Brand,
        answer: impl Into<String>,
        warnings: Vec<String>,
        now: DateTime<Utc>,
        newest: Option<&HistoryRecord>,
    ) -> Self {
        let mut at = now.trunc_subsecs(6);
        if let Some(prev) = newest {
            let prev_at = prev.timestamp.trunc_subsecs(6);
            if at <= prev_at {
                at = prev_at + chrono::Duration::microseconds(1);
            }
        }

        Self {
            id: at.format(RECORD_ID_FORMAT).to_string(),
            query: query.into(),
            brand,
            answer: answer.into(),
            warnings,
            timestamp: at,
        }
    }
}

/// A key-ordered durable record store.
///
/// `save` is an atomic overwrite of the whole collection. Callers are
/// responsible for serializing read-modify-write cycles.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// The backend name (e.g., "json_file", "in_memory").
    fn name(&self) -> &str;

    /// Load every record, newest first.
    async fn load(&self) -> Result<Vec<HistoryRecord>, HistoryError>;

    /// Replace the stored collection with `records`.
    async fn save(&self, records: &[HistoryRecord]) -> Result<(), HistoryError>;
}
