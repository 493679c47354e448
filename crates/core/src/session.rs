//! Session context — the bounded, ordered conversation kept per client key.
//!
//! Sessions live for the lifetime of the process and are never persisted:
//! conversational memory is best-effort. Mutation is append-only followed by
//! truncation from the front, so surviving turns keep their order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::message::Turn;

/// Default number of turns retained per session.
pub const DEFAULT_MAX_TURNS: usize = 20;

/// One client's conversational context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Client-chosen session key
    pub key: String,

    /// Turns, oldest first
    pub turns: Vec<Turn>,

    /// When the session was first seen
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new empty session.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            turns: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a turn, then drop the oldest turns beyond `max_turns`.
    pub fn push(&mut self, turn: Turn, max_turns: usize) {
        self.turns.push(turn);
        if self.turns.len() > max_turns {
            let excess = self.turns.len() - max_turns;
            self.turns.drain(..excess);
        }
    }
}

/// Capability set of a session context store.
///
/// Injected into the orchestrator rather than reached as global state.
/// Concurrent requests for the same key are not ordered relative to each
/// other.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the session for `key`, creating an empty one if absent.
    async fn get_or_create(&self, key: &str) -> Result<Session, SessionError>;

    /// Append a turn to the session for `key` (creating it if absent) and
    /// truncate it to the store's turn limit.
    async fn append(&self, key: &str, turn: Turn) -> Result<(), SessionError>;

    /// The retained turns for `key`, oldest first. Empty for unknown keys.
    async fn snapshot(&self, key: &str) -> Result<Vec<Turn>, SessionError>;
}
