//! Process-local session context store.

use async_trait::async_trait;
use std::collections::HashMap;
use switchbot_core::error::SessionError;
use switchbot_core::message::Turn;
use switchbot_core::session::{DEFAULT_MAX_TURNS, Session, SessionStore};
use tokio::sync::RwLock;

/// Sessions keyed by client session id, held in memory for the life of the
/// process.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    max_turns: usize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_max_turns(DEFAULT_MAX_TURNS)
    }

    pub fn with_max_turns(max_turns: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_turns: max_turns.max(1),
        }
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Number of sessions seen so far.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, key: &str) -> Result<Session, SessionError> {
        if let Some(session) = self.sessions.read().await.get(key) {
            return Ok(session.clone());
        }
        let mut sessions = self.sessions.write().await;
        Ok(sessions
            .entry(key.to_string())
            .or_insert_with(|| Session::new(key))
            .clone())
    }

    async fn append(&self, key: &str, turn: Turn) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(key.to_string())
            .or_insert_with(|| Session::new(key))
            .push(turn, self.max_turns);
        Ok(())
    }

    async fn snapshot(&self, key: &str) -> Result<Vec<Turn>, SessionError> {
        Ok(self
            .sessions
            .read()
            .await
            .get(key)
            .map(|s| s.turns.clone())
            .unwrap_or_default())
    }
}
