//! The `ask` orchestration — one request from raw text to recorded answer.

use serde::Serialize;
use std::sync::Arc;
use switchbot_core::brand::Brand;
use switchbot_core::error::{AskError, HistoryError};
use switchbot_core::history::HistoryRecord;
use switchbot_core::message::Turn;
use switchbot_core::provider::Provider;
use switchbot_core::session::SessionStore;
use switchbot_history::{Exchange, HistoryLedger};
use tracing::{debug, error, info};

use crate::classifier::classify;
use crate::generator::{CommandGenerator, GeneratorSettings};
use crate::prompt::PromptComposer;
use crate::session_store::InMemorySessionStore;
use crate::validator::validate;

/// Session key used when a client does not supply one.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Characters of the query included in request logs.
const LOG_PREVIEW_CHARS: usize = 50;

/// A completed exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskOutcome {
    pub brand: Brand,
    pub answer: String,
    pub warnings: Vec<String>,
    pub record_id: String,
}

/// Ties the classifier, composer, generator, validator, session store and
/// history ledger together.
pub struct Assistant {
    generator: CommandGenerator,
    composer: PromptComposer,
    sessions: Arc<dyn SessionStore>,
    ledger: Arc<HistoryLedger>,
}

impl Assistant {
    /// Create an assistant with default settings and in-memory sessions.
    pub fn new(provider: Arc<dyn Provider>, ledger: Arc<HistoryLedger>) -> Self {
        Self {
            generator: CommandGenerator::new(provider),
            composer: PromptComposer::default(),
            sessions: Arc::new(InMemorySessionStore::new()),
            ledger,
        }
    }

    /// Create an assistant wired from application config.
    pub fn from_config(
        config: &switchbot_config::AppConfig,
        provider: Arc<dyn Provider>,
        ledger: Arc<HistoryLedger>,
    ) -> Self {
        Self::new(provider, ledger)
            .with_generator_settings(GeneratorSettings::from_config(config))
            .with_context_window(config.session.context_window)
            .with_sessions(Arc::new(InMemorySessionStore::with_max_turns(
                config.session.max_turns,
            )))
    }

    pub fn with_generator_settings(mut self, settings: GeneratorSettings) -> Self {
        self.generator = self.generator.reconfigured(settings);
        self
    }

    /// Set how many prior turns are forwarded to the generator.
    pub fn with_context_window(mut self, window: usize) -> Self {
        self.composer = PromptComposer::new(window);
        self
    }

    /// Replace the session store.
    pub fn with_sessions(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn ledger(&self) -> &Arc<HistoryLedger> {
        &self.ledger
    }

    pub fn generator(&self) -> &CommandGenerator {
        &self.generator
    }

    /// Answer one request in the context of `session_id`.
    ///
    /// An empty (after trimming) query fails with [`AskError::EmptyQuery`]
    /// before anything is read or written. Generator failures are not
    /// errors: they come back as the answer text and are recorded like any
    /// other exchange.
    pub async fn ask(&self, query: &str, session_id: &str) -> Result<AskOutcome, AskError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AskError::EmptyQuery);
        }
        let session_id = match session_id.trim() {
            "" => DEFAULT_SESSION_ID,
            id => id,
        };

        match self.run(query, session_id).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(session = session_id, "Ask failed: {e}");
                Err(e)
            }
        }
    }

    async fn run(&self, query: &str, session_id: &str) -> Result<AskOutcome, AskError> {
        let session = self.sessions.get_or_create(session_id).await?;
        let classification = classify(query, &session.turns);
        let brand = classification.brand;

        info!(
            session = session_id,
            query = %preview(query),
            brand = %brand,
            resolution = ?classification.resolution,
            "Ask"
        );

        let prompt = self.composer.compose(brand, query, &session.turns);
        let generation = self.generator.generate(prompt).await;
        let warnings = validate(brand, &generation.answer);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "Answer has structure warnings");
        }

        self.sessions.append(session_id, Turn::user(query)).await?;
        self.sessions
            .append(session_id, Turn::assistant(generation.answer.clone(), brand))
            .await?;

        let record = self
            .ledger
            .record(Exchange {
                query: query.to_string(),
                brand,
                answer: generation.answer,
                warnings,
            })
            .await?;

        info!(id = %record.id, brand = %brand, failed = generation.failure.is_some(), "Ask complete");

        Ok(AskOutcome {
            brand: record.brand,
            answer: record.answer,
            warnings: record.warnings,
            record_id: record.id,
        })
    }

    /// All history records, newest first.
    pub async fn list_history(&self) -> Vec<HistoryRecord> {
        self.ledger.load().await
    }

    /// Delete one history record. `Ok(false)` when no record has `id`.
    pub async fn delete_history(&self, id: &str) -> Result<bool, HistoryError> {
        self.ledger.delete(id).await
    }

    /// The turns currently retained for `session_id`.
    pub async fn session_turns(&self, session_id: &str) -> Vec<Turn> {
        self.sessions.snapshot(session_id).await.unwrap_or_default()
    }
}

fn preview(query: &str) -> String {
    query.chars().take(LOG_PREVIEW_CHARS).collect()
}
