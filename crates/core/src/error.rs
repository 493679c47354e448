//! Error types for the switchbot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

// --- Bounded context errors ---

/// Failures of the external text generator.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History storage error: {0}")]
    Storage(String),

    #[error("History serialization error: {0}")]
    Serialization(String),
}

/// Terminal failure states of one `ask` orchestration.
///
/// Generator failures are deliberately absent: they surface as answer
/// text on a successful outcome.
#[derive(Debug, Error)]
pub enum AskError {
    /// The query was empty after trimming. Raised before any side effect.
    #[error("Empty query")]
    EmptyQuery,

    /// Catch-all for failures between classification and ledger append.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SessionError> for AskError {
    fn from(e: SessionError) -> Self {
        AskError::Internal(e.to_string())
    }
}

impl From<HistoryError> for AskError {
    fn from(e: HistoryError) -> Self {
        AskError::Internal(e.to_string())
    }
}
