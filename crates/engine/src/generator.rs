//! Command generator adapter — one bounded call to the external generator.
//!
//! Failures never escape as errors. They are classified and turned into a
//! fixed, user-facing answer so the exchange still completes and is
//! recorded. There is no retry.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use switchbot_core::error::ProviderError;
use switchbot_core::message::Turn;
use switchbot_core::provider::{Provider, ProviderRequest};
use tracing::{debug, warn};

/// Why a generator call produced no commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorFailure {
    InvalidCredential,
    QuotaExceeded,
    RateLimited,
    Unknown,
}

impl GeneratorFailure {
    /// Classify a provider error. Typed variants win, then the error text
    /// is searched for well-known markers.
    pub fn classify(err: &ProviderError) -> Self {
        match err {
            ProviderError::AuthenticationFailed(_) => return Self::InvalidCredential,
            ProviderError::QuotaExceeded(_) => return Self::QuotaExceeded,
            ProviderError::RateLimited { .. } => return Self::RateLimited,
            _ => {}
        }

        let text = err.to_string().to_lowercase();
        if text.contains("api_key") || text.contains("api key") {
            Self::InvalidCredential
        } else if text.contains("quota") || text.contains("insufficient") {
            Self::QuotaExceeded
        } else if text.contains("rate_limit") || text.contains("rate limit") {
            Self::RateLimited
        } else {
            Self::Unknown
        }
    }

    /// The answer text shown in place of commands. `detail` is only used
    /// for [`GeneratorFailure::Unknown`].
    pub fn user_message(&self, detail: &str) -> String {
        match self {
            Self::InvalidCredential => "❌ ERROR: Invalid API key.\n\n\
                 🔑 Check your key at https://platform.openai.com/api-keys"
                .into(),
            Self::QuotaExceeded => "❌ ERROR: Quota exceeded.\n\n\
                 💳 Add credit at https://platform.openai.com/account/billing"
                .into(),
            Self::RateLimited => "❌ ERROR: Too many requests. Wait 10 seconds.".into(),
            Self::Unknown => format!("❌ Generator error: {detail}"),
        }
    }
}

/// Outcome of one generator call.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub answer: String,
    pub failure: Option<GeneratorFailure>,
    pub total_tokens: Option<u32>,
}

/// Sampling parameters and limits for the generator.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".into(),
            temperature: 0.1,
            max_tokens: 1000,
            timeout: Duration::from_secs(60),
        }
    }
}

impl GeneratorSettings {
    pub fn from_config(config: &switchbot_config::AppConfig) -> Self {
        Self {
            model: config.effective_model().to_string(),
            temperature: config.generator.temperature,
            max_tokens: config.generator.max_tokens,
            timeout: Duration::from_secs(config.generator.timeout_secs),
        }
    }
}

/// Wraps a [`Provider`] with fixed sampling and failure classification.
pub struct CommandGenerator {
    provider: Arc<dyn Provider>,
    settings: GeneratorSettings,
}

impl CommandGenerator {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self::with_settings(provider, GeneratorSettings::default())
    }

    pub fn with_settings(provider: Arc<dyn Provider>, settings: GeneratorSettings) -> Self {
        Self { provider, settings }
    }

    /// The same provider with different settings.
    pub fn reconfigured(self, settings: GeneratorSettings) -> Self {
        Self::with_settings(self.provider, settings)
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Send `messages` to the generator and return the trimmed answer, or a
    /// fixed failure message.
    pub async fn generate(&self, messages: Vec<Turn>) -> Generation {
        let request = ProviderRequest {
            model: self.settings.model.clone(),
            messages,
            temperature: self.settings.temperature,
            max_tokens: Some(self.settings.max_tokens),
        };

        let result = match tokio::time::timeout(
            self.settings.timeout,
            self.provider.complete(request),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(format!(
                "no response within {}s",
                self.settings.timeout.as_secs()
            ))),
        };

        match result {
            Ok(response) => {
                let total_tokens = response.usage.as_ref().map(|u| u.total_tokens);
                if let Some(tokens) = total_tokens {
                    debug!(provider = self.provider.name(), tokens, "Generator call complete");
                }
                Generation {
                    answer: response.content.trim().to_string(),
                    failure: None,
                    total_tokens,
                }
            }
            Err(e) => {
                let failure = GeneratorFailure::classify(&e);
                warn!(provider = self.provider.name(), ?failure, "Generator call failed: {e}");
                Generation {
                    answer: failure.user_message(&e.to_string()),
                    failure: Some(failure),
                    total_tokens: None,
                }
            }
        }
    }
}
