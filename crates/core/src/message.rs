//! Conversation turn types.
//!
//! A [`Turn`] is one utterance in a session's conversational context:
//! the user's request or the generator's answer. Turns are immutable once
//! appended to a session.

use serde::{Deserialize, Serialize};

use crate::brand::Brand;

/// The role of a turn's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Generator instructions (only ever composed, never stored)
    System,
    /// The end user
    User,
    /// The command generator
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced this turn
    pub role: Role,

    /// The text content
    pub content: String,

    /// Brand the answer was generated for. Set on assistant turns so later
    /// requests can continue in the same dialect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<Brand>,
}

impl Turn {
    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            brand: None,
        }
    }

    /// Create an assistant turn tagged with the brand it answered for.
    pub fn assistant(content: impl Into<String>, brand: Brand) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            brand: Some(brand),
        }
    }

    /// Create a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            brand: None,
        }
    }
}
