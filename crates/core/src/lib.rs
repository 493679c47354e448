//! # Switchbot Core
//!
//! Domain types, traits, and error definitions for the switch command
//! assistant. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external seam is a trait here: the text generator ([`Provider`]),
//! the live conversation context ([`SessionStore`]) and the durable
//! exchange ledger ([`HistoryStore`]). Implementations live in their
//! respective crates, so the orchestrator can be tested against stubs.

pub mod brand;
pub mod error;
pub mod history;
pub mod message;
pub mod provider;
pub mod session;

// Re-export key types at crate root for ergonomics
pub use brand::Brand;
pub use error::{AskError, HistoryError, ProviderError, SessionError};
pub use history::{HistoryRecord, HistoryStore};
pub use message::{Role, Turn};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use session::{Session, SessionStore};
