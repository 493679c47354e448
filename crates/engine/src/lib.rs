//! The switch command assistant engine.
//!
//! One `ask` runs a fixed pipeline:
//!
//! 1. **Classify** the request into a vendor brand
//! 2. **Compose** a prompt from the brand template and recent session turns
//! 3. **Generate** commands through the configured provider
//! 4. **Validate** the answer's structure (advisory warnings only)
//! 5. **Record** the exchange in the session and the history ledger

pub mod assistant;
pub mod classifier;
pub mod generator;
pub mod prompt;
pub mod session_store;
pub mod templates;
pub mod validator;

pub use assistant::{AskOutcome, Assistant, DEFAULT_SESSION_ID};
pub use classifier::{Classification, Resolution, classify, detect_brand};
pub use generator::{CommandGenerator, Generation, GeneratorFailure, GeneratorSettings};
pub use prompt::{PromptComposer, system_prompt};
pub use session_store::InMemorySessionStore;
pub use templates::{QUICK_REQUESTS, QuickRequest};
pub use validator::validate;
