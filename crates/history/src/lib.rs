//! History ledger implementations for switchbot.
//!
//! The ledger is independent of live sessions: it survives restarts and is
//! only ever pruned by the record cap or an explicit delete.

pub mod in_memory;
pub mod json_file;
pub mod ledger;

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;
pub use ledger::{Exchange, HistoryLedger};
