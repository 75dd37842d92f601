//! Upload history storage
//!
//! A bounded, order-preserving store of the most recent uploads, optionally
//! written through to Sled DB so history survives restarts.

pub mod history;

pub use history::{HistoryStore, StorageError, DEFAULT_CAPACITY};
