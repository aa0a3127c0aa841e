//! Persistence - save/load of the aggregate game snapshot
//!
//! # Critical Invariants
//!
//! - **Single record**: at most one record exists; saves update it in place
//! - **Partial tolerance**: a field that fails to decode falls back to its
//!   default without aborting the rest of the load
//! - **Merge-on-load**: the code catalog decides which achievements exist;
//!   the record only says which of them were unlocked

pub mod gateway;
pub mod snapshot;
pub mod store;

use thiserror::Error;

pub use gateway::PersistenceGateway;
pub use snapshot::{GameSnapshot, PersistedRecord};
pub use store::{JsonFileStore, MemoryStore, SnapshotStore};

/// Errors that can occur while saving or loading
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Persistence unavailable: {0}")]
    Unavailable(String),

    #[error("Snapshot encoding failed: {0}")]
    Codec(#[from] serde_json::Error),
}
