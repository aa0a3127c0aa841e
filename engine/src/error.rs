//! Crate-wide error type
//!
//! Each component keeps its own error enum; [`GameError`] folds them into
//! one for callers that drive several components.

use thiserror::Error;

use crate::core::ConfigError;
use crate::hints::EnrichmentError;
use crate::models::{LedgerError, RoundError};
use crate::persistence::PersistenceError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Round(#[from] RoundError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GameError {
    /// Whether the rejected intent left state untouched. Only persistence
    /// and configuration failures can lose data.
    pub fn is_silent_no_op(&self) -> bool {
        matches!(
            self,
            GameError::Ledger(_) | GameError::Round(_) | GameError::Enrichment(_)
        )
    }
}
