//! Canteen Change Core - game rules engine
//!
//! Rules engine for a canteen shopping game that teaches children to give
//! change: buy a snack, pay with a bigger note, then put the right coins on
//! the change tray.
//!
//! # Architecture
//!
//! - **core**: Engine configuration
//! - **models**: Domain types (Product, Purchase, Round, BudgetLedger, Achievement)
//! - **rules**: Achievement unlock rules
//! - **analytics**: Session and lifetime accuracy counters
//! - **persistence**: Single-record save/load with merge-on-load
//! - **hints**: Deterministic hints and optional async enrichment
//! - **navigator**: Screen state machine and intent handling
//! - **events**: Dispatch of engine events to presentation sinks
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (whole canteen coins)
//! 2. `0 <= budget <= starting_budget` in every reachable state
//! 3. Tray ceilings are enforced on insertion, never after the fact
//! 4. Unlocked achievement ids are always a subset of the code catalog
//!
//! # Example
//!
//! ```rust
//! use canteen_change_core::navigator::Navigator;
//! use canteen_change_core::persistence::MemoryStore;
//! use canteen_change_core::{AchievementId, CoinDenomination, EngineConfig, Product};
//!
//! let mut nav = Navigator::new(EngineConfig::default(), MemoryStore::new()).unwrap();
//! nav.buy(Product::find("Simit").unwrap()).unwrap();
//! nav.add_coin(CoinDenomination::Five).unwrap();
//! assert!(nav.evaluate().unwrap().is_correct());
//! assert!(nav.achievements().is_unlocked(AchievementId::NoHintHero));
//! ```

// Module declarations
pub mod analytics;
pub mod core;
pub mod error;
pub mod events;
pub mod hints;
pub mod models;
pub mod navigator;
pub mod persistence;
pub mod rules;

// Re-exports for convenience
pub use analytics::AnalyticsAggregator;
pub use core::{ConfigError, EngineConfig, ResetPolicy};
pub use error::GameError;
pub use events::{FeedbackDispatcher, FeedbackSink};
pub use hints::{EnrichmentError, HintAdvisor, NoEnricher, SessionId, TextEnricher};
pub use models::{
    achievement::{Achievement, AchievementBook, AchievementId},
    coin::CoinDenomination,
    event::{EventLog, GameEvent},
    goal::SavingsGoal,
    ledger::{BudgetLedger, LedgerError},
    product::{ColorTag, Difficulty, Product},
    purchase::Purchase,
    round::{ChangeResult, Evaluation, Round, RoundError, RoundId},
};
pub use navigator::{Navigator, Screen, SharedNavigator};
pub use persistence::{
    GameSnapshot, JsonFileStore, MemoryStore, PersistedRecord, PersistenceError,
    PersistenceGateway, SnapshotStore,
};
pub use rules::{AchievementEngine, Trigger};
