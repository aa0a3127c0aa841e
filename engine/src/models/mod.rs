//! Domain models for the canteen change game

pub mod achievement;
pub mod coin;
pub mod event;
pub mod goal;
pub mod ledger;
pub mod product;
pub mod purchase;
pub mod round;

// Re-exports
pub use achievement::{Achievement, AchievementBook, AchievementId};
pub use coin::CoinDenomination;
pub use event::{EventLog, GameEvent};
pub use goal::SavingsGoal;
pub use ledger::{BudgetLedger, LedgerError};
pub use product::{ColorTag, Difficulty, Product};
pub use purchase::Purchase;
pub use round::{
    ChangeResult, Evaluation, OverLimitReason, Round, RoundError, RoundId, RoundPhase, TrayLimits,
};
