//! Unlock rules evaluated at fixed trigger points.
//!
//! Rules are pure predicates over ledger and round state. They are checked
//! when something happens (a purchase, an evaluation, entering the summary),
//! never polled.

pub mod achievements;

pub use achievements::{AchievementEngine, RuleContext, Trigger};
