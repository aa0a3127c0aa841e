//! Engine-to-presentation events
//!
//! Rule logic never calls haptics, speech or notifications directly. Each
//! state change is recorded as a [`GameEvent`]; the caller drains the log
//! and hands the events to whatever feedback services it owns.
//!
//! # Example
//!
//! ```rust
//! use canteen_change_core::models::{CoinDenomination, GameEvent, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(GameEvent::CoinAdded { coin: CoinDenomination::Five, tray_total: 5 });
//! assert_eq!(log.events_of_type("coin_added").len(), 1);
//!
//! let drained = log.drain();
//! assert_eq!(drained.len(), 1);
//! assert!(log.is_empty());
//! ```

use super::achievement::AchievementId;
use super::coin::CoinDenomination;
use super::goal::SavingsGoal;
use super::product::Product;
use super::round::RoundId;
use crate::navigator::Screen;

/// A state change worth telling the presentation layer about
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Coin placed on the tray
    CoinAdded {
        coin: CoinDenomination,
        tray_total: i64,
    },

    /// Coin taken off the tray
    CoinRemoved {
        coin: CoinDenomination,
        tray_total: i64,
    },

    /// Tray exceeds the change target
    TooMuch { tray_total: i64, change_target: i64 },

    /// Round confirmed correct by evaluate
    Correct { change_target: i64 },

    AchievementUnlocked { id: AchievementId },

    /// Product bought, a new round is open
    Purchased {
        product: Product,
        amount_paid: i64,
        change_target: i64,
    },

    GoalSelected {
        goal: SavingsGoal,
        sessions_needed: i64,
    },

    /// Last purchase refunded
    Undone { product: Product },

    ScreenChanged { from: Screen, to: Screen },

    /// Deterministic hint produced for a round
    HintShown { round: RoundId, text: String },

    /// Enrichment replaced the displayed hint
    HintEnriched { round: RoundId, text: String },

    /// Enrichment replaced the summary feedback
    FeedbackEnriched { text: String },

    /// Full game reset
    Reset { games_played: u32 },
}

impl GameEvent {
    /// Get event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::CoinAdded { .. } => "coin_added",
            GameEvent::CoinRemoved { .. } => "coin_removed",
            GameEvent::TooMuch { .. } => "too_much",
            GameEvent::Correct { .. } => "correct",
            GameEvent::AchievementUnlocked { .. } => "achievement_unlocked",
            GameEvent::Purchased { .. } => "purchased",
            GameEvent::GoalSelected { .. } => "goal_selected",
            GameEvent::Undone { .. } => "undone",
            GameEvent::ScreenChanged { .. } => "screen_changed",
            GameEvent::HintShown { .. } => "hint_shown",
            GameEvent::HintEnriched { .. } => "hint_enriched",
            GameEvent::FeedbackEnriched { .. } => "feedback_enriched",
            GameEvent::Reset { .. } => "reset",
        }
    }

    /// Round this event belongs to, if it is round-scoped
    pub fn round(&self) -> Option<RoundId> {
        match self {
            GameEvent::HintShown { round, .. } | GameEvent::HintEnriched { round, .. } => {
                Some(*round)
            }
            _ => None,
        }
    }
}

/// Pending events in emission order
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&GameEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Take every pending event, leaving the log empty
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
