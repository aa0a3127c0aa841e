//! Change-making round
//!
//! A round is opened by a purchase and holds the coins the child places on
//! the change tray. It ends with a correct evaluation, an undo, a new
//! purchase or a game reset.
//!
//! # Round phases
//!
//! ```text
//! Empty -> Building -> { TooMuch | Building } -> Correct
//! ```
//!
//! Only [`Round::evaluate`] can reach `Correct`. Placing the last matching
//! coin leaves the round in `Building` until the child confirms.
//!
//! # Invariants
//!
//! - `selected_total() <= change_target * tray_sum_multiplier`
//! - `coins().len() <= max_tray_coins`
//!
//! Both ceilings are enforced on insertion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use super::coin::CoinDenomination;
use crate::core::EngineConfig;

/// Identity of a round, unique within one navigator's lifetime.
///
/// Used to discard enrichment replies that arrive after their round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundId(pub u64);

impl std::fmt::Display for RoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "round-{}", self.0)
    }
}

/// Which tray ceiling a coin would have broken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverLimitReason {
    CountCeiling { max: usize },
    SumCeiling { max: i64, attempted: i64 },
}

/// Errors that can occur during round operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    #[error("Coin rejected: {0:?}")]
    OverLimit(OverLimitReason),

    #[error("Index {index} out of range for tray of {len} coins")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Round already resolved as correct")]
    AlreadyResolved,

    #[error("No round is open")]
    NoActiveRound,
}

/// Stored result of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeResult {
    Correct,
    TooMuch,
}

/// Where a round is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Empty,
    Building,
    TooMuch,
    Correct,
}

/// Outcome of an explicit evaluate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// Tray matches the target exactly
    Correct {
        change_target: i64,
        hint_requested: bool,
        distinct_denominations: usize,
    },
    /// Tray exceeds the target
    TooMuch { over_by: i64 },
    /// Tray is below the target. The stored result is cleared, same as an
    /// empty tray.
    Incomplete { remaining: i64 },
}

impl Evaluation {
    pub fn is_correct(&self) -> bool {
        matches!(self, Evaluation::Correct { .. })
    }
}

/// Tray ceilings copied from config when the round opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrayLimits {
    pub max_coins: usize,
    pub sum_multiplier: i64,
}

impl From<&EngineConfig> for TrayLimits {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_coins: config.max_tray_coins,
            sum_multiplier: config.tray_sum_multiplier,
        }
    }
}

impl Default for TrayLimits {
    fn default() -> Self {
        TrayLimits::from(&EngineConfig::default())
    }
}

/// One change-making puzzle
///
/// # Example
/// ```
/// use canteen_change_core::models::{ChangeResult, CoinDenomination, Round, RoundId, TrayLimits};
///
/// let mut round = Round::new(RoundId(1), 5, TrayLimits::default());
/// round.add_coin(CoinDenomination::Twenty).unwrap();
/// assert_eq!(round.result(), Some(ChangeResult::TooMuch));
///
/// round.remove_coin(0).unwrap();
/// round.add_coin(CoinDenomination::Five).unwrap();
/// assert_eq!(round.result(), None); // exact, but not confirmed yet
/// assert!(round.evaluate().unwrap().is_correct());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    id: RoundId,
    change_target: i64,
    selected: Vec<CoinDenomination>,
    /// Maintained incrementally on every tray change
    running_total: i64,
    result: Option<ChangeResult>,
    hint_requested: bool,
    limits: TrayLimits,
}

impl Round {
    pub fn new(id: RoundId, change_target: i64, limits: TrayLimits) -> Self {
        debug_assert!(change_target >= 0, "change_target must be non-negative");
        Self {
            id,
            change_target,
            selected: Vec::new(),
            running_total: 0,
            result: None,
            hint_requested: false,
            limits,
        }
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn change_target(&self) -> i64 {
        self.change_target
    }

    pub fn coins(&self) -> &[CoinDenomination] {
        &self.selected
    }

    pub fn result(&self) -> Option<ChangeResult> {
        self.result
    }

    pub fn hint_requested(&self) -> bool {
        self.hint_requested
    }

    pub fn is_resolved(&self) -> bool {
        self.result == Some(ChangeResult::Correct)
    }

    pub fn phase(&self) -> RoundPhase {
        match self.result {
            Some(ChangeResult::Correct) => RoundPhase::Correct,
            Some(ChangeResult::TooMuch) => RoundPhase::TooMuch,
            None if self.selected.is_empty() => RoundPhase::Empty,
            None => RoundPhase::Building,
        }
    }

    /// Tray total from the running counter
    pub fn selected_total(&self) -> i64 {
        self.running_total
    }

    /// Tray total summed from scratch
    pub fn recomputed_total(&self) -> i64 {
        self.selected.iter().map(|c| c.value()).sum()
    }

    /// Amount still missing; negative when over
    pub fn remaining(&self) -> i64 {
        self.change_target - self.running_total
    }

    /// Highest tray sum this round accepts
    pub fn sum_ceiling(&self) -> i64 {
        self.change_target * self.limits.sum_multiplier
    }

    pub fn distinct_denominations(&self) -> usize {
        self.selected.iter().collect::<BTreeSet<_>>().len()
    }

    fn ensure_open(&self) -> Result<(), RoundError> {
        if self.is_resolved() {
            return Err(RoundError::AlreadyResolved);
        }
        Ok(())
    }

    /// Place a coin on the tray.
    ///
    /// Going over the target flags `TooMuch` right away. Hitting the target
    /// exactly does not resolve the round.
    ///
    /// # Errors
    /// - [`RoundError::OverLimit`] when the coin count or the tray sum
    ///   ceiling would be exceeded
    /// - [`RoundError::AlreadyResolved`] after a correct evaluation
    pub fn add_coin(&mut self, coin: CoinDenomination) -> Result<i64, RoundError> {
        self.ensure_open()?;

        if self.selected.len() >= self.limits.max_coins {
            return Err(RoundError::OverLimit(OverLimitReason::CountCeiling {
                max: self.limits.max_coins,
            }));
        }
        let attempted = self.running_total + coin.value();
        if attempted > self.sum_ceiling() {
            return Err(RoundError::OverLimit(OverLimitReason::SumCeiling {
                max: self.sum_ceiling(),
                attempted,
            }));
        }

        self.selected.push(coin);
        self.running_total = attempted;
        self.result = if self.running_total > self.change_target {
            Some(ChangeResult::TooMuch)
        } else {
            None
        };
        Ok(self.running_total)
    }

    /// Take the coin at `index` off the tray and clear the result
    pub fn remove_coin(&mut self, index: usize) -> Result<CoinDenomination, RoundError> {
        self.ensure_open()?;

        if index >= self.selected.len() {
            return Err(RoundError::IndexOutOfRange {
                index,
                len: self.selected.len(),
            });
        }
        let coin = self.selected.remove(index);
        self.running_total -= coin.value();
        self.result = None;
        Ok(coin)
    }

    /// Empty the tray and clear the result.
    ///
    /// A hint request survives: once asked, the round stays disqualified
    /// from the no-hint achievement.
    pub fn clear(&mut self) -> Result<(), RoundError> {
        self.ensure_open()?;

        self.selected.clear();
        self.running_total = 0;
        self.result = None;
        Ok(())
    }

    /// Confirm the tray against the target
    pub fn evaluate(&mut self) -> Result<Evaluation, RoundError> {
        self.ensure_open()?;

        let evaluation = match self.running_total.cmp(&self.change_target) {
            std::cmp::Ordering::Equal => {
                self.result = Some(ChangeResult::Correct);
                Evaluation::Correct {
                    change_target: self.change_target,
                    hint_requested: self.hint_requested,
                    distinct_denominations: self.distinct_denominations(),
                }
            }
            std::cmp::Ordering::Greater => {
                self.result = Some(ChangeResult::TooMuch);
                Evaluation::TooMuch {
                    over_by: self.running_total - self.change_target,
                }
            }
            std::cmp::Ordering::Less => {
                self.result = None;
                Evaluation::Incomplete {
                    remaining: self.remaining(),
                }
            }
        };
        Ok(evaluation)
    }

    /// Record that a hint was asked for. Disqualifies the no-hint
    /// achievement for the rest of this round.
    pub fn request_hint(&mut self) {
        self.hint_requested = true;
    }
}
