//! Achievement catalog
//!
//! The set of achievement ids is defined here, in code. Persisted data only
//! says which ids were unlocked before; ids unknown to this catalog are
//! dropped and ids new to it start locked.
//!
//! Unlock state is indexed by id for O(1) idempotent unlocks while the
//! catalog order is kept for display.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable achievement identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstPurchase,
    ChangeMaster,
    SmartSaver,
    BudgetMaster,
    NoHintHero,
    CoinMix,
}

impl AchievementId {
    /// Catalog order
    pub const ALL: [AchievementId; 6] = [
        AchievementId::FirstPurchase,
        AchievementId::ChangeMaster,
        AchievementId::SmartSaver,
        AchievementId::BudgetMaster,
        AchievementId::NoHintHero,
        AchievementId::CoinMix,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            AchievementId::FirstPurchase => "first_purchase",
            AchievementId::ChangeMaster => "change_master",
            AchievementId::SmartSaver => "smart_saver",
            AchievementId::BudgetMaster => "budget_master",
            AchievementId::NoHintHero => "no_hint_hero",
            AchievementId::CoinMix => "coin_mix",
        }
    }

    /// Resolve a persisted id; `None` when the code catalog no longer has it
    ///
    /// # Example
    /// ```
    /// use canteen_change_core::AchievementId;
    ///
    /// assert_eq!(AchievementId::parse("coin_mix"), Some(AchievementId::CoinMix));
    /// assert_eq!(AchievementId::parse("retired_badge"), None);
    /// ```
    pub fn parse(id: &str) -> Option<AchievementId> {
        Self::ALL.iter().copied().find(|a| a.as_str() == id)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry with its unlock state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub id: AchievementId,

    /// Name of the unlock rule evaluated for this entry
    pub predicate: &'static str,

    pub title: &'static str,
    pub subtitle: &'static str,
    pub unlocked: bool,
}

impl Achievement {
    fn locked(id: AchievementId) -> Self {
        let (predicate, title, subtitle) = match id {
            AchievementId::FirstPurchase => (
                "purchase_count_is_one",
                "First Purchase!",
                "You bought your first item at the canteen.",
            ),
            AchievementId::ChangeMaster => (
                "evaluated_correct",
                "Change Master!",
                "You calculated the correct change amount.",
            ),
            AchievementId::SmartSaver => (
                "total_spent_below_20",
                "Smart Saver!",
                "You spent less than 20 coins, great saving!",
            ),
            AchievementId::BudgetMaster => (
                "budget_at_least_30",
                "Budget Master!",
                "Saved 30 or more coins at the end.",
            ),
            AchievementId::NoHintHero => (
                "correct_without_hint",
                "Independent Thinker!",
                "You figured out the exact change all by yourself, no hints needed!",
            ),
            AchievementId::CoinMix => (
                "correct_with_three_denominations",
                "Mix & Match!",
                "You combined three or more different coin types to make exact change!",
            ),
        };
        Self {
            id,
            predicate,
            title,
            subtitle,
            unlocked: false,
        }
    }
}

/// Ordered catalog plus unlock state
///
/// # Example
/// ```
/// use canteen_change_core::{AchievementBook, AchievementId};
///
/// let mut book = AchievementBook::catalog();
/// assert!(book.unlock(AchievementId::CoinMix));
/// assert!(!book.unlock(AchievementId::CoinMix)); // already unlocked
/// assert_eq!(book.unlocked_ids(), vec!["coin_mix"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementBook {
    entries: Vec<Achievement>,
}

impl AchievementBook {
    /// Full catalog, everything locked
    pub fn catalog() -> Self {
        Self {
            entries: AchievementId::ALL.iter().copied().map(Achievement::locked).collect(),
        }
    }

    /// Catalog with the given persisted ids marked unlocked.
    ///
    /// Returns the book and the ids that were dropped because the code
    /// catalog does not know them.
    pub fn from_unlocked_ids<'a, I>(ids: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut book = Self::catalog();
        let mut dropped = Vec::new();
        for raw in ids {
            match AchievementId::parse(raw) {
                Some(id) => {
                    book.unlock(id);
                }
                None => dropped.push(raw.to_string()),
            }
        }
        (book, dropped)
    }

    /// Mark `id` unlocked. Returns `true` only on the first unlock.
    pub fn unlock(&mut self, id: AchievementId) -> bool {
        let entry = &mut self.entries[id.index()];
        if entry.unlocked {
            return false;
        }
        entry.unlocked = true;
        true
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.entries[id.index()].unlocked
    }

    pub fn get(&self, id: AchievementId) -> &Achievement {
        &self.entries[id.index()]
    }

    /// Unlocked ids in catalog order
    pub fn unlocked_ids(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|a| a.unlocked)
            .map(|a| a.id.as_str())
            .collect()
    }

    pub fn unlocked_count(&self) -> usize {
        self.entries.iter().filter(|a| a.unlocked).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in display order
    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.entries.iter()
    }
}

impl Default for AchievementBook {
    fn default() -> Self {
        Self::catalog()
    }
}
