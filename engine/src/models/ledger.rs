//! Budget ledger
//!
//! Tracks the spendable balance and the purchase log.
//!
//! # Invariants
//!
//! - `0 <= budget <= starting_budget` in every reachable state
//! - Purchases leave the log only through [`BudgetLedger::undo_last`],
//!   strictly newest first
//!
//! All amounts are whole canteen coins (i64).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::product::{Difficulty, Product};
use super::purchase::Purchase;

/// Errors that can occur during ledger operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Nothing to undo: purchase log is empty")]
    NothingToUndo,
}

/// Spendable balance plus purchase history
///
/// # Example
/// ```
/// use canteen_change_core::{BudgetLedger, Difficulty, Product};
///
/// let mut ledger = BudgetLedger::new(50);
/// let purchase = ledger.buy(Product::find("Simit").unwrap(), Difficulty::Easy).unwrap();
/// assert_eq!(purchase.paid_with(), 10);
/// assert_eq!(purchase.change(), 5);
/// assert_eq!(ledger.budget(), 45);
///
/// ledger.undo_last().unwrap();
/// assert_eq!(ledger.budget(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLedger {
    starting_budget: i64,
    budget: i64,
    purchases: Vec<Purchase>,
}

impl BudgetLedger {
    /// Create a ledger holding the full starting budget
    pub fn new(starting_budget: i64) -> Self {
        debug_assert!(starting_budget > 0, "starting_budget must be positive");
        Self {
            starting_budget,
            budget: starting_budget,
            purchases: Vec::new(),
        }
    }

    /// Rebuild a ledger from persisted values.
    ///
    /// Inconsistent purchases are dropped, and a log spending more than
    /// `starting_budget` is dropped whole. The budget is clamped into
    /// `0..=starting_budget`; when refunding every remaining purchase would
    /// still overshoot `starting_budget`, it is recomputed from the log as
    /// `starting_budget - total_spent`. Either way no later undo can leave
    /// the valid range.
    pub fn from_snapshot(starting_budget: i64, budget: i64, mut purchases: Vec<Purchase>) -> Self {
        let mut ledger = Self::new(starting_budget);
        ledger.budget = budget.clamp(0, starting_budget);

        let before = purchases.len();
        purchases.retain(Purchase::is_consistent);
        if purchases.len() != before {
            warn!(
                dropped = before - purchases.len(),
                "inconsistent purchases dropped from restored ledger"
            );
        }

        let spent = purchases
            .iter()
            .try_fold(0i64, |acc, p| acc.checked_add(p.price()))
            .filter(|&spent| spent <= starting_budget);
        let Some(spent) = spent else {
            warn!(
                purchases = purchases.len(),
                starting_budget, "restored purchases exceed the starting budget; dropping them"
            );
            return ledger;
        };

        if ledger.budget + spent > starting_budget {
            let reconciled = starting_budget - spent;
            warn!(
                stored = budget,
                reconciled, "restored budget disagrees with purchases; recomputed"
            );
            ledger.budget = reconciled;
        }
        ledger.purchases = purchases;
        ledger
    }

    pub fn starting_budget(&self) -> i64 {
        self.starting_budget
    }

    pub fn budget(&self) -> i64 {
        self.budget
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    pub fn last_purchase(&self) -> Option<&Purchase> {
        self.purchases.last()
    }

    /// Check whether `price` is affordable right now
    pub fn can_afford(&self, price: i64) -> bool {
        price <= self.budget
    }

    /// Buy a product at the given difficulty.
    ///
    /// Deducts the price and records a purchase paid with the smallest
    /// payment denomination above the price (see
    /// [`Difficulty::amount_paid_for`]).
    ///
    /// # Errors
    /// [`LedgerError::InsufficientFunds`] when the budget is below the
    /// price. The ledger is left untouched.
    pub fn buy(&mut self, product: Product, difficulty: Difficulty) -> Result<Purchase, LedgerError> {
        if !self.can_afford(product.price) {
            return Err(LedgerError::InsufficientFunds {
                required: product.price,
                available: self.budget,
            });
        }

        let amount_paid = difficulty.amount_paid_for(product.price);
        self.budget -= product.price;
        let purchase = Purchase::new(product, amount_paid);
        self.purchases.push(purchase.clone());

        info!(
            product = %purchase.product().name,
            price = purchase.price(),
            amount_paid,
            budget = self.budget,
            "purchase recorded"
        );
        Ok(purchase)
    }

    /// Refund and remove the most recent purchase
    ///
    /// # Errors
    /// [`LedgerError::NothingToUndo`] when the log is empty.
    pub fn undo_last(&mut self) -> Result<Purchase, LedgerError> {
        let last = self.purchases.pop().ok_or(LedgerError::NothingToUndo)?;
        self.budget += last.price();
        debug!(product = %last.product().name, budget = self.budget, "purchase undone");
        Ok(last)
    }

    /// Sum of all purchase prices
    pub fn total_spent(&self) -> i64 {
        self.purchases.iter().map(Purchase::price).sum()
    }

    /// Coins not spent, `starting_budget - total_spent`
    pub fn coins_saved(&self) -> i64 {
        self.starting_budget - self.total_spent()
    }

    /// Remaining budget as a fraction of the starting budget
    pub fn budget_fraction(&self) -> f64 {
        self.budget as f64 / self.starting_budget as f64
    }

    /// Restore the full budget and clear the log
    pub fn reset(&mut self) {
        self.budget = self.starting_budget;
        self.purchases.clear();
    }
}
