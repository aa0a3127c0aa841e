//! Achievement engine
//!
//! | id             | predicate                              | trigger          |
//! |----------------|----------------------------------------|------------------|
//! | first_purchase | exactly one purchase in the log        | after buy        |
//! | change_master  | evaluation was correct                 | after evaluate   |
//! | smart_saver    | purchases made and total spent < 20    | after buy        |
//! | budget_master  | purchases made and budget >= 30        | after buy        |
//! | no_hint_hero   | correct and no hint requested          | after evaluate   |
//! | coin_mix       | correct with >= 3 distinct coins       | after evaluate   |
//!
//! smart_saver and budget_master are checked again when the summary opens.
//!
//! The engine only returns newly unlocked ids. Forwarding them to
//! haptics, speech or notifications is the caller's job.

use tracing::info;

use crate::models::{AchievementBook, AchievementId, BudgetLedger, Evaluation};

/// Spent strictly below this for smart_saver
pub const SMART_SAVER_SPEND_LIMIT: i64 = 20;

/// Budget at or above this for budget_master
pub const BUDGET_MASTER_THRESHOLD: i64 = 30;

/// Distinct denominations needed for coin_mix
pub const COIN_MIX_DENOMINATIONS: usize = 3;

/// Moment at which rules are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    AfterPurchase,
    AfterEvaluate,
    SummaryEntered,
}

impl Trigger {
    /// Rules checked at this trigger, in catalog order
    pub fn rules(self) -> &'static [AchievementId] {
        match self {
            Trigger::AfterPurchase => &[
                AchievementId::FirstPurchase,
                AchievementId::SmartSaver,
                AchievementId::BudgetMaster,
            ],
            Trigger::AfterEvaluate => &[
                AchievementId::ChangeMaster,
                AchievementId::NoHintHero,
                AchievementId::CoinMix,
            ],
            Trigger::SummaryEntered => &[AchievementId::SmartSaver, AchievementId::BudgetMaster],
        }
    }
}

/// State visible to the predicates
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub purchase_count: usize,
    pub total_spent: i64,
    pub budget: i64,
    pub evaluation: Option<&'a Evaluation>,
}

impl<'a> RuleContext<'a> {
    pub fn from_ledger(ledger: &BudgetLedger) -> Self {
        Self {
            purchase_count: ledger.purchases().len(),
            total_spent: ledger.total_spent(),
            budget: ledger.budget(),
            evaluation: None,
        }
    }

    #[must_use]
    pub fn with_evaluation(mut self, evaluation: &'a Evaluation) -> Self {
        self.evaluation = Some(evaluation);
        self
    }
}

/// Check one rule against the context
pub fn predicate_holds(id: AchievementId, ctx: &RuleContext<'_>) -> bool {
    let has_purchases = ctx.purchase_count > 0;
    match (id, ctx.evaluation) {
        (AchievementId::FirstPurchase, _) => ctx.purchase_count == 1,
        (AchievementId::SmartSaver, _) => {
            has_purchases && ctx.total_spent < SMART_SAVER_SPEND_LIMIT
        }
        (AchievementId::BudgetMaster, _) => has_purchases && ctx.budget >= BUDGET_MASTER_THRESHOLD,
        (AchievementId::ChangeMaster, Some(Evaluation::Correct { .. })) => true,
        (
            AchievementId::NoHintHero,
            Some(Evaluation::Correct {
                hint_requested: false,
                ..
            }),
        ) => true,
        (
            AchievementId::CoinMix,
            Some(Evaluation::Correct {
                distinct_denominations,
                ..
            }),
        ) => *distinct_denominations >= COIN_MIX_DENOMINATIONS,
        _ => false,
    }
}

/// Owns unlock state and applies the rule table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementEngine {
    book: AchievementBook,
}

impl AchievementEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(book: AchievementBook) -> Self {
        Self { book }
    }

    pub fn book(&self) -> &AchievementBook {
        &self.book
    }

    /// Unlock `id`. Returns it only when this call changed its state.
    ///
    /// # Example
    /// ```
    /// use canteen_change_core::{AchievementEngine, AchievementId};
    ///
    /// let mut engine = AchievementEngine::new();
    /// assert_eq!(engine.unlock(AchievementId::SmartSaver), Some(AchievementId::SmartSaver));
    /// assert_eq!(engine.unlock(AchievementId::SmartSaver), None);
    /// ```
    pub fn unlock(&mut self, id: AchievementId) -> Option<AchievementId> {
        if self.book.unlock(id) {
            info!(achievement = %id, "achievement unlocked");
            Some(id)
        } else {
            None
        }
    }

    /// Evaluate the rules for `trigger` and unlock every one that holds.
    ///
    /// Returns newly unlocked ids in catalog order.
    pub fn check(&mut self, trigger: Trigger, ctx: &RuleContext<'_>) -> Vec<AchievementId> {
        trigger
            .rules()
            .iter()
            .copied()
            .filter(|&id| predicate_holds(id, ctx))
            .filter_map(|id| self.unlock(id))
            .collect()
    }

    /// Relock everything
    pub fn clear(&mut self) {
        self.book = AchievementBook::catalog();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(purchase_count: usize, total_spent: i64, budget: i64) -> RuleContext<'a> {
        RuleContext {
            purchase_count,
            total_spent,
            budget,
            evaluation: None,
        }
    }

    #[test]
    fn test_first_purchase_only_at_count_one() {
        assert!(predicate_holds(AchievementId::FirstPurchase, &ctx(1, 5, 45)));
        assert!(!predicate_holds(AchievementId::FirstPurchase, &ctx(2, 10, 40)));
        assert!(!predicate_holds(AchievementId::FirstPurchase, &ctx(0, 0, 50)));
    }

    #[test]
    fn test_saver_rules_need_purchases() {
        assert!(!predicate_holds(AchievementId::SmartSaver, &ctx(0, 0, 50)));
        assert!(!predicate_holds(AchievementId::BudgetMaster, &ctx(0, 0, 50)));
        assert!(predicate_holds(AchievementId::SmartSaver, &ctx(2, 19, 31)));
        assert!(!predicate_holds(AchievementId::SmartSaver, &ctx(2, 20, 30)));
        assert!(predicate_holds(AchievementId::BudgetMaster, &ctx(2, 20, 30)));
        assert!(!predicate_holds(AchievementId::BudgetMaster, &ctx(4, 21, 29)));
    }

    #[test]
    fn test_evaluate_rules_ignore_non_correct() {
        let too_much = Evaluation::TooMuch { over_by: 3 };
        let c = ctx(1, 5, 45).with_evaluation(&too_much);
        for id in Trigger::AfterEvaluate.rules() {
            assert!(!predicate_holds(*id, &c), "{} should not hold", id);
        }
    }

    #[test]
    fn test_hint_blocks_no_hint_hero() {
        let correct = Evaluation::Correct {
            change_target: 5,
            hint_requested: true,
            distinct_denominations: 1,
        };
        let mut engine = AchievementEngine::new();
        let unlocked = engine.check(
            Trigger::AfterEvaluate,
            &ctx(1, 5, 45).with_evaluation(&correct),
        );
        assert_eq!(unlocked, vec![AchievementId::ChangeMaster]);
    }

    #[test]
    fn test_check_is_idempotent() {
        let mut engine = AchievementEngine::new();
        let first = engine.check(Trigger::AfterPurchase, &ctx(1, 5, 45));
        assert_eq!(
            first,
            vec![
                AchievementId::FirstPurchase,
                AchievementId::SmartSaver,
                AchievementId::BudgetMaster
            ]
        );
        let again = engine.check(Trigger::SummaryEntered, &ctx(1, 5, 45));
        assert!(again.is_empty());
        assert_eq!(engine.book().unlocked_count(), 3);
    }
}
