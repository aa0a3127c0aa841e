//! Tests for BudgetLedger
//!
//! CRITICAL: All money values are i64 (whole canteen coins)

use canteen_change_core::{BudgetLedger, ColorTag, Difficulty, LedgerError, Product};

fn product(name: &str) -> Product {
    Product::find(name).unwrap()
}

#[test]
fn test_new_ledger_is_full() {
    let ledger = BudgetLedger::new(50);
    assert_eq!(ledger.budget(), 50);
    assert_eq!(ledger.starting_budget(), 50);
    assert!(ledger.purchases().is_empty());
    assert_eq!(ledger.coins_saved(), 50);
}

#[test]
fn test_payment_follows_difficulty() {
    let cases = [
        (Difficulty::Easy, "Simit", 10, 5),
        (Difficulty::Easy, "Ayran", 5, 2),
        (Difficulty::Easy, "Tost", 20, 10),
        (Difficulty::Medium, "Simit", 10, 5),
        (Difficulty::Medium, "Water", 10, 9),
        (Difficulty::Hard, "Simit", 20, 15),
        (Difficulty::Hard, "Chocolate", 20, 12),
    ];

    for (difficulty, name, paid, change) in cases {
        let mut ledger = BudgetLedger::new(50);
        let purchase = ledger.buy(product(name), difficulty).unwrap();
        assert_eq!(purchase.paid_with(), paid, "{:?} {}", difficulty, name);
        assert_eq!(purchase.change(), change, "{:?} {}", difficulty, name);
    }
}

#[test]
fn test_payment_fallback_above_every_note() {
    let cake = Product::new("Pasta", "Cake", 50, ColorTag::Yellow);

    let mut easy = BudgetLedger::new(200);
    assert_eq!(easy.buy(cake, Difficulty::Easy).unwrap().paid_with(), 55);

    let banquet = Product::new("Ziyafet", "Banquet", 100, ColorTag::Orange);
    let mut hard = BudgetLedger::new(200);
    let purchase = hard.buy(banquet, Difficulty::Hard).unwrap();
    assert_eq!(purchase.paid_with(), 120);
    assert_eq!(purchase.change(), 20);
}

#[test]
fn test_purchase_keeps_product_snapshot() {
    let mut ledger = BudgetLedger::new(50);
    let mut simit = product("Simit");
    ledger.buy(simit.clone(), Difficulty::Easy).unwrap();

    // Editing the caller's copy leaves history alone
    simit.price = 99;
    assert_eq!(ledger.purchases()[0].product().price, 5);
    assert_eq!(ledger.total_spent(), 5);
}

#[test]
fn test_spend_down_to_zero_then_refuse() {
    let mut ledger = BudgetLedger::new(10);
    ledger.buy(product("Simit"), Difficulty::Easy).unwrap();
    ledger.buy(product("Simit"), Difficulty::Easy).unwrap();
    assert_eq!(ledger.budget(), 0);

    let err = ledger.buy(product("Water"), Difficulty::Easy).unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientFunds {
            required: 1,
            available: 0
        }
    );
    assert_eq!(
        err.to_string(),
        "Insufficient funds: required 1, available 0"
    );
    assert_eq!(ledger.purchases().len(), 2);
}

#[test]
fn test_undo_all_restores_start() {
    let mut ledger = BudgetLedger::new(50);
    for name in ["Tost", "Ayran", "Chocolate"] {
        ledger.buy(product(name), Difficulty::Medium).unwrap();
    }
    assert_eq!(ledger.budget(), 29);

    let undone: Vec<String> = (0..3)
        .map(|_| ledger.undo_last().unwrap().product().name.clone())
        .collect();
    assert_eq!(undone, vec!["Chocolate", "Ayran", "Tost"]);
    assert_eq!(ledger.budget(), 50);
    assert_eq!(ledger.undo_last(), Err(LedgerError::NothingToUndo));
}

#[test]
fn test_reset_restores_budget() {
    let mut ledger = BudgetLedger::new(50);
    ledger.buy(product("Tost"), Difficulty::Easy).unwrap();
    ledger.reset();
    assert_eq!(ledger.budget(), 50);
    assert!(ledger.last_purchase().is_none());
}
