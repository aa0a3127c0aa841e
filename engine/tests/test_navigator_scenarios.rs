//! Navigator scenario tests
//!
//! End-to-end play through the navigator: purchases, tray intents,
//! evaluation, undo, reset and the screen flow between them.

use canteen_change_core::{
    AchievementId, ChangeResult, CoinDenomination, Difficulty, EngineConfig, Evaluation,
    GameEvent, LedgerError, MemoryStore, Navigator, PersistedRecord, Product, RoundError,
    SavingsGoal, Screen,
};
use CoinDenomination::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn navigator() -> Navigator {
    Navigator::new(EngineConfig::default(), MemoryStore::new()).unwrap()
}

fn simit() -> Product {
    Product::find("Simit").unwrap()
}

fn event_types(nav: &mut Navigator) -> Vec<&'static str> {
    nav.drain_events().iter().map(GameEvent::event_type).collect()
}

// ============================================================================
// Reference Scenarios
// ============================================================================

#[test]
fn test_scenario_a_exact_change() {
    let mut nav = navigator();
    let purchase = nav.buy(simit()).unwrap();
    assert_eq!(purchase.paid_with(), 10);
    assert_eq!(purchase.change(), 5);

    assert_eq!(nav.add_coin(Five).unwrap(), 5);
    let evaluation = nav.evaluate().unwrap();
    assert!(evaluation.is_correct());

    let book = nav.achievements();
    assert!(book.is_unlocked(AchievementId::ChangeMaster));
    assert!(book.is_unlocked(AchievementId::NoHintHero));
    assert!(!book.is_unlocked(AchievementId::CoinMix));
}

#[test]
fn test_scenario_b_too_much_without_evaluate() {
    let mut nav = navigator();
    nav.buy(simit()).unwrap();
    nav.drain_events();

    assert_eq!(nav.add_coin(Twenty).unwrap(), 20);
    assert_eq!(nav.round().unwrap().result(), Some(ChangeResult::TooMuch));
    assert_eq!(event_types(&mut nav), vec!["coin_added", "too_much"]);
    assert_eq!(nav.analytics().session_attempts(), 0);
}

#[test]
fn test_scenario_c_undo_purchase() {
    let mut nav = navigator();
    nav.buy(simit()).unwrap();
    nav.add_coin(One).unwrap();

    let undone = nav.undo().unwrap();
    assert_eq!(undone.product().name, "Simit");
    assert_eq!(nav.ledger().budget(), 50);
    assert!(nav.ledger().purchases().is_empty());
    assert!(nav.round().is_none());
    assert_eq!(nav.screen(), Screen::Canteen);

    assert_eq!(nav.undo(), Err(LedgerError::NothingToUndo));
    assert_eq!(nav.add_coin(One), Err(RoundError::NoActiveRound));
}

#[test]
fn test_scenario_d_merge_on_load() {
    let store = MemoryStore::with_record(PersistedRecord {
        budget: Some(50),
        unlocked_achievement_ids: vec!["first_purchase".to_string()],
        ..PersistedRecord::create()
    });
    let mut nav = Navigator::new(EngineConfig::default(), store).unwrap();
    nav.load();

    let book = nav.achievements();
    assert_eq!(book.len(), 6);
    assert_eq!(book.unlocked_ids(), vec!["first_purchase"]);
}

#[test]
fn test_scenario_e_history_keeps_ten_newest() {
    let mut nav = navigator();
    nav.save().unwrap(); // 0.0
    nav.buy(simit()).unwrap(); // 0.0
    nav.add_coin(Five).unwrap();
    nav.evaluate().unwrap(); // 1.0
    for _ in 0..8 {
        nav.save().unwrap(); // 1.0
    }

    let history = nav.analytics().history();
    assert_eq!(history.len(), 10);
    assert_eq!(history[0], 0.0);
    assert!(history[1..].iter().all(|&a| a == 1.0));
}

// ============================================================================
// Screen Flow
// ============================================================================

#[test]
fn test_first_launch_flow() {
    let mut nav = navigator();
    nav.load();
    assert_eq!(nav.screen(), Screen::Splash);

    nav.navigate(Screen::Story);
    nav.mark_tutorial_seen();
    nav.set_difficulty(Difficulty::Medium);
    nav.navigate(Screen::GoalPicker);
    nav.select_goal(SavingsGoal::find("book_set").unwrap());
    assert_eq!(nav.continue_from_goal_picker(), Screen::CoinIntro);
    assert_eq!(nav.finish_coin_intro(), Screen::Canteen);

    let purchase = nav.buy(Product::find("Water").unwrap()).unwrap();
    assert_eq!(purchase.paid_with(), 10);
    assert_eq!(nav.screen(), Screen::ChangeGame);

    nav.add_coin(Five).unwrap();
    for _ in 0..4 {
        nav.add_coin(One).unwrap();
    }
    assert!(nav.evaluate().unwrap().is_correct());
    assert_eq!(nav.continue_after_correct(), Some(Screen::Canteen));
}

#[test]
fn test_buy_event_order() {
    let mut nav = navigator();
    nav.navigate(Screen::Canteen);
    nav.drain_events();

    nav.buy(simit()).unwrap();
    assert_eq!(
        event_types(&mut nav),
        vec![
            "purchased",
            "achievement_unlocked",
            "achievement_unlocked",
            "achievement_unlocked",
            "screen_changed"
        ]
    );
}

#[test]
fn test_undo_outside_change_game_keeps_screen() {
    let mut nav = navigator();
    nav.buy(simit()).unwrap();
    nav.navigate(Screen::GoalSetting);
    nav.undo().unwrap();
    assert_eq!(nav.screen(), Screen::GoalSetting);
}

#[test]
fn test_evaluate_counts_every_attempt() {
    let mut nav = navigator();
    nav.buy(simit()).unwrap();

    assert_eq!(
        nav.evaluate().unwrap(),
        Evaluation::Incomplete { remaining: 5 }
    );
    nav.add_coin(Ten).unwrap();
    assert_eq!(nav.evaluate().unwrap(), Evaluation::TooMuch { over_by: 5 });
    nav.remove_coin(0).unwrap();
    nav.add_coin(Five).unwrap();
    assert!(nav.evaluate().unwrap().is_correct());

    let analytics = nav.analytics();
    assert_eq!(analytics.session_attempts(), 3);
    assert_eq!(analytics.session_correct(), 1);
    assert!((analytics.session_accuracy() - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(analytics.total_correct_change_saved(), 5);
}

#[test]
fn test_reset_starts_new_playthrough() {
    let mut nav = navigator();
    nav.set_difficulty(Difficulty::Hard);
    nav.select_goal(SavingsGoal::find("football").unwrap());
    nav.buy(simit()).unwrap();
    nav.add_coin(Ten).unwrap();
    nav.add_coin(Five).unwrap();
    nav.evaluate().unwrap();
    let session = nav.session();

    nav.reset();

    assert_eq!(nav.screen(), Screen::Splash);
    assert_eq!(nav.ledger().budget(), 50);
    assert!(nav.ledger().purchases().is_empty());
    assert!(nav.round().is_none());
    assert_eq!(nav.selected_goal(), None);
    assert_eq!(nav.difficulty(), Difficulty::Easy);
    assert_eq!(nav.games_played(), 1);
    assert_eq!(nav.analytics().session_attempts(), 0);
    assert_eq!(nav.analytics().total_attempts(), 1);
    assert_eq!(nav.achievements().unlocked_count(), 0);
    assert_ne!(nav.session(), session);
    assert!(nav
        .events()
        .iter()
        .any(|e| matches!(e, GameEvent::Reset { games_played: 1 })));
}

#[test]
fn test_hint_after_overshoot_says_too_many() {
    let mut nav = navigator();
    nav.buy(simit()).unwrap();
    nav.add_coin(Ten).unwrap();
    assert_eq!(
        nav.get_hint().unwrap(),
        "That's 5 too many. Try smaller coins!"
    );
    assert_eq!(nav.hint_text(), Some("That's 5 too many. Try smaller coins!"));
}
