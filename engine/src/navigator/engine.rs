//! Navigator - single owner of the game state
//!
//! Receives presentation intents (buy, add/remove coin, evaluate, undo,
//! reset), forwards them to the ledger and the active round, feeds the
//! outcomes to the achievement rules and analytics, records events and
//! saves.
//!
//! # Intent flow
//!
//! ```text
//! intent -> ledger / round -> achievements + analytics -> events -> save
//! ```
//!
//! Every method takes `&mut self`, so mutations are serialized by
//! ownership. Shared async access goes through
//! [`SharedNavigator`](super::shared::SharedNavigator).

use tracing::{debug, info, warn};

use super::screen::Screen;
use crate::analytics::AnalyticsAggregator;
use crate::core::{ConfigError, EngineConfig, ResetPolicy};
use crate::hints::{
    EnrichmentReply, EnrichmentRequest, FeedbackPrompt, HintAdvisor, HintPrompt, SessionId,
};
use crate::models::{
    AchievementBook, AchievementId, BudgetLedger, CoinDenomination, Difficulty, EventLog,
    Evaluation, GameEvent, LedgerError, Product, Purchase, Round, RoundError, RoundId,
    SavingsGoal, TrayLimits,
};
use crate::persistence::{GameSnapshot, PersistenceError, PersistenceGateway, SnapshotStore};
use crate::rules::{AchievementEngine, RuleContext, Trigger};

// ============================================================================
// Navigator
// ============================================================================

/// Game state owner and screen state machine
pub struct Navigator {
    config: EngineConfig,

    /// Screen currently shown
    screen: Screen,

    difficulty: Difficulty,

    ledger: BudgetLedger,

    /// Open change-making round, if any
    round: Option<Round>,

    /// Counter for generating unique round ids
    next_round_id: u64,

    achievements: AchievementEngine,

    /// Achievements unlocked since the last purchase or reset
    newly_unlocked: Vec<AchievementId>,

    analytics: AnalyticsAggregator,

    gateway: PersistenceGateway,

    advisor: HintAdvisor,

    /// Pending events for the presentation layer
    event_log: EventLog,

    selected_goal: Option<SavingsGoal>,

    games_played: u32,
    tutorial_seen: bool,
    coin_intro_seen: bool,

    /// Bumped by every reset; tags feedback enrichment
    session: SessionId,
}

impl Navigator {
    /// Create a navigator on the Splash screen with first-launch state.
    ///
    /// Nothing is read from `store` until [`Navigator::load`] is called.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] when `config` fails validation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use canteen_change_core::navigator::{Navigator, Screen};
    /// use canteen_change_core::persistence::MemoryStore;
    /// use canteen_change_core::{EngineConfig, Product};
    ///
    /// let mut nav = Navigator::new(EngineConfig::default(), MemoryStore::new()).unwrap();
    /// nav.load();
    /// assert_eq!(nav.screen(), Screen::Splash);
    ///
    /// let purchase = nav.buy(Product::find("Simit").unwrap()).unwrap();
    /// assert_eq!(purchase.change(), 5);
    /// assert_eq!(nav.screen(), Screen::ChangeGame);
    /// ```
    pub fn new(
        config: EngineConfig,
        store: impl SnapshotStore + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            screen: Screen::Splash,
            difficulty: config.difficulty,
            ledger: BudgetLedger::new(config.starting_budget),
            round: None,
            next_round_id: 1,
            achievements: AchievementEngine::new(),
            newly_unlocked: Vec::new(),
            analytics: AnalyticsAggregator::new(config.history_capacity),
            gateway: PersistenceGateway::new(store, &config),
            advisor: HintAdvisor::new(),
            event_log: EventLog::new(),
            selected_goal: None,
            games_played: 0,
            tutorial_seen: false,
            coin_intro_seen: false,
            session: SessionId(0),
            config,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn ledger(&self) -> &BudgetLedger {
        &self.ledger
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn achievements(&self) -> &AchievementBook {
        self.achievements.book()
    }

    /// Achievements unlocked since the last purchase or reset
    pub fn newly_unlocked(&self) -> &[AchievementId] {
        &self.newly_unlocked
    }

    pub fn analytics(&self) -> &AnalyticsAggregator {
        &self.analytics
    }

    pub fn selected_goal(&self) -> Option<SavingsGoal> {
        self.selected_goal
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn tutorial_seen(&self) -> bool {
        self.tutorial_seen
    }

    pub fn coin_intro_seen(&self) -> bool {
        self.coin_intro_seen
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Hint text on screen for the live round
    pub fn hint_text(&self) -> Option<&str> {
        let live = self.live_round_id()?;
        self.advisor
            .hint()
            .filter(|shown| shown.owner.round == live)
            .map(|shown| shown.text.as_str())
    }

    /// Summary feedback on screen for this session
    pub fn feedback_text(&self) -> Option<&str> {
        self.advisor
            .feedback()
            .filter(|shown| shown.owner == self.session)
            .map(|shown| shown.text.as_str())
    }

    pub fn events(&self) -> &[GameEvent] {
        self.event_log.events()
    }

    /// Take every pending event for dispatch
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.event_log.drain()
    }

    fn live_round_id(&self) -> Option<RoundId> {
        self.round.as_ref().map(Round::id)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Move to `to`. Entering Summary re-checks the saver achievements and
    /// refreshes the session feedback.
    pub fn navigate(&mut self, to: Screen) -> Screen {
        let from = self.screen;
        if from != to {
            self.screen = to;
            self.event_log.log(GameEvent::ScreenChanged { from, to });
            debug!(%from, %to, "screen changed");
        }
        if to == Screen::Summary {
            self.enter_summary();
        }
        self.screen
    }

    fn enter_summary(&mut self) {
        self.run_rules(Trigger::SummaryEntered, None);
        self.advisor
            .show_feedback(self.session, self.analytics.session_accuracy());
    }

    /// Leave GoalPicker: straight to the canteen once the coin intro was
    /// seen, otherwise through the intro first
    pub fn continue_from_goal_picker(&mut self) -> Screen {
        let next = if self.coin_intro_seen {
            Screen::Canteen
        } else {
            Screen::CoinIntro
        };
        self.navigate(next)
    }

    /// Mark the coin intro seen and open the canteen
    pub fn finish_coin_intro(&mut self) -> Screen {
        self.mark_coin_intro_seen();
        self.navigate(Screen::Canteen)
    }

    /// Leave a correctly solved round.
    ///
    /// Goes to Summary once enough purchases were made or the budget runs
    /// low, otherwise back to the canteen. Returns `None` without moving
    /// when the round is not resolved.
    pub fn continue_after_correct(&mut self) -> Option<Screen> {
        if !self.round.as_ref().is_some_and(Round::is_resolved) {
            return None;
        }
        self.round = None;
        self.advisor.clear_hint();

        let next = if self.ledger.purchases().len() >= self.config.summary_after_purchases
            || self.ledger.budget() < self.config.summary_below_budget
        {
            Screen::Summary
        } else {
            Screen::Canteen
        };
        Some(self.navigate(next))
    }

    pub fn mark_tutorial_seen(&mut self) {
        if !self.tutorial_seen {
            self.tutorial_seen = true;
            self.persist();
        }
    }

    pub fn mark_coin_intro_seen(&mut self) {
        if !self.coin_intro_seen {
            self.coin_intro_seen = true;
            self.persist();
        }
    }

    /// Difficulty for the next purchase. The open round keeps its target.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        debug!(?difficulty, "difficulty set");
        self.difficulty = difficulty;
    }

    // ========================================================================
    // Purchases
    // ========================================================================

    /// Buy `product` and open a change-making round for it.
    ///
    /// Any previous round is discarded. Runs the purchase achievements and
    /// moves to the ChangeGame screen.
    ///
    /// # Errors
    /// [`LedgerError::InsufficientFunds`] when the budget is below the
    /// price. Nothing changes.
    pub fn buy(&mut self, product: Product) -> Result<Purchase, LedgerError> {
        let purchase = self.ledger.buy(product, self.difficulty)?;

        let id = RoundId(self.next_round_id);
        self.next_round_id += 1;
        self.round = Some(Round::new(
            id,
            purchase.change(),
            TrayLimits::from(&self.config),
        ));
        self.advisor.clear_hint();
        self.newly_unlocked.clear();

        self.event_log.log(GameEvent::Purchased {
            product: purchase.product().clone(),
            amount_paid: purchase.paid_with(),
            change_target: purchase.change(),
        });
        self.run_rules(Trigger::AfterPurchase, None);
        self.navigate(Screen::ChangeGame);
        self.persist();

        debug!(round = %id, change_target = purchase.change(), "round opened");
        Ok(purchase)
    }

    /// Refund the last purchase and discard the open round.
    ///
    /// # Errors
    /// [`LedgerError::NothingToUndo`] when there is no purchase.
    pub fn undo(&mut self) -> Result<Purchase, LedgerError> {
        let undone = self.ledger.undo_last()?;

        self.round = None;
        self.advisor.clear_hint();
        self.event_log.log(GameEvent::Undone {
            product: undone.product().clone(),
        });
        if self.screen == Screen::ChangeGame {
            self.navigate(Screen::Canteen);
        }
        self.persist();
        Ok(undone)
    }

    /// Pick a savings goal. Returns the sessions needed at the current
    /// saving rate (at least one coin per session).
    pub fn select_goal(&mut self, goal: SavingsGoal) -> i64 {
        let sessions_needed = goal.sessions_needed(self.ledger.coins_saved().max(1));
        self.selected_goal = Some(goal);
        self.event_log.log(GameEvent::GoalSelected {
            goal,
            sessions_needed,
        });
        debug!(goal = goal.id, sessions_needed, "goal selected");
        sessions_needed
    }

    // ========================================================================
    // Change Tray
    // ========================================================================

    fn active_round(&mut self) -> Result<&mut Round, RoundError> {
        self.round.as_mut().ok_or(RoundError::NoActiveRound)
    }

    /// Place a coin on the tray. Returns the new tray total.
    ///
    /// # Errors
    /// - [`RoundError::NoActiveRound`] without a purchase
    /// - [`RoundError::OverLimit`] when a tray ceiling would break
    /// - [`RoundError::AlreadyResolved`] after a correct evaluation
    pub fn add_coin(&mut self, coin: CoinDenomination) -> Result<i64, RoundError> {
        let round = self.active_round()?;
        let tray_total = round.add_coin(coin)?;
        let change_target = round.change_target();

        self.event_log.log(GameEvent::CoinAdded { coin, tray_total });
        if tray_total > change_target {
            self.event_log.log(GameEvent::TooMuch {
                tray_total,
                change_target,
            });
        }
        Ok(tray_total)
    }

    /// Take the coin at `index` off the tray
    pub fn remove_coin(&mut self, index: usize) -> Result<CoinDenomination, RoundError> {
        let round = self.active_round()?;
        let coin = round.remove_coin(index)?;
        let tray_total = round.selected_total();

        self.event_log.log(GameEvent::CoinRemoved { coin, tray_total });
        Ok(coin)
    }

    /// Empty the tray and drop the displayed hint
    pub fn clear(&mut self) -> Result<(), RoundError> {
        self.active_round()?.clear()?;
        self.advisor.clear_hint();
        Ok(())
    }

    /// Confirm the tray.
    ///
    /// Every call counts as an attempt. A correct tray resolves the round,
    /// adds its target to the lifetime change total and runs the evaluate
    /// achievements.
    pub fn evaluate(&mut self) -> Result<Evaluation, RoundError> {
        let evaluation = self.active_round()?.evaluate()?;
        self.analytics.record(&evaluation);

        match &evaluation {
            Evaluation::Correct { change_target, .. } => {
                self.event_log.log(GameEvent::Correct {
                    change_target: *change_target,
                });
                self.run_rules(Trigger::AfterEvaluate, Some(&evaluation));
            }
            Evaluation::TooMuch { over_by } => {
                if let Some(round) = &self.round {
                    self.event_log.log(GameEvent::TooMuch {
                        tray_total: round.change_target() + over_by,
                        change_target: round.change_target(),
                    });
                }
            }
            Evaluation::Incomplete { remaining } => {
                debug!(remaining, "evaluated below target");
            }
        }

        self.persist();
        Ok(evaluation)
    }

    /// Ask for a hint on the live round.
    ///
    /// Marks the round as hinted for good and returns the deterministic
    /// text. An enrichment may replace it later, see
    /// [`Navigator::hint_enrichment_request`].
    pub fn get_hint(&mut self) -> Result<String, RoundError> {
        let round = self.active_round()?;
        round.request_hint();
        let id = round.id();
        let remaining = round.remaining();

        let text = self.advisor.show_hint(id, remaining);
        self.event_log.log(GameEvent::HintShown {
            round: id,
            text: text.clone(),
        });
        Ok(text)
    }

    /// Enrichment request for the displayed hint, when one is worth making
    pub fn hint_enrichment_request(&self) -> Option<EnrichmentRequest> {
        let round = self.round.as_ref()?;
        let shown = self.advisor.hint()?;
        if shown.owner.round != round.id() || shown.enriched || round.remaining() <= 0 {
            return None;
        }
        Some(EnrichmentRequest::Hint {
            ticket: shown.owner,
            prompt: HintPrompt {
                remaining: round.remaining(),
                coins: round.coins().to_vec(),
            },
        })
    }

    /// Enrichment request for the displayed summary feedback
    pub fn feedback_enrichment_request(&self) -> Option<EnrichmentRequest> {
        let shown = self.advisor.feedback()?;
        if shown.owner != self.session || shown.enriched {
            return None;
        }
        Some(EnrichmentRequest::Feedback {
            session: self.session,
            prompt: FeedbackPrompt {
                session_correct: self.analytics.session_correct(),
                session_attempts: self.analytics.session_attempts(),
                total_correct_change_saved: self.analytics.total_correct_change_saved(),
                games_played: self.games_played,
            },
        })
    }

    /// Apply an enrichment reply. Stale replies are dropped.
    pub fn apply_enrichment(&mut self, reply: EnrichmentReply) -> bool {
        let event = match &reply {
            EnrichmentReply::Hint { ticket, text } => GameEvent::HintEnriched {
                round: ticket.round,
                text: text.clone(),
            },
            EnrichmentReply::Feedback { text, .. } => GameEvent::FeedbackEnriched { text: text.clone() },
        };

        let applied = self
            .advisor
            .accept(reply, self.live_round_id(), self.session);
        if applied {
            self.event_log.log(event);
        } else {
            warn!(
                event = event.event_type(),
                live_round = ?self.live_round_id(),
                session = self.session.0,
                "stale enrichment discarded"
            );
        }
        applied
    }

    // ========================================================================
    // Achievements
    // ========================================================================

    fn run_rules(&mut self, trigger: Trigger, evaluation: Option<&Evaluation>) {
        let mut ctx = RuleContext::from_ledger(&self.ledger);
        if let Some(evaluation) = evaluation {
            ctx = ctx.with_evaluation(evaluation);
        }
        for id in self.achievements.check(trigger, &ctx) {
            info!(%id, ?trigger, "achievement unlocked");
            self.newly_unlocked.push(id);
            self.event_log.log(GameEvent::AchievementUnlocked { id });
        }
    }

    // ========================================================================
    // Reset, Save, Load
    // ========================================================================

    /// Start a new playthrough.
    ///
    /// Restores the budget, clears purchases, the round, the goal and the
    /// session counters, counts one more game played and returns to
    /// Splash. Achievements follow the configured [`ResetPolicy`].
    /// Lifetime analytics survive.
    pub fn reset(&mut self) {
        self.ledger.reset();
        self.round = None;
        self.selected_goal = None;
        self.difficulty = self.config.difficulty;
        self.newly_unlocked.clear();
        self.advisor.clear();
        self.analytics.reset_session();
        self.session = SessionId(self.session.0 + 1);
        self.games_played += 1;

        match self.config.reset_policy {
            ResetPolicy::ClearAchievements => {
                let cleared = self.achievements.book().unlocked_ids();
                if !cleared.is_empty() {
                    warn!(cleared = ?cleared, "reset clears unlocked achievements");
                }
                self.achievements.clear();
            }
            ResetPolicy::KeepAchievements => {}
        }

        info!(games_played = self.games_played, "game reset");
        self.event_log.log(GameEvent::Reset {
            games_played: self.games_played,
        });
        self.navigate(Screen::Splash);
        self.persist();
    }

    /// Current state as a persistable snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            budget: self.ledger.budget(),
            games_played: self.games_played,
            tutorial_seen: self.tutorial_seen,
            coin_intro_seen: self.coin_intro_seen,
            achievements: self.achievements.book().clone(),
            purchases: self.ledger.purchases().to_vec(),
            total_attempts: self.analytics.total_attempts(),
            total_correct_attempts: self.analytics.total_correct(),
            total_correct_change_saved: self.analytics.total_correct_change_saved(),
            session_accuracy_history: self.analytics.history(),
        }
    }

    /// Push the session accuracy onto the history and write the snapshot.
    ///
    /// # Errors
    /// The store's error when the commit fails. State in memory is kept and
    /// the next save retries.
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        self.analytics.push_session_accuracy();
        let snapshot = self.snapshot();
        self.gateway.save(&snapshot)
    }

    /// Save after a mutation; a failed commit is logged and dropped
    fn persist(&mut self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "save failed; will retry on next change");
        }
    }

    /// Replace persisted state with what the store holds.
    ///
    /// Never fails. Session counters start at zero and no round is open.
    pub fn load(&mut self) {
        let snapshot = self.gateway.load();

        self.ledger = BudgetLedger::from_snapshot(
            self.config.starting_budget,
            snapshot.budget,
            snapshot.purchases,
        );
        self.achievements = AchievementEngine::with_book(snapshot.achievements);
        self.analytics = AnalyticsAggregator::from_lifetime(
            self.config.history_capacity,
            snapshot.total_attempts,
            snapshot.total_correct_attempts,
            snapshot.total_correct_change_saved,
            snapshot.session_accuracy_history,
        );
        self.games_played = snapshot.games_played;
        self.tutorial_seen = snapshot.tutorial_seen;
        self.coin_intro_seen = snapshot.coin_intro_seen;
        self.round = None;
        self.newly_unlocked.clear();
        self.advisor.clear_hint();
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("screen", &self.screen)
            .field("budget", &self.ledger.budget())
            .field("purchases", &self.ledger.purchases().len())
            .field("round", &self.live_round_id())
            .field("games_played", &self.games_played)
            .field("pending_events", &self.event_log.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
