//! Persistence gateway
//!
//! Converts between the decoded [`GameSnapshot`] and the stored
//! [`PersistedRecord`], and reconciles persisted achievement ids against the
//! code catalog on load.

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::snapshot::{GameSnapshot, PersistedRecord};
use super::store::SnapshotStore;
use super::PersistenceError;
use crate::core::EngineConfig;
use crate::models::{AchievementBook, Purchase};

/// Save/load front for a [`SnapshotStore`]
pub struct PersistenceGateway {
    store: Box<dyn SnapshotStore>,
    starting_budget: i64,
    history_capacity: usize,
}

impl std::fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("starting_budget", &self.starting_budget)
            .field("history_capacity", &self.history_capacity)
            .finish_non_exhaustive()
    }
}

impl PersistenceGateway {
    pub fn new(store: impl SnapshotStore + 'static, config: &EngineConfig) -> Self {
        Self {
            store: Box::new(store),
            starting_budget: config.starting_budget,
            history_capacity: config.history_capacity,
        }
    }

    /// Write `snapshot` into the single record, creating it if absent.
    ///
    /// # Errors
    /// Returns the store error when the record cannot be committed. Callers
    /// treat this as non-fatal; the next save tries again.
    pub fn save(&mut self, snapshot: &GameSnapshot) -> Result<(), PersistenceError> {
        let mut record = match self.store.fetch() {
            Ok(Some(existing)) => existing,
            Ok(None) => PersistedRecord::create(),
            Err(PersistenceError::Codec(e)) => {
                warn!(error = %e, "stored record unreadable; replacing it");
                PersistedRecord::create()
            }
            Err(e) => return Err(e),
        };
        if record.record_id.is_nil() {
            record.record_id = Uuid::new_v4();
        }

        record.budget = Some(snapshot.budget);
        record.games_played = snapshot.games_played;
        record.tutorial_seen = snapshot.tutorial_seen;
        record.coin_intro_seen = snapshot.coin_intro_seen;
        record.unlocked_achievement_ids = snapshot
            .achievements
            .unlocked_ids()
            .into_iter()
            .map(str::to_string)
            .collect();
        record.purchases = serde_json::to_string(&snapshot.purchases)?;
        record.total_attempts = snapshot.total_attempts;
        record.total_correct_attempts = snapshot.total_correct_attempts;
        record.total_correct_change_saved = snapshot.total_correct_change_saved;
        record.session_accuracy_history = serde_json::to_string(&snapshot.session_accuracy_history)?;

        self.store.commit(&record)?;
        debug!(record_id = %record.record_id, budget = snapshot.budget, "snapshot saved");
        Ok(())
    }

    /// Load the saved snapshot, or defaults when nothing usable is stored.
    ///
    /// Never fails: any field that cannot be decoded takes its default and
    /// the rest of the record is still used.
    pub fn load(&self) -> GameSnapshot {
        match self.store.fetch() {
            Ok(Some(record)) => self.decode(record),
            Ok(None) => {
                debug!("no saved record; using defaults");
                GameSnapshot::defaults(self.starting_budget)
            }
            Err(e) => {
                warn!(error = %e, "load failed; using defaults");
                GameSnapshot::defaults(self.starting_budget)
            }
        }
    }

    /// Decode one record into a snapshot, field by field
    pub fn decode(&self, record: PersistedRecord) -> GameSnapshot {
        let defaults = GameSnapshot::defaults(self.starting_budget);

        let budget = match record.budget {
            Some(budget) if (0..=self.starting_budget).contains(&budget) => budget,
            Some(budget) => {
                warn!(
                    budget,
                    starting_budget = self.starting_budget,
                    "saved budget out of range; using starting budget"
                );
                defaults.budget
            }
            None => {
                debug!("no saved budget; using starting budget");
                defaults.budget
            }
        };

        let mut purchases = match serde_json::from_str::<Vec<Purchase>>(&record.purchases) {
            Ok(purchases) => purchases,
            Err(e) => {
                warn!(error = %e, "saved purchases failed to decode; starting with none");
                defaults.purchases
            }
        };
        let decoded = purchases.len();
        purchases.retain(Purchase::is_consistent);
        if purchases.len() != decoded {
            warn!(
                dropped = decoded - purchases.len(),
                "saved purchases with impossible amounts dropped"
            );
        }

        let mut history = match serde_json::from_str::<Vec<f64>>(&record.session_accuracy_history) {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "saved accuracy history failed to decode; starting empty");
                defaults.session_accuracy_history
            }
        };
        if history.len() > self.history_capacity {
            history.drain(..history.len() - self.history_capacity);
        }

        let achievements = merge_achievements(&record.unlocked_achievement_ids);

        info!(
            budget,
            purchases = purchases.len(),
            achievements = achievements.unlocked_count(),
            "snapshot loaded"
        );

        GameSnapshot {
            budget,
            games_played: record.games_played,
            tutorial_seen: record.tutorial_seen,
            coin_intro_seen: record.coin_intro_seen,
            achievements,
            purchases,
            total_attempts: record.total_attempts,
            total_correct_attempts: record.total_correct_attempts,
            total_correct_change_saved: record.total_correct_change_saved,
            session_accuracy_history: history,
        }
    }
}

/// Reconcile persisted unlocked ids with the code catalog.
///
/// Every catalog id is present in the result. Persisted ids the catalog no
/// longer has are dropped; catalog ids never persisted start locked.
///
/// # Example
/// ```
/// use canteen_change_core::persistence::gateway::merge_achievements;
/// use canteen_change_core::AchievementId;
///
/// let book = merge_achievements(&["first_purchase".to_string(), "old_badge".to_string()]);
/// assert_eq!(book.len(), 6);
/// assert!(book.is_unlocked(AchievementId::FirstPurchase));
/// assert_eq!(book.unlocked_count(), 1);
/// ```
pub fn merge_achievements(persisted: &[String]) -> AchievementBook {
    let (book, dropped) = AchievementBook::from_unlocked_ids(persisted.iter().map(String::as_str));
    if !dropped.is_empty() {
        info!(dropped = ?dropped, "saved achievements no longer in catalog");
    }
    book
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AchievementId, Difficulty, Product};
    use crate::persistence::MemoryStore;

    fn gateway(store: &MemoryStore) -> PersistenceGateway {
        PersistenceGateway::new(store.clone(), &EngineConfig::default())
    }

    #[test]
    fn test_load_without_record_gives_defaults() {
        let store = MemoryStore::new();
        let snapshot = gateway(&store).load();
        assert_eq!(snapshot, GameSnapshot::defaults(50));
    }

    #[test]
    fn test_save_keeps_record_id() {
        let store = MemoryStore::new();
        let mut gw = gateway(&store);
        gw.save(&GameSnapshot::defaults(50)).unwrap();
        let first_id = store.record().unwrap().record_id;
        assert!(!first_id.is_nil());

        let mut snapshot = GameSnapshot::defaults(50);
        snapshot.budget = 40;
        gw.save(&snapshot).unwrap();

        let record = store.record().unwrap();
        assert_eq!(record.record_id, first_id);
        assert_eq!(record.budget, Some(40));
    }

    #[test]
    fn test_bad_purchases_field_only_loses_purchases() {
        let record = PersistedRecord {
            budget: Some(30),
            purchases: "{broken".to_string(),
            unlocked_achievement_ids: vec!["change_master".to_string()],
            ..PersistedRecord::create()
        };
        let snapshot = gateway(&MemoryStore::with_record(record)).load();
        assert!(snapshot.purchases.is_empty());
        assert_eq!(snapshot.budget, 30);
        assert!(snapshot.achievements.is_unlocked(AchievementId::ChangeMaster));
    }

    #[test]
    fn test_out_of_range_budget_defaults() {
        let record = PersistedRecord {
            budget: Some(500),
            ..PersistedRecord::create()
        };
        assert_eq!(gateway(&MemoryStore::with_record(record)).load().budget, 50);
    }

    #[test]
    fn test_fetch_failure_gives_defaults() {
        let store = MemoryStore::with_record(PersistedRecord {
            budget: Some(10),
            ..PersistedRecord::create()
        });
        store.set_fail_fetches(true);
        assert_eq!(gateway(&store).load().budget, 50);
    }

    #[test]
    fn test_purchases_survive_roundtrip() {
        let store = MemoryStore::new();
        let mut gw = gateway(&store);
        let mut snapshot = GameSnapshot::defaults(50);
        let purchase = Purchase::new(
            Product::find("Tost").unwrap(),
            Difficulty::Easy.amount_paid_for(10),
        );
        snapshot.purchases = vec![purchase.clone()];
        snapshot.budget = 40;
        gw.save(&snapshot).unwrap();

        let loaded = gw.load();
        assert_eq!(loaded.purchases, vec![purchase]);
        assert_eq!(loaded.budget, 40);
    }

    #[test]
    fn test_long_history_trimmed_on_load() {
        let history: Vec<f64> = (0..14).map(|i| i as f64 / 14.0).collect();
        let record = PersistedRecord {
            session_accuracy_history: serde_json::to_string(&history).unwrap(),
            ..PersistedRecord::create()
        };
        let loaded = gateway(&MemoryStore::with_record(record)).load();
        assert_eq!(loaded.session_accuracy_history, history[4..].to_vec());
    }
}
