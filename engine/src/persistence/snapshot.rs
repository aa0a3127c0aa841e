//! Snapshot structures
//!
//! [`PersistedRecord`] is the single stored row, laid out field by field the
//! way it sits on disk. Purchases and the accuracy history are stored as
//! JSON-encoded strings inside the record so each can fail to decode on its
//! own.
//!
//! [`GameSnapshot`] is the decoded aggregate the navigator saves from and
//! loads into.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::{AchievementBook, Purchase};

// ============================================================================
// Stored Record
// ============================================================================

/// The one persisted record per installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedRecord {
    /// Assigned when the record is first created, kept on every update
    pub record_id: Uuid,

    /// `None` when absent or undecodable; load then uses the starting budget
    pub budget: Option<i64>,
    pub games_played: u32,
    pub tutorial_seen: bool,
    pub coin_intro_seen: bool,
    pub unlocked_achievement_ids: Vec<String>,

    /// JSON-encoded `Vec<Purchase>`
    pub purchases: String,

    pub total_attempts: u32,
    pub total_correct_attempts: u32,
    pub total_correct_change_saved: i64,

    /// JSON-encoded `Vec<f64>`
    pub session_accuracy_history: String,
}

impl Default for PersistedRecord {
    fn default() -> Self {
        Self {
            record_id: Uuid::nil(),
            budget: None,
            games_played: 0,
            tutorial_seen: false,
            coin_intro_seen: false,
            unlocked_achievement_ids: Vec::new(),
            purchases: "[]".to_string(),
            total_attempts: 0,
            total_correct_attempts: 0,
            total_correct_change_saved: 0,
            session_accuracy_history: "[]".to_string(),
        }
    }
}

impl PersistedRecord {
    /// Fresh record with a new id
    pub fn create() -> Self {
        Self {
            record_id: Uuid::new_v4(),
            ..Self::default()
        }
    }

    /// Decode a record field by field.
    ///
    /// A missing field takes its default silently. A present field that
    /// does not decode also takes its default, and its name is returned in
    /// the failure list. Only a non-object value fails the whole record.
    ///
    /// # Example
    /// ```
    /// use canteen_change_core::persistence::PersistedRecord;
    /// use serde_json::json;
    ///
    /// let (record, failed) = PersistedRecord::from_value_lenient(json!({
    ///     "budget": "lots",
    ///     "gamesPlayed": 3,
    /// })).unwrap();
    /// assert_eq!(record.games_played, 3);
    /// assert_eq!(record.budget, None);
    /// assert_eq!(failed, vec!["budget"]);
    /// ```
    pub fn from_value_lenient(value: Value) -> Option<(Self, Vec<&'static str>)> {
        let Value::Object(obj) = value else {
            return None;
        };
        let defaults = Self::default();
        let mut failed = Vec::new();

        let record = Self {
            record_id: field(&obj, "recordId", &mut failed).unwrap_or(defaults.record_id),
            budget: field(&obj, "budget", &mut failed).unwrap_or(defaults.budget),
            games_played: field(&obj, "gamesPlayed", &mut failed)
                .unwrap_or(defaults.games_played),
            tutorial_seen: field(&obj, "tutorialSeen", &mut failed)
                .unwrap_or(defaults.tutorial_seen),
            coin_intro_seen: field(&obj, "coinIntroSeen", &mut failed)
                .unwrap_or(defaults.coin_intro_seen),
            unlocked_achievement_ids: field(&obj, "unlockedAchievementIds", &mut failed)
                .unwrap_or(defaults.unlocked_achievement_ids),
            purchases: field(&obj, "purchases", &mut failed).unwrap_or(defaults.purchases),
            total_attempts: field(&obj, "totalAttempts", &mut failed)
                .unwrap_or(defaults.total_attempts),
            total_correct_attempts: field(&obj, "totalCorrectAttempts", &mut failed)
                .unwrap_or(defaults.total_correct_attempts),
            total_correct_change_saved: field(&obj, "totalCorrectChangeSaved", &mut failed)
                .unwrap_or(defaults.total_correct_change_saved),
            session_accuracy_history: field(&obj, "sessionAccuracyHistory", &mut failed)
                .unwrap_or(defaults.session_accuracy_history),
        };
        Some((record, failed))
    }
}

fn field<T: DeserializeOwned>(
    obj: &Map<String, Value>,
    key: &'static str,
    failed: &mut Vec<&'static str>,
) -> Option<T> {
    let value = obj.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(_) => {
            failed.push(key);
            None
        }
    }
}

// ============================================================================
// Decoded Aggregate
// ============================================================================

/// Everything the engine persists, decoded
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub budget: i64,
    pub games_played: u32,
    pub tutorial_seen: bool,
    pub coin_intro_seen: bool,
    pub achievements: AchievementBook,
    pub purchases: Vec<Purchase>,
    pub total_attempts: u32,
    pub total_correct_attempts: u32,
    pub total_correct_change_saved: i64,
    pub session_accuracy_history: Vec<f64>,
}

impl GameSnapshot {
    /// State of a first launch
    pub fn defaults(starting_budget: i64) -> Self {
        Self {
            budget: starting_budget,
            games_played: 0,
            tutorial_seen: false,
            coin_intro_seen: false,
            achievements: AchievementBook::catalog(),
            purchases: Vec::new(),
            total_attempts: 0,
            total_correct_attempts: 0,
            total_correct_change_saved: 0,
            session_accuracy_history: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_json_uses_camel_case() {
        let record = PersistedRecord::create();
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("unlockedAchievementIds").is_some());
        assert!(value.get("totalCorrectChangeSaved").is_some());
        assert_eq!(value["purchases"], "[]");
    }

    #[test]
    fn test_lenient_decode_rejects_non_object() {
        assert!(PersistedRecord::from_value_lenient(json!([1, 2, 3])).is_none());
    }

    #[test]
    fn test_lenient_decode_collects_every_bad_field() {
        let (record, failed) = PersistedRecord::from_value_lenient(json!({
            "recordId": "not-a-uuid",
            "budget": 42,
            "tutorialSeen": "yes",
            "unlockedAchievementIds": ["first_purchase"],
        }))
        .unwrap();
        assert_eq!(record.budget, Some(42));
        assert_eq!(record.unlocked_achievement_ids, vec!["first_purchase"]);
        assert!(!record.tutorial_seen);
        assert_eq!(failed, vec!["recordId", "tutorialSeen"]);
    }
}
