//! Engine configuration
//!
//! Every tunable the rules engine reads lives here: the starting budget,
//! the tray ceilings, the summary thresholds and the enrichment timeout.
//! Defaults reproduce the canteen game as shipped.
//!
//! Configuration can be loaded from JSON; missing fields fall back to the
//! defaults so partial files are fine.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::models::product::Difficulty;

/// Errors raised while loading or validating an [`EngineConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What a full game reset does with unlocked achievements.
///
/// The shipped game cleared them, which contradicts merge-on-load keeping
/// them forever. Both behaviors are available; the default keeps the
/// shipped one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Reassign the all-locked catalog before the reset save
    #[default]
    ClearAchievements,
    /// Carry unlocked achievements into the next playthrough
    KeepAchievements,
}

/// Complete engine configuration
///
/// # Example
/// ```
/// use canteen_change_core::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.starting_budget, 50);
/// assert_eq!(config.max_tray_coins, 40);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Coins the player starts every playthrough with
    pub starting_budget: i64,

    /// Maximum number of coins on the change tray
    pub max_tray_coins: usize,

    /// Tray sum may not exceed `change_target * tray_sum_multiplier`
    pub tray_sum_multiplier: i64,

    /// Number of session accuracy values kept in history
    pub history_capacity: usize,

    /// Go to Summary after a correct round once this many purchases exist
    pub summary_after_purchases: usize,

    /// Go to Summary after a correct round once the budget drops below this
    pub summary_below_budget: i64,

    /// Upper bound on a single enrichment call
    pub enrichment_timeout_ms: u64,

    pub reset_policy: ResetPolicy,

    /// Difficulty at startup and after every reset
    pub difficulty: Difficulty,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_budget: 50,
            max_tray_coins: 40,
            tray_sum_multiplier: 3,
            history_capacity: 10,
            summary_after_purchases: 3,
            summary_below_budget: 3,
            enrichment_timeout_ms: 5_000,
            reset_policy: ResetPolicy::default(),
            difficulty: Difficulty::Easy,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON, filling gaps with defaults, then validate it.
    ///
    /// # Example
    /// ```
    /// use canteen_change_core::{EngineConfig, ResetPolicy};
    ///
    /// let config = EngineConfig::from_json_str(
    ///     r#"{"starting_budget": 80, "reset_policy": "keep_achievements"}"#,
    /// ).unwrap();
    /// assert_eq!(config.starting_budget, 80);
    /// assert_eq!(config.reset_policy, ResetPolicy::KeepAchievements);
    /// assert_eq!(config.history_capacity, 10);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Check that every field is usable by the engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_budget <= 0 {
            return Err(ConfigError::Invalid(format!(
                "starting_budget must be positive, got {}",
                self.starting_budget
            )));
        }
        if self.max_tray_coins == 0 {
            return Err(ConfigError::Invalid(
                "max_tray_coins must be at least 1".to_string(),
            ));
        }
        if self.tray_sum_multiplier < 1 {
            return Err(ConfigError::Invalid(format!(
                "tray_sum_multiplier must be at least 1, got {}",
                self.tray_sum_multiplier
            )));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        if self.enrichment_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "enrichment_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_millis(self.enrichment_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_budget() {
        let config = EngineConfig {
            starting_budget: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_history_capacity() {
        let result = EngineConfig::from_json_str(r#"{"history_capacity": 0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_error_surfaces() {
        let result = EngineConfig::from_json_str("{not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_difficulty_parses_from_json() {
        let config = EngineConfig::from_json_str(r#"{"difficulty": "hard"}"#).unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.enrichment_timeout(), Duration::from_millis(5_000));
    }
}
