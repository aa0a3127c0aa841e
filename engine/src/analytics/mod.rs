//! Learning analytics
//!
//! Session counters cover the current playthrough and reset with the game.
//! Lifetime counters and the accuracy history survive resets.
//!
//! # Critical Invariants
//!
//! 1. `history().len() <= capacity` after any number of pushes
//! 2. Every evaluate counts as an attempt, whatever its outcome

use std::collections::VecDeque;

use crate::models::Evaluation;

/// Session and lifetime counters plus bounded accuracy history
///
/// # Example
/// ```
/// use canteen_change_core::AnalyticsAggregator;
/// use canteen_change_core::models::Evaluation;
///
/// let mut analytics = AnalyticsAggregator::new(10);
/// analytics.record(&Evaluation::Incomplete { remaining: 2 });
/// analytics.record(&Evaluation::Correct {
///     change_target: 5,
///     hint_requested: false,
///     distinct_denominations: 1,
/// });
/// assert_eq!(analytics.session_accuracy(), 0.5);
/// assert_eq!(analytics.total_correct_change_saved(), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsAggregator {
    session_attempts: u32,
    session_correct: u32,
    total_attempts: u32,
    total_correct: u32,
    /// Lifetime sum of correctly computed change (social-impact total)
    total_correct_change_saved: i64,
    history: VecDeque<f64>,
    capacity: usize,
}

impl AnalyticsAggregator {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "history capacity must be positive");
        Self {
            session_attempts: 0,
            session_correct: 0,
            total_attempts: 0,
            total_correct: 0,
            total_correct_change_saved: 0,
            history: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Rebuild from persisted lifetime values. Session counters start at 0.
    ///
    /// A history longer than `capacity` keeps only its newest entries.
    pub fn from_lifetime(
        capacity: usize,
        total_attempts: u32,
        total_correct: u32,
        total_correct_change_saved: i64,
        history: Vec<f64>,
    ) -> Self {
        let mut analytics = Self::new(capacity);
        analytics.total_attempts = total_attempts;
        analytics.total_correct = total_correct;
        analytics.total_correct_change_saved = total_correct_change_saved;
        for value in history {
            analytics.push_bounded(value);
        }
        analytics
    }

    /// Count one evaluate call
    pub fn record(&mut self, evaluation: &Evaluation) {
        self.session_attempts += 1;
        self.total_attempts += 1;

        if let Evaluation::Correct { change_target, .. } = evaluation {
            self.session_correct += 1;
            self.total_correct += 1;
            self.total_correct_change_saved += change_target;
        }
    }

    pub fn session_attempts(&self) -> u32 {
        self.session_attempts
    }

    pub fn session_correct(&self) -> u32 {
        self.session_correct
    }

    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    pub fn total_correct_change_saved(&self) -> i64 {
        self.total_correct_change_saved
    }

    /// `session_correct / session_attempts`, 0 without attempts
    pub fn session_accuracy(&self) -> f64 {
        ratio(self.session_correct, self.session_attempts)
    }

    /// `total_correct / total_attempts`, 0 without attempts
    pub fn lifetime_accuracy(&self) -> f64 {
        ratio(self.total_correct, self.total_attempts)
    }

    /// Accuracy history, oldest first
    pub fn history(&self) -> Vec<f64> {
        self.history.iter().copied().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append the current session accuracy. Called on every save.
    pub fn push_session_accuracy(&mut self) {
        self.push_bounded(self.session_accuracy());
    }

    fn push_bounded(&mut self, value: f64) {
        self.history.push_back(value);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    /// Start a new session. Lifetime counters and history are kept.
    pub fn reset_session(&mut self) {
        self.session_attempts = 0;
        self.session_correct = 0;
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correct(target: i64) -> Evaluation {
        Evaluation::Correct {
            change_target: target,
            hint_requested: false,
            distinct_denominations: 1,
        }
    }

    #[test]
    fn test_accuracy_zero_without_attempts() {
        let analytics = AnalyticsAggregator::new(10);
        assert_eq!(analytics.session_accuracy(), 0.0);
        assert_eq!(analytics.lifetime_accuracy(), 0.0);
    }

    #[test]
    fn test_too_much_counts_attempt_only() {
        let mut analytics = AnalyticsAggregator::new(10);
        analytics.record(&Evaluation::TooMuch { over_by: 4 });
        assert_eq!(analytics.session_attempts(), 1);
        assert_eq!(analytics.total_attempts(), 1);
        assert_eq!(analytics.session_correct(), 0);
        assert_eq!(analytics.total_correct_change_saved(), 0);
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut analytics = AnalyticsAggregator::new(3);
        for i in 0..5 {
            analytics.record(&if i % 2 == 0 {
                correct(1)
            } else {
                Evaluation::Incomplete { remaining: 1 }
            });
            analytics.push_session_accuracy();
        }
        let history = analytics.history();
        assert_eq!(history.len(), 3);
        // attempts 3..=5 -> 2/3, 2/4, 3/5
        assert!((history[0] - 2.0 / 3.0).abs() < 1e-9);
        assert!((history[1] - 0.5).abs() < 1e-9);
        assert!((history[2] - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_reset_session_keeps_lifetime() {
        let mut analytics = AnalyticsAggregator::new(10);
        analytics.record(&correct(5));
        analytics.push_session_accuracy();
        analytics.reset_session();

        assert_eq!(analytics.session_attempts(), 0);
        assert_eq!(analytics.total_attempts(), 1);
        assert_eq!(analytics.total_correct_change_saved(), 5);
        assert_eq!(analytics.history(), vec![1.0]);
    }

    #[test]
    fn test_from_lifetime_trims_long_history() {
        let analytics =
            AnalyticsAggregator::from_lifetime(2, 4, 3, 17, vec![0.1, 0.2, 0.3, 0.4]);
        assert_eq!(analytics.history(), vec![0.3, 0.4]);
        assert_eq!(analytics.lifetime_accuracy(), 0.75);
    }
}
