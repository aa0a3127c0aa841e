//! Savings goals
//!
//! A goal is something the child might save up for. Picking one only
//! changes display math; it has no bearing on the ledger.

/// A savings target priced in canteen coins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavingsGoal {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: i64,
}

/// Returned when fewer than one coin per session is saved
pub const UNREACHABLE_SESSIONS: i64 = 999;

impl SavingsGoal {
    pub const ALL: [SavingsGoal; 6] = [
        SavingsGoal { id: "toy_car", name: "Toy Car", cost: 100 },
        SavingsGoal { id: "book_set", name: "Book Set", cost: 60 },
        SavingsGoal { id: "puzzle", name: "Puzzle", cost: 80 },
        SavingsGoal { id: "football", name: "Football", cost: 120 },
        SavingsGoal { id: "art_set", name: "Art Set", cost: 90 },
        SavingsGoal { id: "video_game", name: "Video Game", cost: 150 },
    ];

    pub fn find(id: &str) -> Option<SavingsGoal> {
        Self::ALL.iter().copied().find(|g| g.id == id)
    }

    /// Sessions needed to afford this goal, `ceil(cost / coins_per_session)`
    ///
    /// # Example
    /// ```
    /// use canteen_change_core::SavingsGoal;
    ///
    /// let puzzle = SavingsGoal::find("puzzle").unwrap();
    /// assert_eq!(puzzle.sessions_needed(45), 2);
    /// assert_eq!(puzzle.sessions_needed(40), 2);
    /// assert_eq!(puzzle.sessions_needed(0), 999);
    /// ```
    pub fn sessions_needed(&self, coins_per_session: i64) -> i64 {
        if coins_per_session <= 0 {
            return UNREACHABLE_SESSIONS;
        }
        (self.cost + coins_per_session - 1) / coins_per_session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_needed_rounds_up() {
        let toy_car = SavingsGoal::find("toy_car").unwrap();
        assert_eq!(toy_car.sessions_needed(1), 100);
        assert_eq!(toy_car.sessions_needed(33), 4);
        assert_eq!(toy_car.sessions_needed(100), 1);
        assert_eq!(toy_car.sessions_needed(150), 1);
        assert_eq!(toy_car.sessions_needed(-5), UNREACHABLE_SESSIONS);
    }

    #[test]
    fn test_find_unknown_goal() {
        assert!(SavingsGoal::find("pony").is_none());
    }
}
