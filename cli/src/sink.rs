//! Terminal stand-in for haptics, speech and notifications

use std::io::Write;

use canteen_change_core::{AchievementBook, FeedbackSink, GameEvent};

/// Writes one line per engine event
pub struct TerminalSink<W: Write + Send> {
    out: W,
    catalog: AchievementBook,
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            catalog: AchievementBook::catalog(),
        }
    }

    fn describe(&self, event: &GameEvent) -> String {
        match event {
            GameEvent::CoinAdded { coin, tray_total } => {
                format!("  + {} coin (tray: {})", coin, tray_total)
            }
            GameEvent::CoinRemoved { coin, tray_total } => {
                format!("  - {} coin (tray: {})", coin, tray_total)
            }
            GameEvent::TooMuch {
                tray_total,
                change_target,
            } => format!(
                "  Too much! {} on the tray, change is only {}.",
                tray_total, change_target
            ),
            GameEvent::Correct { change_target } => format!(
                "  Correct! You gave {} coins change. Well done, Canteen Hero!",
                change_target
            ),
            GameEvent::AchievementUnlocked { id } => {
                let achievement = self.catalog.get(*id);
                format!(
                    "  * Achievement unlocked: {} {}",
                    achievement.title, achievement.subtitle
                )
            }
            GameEvent::Purchased {
                product,
                amount_paid,
                change_target,
            } => format!(
                "  Bought {} for {}. You paid {}, give back {} in change.",
                product.name, product.price, amount_paid, change_target
            ),
            GameEvent::GoalSelected {
                goal,
                sessions_needed,
            } => format!(
                "  Saving for {} ({} coins): about {} sessions.",
                goal.name, goal.cost, sessions_needed
            ),
            GameEvent::Undone { product } => format!("  Returned {}.", product.name),
            GameEvent::ScreenChanged { to, .. } => format!("[{}]", to),
            GameEvent::HintShown { text, .. } | GameEvent::HintEnriched { text, .. } => {
                format!("  Hint: {}", text)
            }
            GameEvent::FeedbackEnriched { text } => format!("  {}", text),
            GameEvent::Reset { games_played } => {
                format!("  New game! Games played so far: {}", games_played)
            }
        }
    }
}

impl<W: Write + Send> FeedbackSink for TerminalSink<W> {
    fn handle(&mut self, event: &GameEvent) {
        let line = self.describe(event);
        let _ = writeln!(self.out, "{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canteen_change_core::AchievementId;

    #[test]
    fn test_unlock_uses_catalog_title() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.handle(&GameEvent::AchievementUnlocked {
            id: AchievementId::CoinMix,
        });
        let text = String::from_utf8(sink.out).unwrap();
        assert!(text.starts_with("  * Achievement unlocked: Mix & Match!"));
    }
}
