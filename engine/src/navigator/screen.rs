//! App screens

use serde::{Deserialize, Serialize};

/// Screen currently shown. The game starts on [`Screen::Splash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Splash,
    Story,
    GoalPicker,
    CoinIntro,
    Canteen,
    ChangeGame,
    Summary,
    GoalSetting,
}

impl Screen {
    pub const ALL: [Screen; 8] = [
        Screen::Splash,
        Screen::Story,
        Screen::GoalPicker,
        Screen::CoinIntro,
        Screen::Canteen,
        Screen::ChangeGame,
        Screen::Summary,
        Screen::GoalSetting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Splash => "splash",
            Screen::Story => "story",
            Screen::GoalPicker => "goal_picker",
            Screen::CoinIntro => "coin_intro",
            Screen::Canteen => "canteen",
            Screen::ChangeGame => "change_game",
            Screen::Summary => "summary",
            Screen::GoalSetting => "goal_setting",
        }
    }

    pub fn parse(name: &str) -> Option<Screen> {
        Screen::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matches_display() {
        for screen in Screen::ALL {
            assert_eq!(Screen::parse(&screen.to_string()), Some(screen));
        }
        assert_eq!(Screen::parse("lobby"), None);
        assert_eq!(Screen::default(), Screen::Splash);
    }
}
