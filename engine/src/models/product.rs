//! Canteen products and difficulty levels
//!
//! Products are immutable catalog entries. Difficulty decides which round
//! note the player "pays" with, which in turn fixes the change target.

use serde::{Deserialize, Serialize};

/// Category color tag used by the presentation layer to tint a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Yellow,
    Blue,
    Orange,
    Brown,
    LightBlue,
    Chocolate,
}

/// A canteen menu entry
///
/// Prices are whole canteen coins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Name as printed on the menu (e.g., "Simit")
    pub name: String,

    /// Localized subtitle (e.g., "Sesame Ring")
    pub english_name: String,

    pub price: i64,

    pub color: ColorTag,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        english_name: impl Into<String>,
        price: i64,
        color: ColorTag,
    ) -> Self {
        debug_assert!(price > 0, "price must be positive");
        Self {
            name: name.into(),
            english_name: english_name.into(),
            price,
            color,
        }
    }

    /// The canteen menu
    pub fn menu() -> Vec<Product> {
        vec![
            Product::new("Simit", "Sesame Ring", 5, ColorTag::Yellow),
            Product::new("Ayran", "Yogurt Drink", 3, ColorTag::Blue),
            Product::new("Tost", "Grilled Sandwich", 10, ColorTag::Orange),
            Product::new("Poğaça", "Pastry", 7, ColorTag::Brown),
            Product::new("Water", "Still Water", 1, ColorTag::LightBlue),
            Product::new("Chocolate", "Chocolate Bar", 8, ColorTag::Chocolate),
        ]
    }

    /// Look up a menu item by either of its names, ignoring case
    ///
    /// # Example
    /// ```
    /// use canteen_change_core::Product;
    ///
    /// assert_eq!(Product::find("simit").unwrap().price, 5);
    /// assert_eq!(Product::find("Grilled Sandwich").unwrap().name, "Tost");
    /// assert!(Product::find("Pizza").is_none());
    /// ```
    pub fn find(name: &str) -> Option<Product> {
        let wanted = name.trim().to_lowercase();
        Self::menu().into_iter().find(|p| {
            p.name.to_lowercase() == wanted || p.english_name.to_lowercase() == wanted
        })
    }
}

/// Game difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Round notes the player pays with, ascending
    pub fn payment_denominations(self) -> &'static [i64] {
        match self {
            Difficulty::Easy => &[5, 10, 20, 50],
            Difficulty::Medium => &[10, 20, 50],
            Difficulty::Hard => &[20, 50, 100],
        }
    }

    /// Hints are hidden on hard
    pub fn shows_hint_button(self) -> bool {
        self != Difficulty::Hard
    }

    /// Amount handed over for an item of `price`
    ///
    /// Smallest payment denomination strictly greater than the price; when
    /// none exists, the price plus 20 on hard or plus 5 otherwise.
    ///
    /// # Example
    /// ```
    /// use canteen_change_core::Difficulty;
    ///
    /// assert_eq!(Difficulty::Easy.amount_paid_for(5), 10);
    /// assert_eq!(Difficulty::Medium.amount_paid_for(8), 10);
    /// assert_eq!(Difficulty::Easy.amount_paid_for(50), 55);
    /// assert_eq!(Difficulty::Hard.amount_paid_for(100), 120);
    /// ```
    pub fn amount_paid_for(self, price: i64) -> i64 {
        self.payment_denominations()
            .iter()
            .copied()
            .find(|&note| note > price)
            .unwrap_or_else(|| price + self.fallback_margin())
    }

    fn fallback_margin(self) -> i64 {
        match self {
            Difficulty::Hard => 20,
            _ => 5,
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_has_six_items() {
        let menu = Product::menu();
        assert_eq!(menu.len(), 6);
        assert!(menu.iter().all(|p| p.price > 0));
    }

    #[test]
    fn test_payment_is_strictly_greater_than_price() {
        // A price equal to a note pays with the next one up
        assert_eq!(Difficulty::Easy.amount_paid_for(10), 20);
        assert_eq!(Difficulty::Hard.amount_paid_for(20), 50);
        assert_eq!(Difficulty::Easy.amount_paid_for(1), 5);
    }

    #[test]
    fn test_every_menu_item_gives_positive_change() {
        for difficulty in Difficulty::ALL {
            for product in Product::menu() {
                let paid = difficulty.amount_paid_for(product.price);
                assert!(paid > product.price, "{:?} {}", difficulty, product.name);
            }
        }
    }

    #[test]
    fn test_hint_button_visibility() {
        assert!(Difficulty::Easy.shows_hint_button());
        assert!(Difficulty::Medium.shows_hint_button());
        assert!(!Difficulty::Hard.shows_hint_button());
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("Medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert!("extreme".parse::<Difficulty>().is_err());
    }
}
