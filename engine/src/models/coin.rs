//! Coin denominations
//!
//! The four face values a child can place on the change tray.
//! Display metadata (colors, sizes) belongs to the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A coin face value
///
/// # Example
/// ```
/// use canteen_change_core::CoinDenomination;
///
/// assert_eq!(CoinDenomination::Ten.value(), 10);
/// assert_eq!(CoinDenomination::try_from(5), Ok(CoinDenomination::Five));
/// assert!(CoinDenomination::try_from(2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum CoinDenomination {
    One,
    Five,
    Ten,
    Twenty,
}

impl CoinDenomination {
    /// All denominations, ascending
    pub const ALL: [CoinDenomination; 4] = [
        CoinDenomination::One,
        CoinDenomination::Five,
        CoinDenomination::Ten,
        CoinDenomination::Twenty,
    ];

    pub const fn value(self) -> i64 {
        match self {
            CoinDenomination::One => 1,
            CoinDenomination::Five => 5,
            CoinDenomination::Ten => 10,
            CoinDenomination::Twenty => 20,
        }
    }

    /// Largest denomination not exceeding `amount`, if any
    ///
    /// # Example
    /// ```
    /// use canteen_change_core::CoinDenomination;
    ///
    /// assert_eq!(CoinDenomination::largest_at_most(7), Some(CoinDenomination::Five));
    /// assert_eq!(CoinDenomination::largest_at_most(0), None);
    /// ```
    pub fn largest_at_most(amount: i64) -> Option<CoinDenomination> {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|coin| coin.value() <= amount)
    }
}

impl TryFrom<i64> for CoinDenomination {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|coin| coin.value() == value)
            .ok_or_else(|| format!("not a coin denomination: {}", value))
    }
}

impl From<CoinDenomination> for i64 {
    fn from(coin: CoinDenomination) -> Self {
        coin.value()
    }
}

impl fmt::Display for CoinDenomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_largest_at_most_picks_biggest_fitting_coin() {
        assert_eq!(CoinDenomination::largest_at_most(1), Some(CoinDenomination::One));
        assert_eq!(CoinDenomination::largest_at_most(19), Some(CoinDenomination::Ten));
        assert_eq!(CoinDenomination::largest_at_most(45), Some(CoinDenomination::Twenty));
        assert_eq!(CoinDenomination::largest_at_most(-3), None);
    }

    #[test]
    fn test_serde_uses_face_value() {
        let json = serde_json::to_string(&vec![CoinDenomination::Five, CoinDenomination::Twenty]).unwrap();
        assert_eq!(json, "[5,20]");
        let back: Vec<CoinDenomination> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![CoinDenomination::Five, CoinDenomination::Twenty]);
        assert!(serde_json::from_str::<CoinDenomination>("3").is_err());
    }
}
