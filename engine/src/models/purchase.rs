//! Purchase record
//!
//! Created on buy and never edited afterwards. The product is copied by
//! value so later catalog edits cannot rewrite history. A purchase only
//! leaves the log through undo, newest first.

use serde::{Deserialize, Serialize};

use super::product::Product;

/// One completed purchase
///
/// # Example
/// ```
/// use canteen_change_core::{Product, Purchase};
///
/// let simit = Product::find("Simit").unwrap();
/// let purchase = Purchase::new(simit, 10);
/// assert_eq!(purchase.change(), 5);
/// assert_eq!(purchase.price(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    product: Product,

    /// Coins the player handed over
    paid_with: i64,

    /// Correct change, `paid_with - product.price`
    change: i64,
}

impl Purchase {
    pub fn new(product: Product, paid_with: i64) -> Self {
        debug_assert!(
            paid_with >= product.price,
            "amount paid must cover the price"
        );
        let change = paid_with - product.price;
        Self {
            product,
            paid_with,
            change,
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn price(&self) -> i64 {
        self.product.price
    }

    pub fn paid_with(&self) -> i64 {
        self.paid_with
    }

    pub fn change(&self) -> i64 {
        self.change
    }

    /// Whether this record could have come from a real buy: a positive
    /// price, a payment strictly above it and the matching change.
    /// Decoded purchases skip [`Purchase::new`], so loads check this.
    pub fn is_consistent(&self) -> bool {
        self.product.price > 0
            && self.paid_with > self.product.price
            && self.change == self.paid_with - self.product.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::ColorTag;

    #[test]
    fn test_purchase_json_field_names() {
        let purchase = Purchase::new(Product::new("Ayran", "Yogurt Drink", 3, ColorTag::Blue), 5);
        let value = serde_json::to_value(&purchase).unwrap();
        assert_eq!(value["paidWith"], 5);
        assert_eq!(value["change"], 2);
        assert_eq!(value["product"]["englishName"], "Yogurt Drink");
    }

    #[test]
    fn test_decoded_purchase_consistency() {
        let ok: Purchase = serde_json::from_value(serde_json::json!({
            "product": {"name": "Tost", "englishName": "Grilled Sandwich", "price": 10, "color": "orange"},
            "paidWith": 20,
            "change": 10,
        }))
        .unwrap();
        assert!(ok.is_consistent());

        let wrong_change: Purchase = serde_json::from_value(serde_json::json!({
            "product": {"name": "Tost", "englishName": "Grilled Sandwich", "price": 10, "color": "orange"},
            "paidWith": 20,
            "change": 3,
        }))
        .unwrap();
        assert!(!wrong_change.is_consistent());

        let negative: Purchase = serde_json::from_value(serde_json::json!({
            "product": {"name": "Tost", "englishName": "Grilled Sandwich", "price": -10, "color": "orange"},
            "paidWith": 5,
            "change": 15,
        }))
        .unwrap();
        assert!(!negative.is_consistent());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "amount paid must cover the price")]
    fn test_underpayment_panics() {
        Purchase::new(Product::new("Tost", "Grilled Sandwich", 10, ColorTag::Orange), 5);
    }
}
