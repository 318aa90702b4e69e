//! Item Entity
//!
//! A stocked inventory item: one row of the `items` table.

use serde::{Deserialize, Serialize};
use super::entity::{DomainError, DomainResult, Entity};

/// Identity value meaning "not yet assigned by the store"
pub const UNASSIGNED_ID: u32 = 0;

/// A stocked inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, assigned on insert (0 = unassigned)
    pub id: u32,
    /// Display name, not required to be unique
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Units currently in stock
    pub quantity: i32,
}

impl Item {
    /// Create an item whose id will be assigned by the store
    pub fn new(name: impl Into<String>, price: f64, quantity: i32) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Create an item with an explicit id
    pub fn with_id(id: u32, name: impl Into<String>, price: f64, quantity: i32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quantity,
        }
    }

    pub fn has_id(&self) -> bool {
        self.id != UNASSIGNED_ID
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity <= 0
    }

    /// Reject values the store cannot hold. SQLite binds NaN as NULL.
    pub fn check_storable(&self) -> DomainResult<()> {
        if !self.price.is_finite() {
            return Err(DomainError::InvalidInput(format!(
                "price of item {:?} is not a finite number",
                self.name
            )));
        }
        Ok(())
    }

    /// Price as a currency string, e.g. `$1,234.50`
    pub fn formatted_price(&self) -> String {
        format_currency(self.price)
    }
}

impl Entity for Item {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_creation() {
        let item = Item::new("Game", 100.0, 20);
        assert_eq!(item.id(), UNASSIGNED_ID);
        assert!(!item.has_id());
        assert_eq!(item.name, "Game");
    }

    #[test]
    fn test_out_of_stock() {
        assert!(Item::with_id(1, "Pen", 2.0, 0).is_out_of_stock());
        assert!(Item::with_id(1, "Pen", 2.0, -3).is_out_of_stock());
        assert!(!Item::with_id(1, "Pen", 2.0, 1).is_out_of_stock());
    }

    #[test]
    fn test_non_finite_price_not_storable() {
        assert!(Item::new("Pen", 2.5, 1).check_storable().is_ok());
        for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                Item::new("Pen", price, 1).check_storable(),
                Err(DomainError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_formatted_price() {
        assert_eq!(Item::new("a", 0.0, 0).formatted_price(), "$0.00");
        assert_eq!(Item::new("a", 100.0, 0).formatted_price(), "$100.00");
        assert_eq!(Item::new("a", 1234.5, 0).formatted_price(), "$1,234.50");
        assert_eq!(Item::new("a", 1234567.891, 0).formatted_price(), "$1,234,567.89");
        assert_eq!(Item::new("a", -2.5, 0).formatted_price(), "-$2.50");
    }
}
