//! Item form state
//!
//! `ItemDetails` is the editable projection of an [`Item`]: price and
//! quantity stay as raw text so partially typed input survives until save.

use serde::{Deserialize, Serialize};
use super::item::{Item, UNASSIGNED_ID};

/// Editable text form of an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub id: u32,
    pub name: String,
    pub price: String,
    pub quantity: String,
}

impl ItemDetails {
    pub fn new(name: impl Into<String>, price: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            name: name.into(),
            price: price.into(),
            quantity: quantity.into(),
        }
    }

    /// Syntactic check only: all three fields contain a non-whitespace char.
    /// Price and quantity are not required to parse.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.price.trim().is_empty()
            && !self.quantity.trim().is_empty()
    }

    /// Parse into an [`Item`]; unparsable numbers become zero.
    pub fn to_item(&self) -> Item {
        Item {
            id: self.id,
            name: self.name.clone(),
            price: parse_price(&self.price),
            quantity: self.quantity.trim().parse::<i32>().unwrap_or(0),
        }
    }
}

// SQLite turns NaN into NULL, so non-finite input is treated like garbage.
fn parse_price(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
}

impl Item {
    pub fn to_item_details(&self) -> ItemDetails {
        ItemDetails {
            id: self.id,
            name: self.name.clone(),
            price: self.price.to_string(),
            quantity: self.quantity.to_string(),
        }
    }
}

impl From<&Item> for ItemDetails {
    fn from(item: &Item) -> Self {
        item.to_item_details()
    }
}

impl From<&ItemDetails> for Item {
    fn from(details: &ItemDetails) -> Self {
        details.to_item()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_syntactic() {
        assert!(!ItemDetails::new("", "10.00", "5").is_valid());
        assert!(ItemDetails::new("Pen", "10.00", "5").is_valid());
        assert!(ItemDetails::new("Pen", "abc", "five").is_valid());
        assert!(!ItemDetails::new("Pen", "   ", "5").is_valid());
        assert!(!ItemDetails::new("Pen", "1", "\t").is_valid());
    }

    #[test]
    fn test_unparsable_numbers_become_zero() {
        let item = ItemDetails::new("Pen", "ten", "5x").to_item();
        assert_eq!(item.price, 0.0);
        assert_eq!(item.quantity, 0);

        let item = ItemDetails::new("Pen", "NaN", "inf").to_item();
        assert_eq!(item.price, 0.0);
        assert_eq!(item.quantity, 0);
    }

    #[test]
    fn test_parsing_trims_whitespace() {
        let item = ItemDetails::new("Pen", " 2.50 ", " 7 ").to_item();
        assert_eq!(item.price, 2.5);
        assert_eq!(item.quantity, 7);
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let samples = [
            Item::with_id(7, "Game", 100.0, 20),
            Item::with_id(8, "Pen", 0.1 + 0.2, -1),
            Item::with_id(9, "  spaced name ", 1e-7, i32::MAX),
        ];
        for original in samples {
            let back = original.to_item_details().to_item();
            assert_eq!(back.id, original.id);
            assert_eq!(back.name, original.name);
            assert_eq!(back.price, original.price);
            assert_eq!(back.quantity, original.quantity);
        }
    }
}
