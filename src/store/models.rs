//! Inventory records.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

/// A stored inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InventoryItem {
    /// Store-assigned identifier.
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    /// Unit price, persisted as `NUMERIC(18, 4)`.
    pub price: Decimal,
}

/// Payload for creating an item. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewInventoryItem {
    pub name: String,
    pub quantity: i32,
    /// Accepts a JSON number or a decimal string; strings are parsed exactly.
    #[serde(deserialize_with = "price_from_number_or_text")]
    pub price: Decimal,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceInput {
    Text(String),
    Number(f64),
}

fn price_from_number_or_text<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match PriceInput::deserialize(deserializer)? {
        PriceInput::Text(text) => text,
        // Shortest round-trip form, so 9.99 stays 9.99.
        PriceInput::Number(number) => number.to_string(),
    };
    Decimal::from_str(text.trim()).map_err(|e| de::Error::custom(format!("invalid price '{text}': {e}")))
}

impl NewInventoryItem {
    /// Required-field check. Runs before anything reaches the store.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        Ok(())
    }
}
