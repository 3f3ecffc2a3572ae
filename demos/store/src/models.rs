//! The demo's data model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A product sold in the demo store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// The primary key.
    pub pk: i64,
    /// The product name.
    pub name: String,
    /// The price in cents.
    pub price_cents: i64,
    /// Whether the product is currently sold.
    pub active: bool,
}

impl Product {
    /// Serializes the product into the row shape the view layer consumes.
    pub fn to_row(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
