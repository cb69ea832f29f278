//! Goods (stocked inventory items)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::stock::{classify_stock, GoodDefaults, StockLevel};

/// A stocked inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Good {
    pub id: i64,
    pub name: String,
    /// Units on hand, never negative
    pub quantity: i32,
    pub unit_price: Decimal,
    pub category: String,
    pub supplier_id: Option<i64>,
    pub low_stock_threshold: i32,
    pub high_stock_threshold: i32,
    pub created_at: DateTime<Utc>,
}

impl Good {
    /// Value of the units on hand
    pub fn stock_value(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }

    pub fn stock_level(&self) -> StockLevel {
        classify_stock(
            self.quantity,
            self.low_stock_threshold,
            self.high_stock_threshold,
        )
    }
}

/// A good ready to be inserted, with every default resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGood {
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub category: String,
    pub supplier_id: Option<i64>,
    pub low_stock_threshold: i32,
    pub high_stock_threshold: i32,
}

/// Input for creating a good from the goods form
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGoodInput {
    pub name: String,
    #[serde(default)]
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
    pub category: Option<String>,
    pub supplier_id: Option<i64>,
    pub low_stock_threshold: Option<i32>,
    pub high_stock_threshold: Option<i32>,
}

impl CreateGoodInput {
    /// Fill unset fields from the configured defaults
    pub fn into_new_good(self, defaults: &GoodDefaults) -> NewGood {
        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| defaults.category.clone());

        NewGood {
            name: self.name.trim().to_string(),
            quantity: self.quantity,
            unit_price: self.unit_price.unwrap_or(Decimal::ZERO),
            category,
            supplier_id: self.supplier_id,
            low_stock_threshold: self
                .low_stock_threshold
                .unwrap_or(defaults.low_stock_threshold),
            high_stock_threshold: self
                .high_stock_threshold
                .unwrap_or(defaults.high_stock_threshold),
        }
    }
}
