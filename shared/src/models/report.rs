//! Inventory and expense report models

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Good;
use crate::stock::StockLevel;

/// A good that crossed one of its stock thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAlertItem {
    pub id: i64,
    pub name: String,
    pub quantity: i32,
    pub threshold: i32,
}

/// Units on hand per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub quantity: i64,
}

/// Inventory report over all goods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReport {
    pub total_items: i64,
    pub total_value: Decimal,
    pub low_stock: Vec<StockAlertItem>,
    pub high_stock: Vec<StockAlertItem>,
    pub categories: Vec<CategoryTotal>,
}

impl InventoryReport {
    pub fn from_goods(goods: &[Good]) -> Self {
        let mut total_items = 0i64;
        let mut total_value = Decimal::ZERO;
        let mut low_stock = Vec::new();
        let mut high_stock = Vec::new();
        let mut by_category: BTreeMap<&str, i64> = BTreeMap::new();

        for good in goods {
            total_items += i64::from(good.quantity);
            total_value = total_value.saturating_add(good.stock_value());
            *by_category.entry(good.category.as_str()).or_default() += i64::from(good.quantity);

            // A good can sit at both thresholds when they are equal
            if good.stock_level() == StockLevel::Low {
                low_stock.push(StockAlertItem {
                    id: good.id,
                    name: good.name.clone(),
                    quantity: good.quantity,
                    threshold: good.low_stock_threshold,
                });
            }
            if good.quantity >= good.high_stock_threshold {
                high_stock.push(StockAlertItem {
                    id: good.id,
                    name: good.name.clone(),
                    quantity: good.quantity,
                    threshold: good.high_stock_threshold,
                });
            }
        }

        Self {
            total_items,
            total_value,
            low_stock,
            high_stock,
            categories: by_category
                .into_iter()
                .map(|(category, quantity)| CategoryTotal {
                    category: category.to_string(),
                    quantity,
                })
                .collect(),
        }
    }
}

/// Totals shown under the expense list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub total_amount: Decimal,
    pub count: i64,
}

