//! Stock movement calculations
//!
//! Pure functions behind the reconciliation of incoming receipts and outgoing
//! deliveries, plus the amount and stock-level helpers used by the forms.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Good, Incoming, NewExpense, NewGood};

/// Defaults applied to goods created without explicit values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodDefaults {
    pub category: String,
    pub low_stock_threshold: i32,
    pub high_stock_threshold: i32,
}

impl Default for GoodDefaults {
    fn default() -> Self {
        Self {
            category: "General".to_string(),
            low_stock_threshold: 5,
            high_stock_threshold: 50,
        }
    }
}

/// Where a quantity sits relative to its thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Low,
    Normal,
    High,
}

impl std::fmt::Display for StockLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockLevel::Low => write!(f, "low"),
            StockLevel::Normal => write!(f, "normal"),
            StockLevel::High => write!(f, "high"),
        }
    }
}

/// Classify a quantity. Low wins when both thresholds are crossed.
pub fn classify_stock(quantity: i32, low_threshold: i32, high_threshold: i32) -> StockLevel {
    if quantity <= low_threshold {
        StockLevel::Low
    } else if quantity >= high_threshold {
        StockLevel::High
    } else {
        StockLevel::Normal
    }
}

/// A `unit_price * quantity` product too large to represent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Amount of {quantity} x {unit_price} is too large")]
pub struct AmountOverflow {
    pub unit_price: Decimal,
    pub quantity: i32,
}

fn checked_amount(unit_price: Decimal, quantity: i32) -> Result<Decimal, AmountOverflow> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(AmountOverflow {
            unit_price,
            quantity,
        })
}

/// Amount of an outgoing order: `unit_price * quantity`
pub fn outgoing_amount(unit_price: Decimal, quantity: i32) -> Result<Decimal, AmountOverflow> {
    checked_amount(unit_price, quantity)
}

/// Cost of a received shipment: `unit_price * quantity`
pub fn purchase_cost(unit_price: Decimal, quantity: i32) -> Result<Decimal, AmountOverflow> {
    checked_amount(unit_price, quantity)
}

/// Apply a signed change to a quantity, flooring at zero
pub fn floored_quantity(current: i32, delta: i32) -> i32 {
    current.saturating_add(delta).max(0)
}

/// Units requested beyond what was on hand
pub fn delivery_shortfall(on_hand: i32, requested: i32) -> i32 {
    requested.saturating_sub(on_hand).max(0)
}

/// Whether a shipment name refers to a stocked good: exact equality
pub fn names_match(good_name: &str, shipment_name: &str) -> bool {
    good_name == shipment_name
}

/// What a receipt does to the goods table
#[derive(Debug, Clone, PartialEq)]
pub enum RestockPlan {
    /// Add units to an existing good, optionally replacing its price
    Restock {
        good_id: i64,
        quantity: i32,
        unit_price: Option<Decimal>,
    },
    /// No good matched; create one
    Create(NewGood),
}

/// Decide how a received shipment changes the goods table.
///
/// An existing good gains the shipment quantity and takes the shipment price
/// when that price is positive. Otherwise a new good is created with the
/// configured default category and thresholds.
pub fn plan_restock(
    incoming: &Incoming,
    existing: Option<&Good>,
    defaults: &GoodDefaults,
) -> RestockPlan {
    let price = (incoming.unit_price > Decimal::ZERO).then_some(incoming.unit_price);

    match existing {
        Some(good) => RestockPlan::Restock {
            good_id: good.id,
            quantity: incoming.quantity,
            unit_price: price,
        },
        None => RestockPlan::Create(NewGood {
            name: incoming.name.clone(),
            quantity: incoming.quantity,
            unit_price: price.unwrap_or(Decimal::ZERO),
            category: defaults.category.clone(),
            supplier_id: Some(incoming.supplier_id),
            low_stock_threshold: defaults.low_stock_threshold,
            high_stock_threshold: defaults.high_stock_threshold,
        }),
    }
}

/// Expense recorded for a received shipment, if it cost anything
pub fn purchase_expense(
    incoming: &Incoming,
    today: NaiveDate,
) -> Result<Option<NewExpense>, AmountOverflow> {
    let amount = purchase_cost(incoming.unit_price, incoming.quantity)?;
    if amount <= Decimal::ZERO {
        return Ok(None);
    }

    Ok(Some(NewExpense {
        supplier_id: incoming.supplier_id,
        amount,
        description: Some(format!(
            "Purchase of {} units of {}",
            incoming.quantity, incoming.name
        )),
        date: Some(today),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IncomingStatus;
    use chrono::Utc;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn incoming(name: &str, quantity: i32, unit_price: &str) -> Incoming {
        Incoming {
            id: 1,
            name: name.to_string(),
            good_id: None,
            quantity,
            unit_price: dec(unit_price),
            supplier_id: 7,
            expected_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: IncomingStatus::Pending,
            created_at: Utc::now(),
        }
    }

    fn good(id: i64, name: &str, quantity: i32, unit_price: &str) -> Good {
        Good {
            id,
            name: name.to_string(),
            quantity,
            unit_price: dec(unit_price),
            category: "Tools".to_string(),
            supplier_id: None,
            low_stock_threshold: 5,
            high_stock_threshold: 50,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_classify_stock() {
        assert_eq!(classify_stock(5, 5, 50), StockLevel::Low);
        assert_eq!(classify_stock(0, 5, 50), StockLevel::Low);
        assert_eq!(classify_stock(6, 5, 50), StockLevel::Normal);
        assert_eq!(classify_stock(50, 5, 50), StockLevel::High);
        assert_eq!(classify_stock(3, 5, 3), StockLevel::Low);
    }

    #[test]
    fn test_outgoing_amount() {
        assert_eq!(outgoing_amount(dec("12.50"), 4).unwrap(), dec("50.00"));
        assert_eq!(outgoing_amount(dec("12.50"), 0).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_amount_overflow_is_an_error() {
        let err = outgoing_amount(Decimal::MAX, 2).unwrap_err();
        assert_eq!(err.unit_price, Decimal::MAX);
        assert_eq!(err.quantity, 2);
        assert!(purchase_cost(Decimal::MAX, 3).is_err());
        assert_eq!(outgoing_amount(Decimal::MAX, 1).unwrap(), Decimal::MAX);
    }

    #[test]
    fn test_floored_quantity() {
        assert_eq!(floored_quantity(10, 4), 14);
        assert_eq!(floored_quantity(2, -5), 0);
        assert_eq!(floored_quantity(i32::MAX, 1), i32::MAX);
    }

    #[test]
    fn test_delivery_shortfall() {
        assert_eq!(delivery_shortfall(2, 5), 3);
        assert_eq!(delivery_shortfall(10, 5), 0);
    }

    #[test]
    fn test_names_match_is_exact() {
        assert!(names_match("Widget", "Widget"));
        assert!(!names_match("Widget", "widget"));
        assert!(!names_match("Widget", " Widget"));
        assert!(!names_match("Widget", "Widgets"));
    }

    #[test]
    fn test_plan_restock_existing_good_takes_new_price() {
        let existing = good(3, "Widget", 10, "5");
        let plan = plan_restock(&incoming("Widget", 4, "6"), Some(&existing), &GoodDefaults::default());

        assert_eq!(
            plan,
            RestockPlan::Restock {
                good_id: 3,
                quantity: 4,
                unit_price: Some(dec("6")),
            }
        );
    }

    #[test]
    fn test_plan_restock_keeps_price_when_shipment_is_free() {
        let existing = good(3, "Widget", 10, "5");
        let plan = plan_restock(&incoming("Widget", 4, "0"), Some(&existing), &GoodDefaults::default());

        assert_eq!(
            plan,
            RestockPlan::Restock {
                good_id: 3,
                quantity: 4,
                unit_price: None,
            }
        );
    }

    #[test]
    fn test_plan_restock_creates_general_good() {
        let plan = plan_restock(&incoming("Gadget", 3, "2"), None, &GoodDefaults::default());

        match plan {
            RestockPlan::Create(new_good) => {
                assert_eq!(new_good.name, "Gadget");
                assert_eq!(new_good.quantity, 3);
                assert_eq!(new_good.unit_price, dec("2"));
                assert_eq!(new_good.category, "General");
                assert_eq!(new_good.supplier_id, Some(7));
                assert_eq!(new_good.low_stock_threshold, 5);
                assert_eq!(new_good.high_stock_threshold, 50);
            }
            other => panic!("expected a new good, got {:?}", other),
        }
    }

    #[test]
    fn test_purchase_expense() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let expense = purchase_expense(&incoming("Widget", 4, "6"), today)
            .unwrap()
            .unwrap();

        assert_eq!(expense.amount, dec("24"));
        assert_eq!(expense.supplier_id, 7);
        assert_eq!(expense.date, Some(today));
        assert_eq!(
            expense.description.as_deref(),
            Some("Purchase of 4 units of Widget")
        );
    }

    #[test]
    fn test_purchase_expense_skipped_when_free() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        assert!(purchase_expense(&incoming("Widget", 4, "0"), today)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_purchase_expense_overflow() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let mut shipment = incoming("Widget", 4, "1");
        shipment.unit_price = Decimal::MAX;
        assert!(purchase_expense(&shipment, today).is_err());
    }

    // ========================================================================
    // Property-Based Tests
    // ========================================================================

    proptest! {
        #[test]
        fn test_floored_quantity_never_negative(current in 0..i32::MAX, delta in i32::MIN..i32::MAX) {
            prop_assert!(floored_quantity(current, delta) >= 0);
        }

        #[test]
        fn test_amount_never_panics(mantissa in any::<i64>(), scale in 0u32..28, quantity in any::<i32>()) {
            let unit_price = Decimal::new(mantissa, scale);
            match outgoing_amount(unit_price, quantity) {
                Ok(amount) => prop_assert_eq!(amount, unit_price * Decimal::from(quantity)),
                Err(err) => prop_assert_eq!(err.quantity, quantity),
            }
        }

        #[test]
        fn test_classify_low_wins(quantity in -100..100i32, low in 0..50i32, high in 0..50i32) {
            if quantity <= low {
                prop_assert_eq!(classify_stock(quantity, low, high), StockLevel::Low);
            }
        }
    }
}
