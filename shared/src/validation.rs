//! Validation utilities for Shelfie Inventories

use rust_decimal::Decimal;

use crate::models::{NewExpense, NewGood, NewIncoming, NewOutgoing, NewParty};

/// A failed field check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// ============================================================================
// Field Validations
// ============================================================================

/// Validate that a name is present
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name is required");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate a price or amount is not negative
pub fn validate_non_negative(value: Decimal) -> Result<(), &'static str> {
    if value < Decimal::ZERO {
        return Err("Value cannot be negative");
    }
    Ok(())
}

/// Validate a stock movement moves at least one unit
pub fn validate_movement_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate stock thresholds
pub fn validate_thresholds(low: i32, high: i32) -> Result<(), &'static str> {
    if low < 0 || high < 0 {
        return Err("Thresholds cannot be negative");
    }
    if low > high {
        return Err("Low stock threshold cannot exceed high stock threshold");
    }
    Ok(())
}

// ============================================================================
// Record Validations
// ============================================================================

fn check(field: &'static str, result: Result<(), &'static str>) -> Result<(), FieldError> {
    result.map_err(|message| FieldError::new(field, message))
}

pub fn validate_new_good(good: &NewGood) -> Result<(), FieldError> {
    check("name", validate_name(&good.name))?;
    if good.quantity < 0 {
        return Err(FieldError::new("quantity", "Quantity cannot be negative"));
    }
    check("unit_price", validate_non_negative(good.unit_price))?;
    check(
        "low_stock_threshold",
        validate_thresholds(good.low_stock_threshold, good.high_stock_threshold),
    )
}

pub fn validate_new_party(party: &NewParty) -> Result<(), FieldError> {
    check("name", validate_name(&party.name))?;
    if let Some(email) = &party.email {
        check("email", validate_email(email))?;
    }
    Ok(())
}

pub fn validate_new_expense(expense: &NewExpense) -> Result<(), FieldError> {
    check("amount", validate_non_negative(expense.amount))
}

pub fn validate_new_incoming(incoming: &NewIncoming) -> Result<(), FieldError> {
    check("name", validate_name(&incoming.name))?;
    check("quantity", validate_movement_quantity(incoming.quantity))?;
    if let Some(price) = incoming.unit_price {
        check("unit_price", validate_non_negative(price))?;
    }
    Ok(())
}

pub fn validate_new_outgoing(outgoing: &NewOutgoing) -> Result<(), FieldError> {
    check("quantity", validate_movement_quantity(outgoing.quantity))?;
    if let Some(amount) = outgoing.amount {
        check("amount", validate_non_negative(amount))?;
    }
    Ok(())
}
