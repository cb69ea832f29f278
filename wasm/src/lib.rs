//! WebAssembly module for Shelfie Inventories
//!
//! Provides client-side computation for:
//! - Outgoing order amounts and purchase costs
//! - Stock level badges
//! - List search filtering
//! - Form validation and status transitions before submit

use std::str::FromStr;

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::stock::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::import::SheetKind;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("shelfie-wasm ready"));
}

fn parse_price(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|_| format!("Invalid price '{}'", raw))
}

fn js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

// ============================================================================
// Amounts
// ============================================================================

fn amount_for(unit_price: &str, quantity: i32) -> Result<String, String> {
    outgoing_amount(parse_price(unit_price)?, quantity)
        .map(|amount| amount.to_string())
        .map_err(|e| e.to_string())
}

fn cost_for(unit_price: &str, quantity: i32) -> Result<String, String> {
    purchase_cost(parse_price(unit_price)?, quantity)
        .map(|cost| cost.to_string())
        .map_err(|e| e.to_string())
}

/// Amount of an outgoing order, as a decimal string
#[wasm_bindgen]
pub fn compute_outgoing_amount(unit_price: &str, quantity: i32) -> Result<String, JsValue> {
    amount_for(unit_price, quantity).map_err(js_error)
}

/// Cost of an incoming shipment, as a decimal string
#[wasm_bindgen]
pub fn compute_purchase_cost(unit_price: &str, quantity: i32) -> Result<String, JsValue> {
    cost_for(unit_price, quantity).map_err(js_error)
}

// ============================================================================
// Stock levels and search
// ============================================================================

/// `low`, `normal` or `high`
#[wasm_bindgen]
pub fn classify_stock_level(quantity: i32, low_threshold: i32, high_threshold: i32) -> String {
    classify_stock(quantity, low_threshold, high_threshold).to_string()
}

/// Case-insensitive substring match used by the list filters
#[wasm_bindgen]
pub fn search_matches(name: &str, term: &str) -> bool {
    matches_search(name, term)
}

fn matching_ids(goods_json: &str, term: &str) -> Result<Vec<i64>, String> {
    let goods: Vec<Good> =
        serde_json::from_str(goods_json).map_err(|e| format!("Invalid goods JSON: {}", e))?;

    Ok(goods
        .iter()
        .filter(|g| matches_search(&g.name, term))
        .map(|g| g.id)
        .collect())
}

/// Ids of the goods whose names match the search term
#[wasm_bindgen]
pub fn filter_goods(goods_json: &str, term: &str) -> Result<js_sys::Array, JsValue> {
    let ids = matching_ids(goods_json, term).map_err(js_error)?;
    Ok(ids
        .into_iter()
        .map(|id| JsValue::from_f64(id as f64))
        .collect())
}

// ============================================================================
// Forms
// ============================================================================

fn check_good_form(input_json: &str) -> Result<(), String> {
    let input: CreateGoodInput =
        serde_json::from_str(input_json).map_err(|e| format!("Invalid good JSON: {}", e))?;
    let good = input.into_new_good(&GoodDefaults::default());
    validate_new_good(&good).map_err(|e| e.to_string())
}

/// Validate the goods form; the error names the offending field
#[wasm_bindgen]
pub fn validate_good_form(input_json: &str) -> Result<(), JsValue> {
    check_good_form(input_json).map_err(js_error)
}

fn sheet_table(sheet_name: &str) -> Result<&'static str, String> {
    SheetKind::detect(sheet_name)
        .map(|kind| kind.table())
        .map_err(|e| e.to_string())
}

/// Table an uploaded sheet will be imported into
#[wasm_bindgen]
pub fn detect_sheet_table(sheet_name: &str) -> Result<String, JsValue> {
    sheet_table(sheet_name).map(str::to_string).map_err(js_error)
}

fn transition_allowed<T>(current: &str, next: &str) -> Result<bool, String>
where
    T: MovementStatus + FromStr<Err = UnknownStatus>,
{
    let current = T::from_str(current).map_err(|e| e.to_string())?;
    let next = T::from_str(next).map_err(|e| e.to_string())?;
    Ok(current.can_transition_to(next))
}

/// Whether an incoming shipment may move from `current` to `next`
#[wasm_bindgen]
pub fn can_change_incoming_status(current: &str, next: &str) -> Result<bool, JsValue> {
    transition_allowed::<IncomingStatus>(current, next).map_err(js_error)
}

/// Whether an outgoing order may move from `current` to `next`
#[wasm_bindgen]
pub fn can_change_outgoing_status(current: &str, next: &str) -> Result<bool, JsValue> {
    transition_allowed::<OutgoingStatus>(current, next).map_err(js_error)
}
