//! Spreadsheet import normalization
//!
//! Uploaded sheets come from hand-maintained workbooks, so each field is read
//! from the first non-empty column among several header spellings.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{NewGood, NewParty, PartyKind};
use crate::stock::GoodDefaults;

/// One sheet row keyed by header
pub type SheetRow = BTreeMap<String, String>;

const NAME: &[&str] = &["name", "Name"];
const QUANTITY: &[&str] = &["quantity", "Quantity"];
const PRICE: &[&str] = &["price", "Price", "unit_price", "Unit Price"];
const CATEGORY: &[&str] = &["category", "Category"];
const SUPPLIER_ID: &[&str] = &["supplier_id", "Supplier ID"];
const LOW_THRESHOLD: &[&str] = &["low_stock_threshold", "Low Stock Threshold"];
const HIGH_THRESHOLD: &[&str] = &["high_stock_threshold", "High Stock Threshold"];
const CONTACT: &[&str] = &["contact", "Contact", "phone", "Phone"];
const EMAIL: &[&str] = &["email", "Email"];
const ADDRESS: &[&str] = &["address", "Address"];

/// Errors raised while normalizing an uploaded sheet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("The uploaded file contains no data")]
    EmptySheet,

    #[error("Unrecognized sheet name '{0}'. Please name your sheet as Goods, Suppliers, or Customers")]
    UnknownSheet(String),

    #[error("Row {row}: name is required")]
    MissingName { row: usize },

    #[error("Row {row}: '{value}' is not a valid {field}")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// Target table of an uploaded sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetKind {
    Goods,
    Suppliers,
    Customers,
}

impl SheetKind {
    /// Pick the target table from a sheet or file name.
    ///
    /// Keywords are matched case-insensitively as substrings, in the order
    /// goods, supplier, customer.
    pub fn detect(sheet_name: &str) -> Result<Self, ImportError> {
        let lowered = sheet_name.to_lowercase();
        if lowered.contains("goods") {
            Ok(SheetKind::Goods)
        } else if lowered.contains("supplier") {
            Ok(SheetKind::Suppliers)
        } else if lowered.contains("customer") {
            Ok(SheetKind::Customers)
        } else {
            Err(ImportError::UnknownSheet(sheet_name.to_string()))
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            SheetKind::Goods => "goods",
            SheetKind::Suppliers => "suppliers",
            SheetKind::Customers => "customers",
        }
    }

    pub fn party_kind(&self) -> Option<PartyKind> {
        match self {
            SheetKind::Goods => None,
            SheetKind::Suppliers => Some(PartyKind::Supplier),
            SheetKind::Customers => Some(PartyKind::Customer),
        }
    }
}

/// Normalized rows of one sheet
#[derive(Debug, Clone, PartialEq)]
pub enum ImportBatch {
    Goods(Vec<NewGood>),
    Parties(PartyKind, Vec<NewParty>),
}

impl ImportBatch {
    pub fn len(&self) -> usize {
        match self {
            ImportBatch::Goods(rows) => rows.len(),
            ImportBatch::Parties(_, rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First non-empty value among the given header spellings
pub fn first_value<'a>(row: &'a SheetRow, headers: &[&str]) -> Option<&'a str> {
    headers
        .iter()
        .filter_map(|h| row.get(*h))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}

fn integer_field(
    row: &SheetRow,
    headers: &[&str],
    field: &'static str,
    index: usize,
    default: i32,
) -> Result<i32, ImportError> {
    match first_value(row, headers) {
        None => Ok(default),
        Some(raw) => Decimal::from_str(raw)
            .ok()
            .filter(|d| d.fract().is_zero())
            .and_then(|d| d.to_i32())
            .ok_or_else(|| ImportError::InvalidNumber {
                row: index,
                field,
                value: raw.to_string(),
            }),
    }
}

fn required_name(row: &SheetRow, index: usize) -> Result<String, ImportError> {
    first_value(row, NAME)
        .map(str::to_string)
        .ok_or(ImportError::MissingName { row: index })
}

/// Normalize a goods row. `index` is the 1-based data row number.
pub fn good_from_row(
    row: &SheetRow,
    index: usize,
    defaults: &GoodDefaults,
) -> Result<NewGood, ImportError> {
    let name = required_name(row, index)?;
    let quantity = integer_field(row, QUANTITY, "quantity", index, 0)?;

    let unit_price = match first_value(row, PRICE) {
        None => Decimal::ZERO,
        Some(raw) => Decimal::from_str(raw).map_err(|_| ImportError::InvalidNumber {
            row: index,
            field: "price",
            value: raw.to_string(),
        })?,
    };

    let supplier_id = match first_value(row, SUPPLIER_ID) {
        None => None,
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| ImportError::InvalidNumber {
            row: index,
            field: "supplier_id",
            value: raw.to_string(),
        })?),
    };

    Ok(NewGood {
        name,
        quantity,
        unit_price,
        category: first_value(row, CATEGORY)
            .map(str::to_string)
            .unwrap_or_else(|| defaults.category.clone()),
        supplier_id,
        low_stock_threshold: integer_field(
            row,
            LOW_THRESHOLD,
            "low_stock_threshold",
            index,
            defaults.low_stock_threshold,
        )?,
        high_stock_threshold: integer_field(
            row,
            HIGH_THRESHOLD,
            "high_stock_threshold",
            index,
            defaults.high_stock_threshold,
        )?,
    })
}

/// Normalize a supplier or customer row. `index` is the 1-based data row number.
pub fn party_from_row(row: &SheetRow, index: usize) -> Result<NewParty, ImportError> {
    Ok(NewParty {
        name: required_name(row, index)?,
        contact: first_value(row, CONTACT).map(str::to_string),
        email: first_value(row, EMAIL).map(str::to_string),
        address: first_value(row, ADDRESS).map(str::to_string),
    })
}

/// Normalize a whole sheet for the detected table
pub fn normalize_sheet(
    kind: SheetKind,
    rows: &[SheetRow],
    defaults: &GoodDefaults,
) -> Result<ImportBatch, ImportError> {
    if rows.is_empty() {
        return Err(ImportError::EmptySheet);
    }

    match kind.party_kind() {
        None => rows
            .iter()
            .enumerate()
            .map(|(i, row)| good_from_row(row, i + 1, defaults))
            .collect::<Result<Vec<_>, _>>()
            .map(ImportBatch::Goods),
        Some(party_kind) => rows
            .iter()
            .enumerate()
            .map(|(i, row)| party_from_row(row, i + 1))
            .collect::<Result<Vec<_>, _>>()
            .map(|parties| ImportBatch::Parties(party_kind, parties)),
    }
}
