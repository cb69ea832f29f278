//! Supplier and customer models
//!
//! Suppliers and customers share one record shape and live in separate tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which table a party lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyKind {
    Supplier,
    Customer,
}

impl PartyKind {
    pub fn table(&self) -> &'static str {
        match self {
            PartyKind::Supplier => "suppliers",
            PartyKind::Customer => "customers",
        }
    }

    /// Human-readable resource name used in errors
    pub fn label(&self) -> &'static str {
        match self {
            PartyKind::Supplier => "Supplier",
            PartyKind::Customer => "Customer",
        }
    }
}

impl std::fmt::Display for PartyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A supplier or customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Party {
    pub id: i64,
    pub name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub type Supplier = Party;
pub type Customer = Party;

/// Input for creating a supplier or customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewParty {
    pub name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl NewParty {
    /// Trim every field and turn blank optionals into `None`
    pub fn normalized(self) -> Self {
        fn blank_to_none(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            name: self.name.trim().to_string(),
            contact: blank_to_none(self.contact),
            email: blank_to_none(self.email),
            address: blank_to_none(self.address),
        }
    }
}
