//! Incoming stock (supplier shipments)

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MovementStatus;

/// Status of an incoming shipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "incoming_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum IncomingStatus {
    Pending,
    Received,
    #[serde(alias = "cancelled")]
    Canceled,
}

impl IncomingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomingStatus::Pending => "pending",
            IncomingStatus::Received => "received",
            IncomingStatus::Canceled => "canceled",
        }
    }
}

impl MovementStatus for IncomingStatus {
    fn is_terminal(self) -> bool {
        !matches!(self, IncomingStatus::Pending)
    }
}

impl std::fmt::Display for IncomingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IncomingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(IncomingStatus::Pending),
            "received" => Ok(IncomingStatus::Received),
            "canceled" | "cancelled" => Ok(IncomingStatus::Canceled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Returned when a status string names no known status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

/// A shipment expected from a supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Incoming {
    pub id: i64,
    /// Name of the good as typed on the shipment
    pub name: String,
    /// Explicit link to the stocked good, set once the shipment is matched
    pub good_id: Option<i64>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub supplier_id: i64,
    pub expected_date: NaiveDate,
    /// Date the shipment was recorded
    pub date: NaiveDate,
    pub status: IncomingStatus,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an incoming shipment
#[derive(Debug, Clone, Deserialize)]
pub struct NewIncoming {
    pub name: String,
    pub good_id: Option<i64>,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
    pub supplier_id: i64,
    pub expected_date: Option<NaiveDate>,
    pub date: Option<NaiveDate>,
}
