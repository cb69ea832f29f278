//! Outgoing stock (customer orders)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MovementStatus, UnknownStatus};

/// Status of an outgoing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "outgoing_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum OutgoingStatus {
    Pending,
    Delivered,
    #[serde(alias = "cancelled")]
    Canceled,
}

impl OutgoingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutgoingStatus::Pending => "pending",
            OutgoingStatus::Delivered => "delivered",
            OutgoingStatus::Canceled => "canceled",
        }
    }
}

impl MovementStatus for OutgoingStatus {
    fn is_terminal(self) -> bool {
        !matches!(self, OutgoingStatus::Pending)
    }
}

impl std::fmt::Display for OutgoingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutgoingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OutgoingStatus::Pending),
            "delivered" => Ok(OutgoingStatus::Delivered),
            "canceled" | "cancelled" => Ok(OutgoingStatus::Canceled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// An order shipped to a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Outgoing {
    pub id: i64,
    pub good_id: Option<i64>,
    pub customer_id: i64,
    pub quantity: i32,
    pub amount: Decimal,
    pub details: Option<String>,
    pub status: OutgoingStatus,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an outgoing order.
///
/// `amount` is computed from the good's unit price when omitted; a supplied
/// amount is stored as given.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOutgoing {
    pub good_id: i64,
    pub customer_id: i64,
    pub quantity: i32,
    pub amount: Option<Decimal>,
    pub details: Option<String>,
}
