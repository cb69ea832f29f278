//! Transactional access to the tables touched by stock reconciliation
//!
//! A reconciliation runs inside one [`StockUnit`]: every read locks the rows
//! it returns, every write is staged, and nothing is visible to other units
//! until [`StockUnit::commit`]. Dropping a unit without committing discards
//! all of its writes.

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{
    Expense, Good, Incoming, IncomingStatus, NewExpense, NewGood, Outgoing, OutgoingStatus,
};

use crate::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::{FailPoint, MemoryStore};
pub use postgres::PgStore;

/// Opens units of work against a backing store
#[async_trait]
pub trait InventoryStore: Send + Sync {
    type Unit: StockUnit;

    async fn begin(&self) -> AppResult<Self::Unit>;
}

/// One atomic unit of work over goods, movements and expenses
#[async_trait]
pub trait StockUnit: Send {
    /// Fetch an incoming shipment and lock it until commit
    async fn lock_incoming(&mut self, id: i64) -> AppResult<Option<Incoming>>;

    /// Persist an incoming shipment's status and good link
    async fn update_incoming(
        &mut self,
        id: i64,
        status: IncomingStatus,
        good_id: Option<i64>,
    ) -> AppResult<Incoming>;

    /// Fetch an outgoing order and lock it until commit
    async fn lock_outgoing(&mut self, id: i64) -> AppResult<Option<Outgoing>>;

    async fn update_outgoing_status(
        &mut self,
        id: i64,
        status: OutgoingStatus,
    ) -> AppResult<Outgoing>;

    /// Fetch a good by id and lock it until commit
    async fn lock_good(&mut self, id: i64) -> AppResult<Option<Good>>;

    /// Fetch the lowest-id good named exactly `name` and lock it until
    /// commit. The name itself stays locked too, so a concurrent unit cannot
    /// create a good under it before this one commits.
    async fn lock_good_by_name(&mut self, name: &str) -> AppResult<Option<Good>>;

    /// Add `delta` to a good's quantity in place, flooring at zero, and
    /// replace its price when one is given
    async fn adjust_good(
        &mut self,
        id: i64,
        delta: i32,
        unit_price: Option<Decimal>,
    ) -> AppResult<Good>;

    async fn insert_good(&mut self, good: &NewGood) -> AppResult<Good>;

    /// Insert an expense; a missing date means today
    async fn insert_expense(&mut self, expense: &NewExpense) -> AppResult<Expense>;

    async fn commit(self) -> AppResult<()>;
}
