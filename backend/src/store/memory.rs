//! In-memory store used by the reconciliation tests
//!
//! A unit holds the table lock for its whole lifetime and works on a staged
//! copy of the tables, so units are serialized and an uncommitted unit leaves
//! no trace.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use shared::{
    floored_quantity, names_match, outgoing_amount, Expense, Good, Incoming, IncomingStatus,
    NewExpense, NewGood, NewIncoming, NewOutgoing, Outgoing, OutgoingStatus,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{InventoryStore, StockUnit};
use crate::error::{AppError, AppResult};

/// A write that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    UpdateIncoming,
    UpdateOutgoing,
    AdjustGood,
    InsertGood,
    InsertExpense,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    goods: BTreeMap<i64, Good>,
    incoming: BTreeMap<i64, Incoming>,
    outgoing: BTreeMap<i64, Outgoing>,
    expenses: BTreeMap<i64, Expense>,
    last_id: i64,
}

impl MemoryTables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn insert_good(&mut self, good: &NewGood) -> Good {
        let good = Good {
            id: self.next_id(),
            name: good.name.clone(),
            quantity: good.quantity,
            unit_price: good.unit_price,
            category: good.category.clone(),
            supplier_id: good.supplier_id,
            low_stock_threshold: good.low_stock_threshold,
            high_stock_threshold: good.high_stock_threshold,
            created_at: Utc::now(),
        };
        self.goods.insert(good.id, good.clone());
        good
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<MemoryTables>>,
    fail_on: Arc<StdMutex<Option<FailPoint>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later unit fail at `point`; `None` clears it
    pub fn fail_on(&self, point: Option<FailPoint>) {
        if let Ok(mut fail_on) = self.fail_on.lock() {
            *fail_on = point;
        }
    }

    // ========================================================================
    // Seeding and inspection
    // ========================================================================

    pub async fn add_good(&self, good: NewGood) -> Good {
        self.tables.lock().await.insert_good(&good)
    }

    /// Record a pending shipment, defaulting dates to today and price to zero
    pub async fn add_incoming(&self, input: NewIncoming) -> Incoming {
        let mut tables = self.tables.lock().await;
        let today = Utc::now().date_naive();
        let incoming = Incoming {
            id: tables.next_id(),
            name: input.name,
            good_id: input.good_id,
            quantity: input.quantity,
            unit_price: input.unit_price.unwrap_or(Decimal::ZERO),
            supplier_id: input.supplier_id,
            expected_date: input.expected_date.unwrap_or(today),
            date: input.date.unwrap_or(today),
            status: IncomingStatus::Pending,
            created_at: Utc::now(),
        };
        tables.incoming.insert(incoming.id, incoming.clone());
        incoming
    }

    /// Record a pending order, pricing it from the good when no amount is given
    pub async fn add_outgoing(&self, input: NewOutgoing) -> Outgoing {
        let mut tables = self.tables.lock().await;
        let amount = input.amount.unwrap_or_else(|| {
            tables
                .goods
                .get(&input.good_id)
                .and_then(|g| outgoing_amount(g.unit_price, input.quantity).ok())
                .unwrap_or(Decimal::ZERO)
        });
        let outgoing = Outgoing {
            id: tables.next_id(),
            good_id: Some(input.good_id),
            customer_id: input.customer_id,
            quantity: input.quantity,
            amount,
            details: input.details,
            status: OutgoingStatus::Pending,
            created_at: Utc::now(),
        };
        tables.outgoing.insert(outgoing.id, outgoing.clone());
        outgoing
    }

    /// Drop the good link of an order, as happens when its good is deleted
    pub async fn unlink_outgoing(&self, id: i64) {
        if let Some(outgoing) = self.tables.lock().await.outgoing.get_mut(&id) {
            outgoing.good_id = None;
        }
    }

    pub async fn good(&self, id: i64) -> Option<Good> {
        self.tables.lock().await.goods.get(&id).cloned()
    }

    pub async fn goods(&self) -> Vec<Good> {
        self.tables.lock().await.goods.values().cloned().collect()
    }

    pub async fn incoming(&self, id: i64) -> Option<Incoming> {
        self.tables.lock().await.incoming.get(&id).cloned()
    }

    pub async fn outgoing(&self, id: i64) -> Option<Outgoing> {
        self.tables.lock().await.outgoing.get(&id).cloned()
    }

    pub async fn expenses(&self) -> Vec<Expense> {
        self.tables.lock().await.expenses.values().cloned().collect()
    }
}

pub struct MemoryUnit {
    guard: OwnedMutexGuard<MemoryTables>,
    staged: MemoryTables,
    fail_on: Option<FailPoint>,
}

impl MemoryUnit {
    fn check(&self, point: FailPoint) -> AppResult<()> {
        if self.fail_on == Some(point) {
            return Err(AppError::Persistence(format!(
                "injected failure at {:?}",
                point
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    type Unit = MemoryUnit;

    async fn begin(&self) -> AppResult<MemoryUnit> {
        let fail_on = self
            .fail_on
            .lock()
            .map(|point| *point)
            .map_err(|_| AppError::Internal("failure switch poisoned".to_string()))?;
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();

        Ok(MemoryUnit {
            guard,
            staged,
            fail_on,
        })
    }
}

#[async_trait]
impl StockUnit for MemoryUnit {
    async fn lock_incoming(&mut self, id: i64) -> AppResult<Option<Incoming>> {
        Ok(self.staged.incoming.get(&id).cloned())
    }

    async fn update_incoming(
        &mut self,
        id: i64,
        status: IncomingStatus,
        good_id: Option<i64>,
    ) -> AppResult<Incoming> {
        self.check(FailPoint::UpdateIncoming)?;
        let incoming = self
            .staged
            .incoming
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Incoming".to_string()))?;
        incoming.status = status;
        incoming.good_id = good_id;
        Ok(incoming.clone())
    }

    async fn lock_outgoing(&mut self, id: i64) -> AppResult<Option<Outgoing>> {
        Ok(self.staged.outgoing.get(&id).cloned())
    }

    async fn update_outgoing_status(
        &mut self,
        id: i64,
        status: OutgoingStatus,
    ) -> AppResult<Outgoing> {
        self.check(FailPoint::UpdateOutgoing)?;
        let outgoing = self
            .staged
            .outgoing
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Outgoing".to_string()))?;
        outgoing.status = status;
        Ok(outgoing.clone())
    }

    async fn lock_good(&mut self, id: i64) -> AppResult<Option<Good>> {
        Ok(self.staged.goods.get(&id).cloned())
    }

    async fn lock_good_by_name(&mut self, name: &str) -> AppResult<Option<Good>> {
        // BTreeMap iterates in id order, so the first match is the oldest good
        Ok(self
            .staged
            .goods
            .values()
            .find(|g| names_match(&g.name, name))
            .cloned())
    }

    async fn adjust_good(
        &mut self,
        id: i64,
        delta: i32,
        unit_price: Option<Decimal>,
    ) -> AppResult<Good> {
        self.check(FailPoint::AdjustGood)?;
        let good = self
            .staged
            .goods
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Good".to_string()))?;
        good.quantity = floored_quantity(good.quantity, delta);
        if let Some(price) = unit_price {
            good.unit_price = price;
        }
        Ok(good.clone())
    }

    async fn insert_good(&mut self, good: &NewGood) -> AppResult<Good> {
        self.check(FailPoint::InsertGood)?;
        Ok(self.staged.insert_good(good))
    }

    async fn insert_expense(&mut self, expense: &NewExpense) -> AppResult<Expense> {
        self.check(FailPoint::InsertExpense)?;
        let expense = Expense {
            id: self.staged.next_id(),
            supplier_id: expense.supplier_id,
            amount: expense.amount,
            description: expense.description.clone(),
            date: expense.date.unwrap_or_else(|| Utc::now().date_naive()),
            created_at: Utc::now(),
        };
        self.staged.expenses.insert(expense.id, expense.clone());
        Ok(expense)
    }

    async fn commit(self) -> AppResult<()> {
        let MemoryUnit {
            mut guard, staged, ..
        } = self;
        *guard = staged;
        Ok(())
    }
}
