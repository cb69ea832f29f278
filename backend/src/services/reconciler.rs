//! Stock reconciliation for incoming receipts and outgoing deliveries
//!
//! A status change and every stock effect it causes are written in one unit
//! of work. Either the status, the good and the purchase expense all change,
//! or nothing does.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use shared::{
    delivery_shortfall, plan_restock, purchase_expense, Expense, Good, GoodDefaults, Incoming,
    IncomingStatus, MovementStatus, Outgoing, OutgoingStatus, RestockPlan,
};

use crate::error::{AppError, AppResult};
use crate::store::{InventoryStore, StockUnit};

/// Result of changing an incoming shipment's status
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptOutcome {
    pub incoming: Incoming,
    /// The good that was restocked or created, when the shipment was received
    pub good: Option<Good>,
    pub good_created: bool,
    /// The purchase expense, when the shipment had a cost
    pub expense: Option<Expense>,
}

/// Result of changing an outgoing order's status
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryOutcome {
    pub outgoing: Outgoing,
    /// The good that was drawn down, when the order was delivered
    pub good: Option<Good>,
    /// Units delivered beyond what was on hand
    pub shortfall: i32,
}

fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Applies movement status changes to stock levels
pub struct StockReconciler<S> {
    store: S,
    defaults: GoodDefaults,
    today: fn() -> NaiveDate,
}

impl<S: InventoryStore> StockReconciler<S> {
    pub fn new(store: S, defaults: GoodDefaults) -> Self {
        Self {
            store,
            defaults,
            today: today_utc,
        }
    }

    /// Replace the clock used to date purchase expenses
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    // ========================================================================
    // Incoming receipts
    // ========================================================================

    /// Change an incoming shipment's status.
    ///
    /// On `received` the matching good gains the shipment quantity (or is
    /// created) and a purchase expense is recorded when the shipment cost
    /// anything. Shipments that already left `pending` cannot change again.
    pub async fn set_incoming_status(
        &self,
        id: i64,
        status: IncomingStatus,
    ) -> AppResult<ReceiptOutcome> {
        let mut unit = self.store.begin().await?;

        let incoming = unit
            .lock_incoming(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Incoming".to_string()))?;

        ensure_transition("Incoming", id, incoming.status, status)?;

        if status != IncomingStatus::Received {
            let incoming = unit.update_incoming(id, status, incoming.good_id).await?;
            unit.commit().await?;

            tracing::info!(incoming_id = id, %status, "Incoming status updated");
            return Ok(ReceiptOutcome {
                incoming,
                good: None,
                good_created: false,
                expense: None,
            });
        }

        let existing = resolve_good(&mut unit, &incoming).await?;
        let (good, good_created) = match plan_restock(&incoming, existing.as_ref(), &self.defaults)
        {
            RestockPlan::Restock {
                good_id,
                quantity,
                unit_price,
            } => (unit.adjust_good(good_id, quantity, unit_price).await?, false),
            RestockPlan::Create(new_good) => (unit.insert_good(&new_good).await?, true),
        };

        let expense = match purchase_expense(&incoming, (self.today)())? {
            Some(new_expense) => Some(unit.insert_expense(&new_expense).await?),
            None => None,
        };

        let incoming = unit.update_incoming(id, status, Some(good.id)).await?;
        unit.commit().await?;

        tracing::info!(
            incoming_id = id,
            good_id = good.id,
            good_created,
            quantity = incoming.quantity,
            "Incoming shipment received"
        );

        Ok(ReceiptOutcome {
            incoming,
            good: Some(good),
            good_created,
            expense,
        })
    }

    // ========================================================================
    // Outgoing deliveries
    // ========================================================================

    /// Change an outgoing order's status.
    ///
    /// On `delivered` the linked good loses the order quantity, flooring at
    /// zero; the uncovered part is reported as the shortfall. An order whose
    /// good link was cleared only records the status.
    pub async fn set_outgoing_status(
        &self,
        id: i64,
        status: OutgoingStatus,
    ) -> AppResult<DeliveryOutcome> {
        let mut unit = self.store.begin().await?;

        let outgoing = unit
            .lock_outgoing(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Outgoing".to_string()))?;

        ensure_transition("Outgoing", id, outgoing.status, status)?;

        let mut good = None;
        let mut shortfall = 0;

        if status == OutgoingStatus::Delivered {
            if let Some(good_id) = outgoing.good_id {
                let current = unit
                    .lock_good(good_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Good".to_string()))?;

                shortfall = delivery_shortfall(current.quantity, outgoing.quantity);
                if shortfall > 0 {
                    tracing::warn!(
                        outgoing_id = id,
                        good_id,
                        on_hand = current.quantity,
                        requested = outgoing.quantity,
                        "Delivery exceeds stock on hand, flooring at zero"
                    );
                }

                good = Some(unit.adjust_good(good_id, -outgoing.quantity, None).await?);
            }
        }

        let outgoing = unit.update_outgoing_status(id, status).await?;
        unit.commit().await?;

        tracing::info!(outgoing_id = id, %status, "Outgoing status updated");

        Ok(DeliveryOutcome {
            outgoing,
            good,
            shortfall,
        })
    }
}

/// The explicit good link wins; otherwise match by name
async fn resolve_good<U: StockUnit>(unit: &mut U, incoming: &Incoming) -> AppResult<Option<Good>> {
    if let Some(good_id) = incoming.good_id {
        if let Some(good) = unit.lock_good(good_id).await? {
            return Ok(Some(good));
        }
    }
    unit.lock_good_by_name(&incoming.name).await
}

fn ensure_transition<T>(resource: &str, id: i64, current: T, next: T) -> AppResult<()>
where
    T: MovementStatus + std::fmt::Display,
{
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::InvalidStateTransition(format!(
            "{} {} is already {} and cannot become {}",
            resource, id, current, next
        )))
    }
}
