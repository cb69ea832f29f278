//! Stock reconciliation tests
//!
//! Receipts and deliveries run against the in-memory store, which applies the
//! same unit-of-work rules as the PostgreSQL store.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{
    Good, GoodDefaults, IncomingStatus, NewGood, NewIncoming, NewOutgoing, OutgoingStatus,
};
use shelfie_backend::error::AppError;
use shelfie_backend::services::StockReconciler;
use shelfie_backend::store::{FailPoint, MemoryStore};

const SUPPLIER: i64 = 1;
const CUSTOMER: i64 = 2;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
}

fn new_good(name: &str, quantity: i32, unit_price: &str) -> NewGood {
    NewGood {
        name: name.to_string(),
        quantity,
        unit_price: dec(unit_price),
        category: "Tools".to_string(),
        supplier_id: None,
        low_stock_threshold: 5,
        high_stock_threshold: 50,
    }
}

fn shipment(name: &str, quantity: i32, unit_price: &str) -> NewIncoming {
    NewIncoming {
        name: name.to_string(),
        good_id: None,
        quantity,
        unit_price: Some(dec(unit_price)),
        supplier_id: SUPPLIER,
        expected_date: None,
        date: None,
    }
}

fn order(good: &Good, quantity: i32) -> NewOutgoing {
    NewOutgoing {
        good_id: good.id,
        customer_id: CUSTOMER,
        quantity,
        amount: None,
        details: None,
    }
}

fn reconciler(store: &MemoryStore) -> StockReconciler<MemoryStore> {
    StockReconciler::new(store.clone(), GoodDefaults::default()).with_today(fixed_today)
}

// ============================================================================
// Receipts
// ============================================================================

#[tokio::test]
async fn test_receipt_restocks_existing_good() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 10, "5")).await;
    let incoming = store.add_incoming(shipment("Widget", 4, "6")).await;

    let outcome = reconciler(&store)
        .set_incoming_status(incoming.id, IncomingStatus::Received)
        .await
        .unwrap();

    let good = store.good(widget.id).await.unwrap();
    assert_eq!(good.quantity, 14);
    assert_eq!(good.unit_price, dec("6"));
    assert_eq!(good.category, "Tools");
    assert!(!outcome.good_created);

    let expenses = store.expenses().await;
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, dec("24"));
    assert_eq!(expenses[0].supplier_id, SUPPLIER);
    assert_eq!(expenses[0].date, fixed_today());
    assert_eq!(
        expenses[0].description.as_deref(),
        Some("Purchase of 4 units of Widget")
    );
    assert_eq!(outcome.expense.map(|e| e.id), Some(expenses[0].id));

    let incoming = store.incoming(incoming.id).await.unwrap();
    assert_eq!(incoming.status, IncomingStatus::Received);
    assert_eq!(incoming.good_id, Some(widget.id));
}

#[tokio::test]
async fn test_receipt_creates_missing_good() {
    let store = MemoryStore::new();
    let incoming = store.add_incoming(shipment("Gadget", 3, "2")).await;

    let outcome = reconciler(&store)
        .set_incoming_status(incoming.id, IncomingStatus::Received)
        .await
        .unwrap();

    assert!(outcome.good_created);
    let goods = store.goods().await;
    assert_eq!(goods.len(), 1);

    let gadget = &goods[0];
    assert_eq!(gadget.name, "Gadget");
    assert_eq!(gadget.quantity, 3);
    assert_eq!(gadget.unit_price, dec("2"));
    assert_eq!(gadget.category, "General");
    assert_eq!(gadget.supplier_id, Some(SUPPLIER));
    assert_eq!(gadget.low_stock_threshold, 5);
    assert_eq!(gadget.high_stock_threshold, 50);

    let expenses = store.expenses().await;
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, dec("6"));

    let incoming = store.incoming(incoming.id).await.unwrap();
    assert_eq!(incoming.good_id, Some(gadget.id));
}

#[tokio::test]
async fn test_receipt_matches_name_exactly() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 10, "5")).await;
    let exact = store.add_incoming(shipment("Widget", 1, "5")).await;
    let variant = store.add_incoming(shipment("wIDGET", 2, "5")).await;
    let reconciler = reconciler(&store);

    reconciler
        .set_incoming_status(exact.id, IncomingStatus::Received)
        .await
        .unwrap();
    let outcome = reconciler
        .set_incoming_status(variant.id, IncomingStatus::Received)
        .await
        .unwrap();

    assert_eq!(store.good(widget.id).await.unwrap().quantity, 11);
    assert!(outcome.good_created);
    assert_eq!(outcome.good.map(|g| (g.name, g.quantity)), Some(("wIDGET".to_string(), 2)));
    assert_eq!(store.goods().await.len(), 2);
}

#[tokio::test]
async fn test_receipt_restocks_lowest_id_on_duplicate_names() {
    let store = MemoryStore::new();
    let first = store.add_good(new_good("Widget", 1, "5")).await;
    let second = store.add_good(new_good("Widget", 1, "5")).await;
    let incoming = store.add_incoming(shipment("Widget", 2, "5")).await;

    reconciler(&store)
        .set_incoming_status(incoming.id, IncomingStatus::Received)
        .await
        .unwrap();

    assert_eq!(store.good(first.id).await.unwrap().quantity, 3);
    assert_eq!(store.good(second.id).await.unwrap().quantity, 1);
}

#[tokio::test]
async fn test_receipt_prefers_explicit_good_link() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 10, "5")).await;
    let sprocket = store.add_good(new_good("Sprocket", 1, "3")).await;

    let mut input = shipment("Widget", 4, "3");
    input.good_id = Some(sprocket.id);
    let incoming = store.add_incoming(input).await;

    reconciler(&store)
        .set_incoming_status(incoming.id, IncomingStatus::Received)
        .await
        .unwrap();

    assert_eq!(store.good(widget.id).await.unwrap().quantity, 10);
    assert_eq!(store.good(sprocket.id).await.unwrap().quantity, 5);
}

#[tokio::test]
async fn test_free_receipt_keeps_price_and_records_no_expense() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 10, "5")).await;
    let incoming = store.add_incoming(shipment("Widget", 4, "0")).await;

    let outcome = reconciler(&store)
        .set_incoming_status(incoming.id, IncomingStatus::Received)
        .await
        .unwrap();

    let good = store.good(widget.id).await.unwrap();
    assert_eq!(good.quantity, 14);
    assert_eq!(good.unit_price, dec("5"));
    assert!(outcome.expense.is_none());
    assert!(store.expenses().await.is_empty());
}

#[tokio::test]
async fn test_canceled_receipt_only_changes_status() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 10, "5")).await;
    let incoming = store.add_incoming(shipment("Widget", 4, "6")).await;

    let outcome = reconciler(&store)
        .set_incoming_status(incoming.id, IncomingStatus::Canceled)
        .await
        .unwrap();

    assert_eq!(outcome.incoming.status, IncomingStatus::Canceled);
    assert!(outcome.good.is_none());
    assert_eq!(store.good(widget.id).await.unwrap().quantity, 10);
    assert!(store.expenses().await.is_empty());
}

#[tokio::test]
async fn test_pending_to_pending_is_a_no_op() {
    let store = MemoryStore::new();
    let incoming = store.add_incoming(shipment("Widget", 4, "6")).await;

    let outcome = reconciler(&store)
        .set_incoming_status(incoming.id, IncomingStatus::Pending)
        .await
        .unwrap();

    assert_eq!(outcome.incoming.status, IncomingStatus::Pending);
    assert!(store.goods().await.is_empty());
}

#[tokio::test]
async fn test_second_receipt_is_rejected_without_effects() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 10, "5")).await;
    let incoming = store.add_incoming(shipment("Widget", 4, "6")).await;
    let reconciler = reconciler(&store);

    reconciler
        .set_incoming_status(incoming.id, IncomingStatus::Received)
        .await
        .unwrap();
    let err = reconciler
        .set_incoming_status(incoming.id, IncomingStatus::Received)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidStateTransition(_)));
    assert_eq!(store.good(widget.id).await.unwrap().quantity, 14);
    assert_eq!(store.expenses().await.len(), 1);
}

#[tokio::test]
async fn test_failed_expense_rolls_back_receipt() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 10, "5")).await;
    let restock = store.add_incoming(shipment("Widget", 4, "6")).await;
    let create = store.add_incoming(shipment("Gadget", 3, "2")).await;
    store.fail_on(Some(FailPoint::InsertExpense));

    let reconciler = reconciler(&store);
    for id in [restock.id, create.id] {
        let err = reconciler
            .set_incoming_status(id, IncomingStatus::Received)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
        assert_eq!(
            store.incoming(id).await.unwrap().status,
            IncomingStatus::Pending
        );
    }

    let good = store.good(widget.id).await.unwrap();
    assert_eq!(good.quantity, 10);
    assert_eq!(good.unit_price, dec("5"));
    assert_eq!(store.goods().await.len(), 1);
    assert!(store.expenses().await.is_empty());

    // Once the store recovers the same shipment goes through
    store.fail_on(None);
    reconciler
        .set_incoming_status(restock.id, IncomingStatus::Received)
        .await
        .unwrap();
    assert_eq!(store.good(widget.id).await.unwrap().quantity, 14);
}

#[tokio::test]
async fn test_overflowing_purchase_cost_rolls_back_receipt() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 10, "5")).await;
    let mut input = shipment("Widget", 2, "1");
    input.unit_price = Some(Decimal::MAX);
    let incoming = store.add_incoming(input).await;

    let err = reconciler(&store)
        .set_incoming_status(incoming.id, IncomingStatus::Received)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "unit_price"));
    let good = store.good(widget.id).await.unwrap();
    assert_eq!(good.quantity, 10);
    assert_eq!(good.unit_price, dec("5"));
    assert_eq!(
        store.incoming(incoming.id).await.unwrap().status,
        IncomingStatus::Pending
    );
}

#[tokio::test]
async fn test_unknown_incoming_is_not_found() {
    let store = MemoryStore::new();

    let err = reconciler(&store)
        .set_incoming_status(404, IncomingStatus::Received)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(resource) if resource == "Incoming"));
}

#[tokio::test]
async fn test_concurrent_receipts_do_not_lose_updates() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 10, "5")).await;
    let first = store.add_incoming(shipment("Widget", 4, "5")).await;
    let second = store.add_incoming(shipment("Widget", 7, "5")).await;
    let reconciler = reconciler(&store);

    let (a, b) = tokio::join!(
        reconciler.set_incoming_status(first.id, IncomingStatus::Received),
        reconciler.set_incoming_status(second.id, IncomingStatus::Received),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(store.good(widget.id).await.unwrap().quantity, 21);
    assert_eq!(store.expenses().await.len(), 2);
}

// ============================================================================
// Deliveries
// ============================================================================

#[tokio::test]
async fn test_delivery_draws_down_stock() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 10, "5")).await;
    let outgoing = store.add_outgoing(order(&widget, 3)).await;
    assert_eq!(outgoing.amount, dec("15"));

    let outcome = reconciler(&store)
        .set_outgoing_status(outgoing.id, OutgoingStatus::Delivered)
        .await
        .unwrap();

    assert_eq!(outcome.shortfall, 0);
    assert_eq!(outcome.good.map(|g| g.quantity), Some(7));
    assert_eq!(store.good(widget.id).await.unwrap().quantity, 7);
    assert_eq!(
        store.outgoing(outgoing.id).await.unwrap().status,
        OutgoingStatus::Delivered
    );
    assert!(store.expenses().await.is_empty());
}

#[tokio::test]
async fn test_over_delivery_floors_at_zero() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 2, "5")).await;
    let outgoing = store.add_outgoing(order(&widget, 5)).await;

    let outcome = reconciler(&store)
        .set_outgoing_status(outgoing.id, OutgoingStatus::Delivered)
        .await
        .unwrap();

    assert_eq!(outcome.shortfall, 3);
    assert_eq!(store.good(widget.id).await.unwrap().quantity, 0);
}

#[tokio::test]
async fn test_delivery_without_good_link_only_changes_status() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 10, "5")).await;
    let outgoing = store.add_outgoing(order(&widget, 3)).await;
    store.unlink_outgoing(outgoing.id).await;

    let outcome = reconciler(&store)
        .set_outgoing_status(outgoing.id, OutgoingStatus::Delivered)
        .await
        .unwrap();

    assert!(outcome.good.is_none());
    assert_eq!(outcome.outgoing.status, OutgoingStatus::Delivered);
    assert_eq!(store.good(widget.id).await.unwrap().quantity, 10);
}

#[tokio::test]
async fn test_delivery_of_missing_good_rolls_back() {
    let store = MemoryStore::new();
    let outgoing = store
        .add_outgoing(NewOutgoing {
            good_id: 999,
            customer_id: CUSTOMER,
            quantity: 1,
            amount: Some(dec("10")),
            details: None,
        })
        .await;

    let err = reconciler(&store)
        .set_outgoing_status(outgoing.id, OutgoingStatus::Delivered)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(resource) if resource == "Good"));
    assert_eq!(
        store.outgoing(outgoing.id).await.unwrap().status,
        OutgoingStatus::Pending
    );
}

#[tokio::test]
async fn test_failed_status_write_rolls_back_delivery() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 10, "5")).await;
    let outgoing = store.add_outgoing(order(&widget, 3)).await;
    store.fail_on(Some(FailPoint::UpdateOutgoing));

    let err = reconciler(&store)
        .set_outgoing_status(outgoing.id, OutgoingStatus::Delivered)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Persistence(_)));
    assert_eq!(store.good(widget.id).await.unwrap().quantity, 10);
}

#[tokio::test]
async fn test_canceled_order_cannot_be_delivered() {
    let store = MemoryStore::new();
    let widget = store.add_good(new_good("Widget", 10, "5")).await;
    let outgoing = store.add_outgoing(order(&widget, 3)).await;
    let reconciler = reconciler(&store);

    reconciler
        .set_outgoing_status(outgoing.id, OutgoingStatus::Canceled)
        .await
        .unwrap();
    let err = reconciler
        .set_outgoing_status(outgoing.id, OutgoingStatus::Delivered)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidStateTransition(_)));
    assert_eq!(store.good(widget.id).await.unwrap().quantity, 10);
}
