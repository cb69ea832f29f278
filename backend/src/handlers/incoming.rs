//! HTTP handlers for incoming shipment endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{Incoming, IncomingStatus, NewIncoming};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::incoming::IncomingWithSupplier;
use crate::services::{IncomingService, ReceiptOutcome, StockReconciler};
use crate::store::PgStore;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateIncomingStatus {
    pub status: IncomingStatus,
}

/// List incoming shipments
pub async fn list_incoming(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<IncomingWithSupplier>>> {
    let rows = IncomingService::new(state.db).list().await?;
    Ok(Json(rows))
}

/// Record an incoming shipment
pub async fn create_incoming(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(input): Json<NewIncoming>,
) -> AppResult<(StatusCode, Json<Incoming>)> {
    let incoming = IncomingService::new(state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(incoming)))
}

/// Change a shipment's status; `received` restocks the good
pub async fn update_incoming_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(incoming_id): Path<i64>,
    Json(body): Json<UpdateIncomingStatus>,
) -> AppResult<Json<ReceiptOutcome>> {
    let reconciler = StockReconciler::new(
        PgStore::new(state.db.clone()),
        state.config.inventory.good_defaults(),
    );

    tracing::debug!(
        user_id = %current_user.0.user_id,
        incoming_id,
        status = %body.status,
        "update_incoming_status"
    );

    let outcome = reconciler
        .set_incoming_status(incoming_id, body.status)
        .await?;
    Ok(Json(outcome))
}
