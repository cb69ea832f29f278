//! HTTP handlers for outgoing order endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{NewOutgoing, Outgoing, OutgoingStatus};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::outgoing::{OutgoingWithNames, Quote, QuoteQuery};
use crate::services::{DeliveryOutcome, OutgoingService, StockReconciler};
use crate::store::PgStore;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateOutgoingStatus {
    pub status: OutgoingStatus,
}

/// List outgoing orders
pub async fn list_outgoing(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<OutgoingWithNames>>> {
    let rows = OutgoingService::new(state.db).list().await?;
    Ok(Json(rows))
}

/// Record an outgoing order
pub async fn create_outgoing(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(input): Json<NewOutgoing>,
) -> AppResult<(StatusCode, Json<Outgoing>)> {
    let outgoing = OutgoingService::new(state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(outgoing)))
}

/// Price an order before placing it
pub async fn quote_outgoing(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<QuoteQuery>,
) -> AppResult<Json<Quote>> {
    let quote = OutgoingService::new(state.db).quote(&query).await?;
    Ok(Json(quote))
}

/// Change an order's status; `delivered` draws down the good
pub async fn update_outgoing_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(outgoing_id): Path<i64>,
    Json(body): Json<UpdateOutgoingStatus>,
) -> AppResult<Json<DeliveryOutcome>> {
    let reconciler = StockReconciler::new(
        PgStore::new(state.db.clone()),
        state.config.inventory.good_defaults(),
    );

    tracing::debug!(
        user_id = %current_user.0.user_id,
        outgoing_id,
        status = %body.status,
        "update_outgoing_status"
    );

    let outcome = reconciler
        .set_outgoing_status(outgoing_id, body.status)
        .await?;
    Ok(Json(outcome))
}
