//! HTTP handlers for supplier and customer endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{Customer, ListQuery, NewParty, Supplier};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::PartyService;
use crate::AppState;

// ============================================================================
// Suppliers
// ============================================================================

pub async fn list_suppliers(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Supplier>>> {
    let suppliers = PartyService::suppliers(state.db).list(&query).await?;
    Ok(Json(suppliers))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(input): Json<NewParty>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let supplier = PartyService::suppliers(state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(supplier_id): Path<i64>,
) -> AppResult<StatusCode> {
    PartyService::suppliers(state.db).delete(supplier_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Customers
// ============================================================================

pub async fn list_customers(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let customers = PartyService::customers(state.db).list(&query).await?;
    Ok(Json(customers))
}

pub async fn create_customer(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(input): Json<NewParty>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let customer = PartyService::customers(state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(customer_id): Path<i64>,
) -> AppResult<StatusCode> {
    PartyService::customers(state.db).delete(customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
