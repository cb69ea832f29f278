//! HTTP handlers for goods endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{CreateGoodInput, Good, ListQuery};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::GoodsService;
use crate::AppState;

fn service(state: &AppState) -> GoodsService {
    GoodsService::new(state.db.clone(), state.config.inventory.good_defaults())
}

/// List goods
pub async fn list_goods(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Good>>> {
    let goods = service(&state).list(&query).await?;
    Ok(Json(goods))
}

/// Get a good by id
pub async fn get_good(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(good_id): Path<i64>,
) -> AppResult<Json<Good>> {
    let good = service(&state).get(good_id).await?;
    Ok(Json(good))
}

/// Create a good
pub async fn create_good(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateGoodInput>,
) -> AppResult<(StatusCode, Json<Good>)> {
    let good = service(&state).create(input).await?;
    tracing::debug!(user_id = %current_user.0.user_id, good_id = good.id, "create_good");
    Ok((StatusCode::CREATED, Json(good)))
}

/// Delete a good
pub async fn delete_good(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(good_id): Path<i64>,
) -> AppResult<StatusCode> {
    service(&state).delete(good_id).await?;
    tracing::debug!(user_id = %current_user.0.user_id, good_id, "delete_good");
    Ok(StatusCode::NO_CONTENT)
}
