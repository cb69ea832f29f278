//! HTTP handlers for reports

use axum::{extract::State, http::header, response::IntoResponse, Json};
use chrono::Utc;
use shared::InventoryReport;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::ReportingService;
use crate::AppState;

/// Inventory overview: totals, stock alerts and categories
pub async fn get_inventory_report(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<InventoryReport>> {
    let report = ReportingService::new(state.db).inventory_report().await?;
    Ok(Json(report))
}

/// Download the stock sheet (every good with value and level) as CSV
pub async fn export_stock_sheet(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let content = ReportingService::new(state.db).stock_sheet_csv().await?;
    let filename = ReportingService::stock_sheet_filename(Utc::now().date_naive());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        content,
    ))
}
