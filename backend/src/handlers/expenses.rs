//! HTTP handlers for expense endpoints

use axum::{extract::State, http::StatusCode, Json};
use shared::{Expense, ExpenseSummary, NewExpense};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::expenses::ExpenseWithSupplier;
use crate::services::ExpenseService;
use crate::AppState;

/// List expenses, newest first
pub async fn list_expenses(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<ExpenseWithSupplier>>> {
    let expenses = ExpenseService::new(state.db).list().await?;
    Ok(Json(expenses))
}

/// Record an expense
pub async fn create_expense(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(input): Json<NewExpense>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let expense = ExpenseService::new(state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// Total and count of all expenses
pub async fn get_expense_summary(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<ExpenseSummary>> {
    let summary = ExpenseService::new(state.db).summary().await?;
    Ok(Json(summary))
}
