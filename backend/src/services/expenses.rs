//! Expense service

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{validate_new_expense, Expense, ExpenseSummary, NewExpense};
use sqlx::{FromRow, PgPool};

use crate::error::AppResult;
use crate::services::PartyService;

/// Expense row joined with its supplier's name
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExpenseWithSupplier {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub expense: Expense,
    pub supplier_name: Option<String>,
}

/// Flat expense row used for workbook export
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExpenseExportRow {
    pub id: i64,
    pub supplier_id: i64,
    pub supplier_name: Option<String>,
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ExpenseService {
    db: PgPool,
}

impl ExpenseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List expenses, newest first
    pub async fn list(&self) -> AppResult<Vec<ExpenseWithSupplier>> {
        let expenses = sqlx::query_as::<_, ExpenseWithSupplier>(
            r#"
            SELECT e.id, e.supplier_id, e.amount, e.description, e.date, e.created_at,
                   s.name AS supplier_name
            FROM expenses e
            LEFT JOIN suppliers s ON s.id = e.supplier_id
            ORDER BY e.date DESC, e.id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(expenses)
    }

    /// Every expense as a flat row
    pub async fn export_rows(&self) -> AppResult<Vec<ExpenseExportRow>> {
        let rows = sqlx::query_as::<_, ExpenseExportRow>(
            r#"
            SELECT e.id, e.supplier_id, s.name AS supplier_name, e.amount,
                   e.description, e.date, e.created_at
            FROM expenses e
            LEFT JOIN suppliers s ON s.id = e.supplier_id
            ORDER BY e.date DESC, e.id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Record an expense; the date defaults to today
    pub async fn create(&self, input: NewExpense) -> AppResult<Expense> {
        validate_new_expense(&input)?;
        PartyService::suppliers(self.db.clone())
            .ensure_exists(input.supplier_id)
            .await?;

        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (supplier_id, amount, description, date)
            VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE))
            RETURNING id, supplier_id, amount, description, date, created_at
            "#,
        )
        .bind(input.supplier_id)
        .bind(input.amount)
        .bind(&input.description)
        .bind(input.date)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(expense_id = expense.id, amount = %expense.amount, "Expense recorded");
        Ok(expense)
    }

    /// Total amount and count over all expenses
    pub async fn summary(&self) -> AppResult<ExpenseSummary> {
        let (total_amount, count) = sqlx::query_as::<_, (Decimal, i64)>(
            "SELECT COALESCE(SUM(amount), 0), COUNT(*) FROM expenses",
        )
        .fetch_one(&self.db)
        .await?;

        Ok(ExpenseSummary {
            total_amount,
            count,
        })
    }
}
