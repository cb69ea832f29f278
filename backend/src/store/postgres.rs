//! PostgreSQL store: one unit of work is one database transaction

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{
    Expense, Good, Incoming, IncomingStatus, NewExpense, NewGood, Outgoing, OutgoingStatus,
};
use sqlx::{PgPool, Postgres, Transaction};

use super::{InventoryStore, StockUnit};
use crate::error::{AppError, AppResult};

/// Store backed by the application's connection pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// An open transaction; rolled back on drop unless committed
pub struct PgUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl InventoryStore for PgStore {
    type Unit = PgUnit;

    async fn begin(&self) -> AppResult<PgUnit> {
        let tx = self.db.begin().await?;
        Ok(PgUnit { tx })
    }
}

#[async_trait]
impl StockUnit for PgUnit {
    async fn lock_incoming(&mut self, id: i64) -> AppResult<Option<Incoming>> {
        let incoming = sqlx::query_as::<_, Incoming>(
            r#"
            SELECT id, name, good_id, quantity, unit_price, supplier_id,
                   expected_date, date, status, created_at
            FROM incoming
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(incoming)
    }

    async fn update_incoming(
        &mut self,
        id: i64,
        status: IncomingStatus,
        good_id: Option<i64>,
    ) -> AppResult<Incoming> {
        sqlx::query_as::<_, Incoming>(
            r#"
            UPDATE incoming
            SET status = $2, good_id = $3
            WHERE id = $1
            RETURNING id, name, good_id, quantity, unit_price, supplier_id,
                      expected_date, date, status, created_at
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(good_id)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Incoming".to_string()))
    }

    async fn lock_outgoing(&mut self, id: i64) -> AppResult<Option<Outgoing>> {
        let outgoing = sqlx::query_as::<_, Outgoing>(
            r#"
            SELECT id, good_id, customer_id, quantity, amount, details, status, created_at
            FROM outgoing
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(outgoing)
    }

    async fn update_outgoing_status(
        &mut self,
        id: i64,
        status: OutgoingStatus,
    ) -> AppResult<Outgoing> {
        sqlx::query_as::<_, Outgoing>(
            r#"
            UPDATE outgoing
            SET status = $2
            WHERE id = $1
            RETURNING id, good_id, customer_id, quantity, amount, details, status, created_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Outgoing".to_string()))
    }

    async fn lock_good(&mut self, id: i64) -> AppResult<Option<Good>> {
        let good = sqlx::query_as::<_, Good>(
            r#"
            SELECT id, name, quantity, unit_price, category, supplier_id,
                   low_stock_threshold, high_stock_threshold, created_at
            FROM goods
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(good)
    }

    async fn lock_good_by_name(&mut self, name: &str) -> AppResult<Option<Good>> {
        // Row locks cover existing goods only; the name lock also covers the
        // insert that follows a miss
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext('goods.name'), hashtext($1))")
            .bind(name)
            .execute(&mut *self.tx)
            .await?;

        let good = sqlx::query_as::<_, Good>(
            r#"
            SELECT id, name, quantity, unit_price, category, supplier_id,
                   low_stock_threshold, high_stock_threshold, created_at
            FROM goods
            WHERE name = $1
            ORDER BY id
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(good)
    }

    async fn adjust_good(
        &mut self,
        id: i64,
        delta: i32,
        unit_price: Option<Decimal>,
    ) -> AppResult<Good> {
        sqlx::query_as::<_, Good>(
            r#"
            UPDATE goods
            SET quantity = GREATEST(quantity + $2, 0),
                unit_price = COALESCE($3, unit_price)
            WHERE id = $1
            RETURNING id, name, quantity, unit_price, category, supplier_id,
                      low_stock_threshold, high_stock_threshold, created_at
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(unit_price)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Good".to_string()))
    }

    async fn insert_good(&mut self, good: &NewGood) -> AppResult<Good> {
        let good = sqlx::query_as::<_, Good>(
            r#"
            INSERT INTO goods (name, quantity, unit_price, category, supplier_id,
                               low_stock_threshold, high_stock_threshold)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, quantity, unit_price, category, supplier_id,
                      low_stock_threshold, high_stock_threshold, created_at
            "#,
        )
        .bind(&good.name)
        .bind(good.quantity)
        .bind(good.unit_price)
        .bind(&good.category)
        .bind(good.supplier_id)
        .bind(good.low_stock_threshold)
        .bind(good.high_stock_threshold)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(good)
    }

    async fn insert_expense(&mut self, expense: &NewExpense) -> AppResult<Expense> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (supplier_id, amount, description, date)
            VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE))
            RETURNING id, supplier_id, amount, description, date, created_at
            "#,
        )
        .bind(expense.supplier_id)
        .bind(expense.amount)
        .bind(&expense.description)
        .bind(expense.date)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(expense)
    }

    async fn commit(self) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
