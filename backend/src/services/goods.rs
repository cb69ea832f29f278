//! Goods catalogue service

use shared::{validate_new_good, CreateGoodInput, Good, GoodDefaults, ListQuery};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Goods service for listing, creating and deleting stocked items
#[derive(Clone)]
pub struct GoodsService {
    db: PgPool,
    defaults: GoodDefaults,
}

impl GoodsService {
    pub fn new(db: PgPool, defaults: GoodDefaults) -> Self {
        Self { db, defaults }
    }

    /// List goods by name, optionally filtered by a case-insensitive search
    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<Good>> {
        let goods = sqlx::query_as::<_, Good>(
            r#"
            SELECT id, name, quantity, unit_price, category, supplier_id,
                   low_stock_threshold, high_stock_threshold, created_at
            FROM goods
            WHERE ($1::text IS NULL OR strpos(lower(name), lower($1)) > 0)
            ORDER BY name, id
            "#,
        )
        .bind(query.term())
        .fetch_all(&self.db)
        .await?;

        Ok(goods)
    }

    pub async fn get(&self, id: i64) -> AppResult<Good> {
        sqlx::query_as::<_, Good>(
            r#"
            SELECT id, name, quantity, unit_price, category, supplier_id,
                   low_stock_threshold, high_stock_threshold, created_at
            FROM goods
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Good".to_string()))
    }

    /// Create a good, filling unset fields from the configured defaults
    pub async fn create(&self, input: CreateGoodInput) -> AppResult<Good> {
        let new_good = input.into_new_good(&self.defaults);
        validate_new_good(&new_good)?;

        let good = sqlx::query_as::<_, Good>(
            r#"
            INSERT INTO goods (name, quantity, unit_price, category, supplier_id,
                               low_stock_threshold, high_stock_threshold)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, quantity, unit_price, category, supplier_id,
                      low_stock_threshold, high_stock_threshold, created_at
            "#,
        )
        .bind(&new_good.name)
        .bind(new_good.quantity)
        .bind(new_good.unit_price)
        .bind(&new_good.category)
        .bind(new_good.supplier_id)
        .bind(new_good.low_stock_threshold)
        .bind(new_good.high_stock_threshold)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(good_id = good.id, name = %good.name, "Good created");
        Ok(good)
    }

    /// Delete a good. Movements that referenced it keep their rows with the
    /// link cleared.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM goods WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Good".to_string()));
        }

        tracing::info!(good_id = id, "Good deleted");
        Ok(())
    }

    /// Every good, for reports and exports
    pub async fn all(&self) -> AppResult<Vec<Good>> {
        self.list(&ListQuery::default()).await
    }
}
