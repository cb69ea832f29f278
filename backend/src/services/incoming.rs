//! Incoming shipment service
//!
//! Status changes go through [`StockReconciler`](super::StockReconciler);
//! this service only lists and records shipments.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{validate_new_incoming, Incoming, IncomingStatus, NewIncoming};
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::PartyService;

/// Incoming row joined with its supplier's name
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IncomingWithSupplier {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub incoming: Incoming,
    pub supplier_name: Option<String>,
}

#[derive(Clone)]
pub struct IncomingService {
    db: PgPool,
}

impl IncomingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List shipments, soonest expected first
    pub async fn list(&self) -> AppResult<Vec<IncomingWithSupplier>> {
        let rows = sqlx::query_as::<_, IncomingWithSupplier>(
            r#"
            SELECT i.id, i.name, i.good_id, i.quantity, i.unit_price, i.supplier_id,
                   i.expected_date, i.date, i.status, i.created_at,
                   s.name AS supplier_name
            FROM incoming i
            LEFT JOIN suppliers s ON s.id = i.supplier_id
            ORDER BY i.expected_date ASC, i.id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Record a shipment. New shipments always start `pending`; dates
    /// default to today.
    pub async fn create(&self, input: NewIncoming) -> AppResult<Incoming> {
        validate_new_incoming(&input)?;
        PartyService::suppliers(self.db.clone())
            .ensure_exists(input.supplier_id)
            .await?;

        if let Some(good_id) = input.good_id {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM goods WHERE id = $1)",
            )
            .bind(good_id)
            .fetch_one(&self.db)
            .await?;

            if !exists {
                return Err(AppError::NotFound("Good".to_string()));
            }
        }

        let incoming = sqlx::query_as::<_, Incoming>(
            r#"
            INSERT INTO incoming (name, good_id, quantity, unit_price, supplier_id,
                                  expected_date, date, status)
            VALUES ($1, $2, $3, $4, $5,
                    COALESCE($6, CURRENT_DATE), COALESCE($7, CURRENT_DATE), $8)
            RETURNING id, name, good_id, quantity, unit_price, supplier_id,
                      expected_date, date, status, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(input.good_id)
        .bind(input.quantity)
        .bind(input.unit_price.unwrap_or(Decimal::ZERO))
        .bind(input.supplier_id)
        .bind(input.expected_date)
        .bind(input.date)
        .bind(IncomingStatus::Pending)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(incoming_id = incoming.id, name = %incoming.name, "Incoming shipment recorded");
        Ok(incoming)
    }
}
