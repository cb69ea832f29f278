//! Outgoing order service

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    outgoing_amount, validate_movement_quantity, validate_new_outgoing, NewOutgoing, Outgoing,
    OutgoingStatus,
};
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::PartyService;

/// Outgoing row joined with its good's and customer's names
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OutgoingWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub outgoing: Outgoing,
    pub good_name: Option<String>,
    pub customer_name: Option<String>,
}

/// Query for pricing an order before it is placed
#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub good_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub good_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub amount: Decimal,
}

#[derive(Clone)]
pub struct OutgoingService {
    db: PgPool,
}

impl OutgoingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List orders, newest first
    pub async fn list(&self) -> AppResult<Vec<OutgoingWithNames>> {
        let rows = sqlx::query_as::<_, OutgoingWithNames>(
            r#"
            SELECT o.id, o.good_id, o.customer_id, o.quantity, o.amount, o.details,
                   o.status, o.created_at,
                   g.name AS good_name, c.name AS customer_name
            FROM outgoing o
            LEFT JOIN goods g ON g.id = o.good_id
            LEFT JOIN customers c ON c.id = o.customer_id
            ORDER BY o.created_at DESC, o.id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn unit_price(&self, good_id: i64) -> AppResult<Decimal> {
        sqlx::query_scalar::<_, Decimal>("SELECT unit_price FROM goods WHERE id = $1")
            .bind(good_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Good".to_string()))
    }

    /// Price an order from the good's current unit price
    pub async fn quote(&self, query: &QuoteQuery) -> AppResult<Quote> {
        validate_movement_quantity(query.quantity)
            .map_err(|message| AppError::validation("quantity", message))?;
        let unit_price = self.unit_price(query.good_id).await?;

        Ok(Quote {
            good_id: query.good_id,
            quantity: query.quantity,
            unit_price,
            amount: outgoing_amount(unit_price, query.quantity)?,
        })
    }

    /// Record an order. A missing amount is computed from the good's price;
    /// a supplied amount is stored as given.
    pub async fn create(&self, input: NewOutgoing) -> AppResult<Outgoing> {
        validate_new_outgoing(&input)?;
        PartyService::customers(self.db.clone())
            .ensure_exists(input.customer_id)
            .await?;

        let unit_price = self.unit_price(input.good_id).await?;
        let amount = match input.amount {
            Some(amount) => amount,
            None => outgoing_amount(unit_price, input.quantity)?,
        };

        let outgoing = sqlx::query_as::<_, Outgoing>(
            r#"
            INSERT INTO outgoing (good_id, customer_id, quantity, amount, details, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, good_id, customer_id, quantity, amount, details, status, created_at
            "#,
        )
        .bind(input.good_id)
        .bind(input.customer_id)
        .bind(input.quantity)
        .bind(amount)
        .bind(&input.details)
        .bind(OutgoingStatus::Pending)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(outgoing_id = outgoing.id, amount = %outgoing.amount, "Outgoing order recorded");
        Ok(outgoing)
    }
}
