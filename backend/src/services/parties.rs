//! Supplier and customer service
//!
//! Both tables share one shape, so a single service is parameterized by
//! [`PartyKind`]. Table names come from `PartyKind::table` and never from
//! request input.

use shared::{validate_new_party, ListQuery, NewParty, Party, PartyKind};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct PartyService {
    db: PgPool,
    kind: PartyKind,
}

impl PartyService {
    pub fn new(db: PgPool, kind: PartyKind) -> Self {
        Self { db, kind }
    }

    pub fn suppliers(db: PgPool) -> Self {
        Self::new(db, PartyKind::Supplier)
    }

    pub fn customers(db: PgPool) -> Self {
        Self::new(db, PartyKind::Customer)
    }

    /// List parties by name, optionally filtered by a case-insensitive search
    pub async fn list(&self, query: &ListQuery) -> AppResult<Vec<Party>> {
        let sql = format!(
            r#"
            SELECT id, name, contact, email, address, created_at
            FROM {}
            WHERE ($1::text IS NULL OR strpos(lower(name), lower($1)) > 0)
            ORDER BY name, id
            "#,
            self.kind.table()
        );

        let parties = sqlx::query_as::<_, Party>(&sql)
            .bind(query.term())
            .fetch_all(&self.db)
            .await?;

        Ok(parties)
    }

    pub async fn create(&self, input: NewParty) -> AppResult<Party> {
        let input = input.normalized();
        validate_new_party(&input)?;

        let sql = format!(
            r#"
            INSERT INTO {} (name, contact, email, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, contact, email, address, created_at
            "#,
            self.kind.table()
        );

        let party = sqlx::query_as::<_, Party>(&sql)
            .bind(&input.name)
            .bind(&input.contact)
            .bind(&input.email)
            .bind(&input.address)
            .fetch_one(&self.db)
            .await?;

        tracing::info!(kind = %self.kind, id = party.id, name = %party.name, "Party created");
        Ok(party)
    }

    /// Delete a party. Fails with a conflict while movements or expenses
    /// still reference it.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.db).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(self.kind.label().to_string()));
        }

        tracing::info!(kind = %self.kind, id, "Party deleted");
        Ok(())
    }

    /// Whether a party with this id exists
    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", self.kind.table());
        let exists = sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(&self.db)
            .await?;

        Ok(exists)
    }

    /// Fail with `NotFound` unless the party exists
    pub async fn ensure_exists(&self, id: i64) -> AppResult<()> {
        if self.exists(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(self.kind.label().to_string()))
        }
    }
}
