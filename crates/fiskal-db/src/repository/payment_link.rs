//! # Payment Link Repository
//!
//! Database operations for quick payment records, the lightweight
//! `/pay/{linkId}` objects that live next to full documents.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use fiskal_core::PaymentLink;

/// Repository for payment link operations.
#[derive(Debug, Clone)]
pub struct PaymentLinkRepository {
    pool: SqlitePool,
}

impl PaymentLinkRepository {
    /// Creates a new PaymentLinkRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentLinkRepository { pool }
    }

    /// Inserts a payment link.
    pub async fn insert(&self, link: &PaymentLink) -> DbResult<()> {
        debug!(id = %link.id, "Inserting payment link");

        sqlx::query(
            r#"
            INSERT INTO payment_links (id, name, price_minor, description, expires_at, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&link.id)
        .bind(&link.name)
        .bind(link.price_minor)
        .bind(&link.description)
        .bind(link.expires_at)
        .bind(link.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a payment link by its opaque id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PaymentLink>> {
        let row = sqlx::query(
            "SELECT id, name, price_minor, description, expires_at, created_at \
             FROM payment_links WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_link).transpose()
    }

    /// Deletes a payment link.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM payment_links WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PaymentLink", id));
        }

        Ok(())
    }
}

fn map_link(row: &SqliteRow) -> DbResult<PaymentLink> {
    Ok(PaymentLink {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price_minor: row.try_get("price_minor")?,
        description: row.try_get("description")?,
        expires_at: row.try_get::<Option<DateTime<Utc>>, _>("expires_at")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}
