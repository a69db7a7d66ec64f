//! # Document Repository
//!
//! Database operations for documents and their line items.
//!
//! ## Atomic Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Save Path (one transaction)                          │
//! │                                                                         │
//! │  INSERT documents (…, net_total, vat_total, gross_total, …)            │
//! │  INSERT document_items (line 1)                                        │
//! │  INSERT document_items (line 2)                                        │
//! │  …                                                                      │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Totals and items land together or not at all. A reader can never      │
//! │  observe totals that disagree with the stored lines.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use fiskal_core::{
    CalculationDetails, Counterparty, Document, DocumentKind, DocumentStatus, DocumentType,
    LineItem, PaymentMethod, TradeDetails,
};

/// Repository for document database operations.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

const DOCUMENT_COLUMNS: &str = "id, doc_type, status, issue_date, \
     counterparty_name, counterparty_address, counterparty_tax_id, counterparty_registration_id, \
     note, share_token, net_total_minor, vat_total_minor, gross_total_minor, \
     due_date, payment_method, \
     period_month, period_year, gross_turnover_minor, calc_vat_rate_bps, \
     net_base_minor, vat_amount_minor, profit_tax_minor, \
     created_at, updated_at";

impl DocumentRepository {
    /// Creates a new DocumentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// Returns the next free sequence number for a type and year.
    ///
    /// Scanned from stored rows; the UNIQUE (doc_type, seq_year, seq)
    /// index catches the losing side of a concurrent assignment.
    pub async fn next_seq(&self, doc_type: DocumentType, year: i32) -> DbResult<i64> {
        let max: Option<i64> = sqlx::query_scalar(
            "SELECT MAX(seq) FROM documents WHERE doc_type = ?1 AND seq_year = ?2",
        )
        .bind(doc_type.as_str())
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        Ok(max.unwrap_or(0) + 1)
    }

    /// Inserts a document and its line items in one transaction.
    pub async fn insert_document(
        &self,
        doc: &Document,
        seq: i64,
        seq_year: i32,
    ) -> DbResult<()> {
        debug!(id = %doc.id, doc_type = doc.doc_type().as_str(), "Inserting document");

        let (due_date, payment_method, calc) = split_kind(&doc.kind);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO documents (
                id, doc_type, seq, seq_year, status, issue_date,
                counterparty_name, counterparty_address,
                counterparty_tax_id, counterparty_registration_id,
                note, share_token,
                net_total_minor, vat_total_minor, gross_total_minor,
                due_date, payment_method,
                period_month, period_year, gross_turnover_minor, calc_vat_rate_bps,
                net_base_minor, vat_amount_minor, profit_tax_minor,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10,
                ?11, ?12,
                ?13, ?14, ?15,
                ?16, ?17,
                ?18, ?19, ?20, ?21,
                ?22, ?23, ?24,
                ?25, ?26
            )
            "#,
        )
        .bind(&doc.id)
        .bind(doc.doc_type().as_str())
        .bind(seq)
        .bind(seq_year)
        .bind(doc.status.as_str())
        .bind(doc.issue_date)
        .bind(&doc.counterparty.name)
        .bind(&doc.counterparty.address)
        .bind(&doc.counterparty.tax_id)
        .bind(&doc.counterparty.registration_id)
        .bind(&doc.note)
        .bind(&doc.share_token)
        .bind(doc.net_total_minor)
        .bind(doc.vat_total_minor)
        .bind(doc.gross_total_minor)
        .bind(due_date)
        .bind(payment_method.map(|m| m.as_str()))
        .bind(calc.map(|c| c.period_month as i64))
        .bind(calc.map(|c| c.period_year))
        .bind(calc.map(|c| c.gross_turnover_minor))
        .bind(calc.map(|c| c.vat_rate_bps as i64))
        .bind(calc.map(|c| c.net_base_minor))
        .bind(calc.map(|c| c.vat_amount_minor))
        .bind(calc.map(|c| c.profit_tax_minor))
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in doc.kind.line_items().iter().enumerate() {
            insert_item(&mut tx, &doc.id, position as i64, item).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Gets a document by its business id, line items included.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Document>> {
        let row = sqlx::query(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.get_items(id).await?;
                Ok(Some(map_document(&row, items)?))
            }
            None => Ok(None),
        }
    }

    /// Gets a document by its share token.
    ///
    /// Exactly one document or nothing; the token column is UNIQUE, so
    /// the lookup can never return a list.
    pub async fn get_by_token(&self, token: &str) -> DbResult<Option<Document>> {
        let row = sqlx::query(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE share_token = ?1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let id: String = row.try_get("id")?;
                let items = self.get_items(&id).await?;
                Ok(Some(map_document(&row, items)?))
            }
            None => Ok(None),
        }
    }

    /// Gets all line items of a document, in document order.
    pub async fn get_items(&self, document_id: &str) -> DbResult<Vec<LineItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, description, quantity_milli, unit_price_minor, vat_rate_bps,
                   net_minor, vat_minor, gross_minor
            FROM document_items
            WHERE document_id = ?1
            ORDER BY position
            "#,
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_item).collect()
    }

    /// Lists every document, newest first, line items included.
    pub async fn list_all(&self) -> DbResult<Vec<Document>> {
        let rows = sqlx::query(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY issue_date DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        // One pass over all items instead of a query per document
        let item_rows = sqlx::query(
            r#"
            SELECT document_id, id, description, quantity_milli, unit_price_minor,
                   vat_rate_bps, net_minor, vat_minor, gross_minor
            FROM document_items
            ORDER BY document_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_doc: HashMap<String, Vec<LineItem>> = HashMap::new();
        for row in &item_rows {
            let document_id: String = row.try_get("document_id")?;
            items_by_doc
                .entry(document_id)
                .or_default()
                .push(map_item(row)?);
        }

        let mut documents = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.try_get("id")?;
            let items = items_by_doc.remove(&id).unwrap_or_default();
            documents.push(map_document(row, items)?);
        }

        Ok(documents)
    }

    /// Moves a document from one status to another.
    ///
    /// The previous status is part of the WHERE clause, so a concurrent
    /// transition loses cleanly instead of overwriting.
    pub async fn update_status(
        &self,
        id: &str,
        from: DocumentStatus,
        to: DocumentStatus,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE documents SET status = ?3, updated_at = ?4 WHERE id = ?1 AND status = ?2",
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Document", id));
        }

        Ok(())
    }

    /// Stores a share token, only if none exists yet.
    ///
    /// ## Returns
    /// `true` if this call set the token, `false` if one was already
    /// present (caller re-reads the stored one).
    pub async fn set_share_token(&self, id: &str, token: &str) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE documents SET share_token = ?2, updated_at = ?3 \
             WHERE id = ?1 AND share_token IS NULL",
        )
        .bind(id)
        .bind(token)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Replaces a document's line items and totals in one transaction.
    ///
    /// The UPDATE is guarded on unlocked statuses, so a document that
    /// went to `sent`/`paid` between the registry's check and this write
    /// stays untouched.
    pub async fn replace_items(
        &self,
        id: &str,
        items: &[LineItem],
        net_total_minor: i64,
        vat_total_minor: i64,
        gross_total_minor: i64,
    ) -> DbResult<()> {
        debug!(id = %id, items = items.len(), "Replacing document items");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE documents SET
                net_total_minor = ?2,
                vat_total_minor = ?3,
                gross_total_minor = ?4,
                updated_at = ?5
            WHERE id = ?1 AND status IN ('draft', 'awaiting_payment')
            "#,
        )
        .bind(id)
        .bind(net_total_minor)
        .bind(vat_total_minor)
        .bind(gross_total_minor)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Document (editable)", id));
        }

        sqlx::query("DELETE FROM document_items WHERE document_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for (position, item) in items.iter().enumerate() {
            insert_item(&mut tx, id, position as i64, item).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Deletes a document. Line items cascade.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Document", id));
        }

        Ok(())
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

/// Splits a kind into its storable columns.
fn split_kind(
    kind: &DocumentKind,
) -> (
    Option<NaiveDate>,
    Option<PaymentMethod>,
    Option<&CalculationDetails>,
) {
    match kind {
        DocumentKind::Invoice(t) | DocumentKind::Proforma(t) => {
            (Some(t.due_date), Some(t.payment_method), None)
        }
        DocumentKind::Calculation(c) => (None, None, Some(c)),
    }
}

async fn insert_item(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    document_id: &str,
    position: i64,
    item: &LineItem,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO document_items (
            id, document_id, position, description,
            quantity_milli, unit_price_minor, vat_rate_bps,
            net_minor, vat_minor, gross_minor
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(&item.id)
    .bind(document_id)
    .bind(position)
    .bind(&item.description)
    .bind(item.quantity_milli)
    .bind(item.unit_price_minor)
    .bind(item.vat_rate_bps as i64)
    .bind(item.net_minor)
    .bind(item.vat_minor)
    .bind(item.gross_minor)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn map_item(row: &SqliteRow) -> DbResult<LineItem> {
    Ok(LineItem {
        id: row.try_get("id")?,
        description: row.try_get("description")?,
        quantity_milli: row.try_get("quantity_milli")?,
        unit_price_minor: row.try_get("unit_price_minor")?,
        vat_rate_bps: row.try_get::<i64, _>("vat_rate_bps")? as u32,
        net_minor: row.try_get("net_minor")?,
        vat_minor: row.try_get("vat_minor")?,
        gross_minor: row.try_get("gross_minor")?,
    })
}

/// Assembles a full document from its row and (already loaded) items.
///
/// The tagged kind is rebuilt here, validating the payload columns for
/// the stored type; a row that lies about its shape surfaces as
/// `CorruptRow` rather than a half-formed document.
fn map_document(row: &SqliteRow, items: Vec<LineItem>) -> DbResult<Document> {
    let id: String = row.try_get("id")?;

    let doc_type_raw: String = row.try_get("doc_type")?;
    let doc_type = DocumentType::parse(&doc_type_raw).ok_or_else(|| {
        DbError::corrupt("Document", id.as_str(), format!("unknown doc_type '{doc_type_raw}'"))
    })?;

    let status_raw: String = row.try_get("status")?;
    let status = DocumentStatus::parse(&status_raw).ok_or_else(|| {
        DbError::corrupt("Document", id.as_str(), format!("unknown status '{status_raw}'"))
    })?;

    let counterparty = Counterparty {
        name: row.try_get("counterparty_name")?,
        address: row.try_get("counterparty_address")?,
        tax_id: row.try_get("counterparty_tax_id")?,
        registration_id: row.try_get("counterparty_registration_id")?,
    };

    let kind = match doc_type {
        DocumentType::Invoice | DocumentType::Proforma => {
            let due_date: Option<NaiveDate> = row.try_get("due_date")?;
            let due_date = due_date
                .ok_or_else(|| DbError::corrupt("Document", id.as_str(), "trade document without due_date"))?;

            let method_raw: Option<String> = row.try_get("payment_method")?;
            let payment_method = method_raw
                .as_deref()
                .and_then(PaymentMethod::parse)
                .ok_or_else(|| {
                    DbError::corrupt("Document", id.as_str(), "trade document without payment_method")
                })?;

            let details = TradeDetails {
                due_date,
                payment_method,
                line_items: items,
            };

            match doc_type {
                DocumentType::Invoice => DocumentKind::Invoice(details),
                _ => DocumentKind::Proforma(details),
            }
        }
        DocumentType::Calculation => {
            let period_month: Option<i64> = row.try_get("period_month")?;
            let period_year: Option<i64> = row.try_get("period_year")?;
            let gross_turnover: Option<i64> = row.try_get("gross_turnover_minor")?;
            let vat_rate_bps: Option<i64> = row.try_get("calc_vat_rate_bps")?;
            let net_base: Option<i64> = row.try_get("net_base_minor")?;
            let vat_amount: Option<i64> = row.try_get("vat_amount_minor")?;
            let profit_tax: Option<i64> = row.try_get("profit_tax_minor")?;

            match (
                period_month,
                period_year,
                gross_turnover,
                vat_rate_bps,
                net_base,
                vat_amount,
                profit_tax,
            ) {
                (
                    Some(month),
                    Some(year),
                    Some(gross_turnover_minor),
                    Some(bps),
                    Some(net_base_minor),
                    Some(vat_amount_minor),
                    Some(profit_tax_minor),
                ) => DocumentKind::Calculation(CalculationDetails {
                    period_month: month as u32,
                    period_year: year as i32,
                    gross_turnover_minor,
                    vat_rate_bps: bps as u32,
                    net_base_minor,
                    vat_amount_minor,
                    profit_tax_minor,
                }),
                _ => {
                    return Err(DbError::corrupt(
                        "Document",
                        id.as_str(),
                        "calculation document with missing payload columns",
                    ))
                }
            }
        }
    };

    Ok(Document {
        id,
        status,
        issue_date: row.try_get("issue_date")?,
        counterparty,
        note: row.try_get("note")?,
        share_token: row.try_get("share_token")?,
        net_total_minor: row.try_get("net_total_minor")?,
        vat_total_minor: row.try_get("vat_total_minor")?,
        gross_total_minor: row.try_get("gross_total_minor")?,
        kind,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
