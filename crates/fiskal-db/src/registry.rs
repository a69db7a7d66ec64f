//! # Document Registry & Sharing Resolver
//!
//! The coordination layer above the repositories:
//!
//! - assigns globally-unique ids with a type-coded prefix, year and
//!   sequence (`FAK-2026-001`)
//! - freezes line totals and document totals through fiskal-core at
//!   save time, persisting them atomically with the lines
//! - generates opaque share tokens on explicit request only
//! - resolves a document by internal id or by public token, with an
//!   identical `NotFound` for both misses
//! - enforces the status lifecycle and the content lock on sent/paid
//!   documents
//!
//! ## Resolution Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /public/{docType}/{docId}?token={token}                                │
//! │                                                                         │
//! │  token present ──► get_by_token ──► verify type + id ──► public view   │
//! │  token absent  ──► get_by_id    ──► verify prefix     ──► public view  │
//! │                                                                         │
//! │  Any mismatch is NotFound, shaped exactly like a missing id, so the    │
//! │  existence of other documents never leaks.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::DbError;
use crate::pool::Database;
use fiskal_core::calc::{self, DocumentTotals};
use fiskal_core::filter::{filter_documents, summarize, ReportTotals};
use fiskal_core::validation::{
    validate_calculation_submission, validate_search_query, validate_trade_submission,
    vat_rate_anomaly,
};
use fiskal_core::{
    lifecycle, CalculationDetails, CoreError, Counterparty, Document, DocumentKind,
    DocumentStatus, DocumentType, FilterQuery, LineItem, LineItemInput, Money, PaymentLink,
    PaymentMethod, PublicDocumentView, TradeDetails, ValidationError, VatRate,
};

// =============================================================================
// Errors
// =============================================================================

/// Errors surfaced by registry operations: either a domain rule
/// violation from fiskal-core or a storage failure.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationError> for RegistryError {
    fn from(err: ValidationError) -> Self {
        RegistryError::Core(CoreError::Validation(err))
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

// =============================================================================
// Inputs
// =============================================================================

/// Input for a new invoice or proforma.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTradeDocument {
    pub counterparty: Counterparty,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub line_items: Vec<LineItemInput>,
    pub note: Option<String>,
}

/// Input for a new periodic calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCalculation {
    pub counterparty: Counterparty,
    pub issue_date: NaiveDate,
    pub period_month: u32,
    pub period_year: i32,
    pub gross_turnover_minor: i64,
    pub vat_rate_bps: u32,
    pub note: Option<String>,
}

/// Input for a new quick payment link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPaymentLink {
    pub name: String,
    pub price_minor: i64,
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Registry
// =============================================================================

/// The document registry. Holds a store handle; owns no state itself.
#[derive(Debug, Clone)]
pub struct DocumentRegistry {
    db: Database,
}

impl DocumentRegistry {
    /// Creates a registry over a database handle.
    pub fn new(db: Database) -> Self {
        DocumentRegistry { db }
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    /// Creates an invoice (faktura).
    pub async fn create_invoice(&self, new: NewTradeDocument) -> RegistryResult<Document> {
        self.create_trade(DocumentType::Invoice, new).await
    }

    /// Creates a proforma (predračun).
    pub async fn create_proforma(&self, new: NewTradeDocument) -> RegistryResult<Document> {
        self.create_trade(DocumentType::Proforma, new).await
    }

    async fn create_trade(
        &self,
        doc_type: DocumentType,
        new: NewTradeDocument,
    ) -> RegistryResult<Document> {
        validate_trade_submission(&new.counterparty, &new.line_items)?;
        report_rate_anomalies(&new.line_items);

        let (line_items, totals) = freeze_lines(&new.line_items)?;

        let year = new.issue_date.year();
        let seq = self.db.documents().next_seq(doc_type, year).await?;
        let id = format_document_id(doc_type, year, seq);

        let details = TradeDetails {
            due_date: new.due_date,
            payment_method: new.payment_method,
            line_items,
        };
        let kind = match doc_type {
            DocumentType::Invoice => DocumentKind::Invoice(details),
            _ => DocumentKind::Proforma(details),
        };

        let now = Utc::now();
        let doc = Document {
            id: id.clone(),
            status: DocumentStatus::Draft,
            issue_date: new.issue_date,
            counterparty: new.counterparty,
            note: new.note,
            share_token: None,
            net_total_minor: totals.net_total.minor(),
            vat_total_minor: totals.vat_total.minor(),
            gross_total_minor: totals.gross_total.minor(),
            kind,
            created_at: now,
            updated_at: now,
        };

        self.db.documents().insert_document(&doc, seq, year).await?;

        info!(id = %id, gross = %totals.gross_total, "Document created");
        Ok(doc)
    }

    /// Creates a periodic calculation (obračun) from gross turnover.
    pub async fn create_calculation(&self, new: NewCalculation) -> RegistryResult<Document> {
        validate_calculation_submission(&new.counterparty, new.period_month)?;

        let rate = VatRate::from_bps(new.vat_rate_bps);
        if let Some(odd) = vat_rate_anomaly(rate) {
            warn!(rate_bps = odd.bps(), "Non-standard VAT rate on calculation");
        }

        let breakdown =
            calc::reverse_calculate(Money::from_minor(new.gross_turnover_minor), rate)?;

        let year = new.issue_date.year();
        let seq = self
            .db
            .documents()
            .next_seq(DocumentType::Calculation, year)
            .await?;
        let id = format_document_id(DocumentType::Calculation, year, seq);

        let now = Utc::now();
        let doc = Document {
            id: id.clone(),
            status: DocumentStatus::Draft,
            issue_date: new.issue_date,
            counterparty: new.counterparty,
            note: new.note,
            share_token: None,
            // For a calculation the persisted totals mirror the
            // breakdown: net base / VAT share / gross turnover
            net_total_minor: breakdown.net_base.minor(),
            vat_total_minor: breakdown.vat_amount.minor(),
            gross_total_minor: new.gross_turnover_minor,
            kind: DocumentKind::Calculation(CalculationDetails {
                period_month: new.period_month,
                period_year: new.period_year,
                gross_turnover_minor: new.gross_turnover_minor,
                vat_rate_bps: new.vat_rate_bps,
                net_base_minor: breakdown.net_base.minor(),
                vat_amount_minor: breakdown.vat_amount.minor(),
                profit_tax_minor: breakdown.profit_tax.minor(),
            }),
            created_at: now,
            updated_at: now,
        };

        self.db.documents().insert_document(&doc, seq, year).await?;

        info!(id = %id, net_base = %breakdown.net_base, "Calculation created");
        Ok(doc)
    }

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    /// Gets a document by internal id.
    pub async fn get(&self, id: &str) -> RegistryResult<Document> {
        self.db
            .documents()
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Document", id).into())
    }

    /// Resolves a document by internal id or by public share token.
    ///
    /// The two paths are equally direct (one indexed lookup each) and a
    /// miss on either is the same `NotFound`. A token resolving to a
    /// document of a different type is also a miss.
    pub async fn resolve_by_id_or_token(
        &self,
        doc_type: DocumentType,
        id_or_token: &str,
    ) -> RegistryResult<Document> {
        let repo = self.db.documents();

        let found = if doc_type.owns_id(id_or_token) {
            repo.get_by_id(id_or_token).await?
        } else {
            repo.get_by_token(id_or_token).await?
        };

        match found {
            Some(doc) if doc.doc_type() == doc_type => Ok(doc),
            _ => Err(DbError::not_found("Document", id_or_token).into()),
        }
    }

    /// Resolves the public view URL: `/public/{docType}/{docId}?token=…`.
    ///
    /// When a token is present it IS the resolution path; the path id
    /// must then agree with the resolved document. Without a token the
    /// id path is used directly (authenticated contexts).
    pub async fn resolve_public(
        &self,
        doc_type_slug: &str,
        doc_id: &str,
        token: Option<&str>,
    ) -> RegistryResult<PublicDocumentView> {
        let doc_type = DocumentType::from_url_slug(doc_type_slug)
            .ok_or_else(|| DbError::not_found("Document", doc_id))?;

        let doc = match token {
            Some(token) => {
                let doc = self.resolve_by_id_or_token(doc_type, token).await?;
                if doc.id != doc_id {
                    return Err(DbError::not_found("Document", doc_id).into());
                }
                doc
            }
            None => self.resolve_by_id_or_token(doc_type, doc_id).await?,
        };

        // Notes are shown on the public page for this domain; the flag
        // is the field-level redaction seam
        Ok(doc.public_view(true))
    }

    // -------------------------------------------------------------------------
    // Sharing
    // -------------------------------------------------------------------------

    /// Generates the document's share token, on demand and only once.
    ///
    /// Never called implicitly at creation, so an unshared document has
    /// no valid token lookup. Repeated calls return the existing token.
    pub async fn generate_share_token(&self, id: &str) -> RegistryResult<String> {
        let doc = self.get(id).await?;
        if let Some(token) = doc.share_token {
            return Ok(token);
        }

        let token = Uuid::new_v4().simple().to_string();
        if self.db.documents().set_share_token(id, &token).await? {
            info!(id = %id, "Share token generated");
            return Ok(token);
        }

        // Lost a race with another generator; the stored token wins
        let doc = self.get(id).await?;
        doc.share_token
            .ok_or_else(|| DbError::Internal(format!("share token vanished for {id}")).into())
    }

    // -------------------------------------------------------------------------
    // Lifecycle & Editing
    // -------------------------------------------------------------------------

    /// Moves a document to a new status.
    ///
    /// Totals are not touched: they are fixed by the line items,
    /// independent of status.
    pub async fn transition(
        &self,
        id: &str,
        to: DocumentStatus,
    ) -> RegistryResult<Document> {
        let doc = self.get(id).await?;
        lifecycle::check_transition(&doc.id, doc.status, to)?;

        self.db.documents().update_status(id, doc.status, to).await?;

        info!(id = %id, from = doc.status.as_str(), to = to.as_str(), "Status changed");
        self.get(id).await
    }

    /// Replaces the line items of a draft or awaiting-payment document,
    /// recomputing and persisting totals in the same transaction.
    ///
    /// Content of a sent or paid document is immutable; edits fail with
    /// [`CoreError::DocumentLocked`].
    pub async fn replace_line_items(
        &self,
        id: &str,
        lines: Vec<LineItemInput>,
    ) -> RegistryResult<Document> {
        let doc = self.get(id).await?;

        if doc.status.is_locked() {
            return Err(CoreError::DocumentLocked {
                document_id: doc.id,
                status: doc.status,
            }
            .into());
        }

        if matches!(doc.kind, DocumentKind::Calculation(_)) {
            return Err(ValidationError::InvalidFormat {
                field: "line_items".to_string(),
                reason: "calculation documents carry turnover, not line items".to_string(),
            }
            .into());
        }

        report_rate_anomalies(&lines);
        let (items, totals) = freeze_lines(&lines)?;

        self.db
            .documents()
            .replace_items(
                id,
                &items,
                totals.net_total.minor(),
                totals.vat_total.minor(),
                totals.gross_total.minor(),
            )
            .await?;

        self.get(id).await
    }

    /// Deletes a document outright. No soft delete.
    pub async fn delete(&self, id: &str) -> RegistryResult<()> {
        self.db.documents().delete(id).await?;
        info!(id = %id, "Document deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Reports
    // -------------------------------------------------------------------------

    /// Filters stored documents and sums their persisted totals.
    ///
    /// `today` anchors the calendar windows; pass the current date at
    /// the boundary.
    pub async fn report(
        &self,
        query: &FilterQuery,
        today: NaiveDate,
    ) -> RegistryResult<(Vec<Document>, ReportTotals)> {
        if let Some(search) = query.search.as_deref() {
            validate_search_query(search)?;
        }

        let documents = self.db.documents().list_all().await?;
        let hits = filter_documents(&documents, query, today);
        let totals = summarize(hits.iter().copied());

        Ok((hits.into_iter().cloned().collect(), totals))
    }

    // -------------------------------------------------------------------------
    // Payment Links
    // -------------------------------------------------------------------------

    /// Creates a quick payment link with a fresh opaque id.
    pub async fn create_payment_link(&self, new: NewPaymentLink) -> RegistryResult<PaymentLink> {
        if new.name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            }
            .into());
        }
        if new.price_minor <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "price".to_string(),
            }
            .into());
        }

        let link = PaymentLink {
            id: Uuid::new_v4().simple().to_string(),
            name: new.name.trim().to_string(),
            price_minor: new.price_minor,
            description: new.description,
            expires_at: new.expires_at,
            created_at: Utc::now(),
        };

        self.db.payment_links().insert(&link).await?;

        info!(id = %link.id, "Payment link created");
        Ok(link)
    }

    /// Resolves `/pay/{linkId}`.
    ///
    /// An expired link is a plain `NotFound`, indistinguishable from a
    /// link that never existed.
    pub async fn resolve_payment_link(
        &self,
        link_id: &str,
        now: DateTime<Utc>,
    ) -> RegistryResult<PaymentLink> {
        let link = self
            .db
            .payment_links()
            .get_by_id(link_id)
            .await?
            .ok_or_else(|| DbError::not_found("PaymentLink", link_id))?;

        if link.is_expired_at(now) {
            return Err(DbError::not_found("PaymentLink", link_id).into());
        }

        Ok(link)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Builds the business id: prefix, year, zero-padded sequence.
fn format_document_id(doc_type: DocumentType, year: i32, seq: i64) -> String {
    format!("{}-{}-{:03}", doc_type.prefix(), year, seq)
}

/// Logs any line whose VAT rate falls outside the fixed set.
fn report_rate_anomalies(lines: &[LineItemInput]) {
    for line in lines {
        if let Some(rate) = vat_rate_anomaly(line.vat_rate()) {
            warn!(
                rate_bps = rate.bps(),
                description = %line.description,
                "Non-standard VAT rate on line item"
            );
        }
    }
}

/// Computes and freezes per-line totals plus the document totals.
fn freeze_lines(
    lines: &[LineItemInput],
) -> Result<(Vec<LineItem>, DocumentTotals), CoreError> {
    let totals = calc::aggregate(lines)?;

    let mut items = Vec::with_capacity(lines.len());
    for input in lines {
        let computed = calc::compute_line(input.quantity(), input.unit_price(), input.vat_rate())?;
        items.push(LineItem {
            id: Uuid::new_v4().to_string(),
            description: input.description.trim().to_string(),
            quantity_milli: input.quantity_milli,
            unit_price_minor: input.unit_price_minor,
            vat_rate_bps: input.vat_rate_bps,
            net_minor: computed.net.minor(),
            vat_minor: computed.vat.minor(),
            gross_minor: computed.gross.minor(),
        });
    }

    Ok((items, totals))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use fiskal_core::Period;

    async fn registry() -> DocumentRegistry {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        DocumentRegistry::new(db)
    }

    fn counterparty(name: &str) -> Counterparty {
        Counterparty {
            name: name.to_string(),
            address: "Bulevar oslobođenja 1, Beograd".to_string(),
            tax_id: Some("106006802".to_string()),
            registration_id: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invoice_input(issued: NaiveDate) -> NewTradeDocument {
        NewTradeDocument {
            counterparty: counterparty("Alfa doo"),
            issue_date: issued,
            due_date: issued + chrono::Duration::days(15),
            payment_method: PaymentMethod::BankTransfer,
            line_items: vec![
                LineItemInput {
                    description: "Izrada sajta".to_string(),
                    quantity_milli: 3_000,
                    unit_price_minor: 100_000,
                    vat_rate_bps: 2000,
                },
                LineItemInput {
                    description: "Održavanje".to_string(),
                    quantity_milli: 2_000,
                    unit_price_minor: 50_000,
                    vat_rate_bps: 1000,
                },
            ],
            note: Some("Rok plaćanja 15 dana.".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_invoice_assigns_prefixed_sequential_ids() {
        let registry = registry().await;
        let issued = date(2026, 3, 10);

        let first = registry.create_invoice(invoice_input(issued)).await.unwrap();
        let second = registry.create_invoice(invoice_input(issued)).await.unwrap();

        assert_eq!(first.id, "FAK-2026-001");
        assert_eq!(second.id, "FAK-2026-002");
        assert_eq!(first.status, DocumentStatus::Draft);
        assert!(first.share_token.is_none());
    }

    #[tokio::test]
    async fn test_proforma_gets_its_own_prefix_and_sequence() {
        let registry = registry().await;
        let issued = date(2026, 3, 10);

        registry.create_invoice(invoice_input(issued)).await.unwrap();
        let proforma = registry.create_proforma(invoice_input(issued)).await.unwrap();

        assert_eq!(proforma.id, "PR-2026-001");
        assert!(DocumentType::Proforma.owns_id(&proforma.id));
    }

    #[tokio::test]
    async fn test_invoice_totals_match_aggregated_lines() {
        let registry = registry().await;
        let doc = registry
            .create_invoice(invoice_input(date(2026, 3, 10)))
            .await
            .unwrap();

        // 3 × 1000.00 at 20% plus 2 × 500.00 at 10%
        assert_eq!(doc.net_total_minor, 400_000);
        assert_eq!(doc.vat_total_minor, 70_000);
        assert_eq!(doc.gross_total_minor, 470_000);

        // Stored lines carry the frozen per-line figures
        let stored = registry.get(&doc.id).await.unwrap();
        let items = stored.kind.line_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].net_minor, 300_000);
        assert_eq!(items[0].vat_minor, 60_000);
        assert_eq!(items[1].gross_minor, 110_000);
    }

    #[tokio::test]
    async fn test_submission_requires_a_described_line() {
        let registry = registry().await;
        let mut input = invoice_input(date(2026, 3, 10));
        input.line_items.clear();

        let err = registry.create_invoice(input).await.unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Core(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[tokio::test]
    async fn test_create_calculation_derives_breakdown() {
        let registry = registry().await;
        let doc = registry
            .create_calculation(NewCalculation {
                counterparty: counterparty("Moja radnja"),
                issue_date: date(2026, 7, 1),
                period_month: 6,
                period_year: 2026,
                gross_turnover_minor: 12_000_000,
                vat_rate_bps: 2000,
                note: None,
            })
            .await
            .unwrap();

        assert_eq!(doc.id, "OBR-2026-001");
        match &doc.kind {
            DocumentKind::Calculation(calc) => {
                assert_eq!(calc.net_base_minor, 10_000_000);
                assert_eq!(calc.vat_amount_minor, 2_000_000);
                assert_eq!(calc.profit_tax_minor, 1_500_000);
            }
            other => panic!("unexpected kind: {other:?}"),
        }

        // Persisted totals mirror the breakdown, so reports include
        // calculations with no special casing
        assert_eq!(doc.net_total_minor, 10_000_000);
        assert_eq!(doc.vat_total_minor, 2_000_000);
        assert_eq!(doc.gross_total_minor, 12_000_000);

        // And the stored row reassembles the same payload
        let stored = registry.get("OBR-2026-001").await.unwrap();
        assert_eq!(stored.id, doc.id);
        assert_eq!(stored.kind, doc.kind);
        assert_eq!(stored.gross_total_minor, doc.gross_total_minor);
    }

    #[tokio::test]
    async fn test_negative_turnover_is_invalid_amount() {
        let registry = registry().await;
        let err = registry
            .create_calculation(NewCalculation {
                counterparty: counterparty("Moja radnja"),
                issue_date: date(2026, 7, 1),
                period_month: 6,
                period_year: 2026,
                gross_turnover_minor: -1,
                vat_rate_bps: 2000,
                note: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RegistryError::Core(CoreError::InvalidAmount { .. })
        ));
    }

    #[tokio::test]
    async fn test_lifecycle_happy_path() {
        let registry = registry().await;
        let doc = registry
            .create_invoice(invoice_input(date(2026, 3, 10)))
            .await
            .unwrap();

        let doc = registry
            .transition(&doc.id, DocumentStatus::AwaitingPayment)
            .await
            .unwrap();
        let doc = registry.transition(&doc.id, DocumentStatus::Sent).await.unwrap();
        let doc = registry.transition(&doc.id, DocumentStatus::Paid).await.unwrap();

        assert_eq!(doc.status, DocumentStatus::Paid);
    }

    #[tokio::test]
    async fn test_draft_cannot_jump_to_sent() {
        let registry = registry().await;
        let doc = registry
            .create_invoice(invoice_input(date(2026, 3, 10)))
            .await
            .unwrap();

        let err = registry
            .transition(&doc.id, DocumentStatus::Sent)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Core(CoreError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_paid_cannot_return_to_draft() {
        let registry = registry().await;
        let doc = registry
            .create_invoice(invoice_input(date(2026, 3, 10)))
            .await
            .unwrap();
        registry
            .transition(&doc.id, DocumentStatus::AwaitingPayment)
            .await
            .unwrap();
        registry.transition(&doc.id, DocumentStatus::Paid).await.unwrap();

        let err = registry
            .transition(&doc.id, DocumentStatus::Draft)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Core(CoreError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_unshared_document_has_no_token_lookup() {
        let registry = registry().await;
        registry
            .create_invoice(invoice_input(date(2026, 3, 10)))
            .await
            .unwrap();

        let err = registry
            .resolve_by_id_or_token(DocumentType::Invoice, "0123456789abcdef0123456789abcdef")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Db(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_token_resolution_matches_id_resolution() {
        let registry = registry().await;
        let doc = registry
            .create_invoice(invoice_input(date(2026, 3, 10)))
            .await
            .unwrap();

        let token = registry.generate_share_token(&doc.id).await.unwrap();

        let by_id = registry
            .resolve_by_id_or_token(DocumentType::Invoice, &doc.id)
            .await
            .unwrap();
        let by_token = registry
            .resolve_by_id_or_token(DocumentType::Invoice, &token)
            .await
            .unwrap();

        assert_eq!(by_id, by_token);
    }

    #[tokio::test]
    async fn test_share_token_generation_is_idempotent() {
        let registry = registry().await;
        let doc = registry
            .create_invoice(invoice_input(date(2026, 3, 10)))
            .await
            .unwrap();

        let first = registry.generate_share_token(&doc.id).await.unwrap();
        let second = registry.generate_share_token(&doc.id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_token_of_wrong_type_is_not_found() {
        let registry = registry().await;
        let doc = registry
            .create_invoice(invoice_input(date(2026, 3, 10)))
            .await
            .unwrap();
        let token = registry.generate_share_token(&doc.id).await.unwrap();

        // The invoice's token does not resolve as a proforma
        let err = registry
            .resolve_by_id_or_token(DocumentType::Proforma, &token)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Db(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_public_url_resolution() {
        let registry = registry().await;
        let doc = registry
            .create_invoice(invoice_input(date(2026, 3, 10)))
            .await
            .unwrap();
        let token = registry.generate_share_token(&doc.id).await.unwrap();

        // Token path
        let view = registry
            .resolve_public("faktura", &doc.id, Some(&token))
            .await
            .unwrap();
        assert_eq!(view.id, doc.id);
        assert_eq!(view.gross_total_minor, doc.gross_total_minor);
        // Notes are shown for this domain
        assert_eq!(view.note.as_deref(), Some("Rok plaćanja 15 dana."));

        // Id path (no token)
        let view = registry.resolve_public("faktura", &doc.id, None).await.unwrap();
        assert_eq!(view.id, doc.id);

        // Token pointing at a different id than the path is a miss
        let err = registry
            .resolve_public("faktura", "FAK-2026-999", Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Db(DbError::NotFound { .. })));

        // Unknown slug is a miss, not a panic
        let err = registry
            .resolve_public("racun", &doc.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Db(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_replace_line_items_recomputes_totals() {
        let registry = registry().await;
        let doc = registry
            .create_invoice(invoice_input(date(2026, 3, 10)))
            .await
            .unwrap();

        let doc = registry
            .replace_line_items(
                &doc.id,
                vec![LineItemInput {
                    description: "Konsultacije".to_string(),
                    quantity_milli: 2_500,
                    unit_price_minor: 40_000,
                    vat_rate_bps: 2000,
                }],
            )
            .await
            .unwrap();

        // 2.5 × 400.00 = 1000.00 net, 200.00 VAT
        assert_eq!(doc.net_total_minor, 100_000);
        assert_eq!(doc.vat_total_minor, 20_000);
        assert_eq!(doc.gross_total_minor, 120_000);
        assert_eq!(doc.kind.line_items().len(), 1);
    }

    #[tokio::test]
    async fn test_sent_document_content_is_locked() {
        let registry = registry().await;
        let doc = registry
            .create_invoice(invoice_input(date(2026, 3, 10)))
            .await
            .unwrap();
        registry
            .transition(&doc.id, DocumentStatus::AwaitingPayment)
            .await
            .unwrap();
        registry.transition(&doc.id, DocumentStatus::Sent).await.unwrap();

        let err = registry
            .replace_line_items(&doc.id, vec![])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Core(CoreError::DocumentLocked { .. })
        ));

        // Totals unchanged by the rejected edit
        let stored = registry.get(&doc.id).await.unwrap();
        assert_eq!(stored.gross_total_minor, 470_000);
    }

    #[tokio::test]
    async fn test_delete_is_final() {
        let registry = registry().await;
        let doc = registry
            .create_invoice(invoice_input(date(2026, 3, 10)))
            .await
            .unwrap();

        registry.delete(&doc.id).await.unwrap();

        let err = registry.get(&doc.id).await.unwrap_err();
        assert!(matches!(err, RegistryError::Db(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_report_filters_and_sums_persisted_totals() {
        let registry = registry().await;

        registry
            .create_invoice(invoice_input(date(2026, 8, 1)))
            .await
            .unwrap();
        registry
            .create_invoice(invoice_input(date(2026, 7, 15)))
            .await
            .unwrap();
        registry
            .create_proforma(invoice_input(date(2026, 8, 3)))
            .await
            .unwrap();

        let (hits, totals) = registry
            .report(
                &FilterQuery {
                    period: Period::CurrentMonth,
                    doc_type: Some(DocumentType::Invoice),
                    ..Default::default()
                },
                date(2026, 8, 7),
            )
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].issue_date, date(2026, 8, 1));
        assert_eq!(totals.total_amount.minor(), 470_000);
        assert_eq!(totals.total_net.minor(), 400_000);
    }

    #[tokio::test]
    async fn test_payment_link_roundtrip_and_expiry() {
        let registry = registry().await;
        let now = Utc::now();

        let link = registry
            .create_payment_link(NewPaymentLink {
                name: "Brza uplata".to_string(),
                price_minor: 250_000,
                description: Some("Avans za projekat".to_string()),
                expires_at: Some(now + chrono::Duration::days(7)),
            })
            .await
            .unwrap();

        let resolved = registry.resolve_payment_link(&link.id, now).await.unwrap();
        assert_eq!(resolved.id, link.id);
        assert_eq!(resolved.name, "Brza uplata");
        assert_eq!(resolved.price_minor, 250_000);
        assert_eq!(resolved.description.as_deref(), Some("Avans za projekat"));

        // Past expiry the link is a plain miss
        let err = registry
            .resolve_payment_link(&link.id, now + chrono::Duration::days(8))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Db(DbError::NotFound { .. })));

        // Unknown ids miss the same way
        let err = registry
            .resolve_payment_link("feedfacefeedfacefeedfacefeedface", now)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Db(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_payment_link_validation() {
        let registry = registry().await;

        let err = registry
            .create_payment_link(NewPaymentLink {
                name: "  ".to_string(),
                price_minor: 100,
                description: None,
                expires_at: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Core(CoreError::Validation(_))));

        let err = registry
            .create_payment_link(NewPaymentLink {
                name: "Uplata".to_string(),
                price_minor: 0,
                description: None,
                expires_at: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Core(CoreError::Validation(_))));
    }
}
