//! # Domain Types
//!
//! Core domain types for the document engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Document     │   │    LineItem     │   │  PaymentLink    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (FAK-…)     │   │  description    │   │  id (opaque)    │       │
//! │  │  status         │   │  quantity_milli │   │  price_minor    │       │
//! │  │  counterparty   │   │  vat_rate_bps   │   │  expires_at     │       │
//! │  │  kind (tagged)  │   │  net/vat/gross  │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    VatRate      │   │ DocumentStatus  │   │ PaymentMethod   │       │
//! │  │  bps (u32)      │   │  Draft          │   │  BankTransfer   │       │
//! │  │  2000 = 20%     │   │  AwaitingPayment│   │  Cash           │       │
//! │  └─────────────────┘   │  Sent / Paid    │   │  Card           │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tagged Document Kinds
//! Invoices and proformas carry line items; a periodic calculation carries
//! gross turnover and its derived breakdown. The two shapes are a tagged
//! variant (`DocumentKind`), validated at the boundary before entering the
//! core, never a loose settings blob.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{Money, Quantity};
use crate::STANDARD_VAT_RATES_BPS;

// =============================================================================
// VAT Rate
// =============================================================================

/// VAT rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 2000 bps = 20% (the standard rate), 1000 bps = 10% (reduced)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatRate(u32);

impl VatRate {
    /// Creates a VAT rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        VatRate(bps)
    }

    /// Creates a VAT rate from whole percent (20 → 20%).
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        VatRate(pct * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero VAT rate.
    #[inline]
    pub const fn zero() -> Self {
        VatRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks membership in the fixed rate set {0%, 10%, 20%}.
    ///
    /// Other rates are still computed, but callers report them as an
    /// anomaly (see `validation::vat_rate_anomaly`).
    pub fn is_standard(&self) -> bool {
        STANDARD_VAT_RATES_BPS.contains(&self.0)
    }
}

impl Default for VatRate {
    fn default() -> Self {
        VatRate::zero()
    }
}

// =============================================================================
// Document Type & Status
// =============================================================================

/// The kind of commercial document, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Faktura: final, payment-due invoice.
    Invoice,
    /// Predračun: non-binding pre-payment quote.
    Proforma,
    /// Obračun: periodic tax calculation from gross turnover.
    Calculation,
}

impl DocumentType {
    /// Human-readable id prefix. Document ids look like `FAK-2026-001`.
    pub const fn prefix(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "FAK",
            DocumentType::Proforma => "PR",
            DocumentType::Calculation => "OBR",
        }
    }

    /// Path segment used by the public view URL (`/public/{docType}/{docId}`).
    pub const fn url_slug(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "faktura",
            DocumentType::Proforma => "predracun",
            DocumentType::Calculation => "obracun",
        }
    }

    /// Parses the public URL slug.
    pub fn from_url_slug(slug: &str) -> Option<Self> {
        match slug {
            "faktura" => Some(DocumentType::Invoice),
            "predracun" => Some(DocumentType::Proforma),
            "obracun" => Some(DocumentType::Calculation),
            _ => None,
        }
    }

    /// Checks whether a document id carries this type's prefix.
    ///
    /// Invariant: a stored document's id prefix always matches its type;
    /// the registry builds ids and never accepts them from callers.
    pub fn owns_id(&self, id: &str) -> bool {
        id.strip_prefix(self.prefix())
            .map(|rest| rest.starts_with('-'))
            .unwrap_or(false)
    }

    /// Storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::Proforma => "proforma",
            DocumentType::Calculation => "calculation",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "invoice" => Some(DocumentType::Invoice),
            "proforma" => Some(DocumentType::Proforma),
            "calculation" => Some(DocumentType::Calculation),
            _ => None,
        }
    }
}

/// The status of a document.
///
/// Transitions are governed by [`crate::lifecycle`]; the status field
/// never moves backwards to `Draft` once the document has been sent or
/// paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Being edited, content still mutable.
    Draft,
    /// Finalized and waiting on the counterparty.
    AwaitingPayment,
    /// Delivered to the counterparty. Content is frozen.
    Sent,
    /// Settled. Terminal state.
    Paid,
}

impl DocumentStatus {
    /// Content of a sent or paid document is immutable.
    pub const fn is_locked(&self) -> bool {
        matches!(self, DocumentStatus::Sent | DocumentStatus::Paid)
    }

    /// Storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::AwaitingPayment => "awaiting_payment",
            DocumentStatus::Sent => "sent",
            DocumentStatus::Paid => "paid",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(DocumentStatus::Draft),
            "awaiting_payment" => Some(DocumentStatus::AwaitingPayment),
            "sent" => Some(DocumentStatus::Sent),
            "paid" => Some(DocumentStatus::Paid),
            _ => None,
        }
    }
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::Draft
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Wire transfer to the issuer's account. The default for invoices.
    BankTransfer,
    /// Physical cash payment.
    Cash,
    /// Card payment.
    Card,
}

impl PaymentMethod {
    /// Storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            _ => None,
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::BankTransfer
    }
}

// =============================================================================
// Counterparty
// =============================================================================

/// The party a document is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Counterparty {
    /// Legal or display name. Required at submission.
    pub name: String,

    /// Street address, free form.
    pub address: String,

    /// Tax identification number (PIB), when known.
    pub tax_id: Option<String>,

    /// Company registration number (matični broj), when known.
    pub registration_id: Option<String>,
}

// =============================================================================
// Line Item
// =============================================================================

/// A line on an invoice or proforma.
///
/// Totals are computed by [`crate::calc::compute_line`] and frozen onto
/// the item when the document is saved; they are never hand-edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// What is being billed. Required, non-empty at submission.
    pub description: String,

    /// Quantity in thousandths of a unit (2500 = 2.5).
    pub quantity_milli: i64,

    /// Unit price in minor currency units.
    pub unit_price_minor: i64,

    /// VAT rate in basis points (2000 = 20%).
    pub vat_rate_bps: u32,

    /// Net line total, computed and frozen at save time.
    pub net_minor: i64,

    /// VAT amount, computed and frozen at save time.
    pub vat_minor: i64,

    /// Gross line total, computed and frozen at save time.
    pub gross_minor: i64,
}

impl LineItem {
    /// Returns the quantity.
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_milli(self.quantity_milli)
    }

    /// Returns the unit price.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_minor(self.unit_price_minor)
    }

    /// Returns the VAT rate.
    #[inline]
    pub fn vat_rate(&self) -> VatRate {
        VatRate::from_bps(self.vat_rate_bps)
    }
}

/// Caller-supplied line input, before computation freezes the totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    pub description: String,
    pub quantity_milli: i64,
    pub unit_price_minor: i64,
    pub vat_rate_bps: u32,
}

impl LineItemInput {
    /// Returns the quantity.
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_milli(self.quantity_milli)
    }

    /// Returns the unit price.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_minor(self.unit_price_minor)
    }

    /// Returns the VAT rate.
    #[inline]
    pub fn vat_rate(&self) -> VatRate {
        VatRate::from_bps(self.vat_rate_bps)
    }
}

// =============================================================================
// Document
// =============================================================================

/// Per-type payload of a document.
///
/// A tagged variant, not an untyped blob: an invoice without line items
/// or a calculation with them cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentKind {
    /// Faktura.
    Invoice(TradeDetails),
    /// Predračun.
    Proforma(TradeDetails),
    /// Obračun.
    Calculation(CalculationDetails),
}

impl DocumentKind {
    /// Returns the bare document type.
    pub const fn doc_type(&self) -> DocumentType {
        match self {
            DocumentKind::Invoice(_) => DocumentType::Invoice,
            DocumentKind::Proforma(_) => DocumentType::Proforma,
            DocumentKind::Calculation(_) => DocumentType::Calculation,
        }
    }

    /// Line items, empty for calculations.
    pub fn line_items(&self) -> &[LineItem] {
        match self {
            DocumentKind::Invoice(t) | DocumentKind::Proforma(t) => &t.line_items,
            DocumentKind::Calculation(_) => &[],
        }
    }
}

/// Payload shared by invoices and proformas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeDetails {
    /// Payment deadline.
    pub due_date: NaiveDate,

    /// How the counterparty is expected to pay.
    pub payment_method: PaymentMethod,

    /// Ordered billing lines.
    pub line_items: Vec<LineItem>,
}

/// Payload of a periodic tax calculation.
///
/// The derived figures are frozen by [`crate::calc::reverse_calculate`]
/// at save time, like line totals on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationDetails {
    /// Calendar month the turnover covers (1-12).
    pub period_month: u32,

    /// Calendar year the turnover covers.
    pub period_year: i32,

    /// Gross turnover for the period, VAT included.
    pub gross_turnover_minor: i64,

    /// VAT rate applied when deriving the base.
    pub vat_rate_bps: u32,

    /// Derived tax base (osnovica).
    pub net_base_minor: i64,

    /// Derived VAT share of the turnover.
    pub vat_amount_minor: i64,

    /// Derived profit tax (fixed 15% of the base).
    pub profit_tax_minor: i64,
}

/// A tax-bearing commercial document.
///
/// ## Invariants
/// - `id` prefix matches the document type (`FAK-`, `PR-`, `OBR-`)
/// - document totals equal the sum of line totals (trade documents) or
///   mirror the reverse-calculation breakdown (calculations); they are
///   recomputed by the engine on every content write, never hand-edited
/// - `share_token` exists only after an explicit share request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Business id with type prefix, year and sequence: `FAK-2026-001`.
    pub id: String,

    /// Lifecycle status.
    pub status: DocumentStatus,

    /// Date the document was issued.
    pub issue_date: NaiveDate,

    /// Addressee.
    pub counterparty: Counterparty,

    /// Free-form note, shown on the public view for this domain.
    pub note: Option<String>,

    /// Opaque public sharing token. None until explicitly shared.
    pub share_token: Option<String>,

    /// Persisted net total in minor units.
    pub net_total_minor: i64,

    /// Persisted VAT total in minor units.
    pub vat_total_minor: i64,

    /// Persisted gross total in minor units.
    pub gross_total_minor: i64,

    /// Per-type payload.
    pub kind: DocumentKind,

    /// When the document was created.
    pub created_at: DateTime<Utc>,

    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Returns the bare document type.
    #[inline]
    pub fn doc_type(&self) -> DocumentType {
        self.kind.doc_type()
    }

    /// Net total as Money.
    #[inline]
    pub fn net_total(&self) -> Money {
        Money::from_minor(self.net_total_minor)
    }

    /// VAT total as Money.
    #[inline]
    pub fn vat_total(&self) -> Money {
        Money::from_minor(self.vat_total_minor)
    }

    /// Gross total as Money.
    #[inline]
    pub fn gross_total(&self) -> Money {
        Money::from_minor(self.gross_total_minor)
    }

    /// Projects the document onto its public (unauthenticated) view.
    ///
    /// The share token and internal timestamps never leave this function.
    /// `include_note` is the field-level redaction seam: the note is
    /// shown for this domain, but a caller can withhold it.
    pub fn public_view(&self, include_note: bool) -> PublicDocumentView {
        PublicDocumentView {
            id: self.id.clone(),
            doc_type: self.doc_type(),
            status: self.status,
            issue_date: self.issue_date,
            counterparty: self.counterparty.clone(),
            note: if include_note { self.note.clone() } else { None },
            net_total_minor: self.net_total_minor,
            vat_total_minor: self.vat_total_minor,
            gross_total_minor: self.gross_total_minor,
            kind: self.kind.clone(),
        }
    }
}

/// What an unauthenticated viewer (and every render consumer) receives:
/// the persisted totals plus the raw line items, never values recomputed
/// on the fly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicDocumentView {
    pub id: String,
    pub doc_type: DocumentType,
    pub status: DocumentStatus,
    pub issue_date: NaiveDate,
    pub counterparty: Counterparty,
    pub note: Option<String>,
    pub net_total_minor: i64,
    pub vat_total_minor: i64,
    pub gross_total_minor: i64,
    pub kind: DocumentKind,
}

// =============================================================================
// Payment Link
// =============================================================================

/// A lightweight "quick payment" record, resolved by its opaque id at
/// `/pay/{linkId}`. Separate from full documents but sharing the
/// token-resolution pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLink {
    /// Opaque link id, also the URL segment.
    pub id: String,

    /// What is being paid for.
    pub name: String,

    /// Price in minor units.
    pub price_minor: i64,

    /// Optional longer description.
    pub description: Option<String>,

    /// Expiry; an expired link no longer resolves.
    pub expires_at: Option<DateTime<Utc>>,

    /// When the link was created.
    pub created_at: DateTime<Utc>,
}

impl PaymentLink {
    /// Checks whether the link is expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }
}

// =============================================================================
// Filtering
// =============================================================================

/// Calendar window for document filtering, relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// No date restriction.
    #[default]
    All,
    /// Same calendar month and year as today.
    CurrentMonth,
    /// The calendar month immediately prior, with year rollover at January.
    PreviousMonth,
    /// Same calendar year as today.
    CurrentYear,
}

/// Conjunctive document filter: every provided predicate must match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FilterQuery {
    /// Date window relative to today.
    pub period: Period,

    /// Restrict to one status.
    pub status: Option<DocumentStatus>,

    /// Restrict to one document type.
    pub doc_type: Option<DocumentType>,

    /// Case-insensitive substring match on counterparty name or id.
    pub search: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vat_rate_from_percent() {
        let rate = VatRate::from_percent(20);
        assert_eq!(rate.bps(), 2000);
        assert!((rate.percent() - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_vat_rate_standard_set() {
        assert!(VatRate::from_percent(0).is_standard());
        assert!(VatRate::from_percent(10).is_standard());
        assert!(VatRate::from_percent(20).is_standard());
        assert!(!VatRate::from_percent(19).is_standard());
        assert!(!VatRate::from_bps(825).is_standard());
    }

    #[test]
    fn test_document_type_prefix_and_slug() {
        assert_eq!(DocumentType::Invoice.prefix(), "FAK");
        assert_eq!(DocumentType::Proforma.prefix(), "PR");
        assert_eq!(DocumentType::Calculation.prefix(), "OBR");

        assert_eq!(DocumentType::from_url_slug("faktura"), Some(DocumentType::Invoice));
        assert_eq!(DocumentType::from_url_slug("obracun"), Some(DocumentType::Calculation));
        assert_eq!(DocumentType::from_url_slug("nope"), None);
    }

    #[test]
    fn test_owns_id_checks_prefix() {
        assert!(DocumentType::Invoice.owns_id("FAK-2026-001"));
        assert!(!DocumentType::Invoice.owns_id("PR-2026-001"));
        // "FAK" alone is not an id, and "FAKX-…" is not a FAK prefix
        assert!(!DocumentType::Invoice.owns_id("FAK"));
        assert!(!DocumentType::Invoice.owns_id("FAKX-2026-001"));
        // PR is not a prefix of OBR ids even though both contain "R"
        assert!(!DocumentType::Proforma.owns_id("OBR-2026-001"));
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            DocumentStatus::Draft,
            DocumentStatus::AwaitingPayment,
            DocumentStatus::Sent,
            DocumentStatus::Paid,
        ] {
            assert_eq!(DocumentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DocumentStatus::parse("voided"), None);
    }

    #[test]
    fn test_locked_statuses() {
        assert!(!DocumentStatus::Draft.is_locked());
        assert!(!DocumentStatus::AwaitingPayment.is_locked());
        assert!(DocumentStatus::Sent.is_locked());
        assert!(DocumentStatus::Paid.is_locked());
    }

    #[test]
    fn test_status_wire_shape_is_snake_case() {
        let json = serde_json::to_string(&DocumentStatus::AwaitingPayment).unwrap();
        assert_eq!(json, "\"awaiting_payment\"");
    }

    #[test]
    fn test_payment_link_expiry() {
        let now = Utc::now();
        let link = PaymentLink {
            id: "abc".to_string(),
            name: "Consulting".to_string(),
            price_minor: 10_000,
            description: None,
            expires_at: Some(now - chrono::Duration::hours(1)),
            created_at: now - chrono::Duration::days(1),
        };
        assert!(link.is_expired_at(now));

        let open_ended = PaymentLink { expires_at: None, ..link };
        assert!(!open_ended.is_expired_at(now));
    }
}
