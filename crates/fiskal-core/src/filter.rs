//! # Filter/Report Engine
//!
//! Filters a document collection and sums report totals.
//!
//! Filtering is conjunctive: every provided predicate (type AND status
//! AND period AND free-text) must match. The free-text predicate matches
//! case-insensitively on counterparty name or document id.
//!
//! Summarization sums the totals already persisted per document. It does
//! not re-run the aggregator, so reports reflect whatever was last
//! computed and saved for each document. Reads stay cheap.
//!
//! "Today" is an explicit argument so period windows are deterministic
//! and testable; callers pass the current date at the boundary.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Document, FilterQuery, Period};

// =============================================================================
// Period Windows
// =============================================================================

/// Checks whether a date falls inside the period window relative to `today`.
fn period_contains(period: Period, date: NaiveDate, today: NaiveDate) -> bool {
    match period {
        Period::All => true,
        Period::CurrentMonth => {
            date.year() == today.year() && date.month() == today.month()
        }
        Period::PreviousMonth => {
            // January rolls back to December of the prior year
            let (prev_year, prev_month) = if today.month() == 1 {
                (today.year() - 1, 12)
            } else {
                (today.year(), today.month() - 1)
            };
            date.year() == prev_year && date.month() == prev_month
        }
        Period::CurrentYear => date.year() == today.year(),
    }
}

/// Checks whether one document matches the whole query.
fn matches(doc: &Document, query: &FilterQuery, today: NaiveDate) -> bool {
    if let Some(doc_type) = query.doc_type {
        if doc.doc_type() != doc_type {
            return false;
        }
    }

    if let Some(status) = query.status {
        if doc.status != status {
            return false;
        }
    }

    if !period_contains(query.period, doc.issue_date, today) {
        return false;
    }

    if let Some(search) = query.search.as_deref() {
        let needle = search.trim().to_lowercase();
        if !needle.is_empty() {
            let in_name = doc.counterparty.name.to_lowercase().contains(&needle);
            let in_id = doc.id.to_lowercase().contains(&needle);
            if !in_name && !in_id {
                return false;
            }
        }
    }

    true
}

/// Filters a document slice, preserving order.
pub fn filter_documents<'a>(
    documents: &'a [Document],
    query: &FilterQuery,
    today: NaiveDate,
) -> Vec<&'a Document> {
    documents
        .iter()
        .filter(|doc| matches(doc, query, today))
        .collect()
}

// =============================================================================
// Summarization
// =============================================================================

/// Report totals over a filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReportTotals {
    /// Sum of persisted gross totals.
    pub total_amount: Money,
    /// Sum of persisted VAT totals.
    pub total_vat: Money,
    /// Sum of persisted net totals.
    pub total_net: Money,
}

/// Sums the persisted per-document totals.
pub fn summarize<'a, I>(documents: I) -> ReportTotals
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut totals = ReportTotals::default();
    for doc in documents {
        totals.total_amount += doc.gross_total();
        totals.total_vat += doc.vat_total();
        totals.total_net += doc.net_total();
    }
    totals
}

// =============================================================================
// Unit Tests
// =============================================================================
