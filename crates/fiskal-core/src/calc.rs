//! # Document Calculators
//!
//! The three pure calculators of the engine:
//!
//! - [`compute_line`]: quantity × unit price at a VAT rate → one line's
//!   net/VAT/gross
//! - [`aggregate`]: line inputs → document totals
//! - [`reverse_calculate`]: gross turnover at a VAT rate → tax base, VAT
//!   share and profit tax (the periodic "obračun")
//!
//! All three are deterministic, side-effect free and safe under any
//! number of concurrent callers. Results are in minor currency units,
//! rounded half-up exactly once per figure.
//!
//! ## Where Rounding Happens
//! ```text
//! quantity × price ──round──► net ──round──► vat
//!                                │             │
//!                                └──── + ──────┘
//!                                      │
//!                                    gross        (no third rounding:
//!                                                  gross = net + vat holds
//!                                                  exactly by construction)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{round_half_up, Money, Quantity};
use crate::types::{LineItemInput, VatRate};
use crate::PROFIT_TAX_RATE_BPS;

// =============================================================================
// Line Totals
// =============================================================================

/// Computed totals for a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTotals {
    pub net: Money,
    pub vat: Money,
    pub gross: Money,
}

/// Computes net/VAT/gross for one line.
///
/// ## Contract
/// - `quantity` must be positive, `unit_price` non-negative; violations
///   fail with [`CoreError::InvalidAmount`]
/// - any numeric VAT rate is accepted; a rate outside {0%, 10%, 20%} is
///   an anomaly the caller reports, not a computation error
/// - `gross == net + vat` exactly
///
/// ## Example
/// ```rust
/// use fiskal_core::calc::compute_line;
/// use fiskal_core::money::{Money, Quantity};
/// use fiskal_core::types::VatRate;
///
/// let totals = compute_line(
///     Quantity::from_whole(3),
///     Money::from_minor(100_000),
///     VatRate::from_percent(20),
/// ).unwrap();
///
/// assert_eq!(totals.net.minor(), 300_000);
/// assert_eq!(totals.vat.minor(), 60_000);
/// assert_eq!(totals.gross.minor(), 360_000);
/// ```
pub fn compute_line(
    quantity: Quantity,
    unit_price: Money,
    vat_rate: VatRate,
) -> CoreResult<LineTotals> {
    if !quantity.is_positive() {
        return Err(CoreError::InvalidAmount {
            field: "quantity",
            value: quantity.milli(),
        });
    }
    if unit_price.is_negative() {
        return Err(CoreError::InvalidAmount {
            field: "unit_price",
            value: unit_price.minor(),
        });
    }

    let net = unit_price.times_quantity(quantity);
    let vat = net.vat_amount(vat_rate);

    Ok(LineTotals {
        net,
        vat,
        gross: net + vat,
    })
}

// =============================================================================
// Document Totals
// =============================================================================

/// Aggregated totals of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DocumentTotals {
    pub net_total: Money,
    pub vat_total: Money,
    pub gross_total: Money,
}

/// Sums line computations into document totals.
///
/// An empty list yields all-zero totals: a draft may be saved with zero
/// lines in intermediate states. Final submission requirements (at least
/// one line with a description) live in [`crate::validation`], not here.
///
/// Because each line satisfies `gross == net + vat` and the totals are
/// plain sums, `gross_total == net_total + vat_total` holds exactly with
/// no independent rounding drift.
pub fn aggregate(lines: &[LineItemInput]) -> CoreResult<DocumentTotals> {
    let mut totals = DocumentTotals::default();

    for line in lines {
        let computed = compute_line(
            Quantity::from_milli(line.quantity_milli),
            Money::from_minor(line.unit_price_minor),
            VatRate::from_bps(line.vat_rate_bps),
        )?;
        totals.net_total += computed.net;
        totals.vat_total += computed.vat;
        totals.gross_total += computed.gross;
    }

    Ok(totals)
}

// =============================================================================
// Reverse Tax Calculation (Obračun)
// =============================================================================

/// Derived breakdown of a period's gross turnover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnoverBreakdown {
    /// Tax base (osnovica): turnover with VAT stripped out.
    pub net_base: Money,
    /// VAT share of the turnover.
    pub vat_amount: Money,
    /// Profit tax at the fixed 15% rate.
    pub profit_tax: Money,
}

/// Derives tax base, VAT and profit tax from known gross turnover.
///
/// - `net_base = gross / (1 + rate/100)`, in integer math
///   `gross × 10000 / (10000 + bps)` rounded half-up
/// - `vat_amount = gross - net_base`, so base + VAT reassemble the
///   turnover exactly
/// - `profit_tax = net_base × 15%` (policy constant, not configurable)
///
/// A zero rate passes the turnover through: base = gross, VAT = 0.
/// Negative turnover fails with [`CoreError::InvalidAmount`].
///
/// ## Example
/// ```rust
/// use fiskal_core::calc::reverse_calculate;
/// use fiskal_core::money::Money;
/// use fiskal_core::types::VatRate;
///
/// // 120000.00 gross at 20% → base 100000.00, VAT 20000.00, tax 15000.00
/// let breakdown = reverse_calculate(
///     Money::from_minor(12_000_000),
///     VatRate::from_percent(20),
/// ).unwrap();
///
/// assert_eq!(breakdown.net_base.minor(), 10_000_000);
/// assert_eq!(breakdown.vat_amount.minor(), 2_000_000);
/// assert_eq!(breakdown.profit_tax.minor(), 1_500_000);
/// ```
pub fn reverse_calculate(
    gross_turnover: Money,
    vat_rate: VatRate,
) -> CoreResult<TurnoverBreakdown> {
    if gross_turnover.is_negative() {
        return Err(CoreError::InvalidAmount {
            field: "gross_turnover",
            value: gross_turnover.minor(),
        });
    }

    let divisor = 10_000 + vat_rate.bps() as i128;
    let net_base = Money::from_minor(round_half_up(
        gross_turnover.minor() as i128 * 10_000,
        divisor,
    ));
    let vat_amount = gross_turnover - net_base;
    let profit_tax = Money::from_minor(round_half_up(
        net_base.minor() as i128 * PROFIT_TAX_RATE_BPS as i128,
        10_000,
    ));

    Ok(TurnoverBreakdown {
        net_base,
        vat_amount,
        profit_tax,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
