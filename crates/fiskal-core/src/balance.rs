//! # Balance Sheet Validator
//!
//! Sums the asset, liability and equity sections of a balance sheet
//! snapshot and checks the accounting equality
//! `assets = liabilities + equity`.
//!
//! The validator never raises on imbalance. It reports a boolean plus
//! both totals so the caller can render a warning. Leaf values are
//! expected to be non-negative currency amounts, but the engine only
//! sums them; it does not enforce non-negativity.
//!
//! Derived totals are computed on read. They are never persisted as the
//! source of truth.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::BALANCE_TOLERANCE_MINOR;

// =============================================================================
// Snapshot Structure
// =============================================================================

/// Short-life assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CurrentAssets {
    pub cash: Money,
    pub accounts_receivable: Money,
    pub inventory: Money,
    pub other: Money,
}

impl CurrentAssets {
    fn sum(&self) -> Money {
        self.cash + self.accounts_receivable + self.inventory + self.other
    }
}

/// Long-life assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FixedAssets {
    pub equipment: Money,
    pub buildings: Money,
    pub land: Money,
    pub other: Money,
}

impl FixedAssets {
    fn sum(&self) -> Money {
        self.equipment + self.buildings + self.land + self.other
    }
}

/// Obligations due within the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CurrentLiabilities {
    pub accounts_payable: Money,
    pub short_term_loans: Money,
    pub taxes_payable: Money,
    pub other: Money,
}

impl CurrentLiabilities {
    fn sum(&self) -> Money {
        self.accounts_payable + self.short_term_loans + self.taxes_payable + self.other
    }
}

/// Obligations due beyond the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LongTermLiabilities {
    pub bank_loans: Money,
    pub leasing: Money,
    pub other: Money,
}

impl LongTermLiabilities {
    fn sum(&self) -> Money {
        self.bank_loans + self.leasing + self.other
    }
}

/// Owner's stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Equity {
    pub owner_equity: Money,
    pub retained_earnings: Money,
    pub additional_paid_in_capital: Money,
}

impl Equity {
    fn sum(&self) -> Money {
        self.owner_equity + self.retained_earnings + self.additional_paid_in_capital
    }
}

/// A balance sheet as of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetSnapshot {
    pub date: NaiveDate,
    pub current_assets: CurrentAssets,
    pub fixed_assets: FixedAssets,
    pub current_liabilities: CurrentLiabilities,
    pub long_term_liabilities: LongTermLiabilities,
    pub equity: Equity,
}

// =============================================================================
// Validation
// =============================================================================

/// Computed section totals plus the equality verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub total_assets: Money,
    pub total_liabilities: Money,
    pub total_equity: Money,
    pub total_liabilities_and_equity: Money,
    pub is_balanced: bool,
}

/// Sums the snapshot's sections and checks the accounting equality.
///
/// `is_balanced` tolerates a difference strictly below 0.01 currency
/// units. Amounts are integer minor units, so that means the two sides
/// must agree exactly.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use fiskal_core::balance::{validate, BalanceSheetSnapshot, CurrentAssets, Equity};
/// use fiskal_core::money::Money;
///
/// let snapshot = BalanceSheetSnapshot {
///     date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
///     current_assets: CurrentAssets {
///         cash: Money::from_minor(50_000),
///         ..Default::default()
///     },
///     fixed_assets: Default::default(),
///     current_liabilities: Default::default(),
///     long_term_liabilities: Default::default(),
///     equity: Equity {
///         owner_equity: Money::from_minor(50_000),
///         ..Default::default()
///     },
/// };
///
/// let report = validate(&snapshot);
/// assert!(report.is_balanced);
/// assert_eq!(report.total_assets.minor(), 50_000);
/// ```
pub fn validate(snapshot: &BalanceSheetSnapshot) -> BalanceReport {
    let total_assets = snapshot.current_assets.sum() + snapshot.fixed_assets.sum();
    let total_liabilities =
        snapshot.current_liabilities.sum() + snapshot.long_term_liabilities.sum();
    let total_equity = snapshot.equity.sum();
    let total_liabilities_and_equity = total_liabilities + total_equity;

    let difference = (total_assets - total_liabilities_and_equity).abs();

    BalanceReport {
        total_assets,
        total_liabilities,
        total_equity,
        total_liabilities_and_equity,
        is_balanced: difference.minor() < BALANCE_TOLERANCE_MINOR,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()
    }

    fn balanced_snapshot() -> BalanceSheetSnapshot {
        BalanceSheetSnapshot {
            date: snapshot_date(),
            current_assets: CurrentAssets {
                cash: Money::from_minor(120_000),
                accounts_receivable: Money::from_minor(45_000),
                inventory: Money::from_minor(30_000),
                other: Money::from_minor(5_000),
            },
            fixed_assets: FixedAssets {
                equipment: Money::from_minor(200_000),
                buildings: Money::from_minor(500_000),
                land: Money::from_minor(100_000),
                other: Money::zero(),
            },
            current_liabilities: CurrentLiabilities {
                accounts_payable: Money::from_minor(60_000),
                short_term_loans: Money::from_minor(40_000),
                taxes_payable: Money::from_minor(20_000),
                other: Money::zero(),
            },
            long_term_liabilities: LongTermLiabilities {
                bank_loans: Money::from_minor(300_000),
                leasing: Money::from_minor(80_000),
                other: Money::zero(),
            },
            equity: Equity {
                owner_equity: Money::from_minor(350_000),
                retained_earnings: Money::from_minor(130_000),
                additional_paid_in_capital: Money::from_minor(20_000),
            },
        }
    }

    #[test]
    fn test_balanced_sheet_reports_true() {
        let report = validate(&balanced_snapshot());

        assert_eq!(report.total_assets.minor(), 1_000_000);
        assert_eq!(report.total_liabilities.minor(), 500_000);
        assert_eq!(report.total_equity.minor(), 500_000);
        assert_eq!(report.total_liabilities_and_equity.minor(), 1_000_000);
        assert!(report.is_balanced);
    }

    #[test]
    fn test_one_minor_unit_off_reports_false() {
        let mut snapshot = balanced_snapshot();
        snapshot.current_assets.cash += Money::from_minor(1);

        let report = validate(&snapshot);
        assert!(!report.is_balanced);
        assert_eq!(report.total_assets.minor(), 1_000_001);
    }

    #[test]
    fn test_imbalance_is_reported_not_raised() {
        let mut snapshot = balanced_snapshot();
        snapshot.equity.retained_earnings = Money::zero();

        // Heavily imbalanced, still a plain report
        let report = validate(&snapshot);
        assert!(!report.is_balanced);
        assert_eq!(report.total_liabilities_and_equity.minor(), 870_000);
    }

    #[test]
    fn test_empty_sheet_is_balanced() {
        let snapshot = BalanceSheetSnapshot {
            date: snapshot_date(),
            current_assets: Default::default(),
            fixed_assets: Default::default(),
            current_liabilities: Default::default(),
            long_term_liabilities: Default::default(),
            equity: Default::default(),
        };
        let report = validate(&snapshot);
        assert!(report.is_balanced);
        assert!(report.total_assets.is_zero());
    }
}
