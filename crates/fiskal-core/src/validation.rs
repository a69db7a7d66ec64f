//! # Validation Module
//!
//! Boundary validation for caller input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (form, API)                                           │
//! │  ├── Basic format checks, immediate feedback                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL, UNIQUE, CHECK constraints                               │
//! │                                                                         │
//! │  Defense in depth: each layer catches different errors                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A draft may be saved incomplete; the `*_submission` functions are the
//! stricter gate a document passes when it leaves `Draft`.

use crate::error::{ValidationError, ValidationResult};
use crate::money::{Money, Quantity};
use crate::types::{Counterparty, LineItemInput, VatRate};
use crate::MAX_LINE_ITEMS;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a counterparty name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
pub fn validate_counterparty_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "counterparty.name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "counterparty.name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a line-item description.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 500 characters
pub fn validate_line_description(description: &str) -> ValidationResult<()> {
    let description = description.trim();

    if description.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if description.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: 500,
        });
    }

    Ok(())
}

/// Validates a free-text search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: Quantity) -> ValidationResult<()> {
    if !qty.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free lines)
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax-period month.
///
/// ## Rules
/// - Must be a calendar month (1-12)
pub fn validate_period_month(month: u32) -> ValidationResult<()> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "period_month".to_string(),
            min: 1,
            max: 12,
        });
    }

    Ok(())
}

/// Detects a VAT rate outside the fixed set {0%, 10%, 20%}.
///
/// Such a rate is accepted and computed, never rejected. The caller
/// reports the anomaly (the registry logs it), so `None` means the rate
/// is standard.
pub fn vat_rate_anomaly(rate: VatRate) -> Option<VatRate> {
    if rate.is_standard() {
        None
    } else {
        Some(rate)
    }
}

// =============================================================================
// Submission Gates
// =============================================================================

/// Validates everything an invoice or proforma needs to be submittable:
/// a named counterparty and at least one line with a description.
pub fn validate_trade_submission(
    counterparty: &Counterparty,
    lines: &[LineItemInput],
) -> ValidationResult<()> {
    validate_counterparty_name(&counterparty.name)?;

    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "line_items".to_string(),
        });
    }

    if lines.len() > MAX_LINE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "line_items".to_string(),
            min: 1,
            max: MAX_LINE_ITEMS as i64,
        });
    }

    for line in lines {
        validate_line_description(&line.description)?;
        validate_quantity(line.quantity())?;
        validate_unit_price(line.unit_price())?;
    }

    Ok(())
}

/// Validates a periodic calculation submission: a named owner party and
/// a plausible period.
pub fn validate_calculation_submission(
    counterparty: &Counterparty,
    period_month: u32,
) -> ValidationResult<()> {
    validate_counterparty_name(&counterparty.name)?;
    validate_period_month(period_month)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn counterparty(name: &str) -> Counterparty {
        Counterparty {
            name: name.to_string(),
            address: "Bulevar 1, Beograd".to_string(),
            tax_id: None,
            registration_id: None,
        }
    }

    fn line(description: &str) -> LineItemInput {
        LineItemInput {
            description: description.to_string(),
            quantity_milli: 1000,
            unit_price_minor: 10_000,
            vat_rate_bps: 2000,
        }
    }

    #[test]
    fn test_validate_counterparty_name() {
        assert!(validate_counterparty_name("Alfa doo").is_ok());
        assert!(validate_counterparty_name("").is_err());
        assert!(validate_counterparty_name("   ").is_err());
        assert!(validate_counterparty_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_line_description() {
        assert!(validate_line_description("Izrada sajta").is_ok());
        assert!(validate_line_description("").is_err());
        assert!(validate_line_description(&"x".repeat(600)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(Quantity::from_whole(1)).is_ok());
        assert!(validate_quantity(Quantity::from_milli(1)).is_ok());
        assert!(validate_quantity(Quantity::from_whole(0)).is_err());
        assert!(validate_quantity(Quantity::from_milli(-5)).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Money::from_minor(0)).is_ok());
        assert!(validate_unit_price(Money::from_minor(1099)).is_ok());
        assert!(validate_unit_price(Money::from_minor(-1)).is_err());
    }

    #[test]
    fn test_validate_period_month() {
        assert!(validate_period_month(1).is_ok());
        assert!(validate_period_month(12).is_ok());
        assert!(validate_period_month(0).is_err());
        assert!(validate_period_month(13).is_err());
    }

    #[test]
    fn test_vat_rate_anomaly() {
        assert!(vat_rate_anomaly(VatRate::from_percent(20)).is_none());
        assert!(vat_rate_anomaly(VatRate::from_percent(0)).is_none());
        assert_eq!(
            vat_rate_anomaly(VatRate::from_percent(19)),
            Some(VatRate::from_percent(19))
        );
    }

    #[test]
    fn test_trade_submission_requires_lines() {
        let err = validate_trade_submission(&counterparty("Alfa doo"), &[]).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));

        assert!(validate_trade_submission(&counterparty("Alfa doo"), &[line("Rad")]).is_ok());
    }

    #[test]
    fn test_trade_submission_rejects_blank_description() {
        let err =
            validate_trade_submission(&counterparty("Alfa doo"), &[line("  ")]).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));
    }

    #[test]
    fn test_calculation_submission() {
        assert!(validate_calculation_submission(&counterparty("Moja radnja"), 6).is_ok());
        assert!(validate_calculation_submission(&counterparty(""), 6).is_err());
        assert!(validate_calculation_submission(&counterparty("Moja radnja"), 13).is_err());
    }
}
