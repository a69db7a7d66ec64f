//! # Error Types
//!
//! Domain-specific error types for fiskal-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fiskal-core errors (this file)                                        │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  fiskal-db errors (separate crate)                                     │
//! │  └── DbError          - Storage failures (NotFound vs Unavailable)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (document id, field name)
//! 3. Errors are enum variants, never String
//! 4. An imbalanced balance sheet is NOT an error: the validator reports
//!    a boolean and the caller renders a warning

use thiserror::Error;

use crate::types::DocumentStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A negative quantity, price or turnover reached a computation.
    ///
    /// Surfaced immediately to the caller, never silently clamped.
    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount { field: &'static str, value: i64 },

    /// Disallowed status change.
    #[error("Document {document_id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        document_id: String,
        from: DocumentStatus,
        to: DocumentStatus,
    },

    /// Content edit attempted on a sent or paid document.
    #[error("Document {document_id} is {status:?}, content can no longer be edited")]
    DocumentLocked {
        document_id: String,
        status: DocumentStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements, before any
/// business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid month, invalid slug).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidAmount {
            field: "gross_turnover",
            value: -100,
        };
        assert_eq!(err.to_string(), "Invalid amount for gross_turnover: -100");

        let err = CoreError::InvalidTransition {
            document_id: "FAK-2026-001".to_string(),
            from: DocumentStatus::Paid,
            to: DocumentStatus::Draft,
        };
        assert!(err.to_string().contains("FAK-2026-001"));
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "counterparty.name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
