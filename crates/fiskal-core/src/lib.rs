//! # fiskal-core: Pure Document Engine for Fiskal
//!
//! This crate is the **heart** of Fiskal. It contains the document
//! engine as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Fiskal Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Callers (forms, PDF export, public pages)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fiskal-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   calc    │  │  balance  │  │ lifecycle │  │  filter   │  │   │
//! │  │   │ line/doc  │  │  equality │  │  status   │  │ periods,  │  │   │
//! │  │   │ totals,   │  │  check    │  │  machine  │  │ reports   │  │   │
//! │  │   │ obračun   │  │           │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    fiskal-db (Storage Layer)                    │   │
//! │  │        SQLite queries, migrations, registry, sharing            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Document, LineItem, PaymentLink, …)
//! - [`money`] - Money and Quantity in integer units (no floating point!)
//! - [`calc`] - Line/document totals and the reverse tax calculation
//! - [`balance`] - Balance sheet equality checking
//! - [`lifecycle`] - Document status state machine
//! - [`filter`] - Filtering and report summarization
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic, safe under
//!    concurrent callers, with no shared mutable state
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are minor units (i64),
//!    rounded half-up exactly once per derived figure
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod balance;
pub mod calc;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use fiskal_core::Money` instead of
// `use fiskal_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Quantity};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Profit tax rate in basis points (15%).
///
/// A policy constant of the simplified regime this engine models, not
/// user-configurable.
pub const PROFIT_TAX_RATE_BPS: u32 = 1500;

/// The fixed VAT rate set, in basis points: 0%, 10% (reduced), 20%
/// (standard).
///
/// Other rates are accepted numerically and reported as anomalies, never
/// rejected.
pub const STANDARD_VAT_RATES_BPS: [u32; 3] = [0, 1000, 2000];

/// Maximum line items on a single document.
///
/// Prevents runaway documents from a stuck import or a retry loop.
pub const MAX_LINE_ITEMS: usize = 100;

/// Imbalance below this many minor units still counts as balanced.
///
/// The 0.01-currency-unit tolerance expressed in integer minor units:
/// the two sides of the balance sheet must agree exactly.
pub const BALANCE_TOLERANCE_MINOR: i64 = 1;
