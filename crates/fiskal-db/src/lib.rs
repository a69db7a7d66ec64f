//! # fiskal-db: Storage Layer for Fiskal
//!
//! This crate provides database access for the Fiskal document engine.
//! It uses SQLite for local storage with sqlx for async operations, and
//! hosts the document registry that coordinates persistence, id
//! assignment and public sharing.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fiskal Data Flow                                 │
//! │                                                                         │
//! │  Caller (form submit, public URL, report page)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     fiskal-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Registry    │   │  Repositories  │   │  Migrations  │   │   │
//! │  │   │ (registry.rs) │──►│ (document.rs)  │   │  (embedded)  │   │   │
//! │  │   │               │   │ (payment_link) │   │ 001_init.sql │   │   │
//! │  │   │ ids, tokens,  │   │  SQL + row     │   │              │   │   │
//! │  │   │ lifecycle     │   │  mapping       │   │              │   │   │
//! │  │   └───────┬───────┘   └────────────────┘   └──────────────┘   │   │
//! │  │           │ totals via fiskal-core                             │   │
//! │  └───────────┼─────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types (`NotFound` vs `Unavailable`)
//! - [`repository`] - Repository implementations
//! - [`registry`] - Document registry & sharing resolver
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fiskal_db::{Database, DbConfig, DocumentRegistry};
//!
//! let db = Database::new(DbConfig::new("path/to/fiskal.db")).await?;
//! let registry = DocumentRegistry::new(db);
//!
//! let invoice = registry.create_invoice(new_invoice).await?;
//! let token = registry.generate_share_token(&invoice.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod registry;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use registry::{
    DocumentRegistry, NewCalculation, NewPaymentLink, NewTradeDocument, RegistryError,
    RegistryResult,
};

// Repository re-exports for convenience
pub use repository::document::DocumentRepository;
pub use repository::payment_link::PaymentLinkRepository;
