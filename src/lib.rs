//! # Invoice Dashboard
//!
//! Backend for a small invoice-management dashboard: summary cards, the latest
//! invoices, a searchable invoice listing, and the three mutation actions that
//! change the `invoices` table.
//!
//! ## Features
//!
//! - **Validated Mutations**: create, update and delete invoices from free-form
//!   form payloads, with per-field error messages
//! - **Cents Normalization**: amounts are accepted as decimals and stored as
//!   integer cents
//! - **Page Cache**: listing responses are cached per route and purged after
//!   every successful mutation
//! - **Pluggable Storage**: in-memory store by default, PostgreSQL behind the
//!   `postgres` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dashboard::prelude::*;
//!
//! let store = InMemoryInvoiceStore::new();
//! seed_demo_customers(&store).await?;
//!
//! ServerBuilder::new()
//!     .with_store(store)
//!     .serve("127.0.0.1:3000")
//!     .await?;
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        actions::{ActionOutcome, ActionState, Clock, InvoiceActions},
        error::{DashboardError, ErrorResponse},
        invoice::{
            CardData, Customer, Invoice, InvoiceChanges, InvoiceForm, InvoiceStatus,
            InvoiceSummary, NewInvoice,
        },
        store::{ITEMS_PER_PAGE, InvoiceStore},
        validation::{FieldErrors, FormPayload, InvoiceField, InvoiceSchema, ValidInvoice},
    };

    // === Cache ===
    pub use crate::cache::{CacheInvalidator, INVOICES_PATH, PageCache};

    // === Storage ===
    pub use crate::storage::{InMemoryInvoiceStore, demo_customers, seed_demo_customers};
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresInvoiceStore;

    // === Config ===
    pub use crate::config::{
        DashboardConfig, LoggingConfig, ServerConfig, StorageBackend, StorageConfig,
    };

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
