//! HTTP exposure of the dashboard
//!
//! `ServerBuilder` wires an [`InvoiceStore`](crate::core::InvoiceStore), the
//! page cache and the invoice actions into an axum router with:
//! - Health routes
//! - Read endpoints for the dashboard pages
//! - Form-post endpoints for the create, update and delete actions

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::{AppState, CACHE_STATUS_HEADER, InvoicePage};
