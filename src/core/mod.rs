//! Core invoice types, validation, storage seam and the mutation actions

pub mod actions;
pub mod error;
pub mod invoice;
pub mod store;
pub mod validation;

pub use actions::{ActionOutcome, ActionState, InvoiceActions};
pub use error::{DashboardError, ErrorResponse};
pub use invoice::{Customer, Invoice, InvoiceStatus};
pub use store::InvoiceStore;
