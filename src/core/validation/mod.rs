//! Validation and filtering system
//!
//! Submitted invoice forms pass through per-field filters (trimming, number
//! coercion) and then validators. The outcome is either a normalized
//! [`ValidInvoice`] or [`FieldErrors`] keyed by form field.

pub mod extractor;
pub mod filters;
pub mod schema;
pub mod validators;

pub use extractor::ActionForm;
pub use schema::{FieldErrors, FormPayload, InvoiceField, InvoiceSchema, ValidInvoice};
