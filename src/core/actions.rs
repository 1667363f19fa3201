//! Invoice mutation actions
//!
//! Each action validates its input, writes a single statement through the
//! [`InvoiceStore`], and on success revalidates the invoice listing. Failures
//! never propagate: they come back as an [`ActionState`] for the form to show.
//!
//! ```text
//! payload ──▶ InvoiceSchema ──▶ cents ──▶ InvoiceStore ──▶ revalidate ──▶ redirect
//!                  │                           │
//!                  └── Rejected(errors)        └── Failed(message)
//! ```

use crate::cache::{CacheInvalidator, INVOICES_PATH};
use crate::core::store::InvoiceStore;
use crate::core::validation::{FieldErrors, FormPayload, InvoiceSchema};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const CREATE_INVALID_MESSAGE: &str = "Missing Fields. Failed to Create Invoice.";
pub const UPDATE_INVALID_MESSAGE: &str = "Missing Fields. Failed to Edit Invoice.";
pub const CREATE_FAILED_MESSAGE: &str = "DataBase Error: Failed to create new invoice.";
pub const UPDATE_FAILED_MESSAGE: &str = "DataBase Error: Failed to update invoice.";
pub const DELETE_FAILED_MESSAGE: &str = "DataBase Error: Failed to delete invoice.";
pub const DELETED_MESSAGE: &str = "Deleted invoice.";

/// Source of the current calendar day
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Today in UTC
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// State handed back to the form that submitted an action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    pub message: Option<String>,
}

impl ActionState {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            errors: None,
            message: Some(message.into()),
        }
    }

    pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors: Some(errors),
            message: Some(message.into()),
        }
    }
}

/// Result of running an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Mutation succeeded; the caller must continue at `location`
    Redirect { location: String },
    /// Mutation succeeded without navigation
    Completed(ActionState),
    /// Input failed validation; nothing was written
    Rejected(ActionState),
    /// The store failed; nothing was revalidated
    Failed(ActionState),
}

impl ActionOutcome {
    pub fn redirect(location: impl Into<String>) -> Self {
        ActionOutcome::Redirect {
            location: location.into(),
        }
    }

    /// The state returned to the form, if the action did not navigate away
    pub fn state(&self) -> Option<&ActionState> {
        match self {
            ActionOutcome::Redirect { .. } => None,
            ActionOutcome::Completed(state)
            | ActionOutcome::Rejected(state)
            | ActionOutcome::Failed(state) => Some(state),
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            ActionOutcome::Redirect { location } => Some(location),
            _ => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, ActionOutcome::Redirect { .. })
    }
}

/// The create, update and delete invoice actions
///
/// Holds no invoice state between calls; the store and the invalidator are
/// injected so tests can substitute either.
pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    invalidator: Arc<dyn CacheInvalidator>,
    schema: InvoiceSchema,
    clock: Clock,
}

impl InvoiceActions {
    pub fn new(store: Arc<dyn InvoiceStore>, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        Self {
            store,
            invalidator,
            schema: InvoiceSchema::new(),
            clock: Arc::new(utc_today),
        }
    }

    /// Replace the clock used to date new invoices
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Create an invoice dated today from a submitted form
    pub async fn create_invoice(&self, payload: &FormPayload) -> ActionOutcome {
        let valid = match self.schema.validate(payload) {
            Ok(valid) => valid,
            Err(errors) => {
                tracing::debug!(?errors, "Rejected invoice creation");
                return ActionOutcome::Rejected(ActionState::invalid(
                    errors,
                    CREATE_INVALID_MESSAGE,
                ));
            }
        };

        let invoice = valid.into_new_invoice((self.clock)());
        let amount = invoice.amount;
        match self.store.insert_invoice(invoice).await {
            Ok(id) => {
                tracing::info!(invoice_id = %id, amount, "Created invoice");
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "Failed to create invoice");
                return ActionOutcome::Failed(ActionState::with_message(CREATE_FAILED_MESSAGE));
            }
        }

        self.invalidator.revalidate_path(INVOICES_PATH);
        ActionOutcome::redirect(INVOICES_PATH)
    }

    /// Replace customer, amount and status of an existing invoice
    ///
    /// `id` is trusted to name an existing row and is not validated.
    pub async fn update_invoice(&self, id: &Uuid, payload: &FormPayload) -> ActionOutcome {
        let valid = match self.schema.validate(payload) {
            Ok(valid) => valid,
            Err(errors) => {
                tracing::debug!(invoice_id = %id, ?errors, "Rejected invoice update");
                return ActionOutcome::Rejected(ActionState::invalid(
                    errors,
                    UPDATE_INVALID_MESSAGE,
                ));
            }
        };

        match self.store.update_invoice(id, valid.into_changes()).await {
            Ok(rows) => {
                tracing::info!(invoice_id = %id, rows, "Updated invoice");
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, error = %format!("{e:#}"), "Failed to update invoice");
                return ActionOutcome::Failed(ActionState::with_message(UPDATE_FAILED_MESSAGE));
            }
        }

        self.invalidator.revalidate_path(INVOICES_PATH);
        ActionOutcome::redirect(INVOICES_PATH)
    }

    /// Delete an invoice; a missing row is not an error
    pub async fn delete_invoice(&self, id: &Uuid) -> ActionOutcome {
        match self.store.delete_invoice(id).await {
            Ok(rows) => {
                tracing::info!(invoice_id = %id, rows, "Deleted invoice");
                self.invalidator.revalidate_path(INVOICES_PATH);
                ActionOutcome::Completed(ActionState::with_message(DELETED_MESSAGE))
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, error = %format!("{e:#}"), "Failed to delete invoice");
                ActionOutcome::Failed(ActionState::with_message(DELETE_FAILED_MESSAGE))
            }
        }
    }
}
