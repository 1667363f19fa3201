//! Typed errors for the dashboard's read endpoints
//!
//! Mutation actions never return these: their failures are reported through
//! [`ActionState`](crate::core::ActionState). Everything else that can go wrong
//! while serving a request maps to a [`DashboardError`], which knows its HTTP
//! status and a stable error code.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn edit_form(id: Uuid) -> Result<Json<InvoiceForm>, DashboardError> {
//!     let invoice = store
//!         .fetch_invoice_by_id(&id)
//!         .await?
//!         .ok_or(DashboardError::NotFound { resource: "invoice", id })?;
//!     Ok(Json(invoice))
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

/// The main error type for the dashboard
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// A requested row does not exist
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: &'static str, id: Uuid },

    /// The store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is missing or inconsistent
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl DashboardError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::NotFound { .. } => StatusCode::NOT_FOUND,
            DashboardError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::NotFound { .. } => "NOT_FOUND",
            DashboardError::Storage(_) => "STORAGE_ERROR",
            DashboardError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Storage and configuration details stay in the logs; clients get a
    /// fixed message for those.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            DashboardError::Storage(_) => "Database Error: Failed to fetch data.".to_string(),
            DashboardError::Config(_) => "Server is misconfigured.".to_string(),
            other => other.to_string(),
        };
        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            DashboardError::NotFound { resource, id } => Some(serde_json::json!({
                "resource": resource,
                "id": id.to_string()
            })),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        DashboardError::Storage(format!("{:#}", err))
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}
