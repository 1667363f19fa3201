//! Route tables for the dashboard

use super::handlers::{
    AppState, create_form, create_invoice, delete_invoice, edit_form, list_invoices, overview,
    update_invoice,
};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

/// Build dashboard routes
///
/// - GET  /dashboard - Cards and latest invoices
/// - GET  /dashboard/invoices - Filtered, paginated listing (cached)
/// - POST /dashboard/invoices - Create an invoice
/// - GET  /dashboard/invoices/create - Data for the create form
/// - POST /dashboard/invoices/{id} - Update an invoice
/// - GET  /dashboard/invoices/{id}/edit - Data for the edit form
/// - POST /dashboard/invoices/{id}/delete - Delete an invoice
pub fn build_dashboard_routes(state: AppState) -> Router {
    Router::new()
        .route("/dashboard", get(overview))
        .route(
            "/dashboard/invoices",
            get(list_invoices).post(create_invoice),
        )
        .route("/dashboard/invoices/create", get(create_form))
        .route("/dashboard/invoices/{id}", post(update_invoice))
        .route("/dashboard/invoices/{id}/edit", get(edit_form))
        .route("/dashboard/invoices/{id}/delete", post(delete_invoice))
        .with_state(state)
}

/// Build health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invoice-dashboard"
    }))
}
