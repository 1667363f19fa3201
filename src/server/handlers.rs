//! HTTP handlers for the dashboard pages and the invoice actions

use crate::cache::{INVOICES_PATH, PageCache};
use crate::core::actions::{ActionOutcome, InvoiceActions};
use crate::core::error::DashboardError;
use crate::core::invoice::{CardData, Customer, InvoiceForm, InvoiceSummary};
use crate::core::store::InvoiceStore;
use crate::core::validation::ActionForm;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Number of invoices shown on the overview page
pub const LATEST_INVOICES_LIMIT: u32 = 5;

/// Response header reporting whether the listing came from the page cache
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Shared state for dashboard handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InvoiceStore>,
    pub cache: PageCache,
    pub actions: Arc<InvoiceActions>,
}

#[derive(Debug, Serialize)]
pub struct Overview {
    pub cards: CardData,
    pub latest_invoices: Vec<InvoiceSummary>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub query: Option<String>,
    /// Kept as text so a blank or garbled page falls back to the first one
    #[serde(default)]
    pub page: Option<String>,
}

impl ListParams {
    fn normalized(&self) -> (String, u32) {
        let query = self.query.as_deref().unwrap_or_default().trim().to_string();
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1);
        (query, page)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoicePage {
    pub invoices: Vec<InvoiceSummary>,
    pub total_pages: u32,
    pub page: u32,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct CreateForm {
    pub customers: Vec<Customer>,
}

#[derive(Debug, Serialize)]
pub struct EditForm {
    pub invoice: InvoiceForm,
    pub customers: Vec<Customer>,
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self {
            ActionOutcome::Redirect { location } => {
                let mut response = StatusCode::SEE_OTHER.into_response();
                match HeaderValue::from_str(&location) {
                    Ok(value) => {
                        response.headers_mut().insert(header::LOCATION, value);
                        response
                    }
                    Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                }
            }
            ActionOutcome::Completed(state) => (StatusCode::OK, Json(state)).into_response(),
            ActionOutcome::Rejected(state) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(state)).into_response()
            }
            ActionOutcome::Failed(state) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(state)).into_response()
            }
        }
    }
}

/// GET /dashboard
pub async fn overview(State(state): State<AppState>) -> Result<Json<Overview>, DashboardError> {
    let cards = state.store.fetch_card_data().await?;
    let latest_invoices = state
        .store
        .fetch_latest_invoices(LATEST_INVOICES_LIMIT)
        .await?;

    Ok(Json(Overview {
        cards,
        latest_invoices,
    }))
}

/// GET /dashboard/invoices
///
/// Served from the page cache when a rendering for the same search and page
/// exists. A rendering whose read overlapped a revalidation is not stored.
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, DashboardError> {
    let (query, page) = params.normalized();
    let variant = format!("query={}&page={}", query, page);

    if let Some(cached) = state.cache.get(INVOICES_PATH, &variant) {
        tracing::debug!(%variant, "Serving cached invoice listing");
        return Ok(with_cache_status(Json(cached).into_response(), "hit"));
    }

    let generation = state.cache.generation(INVOICES_PATH);
    let invoices = state.store.fetch_filtered_invoices(&query, page).await?;
    let total_pages = state.store.fetch_invoice_pages(&query).await?;
    let listing = InvoicePage {
        invoices,
        total_pages,
        page,
        query,
    };

    let rendered: Value = serde_json::to_value(&listing)
        .map_err(|e| DashboardError::Storage(format!("Failed to render listing: {}", e)))?;
    state
        .cache
        .insert_if_current(INVOICES_PATH, generation, variant, rendered.clone());

    Ok(with_cache_status(Json(rendered).into_response(), "miss"))
}

fn with_cache_status(mut response: Response, status: &'static str) -> Response {
    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static(status));
    response
}

/// GET /dashboard/invoices/create
pub async fn create_form(
    State(state): State<AppState>,
) -> Result<Json<CreateForm>, DashboardError> {
    let customers = state.store.fetch_customers().await?;
    Ok(Json(CreateForm { customers }))
}

/// GET /dashboard/invoices/{id}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EditForm>, DashboardError> {
    let (invoice, customers) = tokio::try_join!(
        state.store.fetch_invoice_by_id(&id),
        state.store.fetch_customers()
    )?;
    let invoice = invoice.ok_or(DashboardError::NotFound {
        resource: "invoice",
        id,
    })?;

    Ok(Json(EditForm { invoice, customers }))
}

/// POST /dashboard/invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    ActionForm(payload): ActionForm,
) -> ActionOutcome {
    state.actions.create_invoice(&payload).await
}

/// POST /dashboard/invoices/{id}
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ActionForm(payload): ActionForm,
) -> ActionOutcome {
    state.actions.update_invoice(&id, &payload).await
}

/// POST /dashboard/invoices/{id}/delete
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ActionOutcome {
    state.actions.delete_invoice(&id).await
}
