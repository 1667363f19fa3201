//! Axum extractor for action form payloads
//!
//! Actions accept either a url-encoded form (what a browser submits) or a
//! JSON object. Both end up as a [`FormPayload`] so the schema sees the same
//! thing regardless of how the request was encoded.

use super::schema::FormPayload;
use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::collections::HashMap;

/// Extracted action payload
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_invoice(
///     State(state): State<AppState>,
///     ActionForm(payload): ActionForm,
/// ) -> ActionOutcome {
///     state.actions.create_invoice(&payload).await
/// }
/// ```
pub struct ActionForm(pub FormPayload);

impl ActionForm {
    pub fn into_inner(self) -> FormPayload {
        self.0
    }
}

impl std::ops::Deref for ActionForm {
    type Target = FormPayload;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"))
}

fn bad_request(error: &str, details: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": error,
            "details": details
        })),
    )
        .into_response()
}

impl<S> FromRequest<S> for ActionForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(&req) {
            let Json(value): Json<Value> = Json::from_request(req, state)
                .await
                .map_err(|e| bad_request("Invalid JSON", e.to_string()))?;

            return FormPayload::from_json(value)
                .map(ActionForm)
                .map_err(|e| bad_request("Invalid JSON", e.to_string()));
        }

        let Form(fields): Form<HashMap<String, String>> = Form::from_request(req, state)
            .await
            .map_err(|e| bad_request("Invalid form", e.to_string()))?;

        Ok(ActionForm(FormPayload::from(fields)))
    }
}
