use crate::{error::ShortenError, AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Body of `POST /`, as sent by the browser form.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub value: String,
}

/// POST /
///
/// Responds with the short code as a bare JSON string. Submitting the same
/// URL again returns the same code.
pub async fn shorten(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ShortenRequest>,
) -> Response {
    match state.shortener.shorten(&req.value).await {
        Ok(code) => {
            tracing::debug!("{} -> {}/{}", req.value, state.config.base_url, code);
            Json(code).into_response()
        }
        Err(ShortenError::EmptyUrl) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "URL must not be empty" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to shorten '{}': {:?}", req.value, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Database error" })),
            )
                .into_response()
        }
    }
}
