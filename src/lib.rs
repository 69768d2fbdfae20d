use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod cache;
pub mod codegen;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod shortener;

use db::SqliteStore;
use shortener::Shortener;

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub shortener: Shortener<SqliteStore>,
    pub config: config::AppConfig,
}

// ── Router ─────────────────────────────────────────────────────────────────

/// Build the HTTP surface around an already-started shortener.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::shorten::shorten))
        // Liveness probe, no store access
        .route("/health", get(|| async { axum::http::StatusCode::OK }))
        // Short-code redirect; registered last so fixed paths take priority
        .route("/:code", get(handlers::redirect::redirect))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
