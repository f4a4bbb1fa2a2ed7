//! Funeral Ops API
//!
//! Back-office service for a funeral service provider, backed by a tabular
//! (spreadsheet-style) store.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

// App state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: store::SharedStore,
    pub config: config::AppConfig,
    pub auth: Arc<auth::AuthService>,
    pub locks: services::SharedLocks,
    pub http: reqwest::Client,
}

// Common response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// All `/api` routes. The admin sub-router carries the role guard; every
/// other protected route relies on the `AuthUser` extractor alone.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let admin = handlers::admin::routes().layer(middleware::from_fn_with_state(
        state,
        auth::require_admin,
    ));

    Router::new()
        .nest("/auth", handlers::auth::routes())
        .nest("/cases", handlers::cases::routes())
        .nest("/contracts", handlers::contracts::routes())
        .nest("/schedule", handlers::schedule::routes())
        .nest("/reminders", handlers::reminders::routes())
        .nest("/inventory", handlers::inventory::routes())
        .nest("/payments", handlers::payments::routes())
        .nest("/procurement", handlers::procurement::routes())
        .nest("/report", handlers::report::routes())
        .nest("/admin", admin)
        .nest("/notify", handlers::notify::routes())
}

/// Full application router: banner, health, API and Swagger UI.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "funeral-ops-api up" }))
        .route("/health", get(health))
        .nest("/api", api_routes(state.clone()))
        .merge(openapi::swagger_ui())
        .with_state(state)
}
