//! Top-level router configuration combining API, page and redirect routes.
//!
//! # Route Structure
//!
//! - `GET  /`              - Shorten form (HTML)
//! - `POST /shorten`       - Form submission (HTML)
//! - `GET  /{code}`        - Short link redirect
//! - `GET  /{code}/stats`  - Link statistics (HTML)
//! - `GET  /health`        - Health check: database, cache
//! - `/api/*`              - JSON API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use crate::web;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes and request tracing, without path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(web::routes::routes())
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
