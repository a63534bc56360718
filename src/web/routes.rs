//! HTML page route configuration.

use crate::state::AppState;
use crate::web::handlers::{index_handler, shorten_form_handler, stats_page_handler};
use axum::{
    Router,
    routing::{get, post},
};

/// Public HTML routes.
///
/// # Endpoints
///
/// - `GET  /`              - Shorten form
/// - `POST /shorten`       - Form submission (form-encoded)
/// - `GET  /{code}/stats`  - Statistics page for a short link
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/shorten", post(shorten_form_handler))
        .route("/{code}/stats", get(stats_page_handler))
}
