//! Link statistics page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;

/// Template for the link statistics page.
///
/// Renders `templates/stats.html` with the short URL, its target and the
/// click count.
#[derive(Template, WebTemplate)]
#[template(path = "stats.html")]
pub struct StatsTemplate {
    pub short_url: String,
    pub long_url: String,
    pub clicks: i64,
}

/// Renders the statistics page for a short link.
///
/// # Endpoint
///
/// `GET /{code}/stats`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_page_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.stats(&code).await?;
    let short_url = state.short_url_for(&headers, &link.code)?;

    Ok(StatsTemplate {
        short_url,
        long_url: link.long_url,
        clicks: link.clicks,
    })
}
