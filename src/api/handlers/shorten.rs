//! Handler for the JSON link shortening endpoint.

use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "custom_code": "promo" }
/// ```
///
/// `custom_code` is optional; blank values are treated as absent.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "code": "promo",
///   "short_url": "https://s.example.com/promo",
///   "long_url": "https://example.com"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if the URL is missing or invalid, or the custom code is malformed
/// - 409 Conflict if the custom code is taken; `details` echoes `long_url` and `custom_code`
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_short_link(payload.url, payload.custom_code)
        .await?;

    let short_url = state.short_url_for(&headers, &link.code)?;

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            code: link.code,
            short_url,
            long_url: link.long_url,
        }),
    ))
}
