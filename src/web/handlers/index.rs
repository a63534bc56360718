//! Shorten form page and its submission handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

const CODE_TAKEN_MESSAGE: &str = "Sorry, that custom code is already taken. Please try another.";
const STORE_FAILURE_MESSAGE: &str = "Something went wrong on our side. Please try again.";

/// Template for the shorten form.
///
/// Renders `templates/index.html`. After a failed submission the form is
/// refilled with `url` and `custom_code` so nothing typed is lost.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub error: Option<String>,
    pub url: String,
    pub custom_code: String,
    pub new_url: Option<String>,
}

impl IndexTemplate {
    pub fn empty() -> Self {
        Self {
            error: None,
            url: String::new(),
            custom_code: String::new(),
            new_url: None,
        }
    }

    pub fn created(new_url: String) -> Self {
        Self {
            new_url: Some(new_url),
            ..Self::empty()
        }
    }

    pub fn failed(error: impl Into<String>, url: String, custom_code: String) -> Self {
        Self {
            error: Some(error.into()),
            url,
            custom_code,
            new_url: None,
        }
    }
}

/// Form-encoded shorten request.
#[derive(Debug, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: String,
    pub custom_code: Option<String>,
}

/// Renders the empty shorten form.
///
/// # Endpoint
///
/// `GET /`
pub async fn index_handler() -> impl IntoResponse {
    IndexTemplate::empty()
}

/// Handles a shorten form submission.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Responses
///
/// - 200 with the new short URL
/// - 409 with the form refilled when the custom code is taken
/// - 400 with the form refilled when the input is invalid
/// - 5xx with the form refilled when the store fails
pub async fn shorten_form_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ShortenForm>,
) -> Result<Response, AppError> {
    let submitted_url = form.url.clone();
    let submitted_code = form.custom_code.clone().unwrap_or_default();

    match state
        .link_service
        .create_short_link(form.url, form.custom_code)
        .await
    {
        Ok(link) => {
            let new_url = state.short_url_for(&headers, &link.code)?;
            Ok(IndexTemplate::created(new_url).into_response())
        }
        Err(AppError::CodeTaken {
            long_url,
            custom_code,
        }) => Ok((
            StatusCode::CONFLICT,
            IndexTemplate::failed(CODE_TAKEN_MESSAGE, long_url, custom_code),
        )
            .into_response()),
        Err(e @ AppError::Validation { .. }) => Ok((
            StatusCode::BAD_REQUEST,
            IndexTemplate::failed(e.to_string(), submitted_url, submitted_code),
        )
            .into_response()),
        Err(e) => {
            tracing::error!(error = %e, "Shorten form submission failed");
            Ok((
                e.status_code(),
                IndexTemplate::failed(STORE_FAILURE_MESSAGE, submitted_url, submitted_code),
            )
                .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_renders() {
        let html = IndexTemplate::empty().render().unwrap();

        assert!(html.contains(r#"<form action="/shorten" method="post">"#));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_failed_form_keeps_input() {
        let html = IndexTemplate::failed(
            CODE_TAKEN_MESSAGE,
            "https://b.com".to_string(),
            "promo".to_string(),
        )
        .render()
        .unwrap();

        assert!(html.contains("already taken"));
        assert!(html.contains(r#"value="https://b.com""#));
        assert!(html.contains(r#"value="promo""#));
    }

    #[test]
    fn test_created_form_shows_short_url() {
        let html = IndexTemplate::created("http://localhost:3000/abc123XY".to_string())
            .render()
            .unwrap();

        assert!(html.contains("http://localhost:3000/abc123XY"));
    }

    #[test]
    fn test_input_is_escaped() {
        let html = IndexTemplate::failed(
            "Invalid URL format",
            "\"><script>".to_string(),
            String::new(),
        )
        .render()
        .unwrap();

        assert!(!html.contains("<script>"));
    }
}
