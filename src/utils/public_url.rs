//! Public origin detection and short URL formatting.

use crate::AppError;
use axum::http::{HeaderMap, header};
use serde_json::json;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Derives the public origin (`scheme://host[:port]`) of a request.
///
/// The host comes from the `Host` header with its port kept, the scheme from
/// `X-Forwarded-Proto` when a proxy sets it, otherwise `http`.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the `Host` header is missing or not
/// valid UTF-8.
pub fn origin_from_headers(headers: &HeaderMap) -> Result<String, AppError> {
    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", json!({})))?;

    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim())
        .filter(|v| *v == "http" || *v == "https")
        .unwrap_or("http");

    Ok(format!("{}://{}", scheme, host))
}

/// Joins a public origin and a short code.
pub fn short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}
