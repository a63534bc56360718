//! Short code generation and validation utilities.
//!
//! Generated codes come from OS entropy encoded as URL-safe base64; custom
//! codes are checked against the characters a path segment can carry
//! unescaped and against the words the router already uses.

use crate::error::AppError;
use base64::Engine as _;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Random bytes per generated code (8 characters once encoded).
const CODE_LENGTH_BYTES: usize = 6;

/// Longest accepted custom code.
pub const MAX_CUSTOM_CODE_LEN: usize = 64;

/// Codes that would shadow a fixed route.
const RESERVED_CODES: &[&str] = &["api", "health", "shorten", "static"];

static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("custom code regex is valid"));

/// Generates a random short code.
///
/// Encodes six bytes from the system RNG as URL-safe base64 without padding,
/// producing an 8-character code.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_code() -> Result<String, AppError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Trims a submitted custom code; empty or whitespace-only means absent.
pub fn normalize_custom_code(custom_code: Option<String>) -> Option<String> {
    custom_code
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route word
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > MAX_CUSTOM_CODE_LEN {
        return Err(AppError::bad_request(
            format!("Custom code must be 1-{} characters", MAX_CUSTOM_CODE_LEN),
            json!({ "provided_length": code.len() }),
        ));
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
