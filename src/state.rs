//! Shared application state injected into every handler.

use axum::http::HeaderMap;
use std::sync::Arc;

use crate::application::services::LinkService;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::persistence::PgLinkRepository;
use crate::utils::public_url::{origin_from_headers, short_url};

/// Service handles shared by all requests. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<PgLinkRepository>>,
    pub cache: Arc<dyn CacheService>,
    /// Public origin used to render short URLs; derived per request when unset.
    pub base_url: Option<String>,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService<PgLinkRepository>>,
        cache: Arc<dyn CacheService>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            link_service,
            cache,
            base_url,
        }
    }

    /// Builds the public short URL for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when no `BASE_URL` is configured and
    /// the request carries no usable `Host` header.
    pub fn short_url_for(&self, headers: &HeaderMap, code: &str) -> Result<String, AppError> {
        let base = match &self.base_url {
            Some(base) => base.clone(),
            None => origin_from_headers(headers)?,
        };

        Ok(short_url(&base, code))
    }
}
