//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache of short code to long URL mappings.
///
/// Implementations must be fail-open: a broken cache degrades to database
/// lookups and never fails a redirect.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Looks up the long URL cached for a short code.
    ///
    /// Returns `Ok(None)` on a miss.
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping. `ttl_seconds = None` uses the implementation default.
    async fn set_url(
        &self,
        short_code: &str,
        long_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;

    /// Short label for health reports.
    fn backend(&self) -> &'static str;
}
