//! Link creation, resolution and statistics service.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, is_unique_violation_on_code};
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{generate_code, normalize_custom_code, validate_custom_code};
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

/// Attempts at inserting a freshly generated code before giving up.
pub const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Store-wide totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkOverview {
    pub links: i64,
    pub clicks: i64,
}

/// Service owning the short code to long URL mapping.
///
/// Uniqueness and click accounting are delegated to the repository: codes are
/// guarded by the store's unique constraint and clicks by a single atomic
/// update. The cache only ever short-circuits the lookup half of
/// [`LinkService::resolve`].
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    cache: Arc<dyn CacheService>,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            link_repository,
            cache,
        }
    }

    /// Creates a short link.
    ///
    /// `custom_code` is trimmed first; an empty or whitespace-only value is
    /// treated as absent and a random code is generated instead.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is empty or not an absolute
    ///   http(s) URL, or the custom code is malformed or reserved
    /// - [`AppError::CodeTaken`] if the custom code is already in use; the
    ///   error carries the submitted URL and code
    /// - [`AppError::Internal`] if no free generated code was found within
    ///   [`MAX_GENERATION_ATTEMPTS`]
    pub async fn create_short_link(
        &self,
        long_url: String,
        custom_code: Option<String>,
    ) -> Result<Link, AppError> {
        let target = validate_long_url(&long_url)?;

        match normalize_custom_code(custom_code) {
            Some(code) => self.create_with_custom_code(long_url, target, code).await,
            None => self.create_with_generated_code(target).await,
        }
    }

    /// Resolves a short code to its long URL and records one click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let long_url = match self.cache.get_url(code).await {
            Ok(Some(url)) => {
                debug!("Cache HIT for {}", code);
                url
            }
            Ok(None) => {
                debug!("Cache MISS for {}", code);
                let link = self.get_link(code).await?;
                self.cache_in_background(code, &link.long_url);
                link.long_url
            }
            Err(e) => {
                warn!("Cache error: {}", e);
                self.get_link(code).await?.long_url
            }
        };

        if !self.link_repository.increment_clicks(code).await? {
            return Err(not_found(code));
        }

        Ok(long_url)
    }

    /// Returns the link with its current click count. Never cached.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn stats(&self, code: &str) -> Result<Link, AppError> {
        self.get_link(code).await
    }

    /// Counts links and clicks across the whole store.
    pub async fn overview(&self) -> Result<LinkOverview, AppError> {
        let links = self.link_repository.count().await?;
        let clicks = self.link_repository.total_clicks().await?;

        Ok(LinkOverview { links, clicks })
    }

    /// Checks that the store is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }

    async fn create_with_custom_code(
        &self,
        submitted_url: String,
        target: String,
        code: String,
    ) -> Result<Link, AppError> {
        validate_custom_code(&code)?;

        // Advisory only: the unique constraint decides on insert.
        if self.link_repository.find_by_code(&code).await?.is_some() {
            return Err(AppError::code_taken(submitted_url, code));
        }

        match self
            .link_repository
            .insert(NewLink::new(code.clone(), target))
            .await
        {
            Ok(link) => {
                info!(code = %link.code, "Created link with custom code");
                Ok(link)
            }
            Err(e) if is_unique_violation_on_code(&e) => {
                Err(AppError::code_taken(submitted_url, code))
            }
            Err(e) => Err(e),
        }
    }

    async fn create_with_generated_code(&self, target: String) -> Result<Link, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = generate_code()?;

            match self
                .link_repository
                .insert(NewLink::new(code, target.clone()))
                .await
            {
                Ok(link) => {
                    info!(code = %link.code, "Created link");
                    return Ok(link);
                }
                Err(e) if is_unique_violation_on_code(&e) => {
                    warn!(attempt, "code collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions", "attempts": MAX_GENERATION_ATTEMPTS }),
        ))
    }

    async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))
    }

    fn cache_in_background(&self, code: &str, long_url: &str) {
        let cache = self.cache.clone();
        let code = code.to_string();
        let long_url = long_url.to_string();

        tokio::spawn(async move {
            if let Err(e) = cache.set_url(&code, &long_url, None).await {
                warn!("Failed to cache URL: {}", e);
            }
        });
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

/// Checks that a long URL is present and is an absolute http(s) URL.
///
/// Returns the trimmed URL exactly as submitted so redirects hand back the
/// same string that was stored.
pub fn validate_long_url(long_url: &str) -> Result<String, AppError> {
    let trimmed = long_url.trim();

    if trimmed.is_empty() {
        return Err(AppError::bad_request(
            "URL is required",
            json!({ "field": "url" }),
        ));
    }

    // The url crate strips or escapes these while parsing, but the stored
    // string must stay usable as a Location header.
    if trimmed.chars().any(char::is_control) {
        return Err(AppError::bad_request(
            "URL must not contain control characters",
            json!({ "field": "url" }),
        ));
    }

    let parsed = Url::parse(trimmed).map_err(|e| {
        AppError::bad_request(
            "Invalid URL format",
            json!({ "field": "url", "reason": e.to_string() }),
        )
    })?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(AppError::bad_request(
            "Only http and https URLs can be shortened",
            json!({ "field": "url", "scheme": parsed.scheme() }),
        ));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::error::SHORT_CODE_CONSTRAINT;
    use crate::infrastructure::cache::{CacheResult, NullCache};
    use async_trait::async_trait;
    use mockall::Sequence;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn create_test_link(id: i64, code: &str, url: &str, clicks: i64) -> Link {
        Link::new(id, code.to_string(), url.to_string(), clicks)
    }

    fn code_conflict() -> AppError {
        AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": SHORT_CODE_CONSTRAINT }),
        )
    }

    fn service(repo: MockLinkRepository) -> LinkService<MockLinkRepository> {
        LinkService::new(Arc::new(repo), Arc::new(NullCache::new()))
    }

    #[derive(Default)]
    struct MapCache {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl CacheService for MapCache {
        async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
            Ok(self.entries.lock().unwrap().get(short_code).cloned())
        }

        async fn set_url(
            &self,
            short_code: &str,
            long_url: &str,
            _ttl_seconds: Option<u64>,
        ) -> CacheResult<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(short_code.to_string(), long_url.to_string());
            Ok(())
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn backend(&self) -> &'static str {
            "map"
        }
    }

    #[tokio::test]
    async fn test_create_short_link_generates_code() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo.expect_find_by_code().times(0);
        mock_link_repo
            .expect_insert()
            .withf(|new_link| new_link.code.len() == 8 && new_link.long_url == "https://example.com")
            .times(1)
            .returning(|new_link| Ok(create_test_link(1, &new_link.code, &new_link.long_url, 0)));

        let link = service(mock_link_repo)
            .create_short_link("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.clicks, 0);
    }

    #[tokio::test]
    async fn test_create_short_link_blank_custom_code_is_absent() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo.expect_find_by_code().times(0);
        mock_link_repo
            .expect_insert()
            .withf(|new_link| new_link.code.len() == 8)
            .times(1)
            .returning(|new_link| Ok(create_test_link(1, &new_link.code, &new_link.long_url, 0)));

        let result = service(mock_link_repo)
            .create_short_link("https://example.com".to_string(), Some("   ".to_string()))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_short_link_retries_generated_collision() {
        let mut mock_link_repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        mock_link_repo
            .expect_insert()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(code_conflict()));
        mock_link_repo
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_link| Ok(create_test_link(3, &new_link.code, &new_link.long_url, 0)));

        let link = service(mock_link_repo)
            .create_short_link("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(link.id, 3);
    }

    #[tokio::test]
    async fn test_create_short_link_gives_up_after_max_attempts() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_insert()
            .times(MAX_GENERATION_ATTEMPTS)
            .returning(|_| Err(code_conflict()));

        let result = service(mock_link_repo)
            .create_short_link("https://example.com".to_string(), None)
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_create_short_link_does_not_retry_other_errors() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_insert()
            .times(1)
            .returning(|_| Err(AppError::unavailable("Database unavailable", json!({}))));

        let result = service(mock_link_repo)
            .create_short_link("https://example.com".to_string(), None)
            .await;

        assert!(matches!(result, Err(AppError::StoreUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_create_short_link_with_custom_code() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .withf(|code| code == "promo")
            .times(1)
            .returning(|_| Ok(None));
        mock_link_repo
            .expect_insert()
            .withf(|new_link| new_link.code == "promo")
            .times(1)
            .returning(|new_link| Ok(create_test_link(10, &new_link.code, &new_link.long_url, 0)));

        let link = service(mock_link_repo)
            .create_short_link("https://a.com".to_string(), Some(" promo ".to_string()))
            .await
            .unwrap();

        assert_eq!(link.code, "promo");
    }

    #[tokio::test]
    async fn test_create_short_link_custom_code_taken() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .withf(|code| code == "promo")
            .times(1)
            .returning(|_| Ok(Some(create_test_link(5, "promo", "https://a.com", 0))));
        mock_link_repo.expect_insert().times(0);

        let result = service(mock_link_repo)
            .create_short_link("https://b.com".to_string(), Some("promo".to_string()))
            .await;

        match result {
            Err(AppError::CodeTaken {
                long_url,
                custom_code,
            }) => {
                assert_eq!(long_url, "https://b.com");
                assert_eq!(custom_code, "promo");
            }
            other => panic!("expected CodeTaken, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_short_link_custom_code_lost_race() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));
        mock_link_repo
            .expect_insert()
            .times(1)
            .returning(|_| Err(code_conflict()));

        let result = service(mock_link_repo)
            .create_short_link("https://b.com".to_string(), Some("promo".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::CodeTaken { .. })));
    }

    #[tokio::test]
    async fn test_create_short_link_invalid_custom_code() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo.expect_find_by_code().times(0);
        mock_link_repo.expect_insert().times(0);

        let result = service(mock_link_repo)
            .create_short_link("https://a.com".to_string(), Some("no/slash".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_short_link_missing_url() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo.expect_insert().times(0);

        let result = service(mock_link_repo)
            .create_short_link("  ".to_string(), None)
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_resolve_increments_clicks() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .withf(|code| code == "abc123XY")
            .times(1)
            .returning(|_| Ok(Some(create_test_link(1, "abc123XY", "https://example.com", 0))));
        mock_link_repo
            .expect_increment_clicks()
            .withf(|code| code == "abc123XY")
            .times(1)
            .returning(|_| Ok(true));

        let url = service(mock_link_repo).resolve("abc123XY").await.unwrap();

        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_not_found_skips_increment() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));
        mock_link_repo.expect_increment_clicks().times(0);

        let result = service(mock_link_repo).resolve("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_cache_hit_still_counts_click() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo.expect_find_by_code().times(0);
        mock_link_repo
            .expect_increment_clicks()
            .times(1)
            .returning(|_| Ok(true));

        let cache = Arc::new(MapCache::default());
        cache
            .set_url("promo", "https://a.com", None)
            .await
            .unwrap();

        let service = LinkService::new(Arc::new(mock_link_repo), cache);
        let url = service.resolve("promo").await.unwrap();

        assert_eq!(url, "https://a.com");
    }

    #[tokio::test]
    async fn test_stats_returns_clicks() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(create_test_link(1, "abc123XY", "https://example.com", 1))));
        mock_link_repo.expect_increment_clicks().times(0);

        let link = service(mock_link_repo).stats("abc123XY").await.unwrap();

        assert_eq!(link.long_url, "https://example.com");
        assert_eq!(link.clicks, 1);
    }

    #[tokio::test]
    async fn test_stats_not_found() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(mock_link_repo).stats("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_overview() {
        let mut mock_link_repo = MockLinkRepository::new();

        mock_link_repo.expect_count().times(1).returning(|| Ok(3));
        mock_link_repo
            .expect_total_clicks()
            .times(1)
            .returning(|| Ok(42));

        let overview = service(mock_link_repo).overview().await.unwrap();

        assert_eq!(
            overview,
            LinkOverview {
                links: 3,
                clicks: 42
            }
        );
    }

    #[test]
    fn test_validate_long_url() {
        assert_eq!(
            validate_long_url(" https://example.com ").unwrap(),
            "https://example.com"
        );
        assert!(validate_long_url("http://localhost:8080/path?q=1").is_ok());
        assert!(validate_long_url("").is_err());
        assert!(validate_long_url("not-a-url").is_err());
        assert!(validate_long_url("javascript:alert(1)").is_err());
        assert!(validate_long_url("ftp://example.com/file").is_err());
    }

    #[test]
    fn test_validate_long_url_rejects_control_characters() {
        assert!(validate_long_url("https://example.com/a\nb").is_err());
        assert!(validate_long_url("https://example.com/a\rb").is_err());
        assert!(validate_long_url("https://exa\tmple.com").is_err());
        assert!(validate_long_url("https://example.com/\u{7f}").is_err());
        assert!(validate_long_url("https://example.com/caf\u{e9}").is_ok());
    }
}
