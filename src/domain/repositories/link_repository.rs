//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Store contract for short links.
///
/// Every cross-request guarantee lives behind this trait: code uniqueness is
/// enforced by the store on [`LinkRepository::insert`], and
/// [`LinkRepository::increment_clicks`] is a single atomic update.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with zero clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    /// Returns [`AppError::StoreUnavailable`] or [`AppError::Internal`] on
    /// database errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Atomically adds one click to the link with the given code.
    ///
    /// Returns `Ok(false)` if no link has that code.
    async fn increment_clicks(&self, code: &str) -> Result<bool, AppError>;

    /// Counts stored links.
    async fn count(&self) -> Result<i64, AppError>;

    /// Sums the click counters of all links.
    async fn total_clicks(&self) -> Result<i64, AppError>;

    /// Checks that the store answers a trivial query.
    async fn ping(&self) -> Result<(), AppError>;
}
