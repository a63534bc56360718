//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! - [`PgLinkRepository`] - Link storage, lookup and click accounting
//! - [`connect_with_retry`] / [`run_migrations`] - Pool startup helpers

pub mod pg_link_repository;
pub mod pool;

pub use pg_link_repository::PgLinkRepository;
pub use pool::{PoolSettings, RetryPolicy, connect_with_retry, run_migrations};
