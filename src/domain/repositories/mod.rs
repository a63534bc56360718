//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations. The PostgreSQL
//! implementation lives in `crate::infrastructure::persistence`; mock
//! implementations are generated via `mockall` for testing.
//!
//! See integration tests in `tests/repository_link.rs` for usage examples.

pub mod link_repository;

pub use link_repository::LinkRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
