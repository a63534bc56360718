//! HTML form variant of the service.
//!
//! Server-rendered pages built with Askama templates: the shorten form and
//! the per-link statistics page.
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering handlers
//! - [`routes`] - Page route configuration

pub mod handlers;
pub mod routes;
