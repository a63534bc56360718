//! Helpers shared by the service and HTTP layers.
//!
//! - [`code_generator`] - Short code generation and custom code validation
//! - [`public_url`] - Public origin detection and short URL formatting

pub mod code_generator;
pub mod public_url;
