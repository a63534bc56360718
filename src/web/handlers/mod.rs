//! HTML template rendering handlers.

mod index;
mod stats;

pub use index::{IndexTemplate, ShortenForm, index_handler, shorten_form_handler};
pub use stats::{StatsTemplate, stats_page_handler};
