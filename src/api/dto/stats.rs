//! DTOs for link statistics.

use serde::Serialize;

use crate::domain::entities::Link;

/// Click statistics for a single short link.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub code: String,
    pub long_url: String,
    pub clicks: i64,
}

impl From<Link> for StatsResponse {
    fn from(link: Link) -> Self {
        Self {
            code: link.code,
            long_url: link.long_url,
            clicks: link.clicks,
        }
    }
}
