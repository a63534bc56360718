//! Link entity representing a shortened URL mapping.

/// A shortened URL with its click counter.
///
/// `code` and `long_url` never change after creation; `clicks` only grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub clicks: i64,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(id: i64, code: String, long_url: String, clicks: i64) -> Self {
        Self {
            id,
            code,
            long_url,
            clicks,
        }
    }
}

/// Input data for creating a new link. Links always start with zero clicks.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub long_url: String,
}

impl NewLink {
    pub fn new(code: impl Into<String>, long_url: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            long_url: long_url.into(),
        }
    }
}
