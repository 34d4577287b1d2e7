//! Content extraction for prospect web pages

mod generic;

use async_trait::async_trait;

pub use generic::GenericWebRetriever;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status}: {url}")]
    Status { status: u16, url: String },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("URL blocked by configuration: {0}")]
    Blocked(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Title and plain text of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: String,
    pub text: String,
}

/// Fetches a URL and reduces it to title and main text
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ExtractedContent, FetchError>;
}
