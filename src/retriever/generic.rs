//! Generic web page retriever with main-content text extraction

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{ContentExtractor, ExtractedContent, FetchError};
use crate::model::{FetchConfig, ensure_scheme};

/// Elements that never carry page content
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "nav", "footer", "header", "noscript"];

/// Main-content containers, most specific first
const CONTENT_SELECTORS: &[&str] = &["main", "article", "div.content", "body"];

/// Generic retriever for company web pages
pub struct GenericWebRetriever {
    client: Client,
    config: FetchConfig,
}

impl GenericWebRetriever {
    pub fn new(config: FetchConfig) -> Self {
        if !config.allow.is_empty() {
            tracing::info!(allow = ?config.allow, "Fetch whitelist configured");
        }
        if !config.deny.is_empty() {
            tracing::info!(deny = ?config.deny, "Fetch blacklist configured");
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    /// Extract title from <title> or <meta property="og:title">
    fn extract_title(document: &Html) -> String {
        if let Ok(selector) = Selector::parse("title")
            && let Some(el) = document.select(&selector).next()
        {
            let title = el.text().collect::<String>().trim().to_string();
            if !title.is_empty() {
                return title;
            }
        }

        Selector::parse("meta[property=\"og:title\"]")
            .ok()
            .and_then(|selector| {
                document
                    .select(&selector)
                    .next()
                    .and_then(|el| el.value().attr("content"))
                    .map(|s| s.trim().to_string())
            })
            .unwrap_or_default()
    }

    /// Text of the main content container, skipping non-content elements
    fn extract_text(document: &Html) -> String {
        let container = CONTENT_SELECTORS.iter().find_map(|css| {
            Selector::parse(css)
                .ok()
                .and_then(|selector| document.select(&selector).next())
        });

        let mut chunks = Vec::new();
        match container {
            Some(root) => collect_text(root, &mut chunks),
            None => collect_text(document.root_element(), &mut chunks),
        }
        chunks.join(" ")
    }

    /// Parse an HTML page into title and text
    pub fn extract(html: &str) -> ExtractedContent {
        let document = Html::parse_document(html);
        ExtractedContent {
            title: Self::extract_title(&document),
            text: Self::extract_text(&document),
        }
    }
}

/// Depth-first text collection that prunes non-content subtrees
fn collect_text(element: ElementRef<'_>, chunks: &mut Vec<String>) {
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if NON_CONTENT_TAGS.contains(&child_el.value().name()) {
                continue;
            }
            collect_text(child_el, chunks);
        } else if let Some(text) = child.value().as_text() {
            let text = text.trim();
            if !text.is_empty() {
                chunks.push(text.to_string());
            }
        }
    }
}

#[async_trait]
impl ContentExtractor for GenericWebRetriever {
    async fn fetch(&self, url: &str) -> Result<ExtractedContent, FetchError> {
        let url_str = ensure_scheme(url);
        let parsed = Url::parse(&url_str).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !self.config.is_url_allowed(&parsed) {
            tracing::debug!(url = %parsed, "URL blocked by configuration");
            return Err(FetchError::Blocked(parsed.to_string()));
        }

        tracing::debug!(url = %parsed, "Fetching web page");

        let response = self.client.get(parsed.as_str()).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(parsed.to_string()));
        }

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(url = %parsed, "Web request rate limited");
            return Err(FetchError::RateLimited);
        }

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url: parsed.to_string(),
            });
        }

        let is_html = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("html"))
            .unwrap_or(true);

        let body = response.text().await?;

        let content = if is_html {
            Self::extract(&body)
        } else {
            ExtractedContent {
                title: String::new(),
                text: body,
            }
        };

        tracing::debug!(
            url = %parsed,
            title = %content.title,
            text_length = content.text.len(),
            "Extracted page content"
        );

        Ok(content)
    }
}
