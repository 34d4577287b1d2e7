use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::service::profile::normalize::{STORED_CHARS_PER_SOURCE, normalize};

/// Fetch state of a source URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Pending,
    Success,
    Error(String),
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::Pending => write!(f, "pending"),
            SourceStatus::Success => write!(f, "success"),
            SourceStatus::Error(reason) => write!(f, "error:{}", reason),
        }
    }
}

/// One fetched URL's content.
///
/// `text` is only ever non-empty for a successful fetch; the constructors are the
/// only way to build one so the invariant holds.
#[derive(Debug, Clone, Serialize)]
pub struct Source {
    url: String,
    title: String,
    text: String,
    status: SourceStatus,
    fetched_at: DateTime<Utc>,
}

impl Source {
    /// Source that has not been fetched yet
    pub fn pending(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            text: String::new(),
            status: SourceStatus::Pending,
            fetched_at: Utc::now(),
        }
    }

    /// Successfully fetched source; text is normalized and capped for storage
    pub fn fetched(url: impl Into<String>, title: impl Into<String>, text: &str) -> Self {
        Self {
            url: url.into(),
            title: title.into().trim().to_string(),
            text: normalize(text, STORED_CHARS_PER_SOURCE),
            status: SourceStatus::Success,
            fetched_at: Utc::now(),
        }
    }

    /// Source whose fetch failed
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            text: String::new(),
            status: SourceStatus::Error(reason.into()),
            fetched_at: Utc::now(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> &SourceStatus {
        &self.status
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, SourceStatus::Success)
    }
}

/// The prospect a profile is generated for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountContext {
    pub name: String,
    pub domain: String,
}

impl AccountContext {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
        }
    }

    /// Build an account from the company website; the name defaults to the domain
    pub fn from_company_url(company_url: &str, name: Option<&str>) -> Self {
        let domain = extract_domain(company_url);
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| domain.clone());
        Self { name, domain }
    }
}

/// Prefix `https://` when the URL has no scheme
pub fn ensure_scheme(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Lower-cased host without a leading `www.`
pub fn extract_domain(url: &str) -> String {
    match Url::parse(&ensure_scheme(url)) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default().to_lowercase();
            host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
        }
        Err(_) => url.split('/').next().unwrap_or(url).to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_source_has_no_text() {
        let source = Source::failed("https://acme.test", "HTTP 503");
        assert!(source.text().is_empty());
        assert!(!source.is_success());
        assert_eq!(source.status().to_string(), "error:HTTP 503");
    }

    #[test]
    fn test_fetched_source_is_capped() {
        let body = "x".repeat(20000);
        let source = Source::fetched("https://acme.test", " Acme ", &body);
        assert!(source.is_success());
        assert_eq!(source.title(), "Acme");
        assert_eq!(source.text().chars().count(), STORED_CHARS_PER_SOURCE);
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("https://www.Acme.com/about"), "acme.com");
        assert_eq!(extract_domain("acme.io"), "acme.io");
        assert_eq!(extract_domain("http://shop.acme.io:8080/x"), "shop.acme.io");
    }

    #[test]
    fn test_account_name_defaults_to_domain() {
        let account = AccountContext::from_company_url("www.acme.com", None);
        assert_eq!(account.name, "acme.com");
        let named = AccountContext::from_company_url("acme.com", Some("Acme Corp"));
        assert_eq!(named.name, "Acme Corp");
    }
}
