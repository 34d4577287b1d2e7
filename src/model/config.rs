use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::service::profile::retry::RetryPolicy;
use crate::service::profile::validation::{ClaimPolicy, UnsourcedPolicy};

const ENV_CONFIG_PATH: &str = "PROSPECT_INTEL_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const ENV_PROFILE_MODEL: &str = "PROFILE_MODEL";

/// Default model for profile and collateral generation
const DEFAULT_MODEL: &str = rig::providers::openai::GPT_4O;

/// URL fetching configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Allowed domains (whitelist). If empty, all domains are allowed.
    #[serde(default)]
    pub allow: Vec<String>,
    /// Denied domains (blacklist). Applied after allow list.
    #[serde(default)]
    pub deny: Vec<String>,
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; prospect-intel/0.1)".to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            allow: Vec::new(),
            deny: Vec::new(),
            timeout_secs: default_fetch_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    /// Check if a URL is allowed based on the allow/deny lists
    pub fn is_url_allowed(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(h) => h.to_lowercase(),
            None => return false,
        };

        if self.deny.iter().any(|d| host.contains(&d.to_lowercase())) {
            return false;
        }

        if self.allow.is_empty() {
            return true;
        }

        self.allow.iter().any(|a| host.contains(&a.to_lowercase()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Profile generation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub claim_policy: ClaimPolicy,
    #[serde(default)]
    pub unsourced_claims: UnsourcedPolicy,
    /// Total model call attempts, first call included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Per model call timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Overall budget for all attempts; no limit when absent
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

fn default_max_attempts() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            claim_policy: ClaimPolicy::default(),
            unsourced_claims: UnsourcedPolicy::default(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            deadline_secs: None,
        }
    }
}

impl ProfileConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.retry_backoff_ms))
            .with_call_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_deadline(self.deadline_secs.map(Duration::from_secs))
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: ProfileConfig,
    pub fetch: FetchConfig,
    pub model: String,
    pub openai_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: ProfileConfig::default(),
            fetch: FetchConfig::default(),
            model: DEFAULT_MODEL.to_string(),
            openai_api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let model =
            std::env::var(ENV_PROFILE_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let openai_api_key = std::env::var(ENV_OPENAI_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set - model calls will fail");
        }

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self {
            profile: file.profile,
            fetch: file.fetch,
            model,
            openai_api_key,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents).or_else(|| {
                tracing::warn!(path = %path.display(), "Failed to parse config file, using defaults");
                None
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    fn parse_config(contents: &str) -> Option<ConfigFile> {
        let contents = contents.trim();
        if contents.is_empty() {
            return Some(ConfigFile::default());
        }
        match serde_yaml::from_str(contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::debug!(error = %e, "Invalid YAML configuration");
                None
            }
        }
    }
}
