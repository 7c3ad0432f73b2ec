//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote store connection
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Discovery run settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// AI and image extraction collaborators
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// File locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary variable source.
    ///
    /// Store parameters accept both the plain and the `VITE_`-prefixed names.
    pub fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        let lookup = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| get(*key))
                .find(|value| !value.trim().is_empty())
        };

        if let Some(url) = lookup(&["SUPABASE_URL", "VITE_SUPABASE_URL"]) {
            self.store.url = Some(url);
        }
        if let Some(key) = lookup(&["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"]) {
            self.store.key = Some(key);
        }
        if let Some(key) = lookup(&["OPENAI_API_KEY"]) {
            self.extraction.api_key = Some(key);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.store.table.trim().is_empty() {
            return Err(AppError::validation("store.table is empty"));
        }
        if let Some(url) = &self.store.url {
            url::Url::parse(url)?;
        }
        url::Url::parse(&self.discovery.reader_url)?;
        url::Url::parse(&self.extraction.api_base)?;
        if self.discovery.targets.is_empty() {
            return Err(AppError::validation("No discovery targets defined"));
        }
        if self.extraction.model.trim().is_empty() {
            return Err(AppError::validation("extraction.model is empty"));
        }
        Ok(())
    }
}

/// Connection parameters for the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project endpoint URL
    #[serde(default)]
    pub url: Option<String>,

    /// Access key sent with every request
    #[serde(default, skip_serializing)]
    pub key: Option<String>,

    /// Table holding memorial rows
    #[serde(default = "defaults::table")]
    pub table: String,
}

impl StoreConfig {
    /// Endpoint and key, when both are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let url = self.url.as_deref().filter(|s| !s.trim().is_empty())?;
        let key = self.key.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((url, key))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            key: None,
            table: defaults::table(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Discovery run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Profile and search pages to harvest post links from
    #[serde(default = "defaults::targets")]
    pub targets: Vec<String>,

    /// Text-extraction proxy; the target URL is appended to it
    #[serde(default = "defaults::reader_url")]
    pub reader_url: String,

    /// Pause between candidates in milliseconds
    #[serde(default = "defaults::delay_ms")]
    pub delay_ms: u64,

    /// Extracted names that mean "nothing found"
    #[serde(default = "defaults::placeholder_names")]
    pub placeholder_names: Vec<String>,

    /// Reference label used when extraction yields none
    #[serde(default = "defaults::reference_label")]
    pub reference_label: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            targets: defaults::targets(),
            reader_url: defaults::reader_url(),
            delay_ms: defaults::delay_ms(),
            placeholder_names: defaults::placeholder_names(),
            reference_label: defaults::reference_label(),
        }
    }
}

/// Extraction collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// OpenAI-compatible API base URL
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Chat model used for extraction
    #[serde(default = "defaults::model")]
    pub model: String,

    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Host serving Open Graph tags for posts (e.g. `fxtwitter.com`)
    #[serde(default = "defaults::image_mirror")]
    pub image_mirror: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            model: defaults::model(),
            api_key: None,
            image_mirror: defaults::image_mirror(),
        }
    }
}

/// File locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Static dataset served when the store is unreachable
    #[serde(default = "defaults::fallback_file")]
    pub fallback_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            fallback_file: defaults::fallback_file(),
        }
    }
}

mod defaults {
    pub fn table() -> String {
        "memorials".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; memorials/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Discovery defaults
    pub fn targets() -> Vec<String> {
        [
            "https://x.com/HoHossein",
            "https://x.com/LoabatK",
            "https://x.com/isamanyasin",
            "https://x.com/longlosthills",
            "https://x.com/iranwire",
            "https://x.com/HengawO",
            "https://x.com/1500tasvir",
            "https://x.com/AmnestyIran",
            "https://x.com/ICHRI",
            // "شهید ایران"
            "https://x.com/search?q=%D8%B4%D9%87%DB%8C%D8%AF%20%D8%A7%DB%8C%D8%B1%D8%A7%D9%86&f=live",
            // "جانباخته ایران"
            "https://x.com/search?q=%D8%AC%D8%A7%D9%86%D8%A8%D8%A7%D8%AE%D8%AA%D9%87%20%D8%A7%DB%8C%D8%B1%D8%A7%D9%86&f=live",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
    pub fn reader_url() -> String {
        "https://r.jina.ai/".into()
    }
    pub fn delay_ms() -> u64 {
        2000
    }
    pub fn placeholder_names() -> Vec<String> {
        vec!["Full Name".into()]
    }
    pub fn reference_label() -> String {
        "X Post".into()
    }

    // Extraction defaults
    pub fn api_base() -> String {
        "https://api.openai.com/v1".into()
    }
    pub fn model() -> String {
        "gpt-4o-mini".into()
    }
    pub fn image_mirror() -> Option<String> {
        Some("fxtwitter.com".into())
    }

    // Path defaults
    pub fn fallback_file() -> String {
        "data/memorials.json".into()
    }
}
