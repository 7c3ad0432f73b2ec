// src/services/reader.rs

//! Rendered page text through a text-extraction proxy.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};

/// Source of rendered page text.
#[async_trait]
pub trait PageReader: Send + Sync {
    /// Rendered text of the page at `url`.
    async fn read(&self, url: &str) -> Result<String>;
}

/// Reader proxy that renders a page when its URL is appended to the proxy's.
#[derive(Clone)]
pub struct ProxyReader {
    client: Client,
    base_url: String,
}

impl ProxyReader {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Proxy URL that renders `target`.
    pub fn reader_url(&self, target: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), target)
    }
}

#[async_trait]
impl PageReader for ProxyReader {
    async fn read(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(self.reader_url(url))
            .header("X-No-Cache", "true")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::discovery(format!(
                "Failed to fetch {}: {}",
                url, status
            )));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_url_appends_target() {
        let reader = ProxyReader::new(Client::new(), "https://r.jina.ai/");
        assert_eq!(
            reader.reader_url("https://x.com/search?q=a&f=live"),
            "https://r.jina.ai/https://x.com/search?q=a&f=live"
        );
    }
}
