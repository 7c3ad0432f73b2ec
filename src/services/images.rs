// src/services/images.rs

//! Photo extraction from a post's Open Graph tags.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::Result;
use crate::utils::http::fetch_page_async;
use crate::utils::url::with_host;

/// Best-effort photo lookup for a post.
#[async_trait]
pub trait ImageExtractor: Send + Sync {
    /// Photo URL attached to the post at `url`, if one can be found.
    async fn extract_image(&self, url: &str) -> Result<Option<String>>;
}

/// Meta tags checked for an image, in order of preference.
const IMAGE_SELECTORS: &[&str] = &[
    r#"meta[property="og:image"]"#,
    r#"meta[name="twitter:image"]"#,
    r#"meta[property="twitter:image"]"#,
];

/// Reads `og:image` / `twitter:image` from the post page.
///
/// Post pages on the canonical host need a browser to render, so requests
/// can be routed through a mirror host that serves the tags statically.
#[derive(Clone)]
pub struct OpenGraphImages {
    client: Client,
    mirror: Option<String>,
}

impl OpenGraphImages {
    pub fn new(client: Client, mirror: Option<String>) -> Self {
        Self { client, mirror }
    }

    fn page_url(&self, url: &str) -> String {
        self.mirror
            .as_deref()
            .and_then(|host| with_host(url, host))
            .unwrap_or_else(|| url.to_string())
    }
}

/// First non-empty image URL declared in the document's meta tags.
pub fn find_image(document: &Html) -> Option<String> {
    IMAGE_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .filter_map(|el| el.value().attr("content"))
                .map(str::trim)
                .find(|content| !content.is_empty())
                .map(String::from)
        })
}

#[async_trait]
impl ImageExtractor for OpenGraphImages {
    async fn extract_image(&self, url: &str) -> Result<Option<String>> {
        let page_url = self.page_url(url);
        log::debug!("Looking up image for {} via {}", url, page_url);

        let document = fetch_page_async(&self.client, &page_url).await?;
        Ok(find_image(&document))
    }
}
