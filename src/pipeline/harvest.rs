// src/pipeline/harvest.rs

//! Candidate post harvesting.

use std::collections::HashSet;

use crate::services::PageReader;
use crate::utils::log;
use crate::utils::url::extract_status_urls;

/// Post URLs linked from a single target page.
///
/// A failed read is logged and contributes nothing.
pub async fn harvest_target(reader: &dyn PageReader, target: &str) -> Vec<String> {
    log::info(&format!("Searching target: {}", target));

    match reader.read(target).await {
        Ok(content) => {
            let urls = extract_status_urls(&content);
            log::debug(&format!("{} post links on {}", urls.len(), target));
            urls
        }
        Err(e) => {
            log::warn(&format!("Error searching {}: {}", target, e));
            Vec::new()
        }
    }
}

/// New candidate URLs across all `targets`, in first-seen order.
///
/// URLs already in `known` are dropped.
pub async fn harvest_candidates(
    reader: &dyn PageReader,
    targets: &[String],
    known: &HashSet<String>,
) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for target in targets {
        for url in harvest_target(reader, target).await {
            if !known.contains(&url) && seen.insert(url.clone()) {
                candidates.push(url);
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{AppError, Result};

    struct FakeReader(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl PageReader for FakeReader {
        async fn read(&self, url: &str) -> Result<String> {
            self.0
                .get(url)
                .map(|s| s.to_string())
                .ok_or_else(|| AppError::discovery(format!("Failed to fetch {}: 500", url)))
        }
    }

    fn targets(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_harvest_across_targets_skips_known_and_failures() {
        let reader = FakeReader(HashMap::from([
            (
                "https://x.com/one",
                "https://x.com/one/status/1 https://twitter.com/one/status/2",
            ),
            (
                "https://x.com/two",
                "https://x.com/one/status/2 https://x.com/two/status/3",
            ),
        ]));
        let known = HashSet::from(["https://x.com/one/status/1".to_string()]);

        let candidates = harvest_candidates(
            &reader,
            &targets(&["https://x.com/one", "https://x.com/down", "https://x.com/two"]),
            &known,
        )
        .await;

        assert_eq!(
            candidates,
            vec![
                "https://x.com/one/status/2".to_string(),
                "https://x.com/two/status/3".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_harvest_target_failure_is_empty() {
        let reader = FakeReader(HashMap::new());
        assert!(harvest_target(&reader, "https://x.com/none").await.is_empty());
    }
}
