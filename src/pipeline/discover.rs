// src/pipeline/discover.rs

//! Discovery run: harvest post links, extract, and submit new entries.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::models::{Config, DiscoveryConfig, DiscoverySummary};
use crate::pipeline::harvest::harvest_candidates;
use crate::services::{
    ImageExtractor, LlmExtractor, MemorialExtractor, MemorialService, OpenGraphImages, PageReader,
    ProxyReader,
};
use crate::utils::log;

/// What happened to a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CandidateOutcome {
    Added(String),
    Skipped,
    Rejected { name: String, error: String },
}

/// One discovery run over the configured targets.
pub struct Discovery<'a> {
    config: &'a DiscoveryConfig,
    service: &'a MemorialService,
    reader: &'a dyn PageReader,
    extractor: &'a dyn MemorialExtractor,
    images: &'a dyn ImageExtractor,
}

impl<'a> Discovery<'a> {
    pub fn new(
        config: &'a DiscoveryConfig,
        service: &'a MemorialService,
        reader: &'a dyn PageReader,
        extractor: &'a dyn MemorialExtractor,
        images: &'a dyn ImageExtractor,
    ) -> Self {
        Self {
            config,
            service,
            reader,
            extractor,
            images,
        }
    }

    /// Run every stage and report totals.
    ///
    /// Failures on a single target or candidate are logged and counted;
    /// they never end the run.
    pub async fn run(&self) -> DiscoverySummary {
        let mut summary = DiscoverySummary::default();

        log::step(1, 3, "Collecting existing entries");
        let existing = self.service.fetch_memorials(true).await;
        let known: HashSet<String> = existing
            .iter()
            .flat_map(|entry| entry.known_urls())
            .map(String::from)
            .collect();
        summary.existing = existing.len();
        log::info(&format!(
            "Found {} existing entries ({} known URLs)",
            existing.len(),
            known.len()
        ));

        log::step(2, 3, "Harvesting candidate posts");
        let candidates = harvest_candidates(self.reader, &self.config.targets, &known).await;
        summary.candidates = candidates.len();
        log::info(&format!(
            "Found {} new potential status URLs",
            candidates.len()
        ));

        log::step(3, 3, "Processing candidates");
        let delay = Duration::from_millis(self.config.delay_ms);

        for (i, url) in candidates.iter().enumerate() {
            log::info(&format!("Processing {}/{}: {}", i + 1, candidates.len(), url));

            match self.process(url).await {
                Ok(CandidateOutcome::Added(name)) => {
                    log::success(&format!("Added: {}", name));
                    summary.added += 1;
                }
                Ok(CandidateOutcome::Skipped) => {
                    log::info(&format!("Skipping (could not extract valid name): {}", url));
                    summary.skipped += 1;
                }
                Ok(CandidateOutcome::Rejected { name, error }) => {
                    log::error(&format!("Failed to submit {}", name));
                    log::sub_item(&error);
                    summary.failed += 1;
                }
                Err(e) => {
                    log::error(&format!("Error processing {}: {}", url, e));
                    summary.failed += 1;
                }
            }

            // Throttle every candidate, skipped ones included; never after the last.
            if i + 1 < candidates.len() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        summary
    }

    async fn process(&self, url: &str) -> Result<CandidateOutcome> {
        let Some(mut extracted) = self.extractor.extract(url).await? else {
            return Ok(CandidateOutcome::Skipped);
        };

        let Some(name) = extracted
            .usable_name(&self.config.placeholder_names)
            .map(String::from)
        else {
            return Ok(CandidateOutcome::Skipped);
        };

        if !extracted.has_photo() {
            extracted.photo = match self.images.extract_image(url).await {
                Ok(photo) => photo,
                Err(e) => {
                    log::debug(&format!("No image for {}: {}", url, e));
                    None
                }
            };
        }

        let draft = extracted.into_draft(url, &self.config.reference_label);
        let outcome = self.service.submit_memorial(draft).await;

        Ok(match outcome.error {
            None if outcome.success => CandidateOutcome::Added(name),
            error => CandidateOutcome::Rejected {
                name,
                error: error.unwrap_or_default(),
            },
        })
    }
}

/// Run discovery with the production collaborators built from `config`.
pub async fn run_discovery(config: &Config, client: &Client) -> Result<DiscoverySummary> {
    log::header("Memorial Discovery");

    let service = MemorialService::from_config(config, client.clone());
    let reader: Arc<dyn PageReader> = Arc::new(ProxyReader::new(
        client.clone(),
        config.discovery.reader_url.clone(),
    ));
    let extractor = LlmExtractor::new(client.clone(), Arc::clone(&reader), &config.extraction);
    let images = OpenGraphImages::new(client.clone(), config.extraction.image_mirror.clone());

    let summary = Discovery::new(
        &config.discovery,
        &service,
        reader.as_ref(),
        &extractor,
        &images,
    )
    .run()
    .await;

    log::summary(
        "Discovery Results",
        &[
            ("Existing entries", summary.existing.to_string()),
            ("New candidates", summary.candidates.to_string()),
            ("Added/Merged", summary.added.to_string()),
            ("Skipped", summary.skipped.to_string()),
            ("Failed", summary.failed.to_string()),
        ],
    );

    Ok(summary)
}
