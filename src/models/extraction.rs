// src/models/extraction.rs

//! Structured data extracted from a single post.

use serde::{Deserialize, Serialize};

use crate::models::memorial::present;
use crate::models::{Media, MemorialDraft, Reference};

/// Best-effort partial entry returned by the extraction collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractedMemorial {
    pub name: Option<String>,
    pub name_fa: Option<String>,
    pub city: Option<String>,
    pub city_fa: Option<String>,
    pub location: Option<String>,
    pub location_fa: Option<String>,
    pub date: Option<String>,
    pub bio: Option<String>,
    pub bio_fa: Option<String>,
    pub photo: Option<String>,
    #[serde(rename = "referenceLabel", alias = "reference_label")]
    pub reference_label: Option<String>,
}

impl ExtractedMemorial {
    /// The extracted name, unless it is empty or one of `placeholders`.
    pub fn usable_name(&self, placeholders: &[String]) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .filter(|name| !placeholders.iter().any(|p| p == name))
    }

    /// Whether a photo URL was extracted.
    pub fn has_photo(&self) -> bool {
        self.photo.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Build an unverified submission for the post at `url`.
    pub fn into_draft(self, url: &str, default_label: &str) -> MemorialDraft {
        let label = present(self.reference_label).unwrap_or_else(|| default_label.to_string());

        MemorialDraft {
            id: None,
            name: self.name,
            name_fa: self.name_fa,
            city: self.city,
            city_fa: self.city_fa,
            location: self.location,
            location_fa: self.location_fa,
            date: self.date,
            coords: None,
            bio: self.bio,
            bio_fa: self.bio_fa,
            testimonials: None,
            media: Some(Media {
                x_post: Some(url.to_string()),
                photo: Some(self.photo.unwrap_or_default()),
                extra: Default::default(),
            }),
            references: Some(vec![Reference {
                label,
                url: url.to_string(),
            }]),
            verified: Some(false),
        }
    }
}
