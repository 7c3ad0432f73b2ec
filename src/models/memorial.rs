// src/models/memorial.rs

//! Memorial entry, draft, and their nested value types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::MemorialRow;

/// A geographic coordinate pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coords {
    pub lat: f64,
    pub lon: f64,
}

impl Coords {
    /// Coordinate used when an entry has no known location.
    pub const FALLBACK: Coords = Coords {
        lat: 35.6892,
        lon: 51.3890,
    };
}

impl Default for Coords {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Media attached to an entry.
///
/// Keys other than `xPost` and `photo` are kept as-is so that rows written
/// by other clients survive a read/write cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Media {
    /// Source post URL
    #[serde(rename = "xPost", default, skip_serializing_if = "Option::is_none")]
    pub x_post: Option<String>,

    /// Portrait photo URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A labelled link citing a source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reference {
    pub label: String,
    pub url: String,
}

/// The canonical in-memory memorial record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemorialEntry {
    /// Stable identifier (slug of the name, or a timestamp fallback)
    pub id: String,

    /// Display name
    pub name: String,

    /// Localized display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_fa: Option<String>,

    #[serde(default)]
    pub city: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_fa: Option<String>,

    #[serde(default)]
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_fa: Option<String>,

    /// ISO date (`YYYY-MM-DD`)
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub coords: Coords,

    #[serde(default)]
    pub bio: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio_fa: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testimonials: Option<Vec<String>>,

    #[serde(default)]
    pub media: Media,

    #[serde(default)]
    pub references: Vec<Reference>,

    #[serde(default)]
    pub verified: bool,
}

impl MemorialEntry {
    /// URLs this entry is already known by: the source post and every reference.
    pub fn known_urls(&self) -> impl Iterator<Item = &str> {
        self.media
            .x_post
            .as_deref()
            .into_iter()
            .chain(self.references.iter().map(|r| r.url.as_str()))
            .filter(|url| !url.is_empty())
    }
}

/// A partial entry accepted by submission.
///
/// A present `id` marks the submission as an edit of that record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MemorialDraft {
    pub id: Option<String>,
    pub name: Option<String>,
    pub name_fa: Option<String>,
    pub city: Option<String>,
    pub city_fa: Option<String>,
    pub location: Option<String>,
    pub location_fa: Option<String>,
    pub date: Option<String>,
    pub coords: Option<Coords>,
    pub bio: Option<String>,
    pub bio_fa: Option<String>,
    pub testimonials: Option<Vec<String>>,
    pub media: Option<Media>,
    pub references: Option<Vec<Reference>>,
    pub verified: Option<bool>,
}

impl MemorialDraft {
    /// Whether this draft edits an existing record.
    pub fn is_edit(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Source post URL of the draft, if any.
    pub fn x_post(&self) -> Option<&str> {
        self.media
            .as_ref()
            .and_then(|m| m.x_post.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Build the store row, filling every absent field with its default.
    ///
    /// Empty strings count as absent. `verified` is only carried over for
    /// edits; new records always start unverified.
    pub fn into_row(self, id: String, today: &str) -> MemorialRow {
        let verified = self.is_edit() && self.verified.unwrap_or(false);

        MemorialRow {
            id,
            name: present(self.name).unwrap_or_else(|| "Unknown".to_string()),
            name_fa: present(self.name_fa),
            city: Some(present(self.city).unwrap_or_else(|| "Unknown".to_string())),
            city_fa: present(self.city_fa),
            location: Some(present(self.location).unwrap_or_default()),
            location_fa: present(self.location_fa),
            date: Some(present(self.date).unwrap_or_else(|| today.to_string())),
            bio: Some(present(self.bio).unwrap_or_default()),
            bio_fa: present(self.bio_fa),
            coords: to_json(self.coords.unwrap_or_default()),
            media: to_json(self.media.unwrap_or_default()),
            source_links: to_json(self.references.unwrap_or_default()),
            testimonials: to_json(self.testimonials.unwrap_or_default()),
            verified: Some(verified),
        }
    }
}

impl From<MemorialEntry> for MemorialDraft {
    fn from(entry: MemorialEntry) -> Self {
        Self {
            id: Some(entry.id),
            name: Some(entry.name),
            name_fa: entry.name_fa,
            city: Some(entry.city),
            city_fa: entry.city_fa,
            location: Some(entry.location),
            location_fa: entry.location_fa,
            date: Some(entry.date),
            coords: Some(entry.coords),
            bio: Some(entry.bio),
            bio_fa: entry.bio_fa,
            testimonials: entry.testimonials,
            media: Some(entry.media),
            references: Some(entry.references),
            verified: Some(entry.verified),
        }
    }
}

/// Treat an empty string the same as a missing value.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn to_json<T: Serialize>(value: T) -> Option<Value> {
    // Plain data structs always serialize.
    serde_json::to_value(value).ok()
}
