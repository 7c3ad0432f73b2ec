// src/models/row.rs

//! Store row representation and its mapping into [`MemorialEntry`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::memorial::present;
use crate::models::{Coords, Media, MemorialEntry, Reference};

/// A row of the `memorials` table as the store returns it.
///
/// Structured columns stay loosely typed so that malformed values are
/// handled by the mapper instead of failing the whole read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemorialRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_fa: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub city_fa: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_fa: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub bio_fa: Option<String>,
    #[serde(default)]
    pub coords: Option<Value>,
    #[serde(default)]
    pub media: Option<Value>,
    #[serde(default)]
    pub source_links: Option<Value>,
    #[serde(default)]
    pub testimonials: Option<Value>,
    #[serde(default)]
    pub verified: Option<bool>,
}

impl MemorialRow {
    /// Source post URL stored in the `media` column.
    pub fn x_post(&self) -> Option<&str> {
        self.media
            .as_ref()
            .and_then(|m| m.get("xPost"))
            .and_then(Value::as_str)
    }
}

impl From<MemorialRow> for MemorialEntry {
    fn from(row: MemorialRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            name_fa: present(row.name_fa),
            city: row.city.unwrap_or_default(),
            city_fa: present(row.city_fa),
            location: row.location.unwrap_or_default(),
            location_fa: present(row.location_fa),
            date: row.date.unwrap_or_default(),
            coords: decode::<Coords>(row.coords).unwrap_or_default(),
            bio: row.bio.unwrap_or_default(),
            bio_fa: present(row.bio_fa),
            testimonials: testimonials(row.testimonials),
            media: decode::<Media>(row.media).unwrap_or_default(),
            references: decode::<Vec<Reference>>(row.source_links).unwrap_or_default(),
            verified: row.verified.unwrap_or(false),
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Option<Value>) -> Option<T> {
    value.and_then(|v| serde_json::from_value(v).ok())
}

/// Only array-shaped values count as testimonials.
fn testimonials(value: Option<Value>) -> Option<Vec<String>> {
    match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}
