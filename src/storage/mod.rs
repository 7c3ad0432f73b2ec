//! Storage abstractions for memorial persistence.
//!
//! The remote store is reached through the narrow [`MemorialStore`]
//! repository; nothing outside this module knows its wire shape.
//!
//! - `rest`: PostgREST-compatible endpoint (the production store)
//! - `memory`: in-process rows, for tests and offline runs
//! - `fallback`: the bundled static dataset served when the store is down

pub mod fallback;
pub mod memory;
pub mod rest;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::MemorialRow;

// Re-export for convenience
pub use fallback::StaticDataset;
pub use memory::MemoryStore;
pub use rest::RestStore;

/// Which rows a [`MemorialStore::select`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// Every row ordered by date, newest first.
    All { verified_only: bool },

    /// Rows whose name equals `name` or whose source post equals `x_post`.
    ///
    /// Matching is exact. A `None` side never matches.
    NameOrPost {
        name: Option<&'a str>,
        x_post: Option<&'a str>,
    },

    /// The row with this id, if any.
    Id(&'a str),
}

/// Partial update applied to a single row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl RowPatch {
    pub fn verify() -> Self {
        Self {
            verified: Some(true),
        }
    }
}

/// Repository over the `memorials` table.
#[async_trait]
pub trait MemorialStore: Send + Sync {
    /// Read rows.
    ///
    /// `Ok(None)` means the store answered without a result set, which is
    /// different from an empty one.
    async fn select(&self, selection: Selection<'_>) -> Result<Option<Vec<MemorialRow>>>;

    /// Insert the row, or replace the row with the same `id`.
    async fn upsert(&self, row: &MemorialRow) -> Result<()>;

    /// Apply `patch` to the row with `id`.
    async fn update(&self, id: &str, patch: &RowPatch) -> Result<()>;

    /// Remove the row with `id`.
    async fn delete(&self, id: &str) -> Result<()>;
}
