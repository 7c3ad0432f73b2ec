//! In-memory storage implementation for testing and offline runs.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::MemorialRow;
use crate::storage::{MemorialStore, RowPatch, Selection};

/// Rows held in process memory, keyed by `id`.
///
/// Data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<MemorialRow>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `rows`.
    pub fn with_rows(rows: Vec<MemorialRow>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Snapshot of the stored rows in insertion order.
    pub fn rows(&self) -> Vec<MemorialRow> {
        self.read().clone()
    }

    /// Look up a single row.
    pub fn get(&self, id: &str) -> Option<MemorialRow> {
        self.read().iter().find(|row| row.id == id).cloned()
    }

    /// Get the number of stored rows.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<MemorialRow>> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<MemorialRow>> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MemorialStore for MemoryStore {
    async fn select(&self, selection: Selection<'_>) -> Result<Option<Vec<MemorialRow>>> {
        let rows = self.read();

        let selected = match selection {
            Selection::All { verified_only } => {
                let mut selected: Vec<MemorialRow> = rows
                    .iter()
                    .filter(|row| !verified_only || row.verified == Some(true))
                    .cloned()
                    .collect();
                // ISO dates sort lexically; rows without a date go last.
                selected.sort_by(|a, b| b.date.cmp(&a.date));
                selected
            }
            Selection::NameOrPost { name, x_post } => rows
                .iter()
                .filter(|row| {
                    name.is_some_and(|n| row.name == n)
                        || x_post.is_some_and(|url| row.x_post() == Some(url))
                })
                .cloned()
                .collect(),
            Selection::Id(id) => rows.iter().filter(|row| row.id == id).cloned().collect(),
        };

        Ok(Some(selected))
    }

    async fn upsert(&self, row: &MemorialRow) -> Result<()> {
        let mut rows = self.write();
        match rows.iter_mut().find(|existing| existing.id == row.id) {
            Some(existing) => *existing = row.clone(),
            None => rows.push(row.clone()),
        }
        Ok(())
    }

    async fn update(&self, id: &str, patch: &RowPatch) -> Result<()> {
        let mut rows = self.write();
        if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
            if let Some(verified) = patch.verified {
                row.verified = Some(verified);
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.write().retain(|row| row.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, date: &str, verified: bool) -> MemorialRow {
        serde_json::from_value(json!({
            "id": id,
            "name": id.to_uppercase(),
            "date": date,
            "media": { "xPost": format!("https://x.com/a/status/{}", id.len()) },
            "verified": verified
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_select_orders_by_date_desc() {
        let store = MemoryStore::with_rows(vec![
            row("old", "2025-12-01", true),
            row("new", "2026-02-01", true),
            row("mid", "2026-01-01", false),
        ]);

        let rows = store
            .select(Selection::All { verified_only: false })
            .await
            .unwrap()
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);

        let verified = store
            .select(Selection::All { verified_only: true })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(verified.len(), 2);
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = MemoryStore::new();
        store.upsert(&row("a", "2026-01-01", false)).await.unwrap();

        let mut changed = row("a", "2026-01-02", false);
        changed.name = "Changed".into();
        store.upsert(&changed).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().name, "Changed");
    }

    #[tokio::test]
    async fn test_name_or_post_matches_either_side() {
        let store = MemoryStore::with_rows(vec![row("abc", "2026-01-01", true)]);

        let by_name = store
            .select(Selection::NameOrPost {
                name: Some("ABC"),
                x_post: None,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.len(), 1);

        let by_post = store
            .select(Selection::NameOrPost {
                name: Some("other"),
                x_post: Some("https://x.com/a/status/3"),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_post.len(), 1);

        let none = store
            .select(Selection::NameOrPost {
                name: Some("abc"),
                x_post: None,
            })
            .await
            .unwrap()
            .unwrap();
        assert!(none.is_empty(), "matching is case-sensitive");
    }

    #[tokio::test]
    async fn test_select_by_id() {
        let store = MemoryStore::with_rows(vec![
            row("abc", "2026-01-01", true),
            row("de", "2026-01-02", false),
        ]);

        let found = store.select(Selection::Id("de")).await.unwrap().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "de");

        let missing = store.select(Selection::Id("ABC")).await.unwrap().unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::with_rows(vec![row("a", "2026-01-01", false)]);

        store.update("a", &RowPatch::verify()).await.unwrap();
        assert_eq!(store.get("a").unwrap().verified, Some(true));

        store.update("missing", &RowPatch::verify()).await.unwrap();

        store.delete("a").await.unwrap();
        assert!(store.is_empty());
    }
}
