// src/services/memorials.rs

//! Memorial data access.
//!
//! Reads degrade to the static dataset when the store cannot answer; writes
//! report failures as [`WriteOutcome`] values. Nothing here returns an
//! error to the caller.

use std::sync::Arc;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Config, MemorialDraft, MemorialEntry, WriteOutcome};
use crate::storage::{MemorialStore, RestStore, RowPatch, Selection, StaticDataset};
use crate::utils::{fallback_id, slugify, today};

/// Fetch, submit, verify, and delete memorial entries.
#[derive(Clone)]
pub struct MemorialService {
    store: Option<Arc<dyn MemorialStore>>,
    fallback: StaticDataset,
}

impl MemorialService {
    /// Create a service over `store`; `None` means the store is not configured.
    pub fn new(store: Option<Arc<dyn MemorialStore>>, fallback: StaticDataset) -> Self {
        Self { store, fallback }
    }

    /// Build the service from configuration, connecting to the REST store
    /// when both connection parameters are present and valid.
    ///
    /// An unusable store configuration leaves the service unconnected.
    pub fn from_config(config: &Config, client: Client) -> Self {
        let store = match RestStore::from_config(&config.store, client) {
            Ok(Some(store)) => Some(Arc::new(store) as Arc<dyn MemorialStore>),
            Ok(None) => {
                log::warn!("Store connection parameters missing; using static dataset only");
                None
            }
            Err(e) => {
                log::warn!("Invalid store configuration ({}); using static dataset only", e);
                None
            }
        };

        Self::new(store, StaticDataset::new(&config.paths.fallback_file))
    }

    /// Whether a store is configured.
    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> Result<&dyn MemorialStore> {
        self.store.as_deref().ok_or(AppError::StoreUnavailable)
    }

    /// Fetch entries newest first.
    ///
    /// Only verified entries unless `include_unverified`. A store error, a
    /// null result, or a missing store yields the static dataset instead;
    /// an empty result set is returned as-is.
    pub async fn fetch_memorials(&self, include_unverified: bool) -> Vec<MemorialEntry> {
        let Some(store) = self.store.as_deref() else {
            log::info!("Store not configured, falling back to static dataset");
            return self.load_fallback().await;
        };

        let selection = Selection::All {
            verified_only: !include_unverified,
        };

        match store.select(selection).await {
            Ok(Some(rows)) => {
                log::info!("Fetched {} entries from store", rows.len());
                rows.into_iter()
                    .map(MemorialEntry::from)
                    .filter(|entry| include_unverified || entry.verified)
                    .collect()
            }
            Ok(None) => {
                log::info!("No data returned from store, falling back to static dataset");
                self.load_fallback().await
            }
            Err(e) => {
                log::warn!("Store fetch failed ({}), falling back to static dataset", e);
                self.load_fallback().await
            }
        }
    }

    /// Find a single entry by id, including unverified ones.
    pub async fn fetch_memorial(&self, id: &str) -> Option<MemorialEntry> {
        self.fetch_memorials(true)
            .await
            .into_iter()
            .find(|entry| entry.id == id)
    }

    async fn load_fallback(&self) -> Vec<MemorialEntry> {
        match self.fallback.load().await {
            Ok(entries) => entries,
            Err(e) => {
                log::error!(
                    "Failed to read static dataset {}: {}",
                    self.fallback.path().display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Mark the entry `id` as verified.
    pub async fn verify_memorial(&self, id: &str) -> WriteOutcome {
        let result: Result<()> = async { self.store()?.update(id, &RowPatch::verify()).await }.await;
        if let Err(e) = &result {
            log::error!("Verify {} failed: {}", id, e);
        }
        result.into()
    }

    /// Remove the entry `id`.
    pub async fn delete_memorial(&self, id: &str) -> WriteOutcome {
        let result: Result<()> = async { self.store()?.delete(id).await }.await;
        if let Err(e) = &result {
            log::error!("Delete {} failed: {}", id, e);
        }
        result.into()
    }

    /// Create or edit an entry.
    ///
    /// Drafts without an `id` are new records and are rejected when a record
    /// with the same name, source post, or derived id already exists.
    pub async fn submit_memorial(&self, draft: MemorialDraft) -> WriteOutcome {
        let result = self.try_submit(draft).await;
        match &result {
            Err(AppError::Duplicate) => log::info!("Submission rejected as duplicate"),
            Err(e) => log::error!("Save failed: {}", e),
            Ok(()) => {}
        }
        result.into()
    }

    async fn try_submit(&self, draft: MemorialDraft) -> Result<()> {
        let store = self.store()?;

        if !draft.is_edit() {
            let name = draft.name.as_deref().filter(|n| !n.is_empty());
            let existing = store
                .select(Selection::NameOrPost {
                    name,
                    x_post: draft.x_post(),
                })
                .await?
                .unwrap_or_default();

            if !existing.is_empty() {
                return Err(AppError::Duplicate);
            }
        }

        let id = match draft.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => draft
                .name
                .as_deref()
                .and_then(slugify)
                .unwrap_or_else(fallback_id),
        };

        // Creates never replace an existing row.
        if !draft.is_edit() {
            let taken = store
                .select(Selection::Id(&id))
                .await?
                .is_some_and(|rows| !rows.is_empty());
            if taken {
                return Err(AppError::Duplicate);
            }
        }

        let row = draft.into_row(id, &today());
        store.upsert(&row).await?;
        log::info!("Saved memorial {}", row.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::TempDir;

    use crate::models::{Media, MemorialRow};
    use crate::storage::MemoryStore;

    /// Store that answers every read without a result set.
    struct NullStore;

    /// Store whose every call fails.
    struct FailingStore;

    #[async_trait]
    impl MemorialStore for NullStore {
        async fn select(&self, _: Selection<'_>) -> Result<Option<Vec<MemorialRow>>> {
            Ok(None)
        }
        async fn upsert(&self, _: &MemorialRow) -> Result<()> {
            Ok(())
        }
        async fn update(&self, _: &str, _: &RowPatch) -> Result<()> {
            Ok(())
        }
        async fn delete(&self, _: &str) -> Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl MemorialStore for FailingStore {
        async fn select(&self, _: Selection<'_>) -> Result<Option<Vec<MemorialRow>>> {
            Err(AppError::store(503, "connection refused"))
        }
        async fn upsert(&self, _: &MemorialRow) -> Result<()> {
            Err(AppError::store(503, "connection refused"))
        }
        async fn update(&self, _: &str, _: &RowPatch) -> Result<()> {
            Err(AppError::store(503, "connection refused"))
        }
        async fn delete(&self, _: &str) -> Result<()> {
            Err(AppError::store(404, ""))
        }
    }

    fn row(id: &str, name: &str, x_post: &str, verified: bool) -> MemorialRow {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "city": "Tehran",
            "date": "2026-01-08",
            "media": { "xPost": x_post },
            "source_links": [{ "label": "X Post", "url": x_post }],
            "verified": verified
        }))
        .unwrap()
    }

    fn fallback(tmp: &TempDir) -> StaticDataset {
        let path = tmp.path().join("memorials.json");
        std::fs::write(
            &path,
            r#"[{"id": "f1", "name": "Fallback One", "verified": true},
                {"id": "f2", "name": "Fallback Two", "verified": true},
                {"id": "f3", "name": "Fallback Three", "verified": true}]"#,
        )
        .unwrap();
        StaticDataset::new(path)
    }

    fn service(store: impl MemorialStore + 'static, tmp: &TempDir) -> MemorialService {
        MemorialService::new(Some(Arc::new(store)), fallback(tmp))
    }

    fn seeded() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_rows(vec![
            row("sara", "Sara", "https://x.com/a/status/1", true),
            row("reza", "Reza", "https://x.com/a/status/2", false),
        ]))
    }

    #[tokio::test]
    async fn test_fetch_verified_only() {
        let tmp = TempDir::new().unwrap();
        let svc = MemorialService::new(Some(seeded()), fallback(&tmp));

        let entries = svc.fetch_memorials(false).await;
        assert_eq!(entries.len(), 1);
        assert!(entries.iter().all(|e| e.verified));

        assert_eq!(svc.fetch_memorials(true).await.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_falls_back_on_error() {
        let tmp = TempDir::new().unwrap();
        let entries = service(FailingStore, &tmp).fetch_memorials(false).await;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].id, "f1");
    }

    #[tokio::test]
    async fn test_fetch_falls_back_on_null() {
        let tmp = TempDir::new().unwrap();
        let entries = service(NullStore, &tmp).fetch_memorials(true).await;
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_empty_store_does_not_fall_back() {
        let tmp = TempDir::new().unwrap();
        let entries = service(MemoryStore::new(), &tmp).fetch_memorials(true).await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_without_store_uses_fallback() {
        let tmp = TempDir::new().unwrap();
        let svc = MemorialService::new(None, fallback(&tmp));
        assert!(!svc.is_connected());
        assert_eq!(svc.fetch_memorials(false).await.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_with_unreadable_fallback_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "oops").unwrap();

        let svc = MemorialService::new(Some(Arc::new(FailingStore)), StaticDataset::new(path));
        assert!(svc.fetch_memorials(false).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_memorial_by_id() {
        let tmp = TempDir::new().unwrap();
        let svc = MemorialService::new(Some(seeded()), fallback(&tmp));
        assert_eq!(svc.fetch_memorial("reza").await.unwrap().name, "Reza");
        assert!(svc.fetch_memorial("nobody").await.is_none());
    }

    #[tokio::test]
    async fn test_submit_rejects_duplicate_name() {
        let tmp = TempDir::new().unwrap();
        let store = seeded();
        let svc = MemorialService::new(Some(store.clone()), fallback(&tmp));
        let before = store.rows();

        let outcome = svc
            .submit_memorial(MemorialDraft {
                name: Some("Sara".into()),
                ..Default::default()
            })
            .await;

        assert!(!outcome.success);
        assert!(!outcome.error.unwrap().is_empty());
        assert_eq!(store.rows(), before);
    }

    #[tokio::test]
    async fn test_submit_rejects_duplicate_post() {
        let tmp = TempDir::new().unwrap();
        let store = seeded();
        let svc = MemorialService::new(Some(store.clone()), fallback(&tmp));

        let outcome = svc
            .submit_memorial(MemorialDraft {
                name: Some("Someone Else".into()),
                media: Some(Media {
                    x_post: Some("https://x.com/a/status/2".into()),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await;

        assert!(!outcome.success);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_submit_rejects_id_collision_without_overwriting() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::with_rows(vec![serde_json::from_value(json!({
            "id": "sara-ahmadi",
            "name": "Sara Ahmadi",
            "bio": "Verified biography",
            "media": { "xPost": "https://x.com/a/status/1" },
            "verified": true
        }))
        .unwrap()]));
        let svc = MemorialService::new(Some(store.clone()), fallback(&tmp));

        let outcome = svc
            .submit_memorial(MemorialDraft {
                name: Some("sara  ahmadi".into()),
                media: Some(Media {
                    x_post: Some("https://x.com/b/status/2".into()),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await;

        assert!(!outcome.success);
        assert_eq!(
            outcome.error.as_deref(),
            Some("A memorial with this name or URL already exists.")
        );

        let kept = store.get("sara-ahmadi").unwrap();
        assert_eq!(kept.name, "Sara Ahmadi");
        assert_eq!(kept.bio.as_deref(), Some("Verified biography"));
        assert_eq!(kept.verified, Some(true));
        assert_eq!(svc.fetch_memorials(false).await.len(), 1);
    }

    #[tokio::test]
    async fn test_from_config_with_invalid_store_url_serves_fallback() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memorials.json");
        std::fs::write(&path, r#"[{"id": "f1", "name": "Fallback One", "verified": true}]"#)
            .unwrap();

        let mut config = Config::default();
        config.store.url = Some("not a url".into());
        config.store.key = Some("anon".into());
        config.paths.fallback_file = path.display().to_string();

        let svc = MemorialService::from_config(&config, Client::new());
        assert!(!svc.is_connected());
        assert_eq!(svc.fetch_memorials(false).await.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_creates_with_slug_id_and_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let svc = MemorialService::new(Some(store.clone()), fallback(&tmp));

        let outcome = svc
            .submit_memorial(MemorialDraft {
                name: Some("  Nika  Shakarami ".into()),
                verified: Some(true),
                ..Default::default()
            })
            .await;
        assert!(outcome.success, "{:?}", outcome.error);

        let saved: MemorialEntry = store.get("nika-shakarami").unwrap().into();
        assert_eq!(saved.name, "  Nika  Shakarami ");
        assert_eq!(saved.city, "Unknown");
        assert_eq!(saved.date, today());
        assert!(!saved.verified);
        assert!(saved.references.is_empty());
        assert_eq!(saved.testimonials, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_submit_without_name_uses_timestamp_id() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let svc = MemorialService::new(Some(store.clone()), fallback(&tmp));

        assert!(svc.submit_memorial(MemorialDraft::default()).await.success);

        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].id.starts_with("submission-"));
        assert_eq!(rows[0].name, "Unknown");
    }

    #[tokio::test]
    async fn test_submit_edit_overwrites_and_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = seeded();
        let svc = MemorialService::new(Some(store.clone()), fallback(&tmp));

        let mut entry = svc.fetch_memorial("sara").await.unwrap();
        entry.bio = "Updated biography".into();
        entry.name = "Sara".into();
        let draft = MemorialDraft::from(entry);

        assert!(svc.submit_memorial(draft.clone()).await.success);
        let first = store.rows();
        assert!(svc.submit_memorial(draft).await.success);
        let second = store.rows();

        assert_eq!(first, second);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("sara").unwrap().bio.as_deref(), Some("Updated biography"));
        assert_eq!(store.get("sara").unwrap().verified, Some(true));
    }

    #[tokio::test]
    async fn test_writes_without_store_report_failure() {
        let tmp = TempDir::new().unwrap();
        let svc = MemorialService::new(None, fallback(&tmp));

        let outcome = svc.verify_memorial("a").await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Store is not configured"));

        assert!(!svc.delete_memorial("a").await.success);
        assert!(!svc.submit_memorial(MemorialDraft::default()).await.success);
    }

    #[tokio::test]
    async fn test_store_errors_become_outcomes() {
        let tmp = TempDir::new().unwrap();
        let svc = service(FailingStore, &tmp);

        let outcome = svc.verify_memorial("a").await;
        assert_eq!(outcome.error.as_deref(), Some("connection refused"));

        let outcome = svc.delete_memorial("a").await;
        assert_eq!(outcome.error.as_deref(), Some("Unknown error"));

        let outcome = svc
            .submit_memorial(MemorialDraft {
                name: Some("New".into()),
                ..Default::default()
            })
            .await;
        assert!(!outcome.success, "duplicate check failure blocks the write");
    }

    #[tokio::test]
    async fn test_verify_and_delete() {
        let tmp = TempDir::new().unwrap();
        let store = seeded();
        let svc = MemorialService::new(Some(store.clone()), fallback(&tmp));

        assert!(svc.verify_memorial("reza").await.success);
        assert_eq!(svc.fetch_memorials(false).await.len(), 2);

        assert!(svc.delete_memorial("sara").await.success);
        assert!(store.get("sara").is_none());
    }
}
