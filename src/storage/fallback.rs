//! Bundled static dataset.
//!
//! A JSON array of entries already in [`MemorialEntry`] shape, read
//! wholesale whenever the remote store cannot answer.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::MemorialEntry;

/// Static dataset on the local filesystem.
#[derive(Debug, Clone)]
pub struct StaticDataset {
    path: PathBuf,
}

impl StaticDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Load every entry in the dataset, unmodified.
    pub async fn load(&self) -> Result<Vec<MemorialEntry>> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => {
                log::warn!("No static dataset found at {}", self.path.display());
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_entries() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memorials.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "a", "name": "A", "city": "Tehran", "date": "2026-01-01",
                 "coords": {"lat": 1.0, "lon": 2.0}, "bio": "",
                 "media": {"xPost": "https://x.com/a/status/1"}, "references": [],
                 "verified": true},
                {"id": "b", "name": "B", "verified": false}
            ]"#,
        )
        .unwrap();

        let entries = StaticDataset::new(&path).load().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].coords.lat, 1.0);
        assert!(!entries[1].verified, "fallback entries are returned as-is");
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let entries = StaticDataset::new(tmp.path().join("nope.json"))
            .load()
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_bundled_dataset_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/memorials.json");
        let entries = StaticDataset::new(path).load().await.unwrap();
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|e| !e.id.is_empty()));
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memorials.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(StaticDataset::new(&path).load().await.is_err());
    }
}
