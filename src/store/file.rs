//! File-backed provider store.
//!
//! Providers live in a single JSON document. All writes go through a temp
//! file followed by an atomic rename to prevent corruption from concurrent
//! or interrupted writers.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::error::{StoreError, StoreResult};
use super::{ProviderCatalog, ProviderRecord, ProviderStore};

/// Provider store backed by a JSON document on the local filesystem.
pub struct FileProviderStore {
    path: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProviderDocument {
    #[serde(default)]
    providers: Vec<ProviderRecord>,
}

impl FileProviderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Insert or replace a provider by name.
    ///
    /// A record carrying `is_default` clears the flag on every other record,
    /// so at most one default exists after the write.
    pub async fn upsert(&self, record: ProviderRecord) -> StoreResult<()> {
        let mut doc = self.read_document().await?;
        if record.is_default {
            for existing in &mut doc.providers {
                existing.is_default = false;
            }
        }
        match doc.providers.iter_mut().find(|p| p.name == record.name) {
            Some(existing) => *existing = record,
            None => doc.providers.push(record),
        }
        self.write_document(&doc).await
    }

    /// Remove a provider by name.
    pub async fn remove(&self, name: &str) -> StoreResult<()> {
        let mut doc = self.read_document().await?;
        let before = doc.providers.len();
        doc.providers.retain(|p| p.name != name);
        if doc.providers.len() == before {
            return Err(StoreError::NotFound(name.to_string()));
        }
        self.write_document(&doc).await
    }

    /// Mark the named provider as the store-wide default.
    pub async fn set_default(&self, name: &str) -> StoreResult<()> {
        let mut doc = self.read_document().await?;
        if !doc.providers.iter().any(|p| p.name == name) {
            return Err(StoreError::NotFound(name.to_string()));
        }
        for provider in &mut doc.providers {
            provider.is_default = provider.name == name;
        }
        self.write_document(&doc).await
    }

    async fn read_document(&self) -> StoreResult<ProviderDocument> {
        let bytes = match fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ProviderDocument::default());
            }
            Err(e) => return Err(StoreError::file_io(&self.path, e)),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_document(&self, doc: &ProviderDocument) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::file_io(parent, e))?;
        }
        let data = serde_json::to_vec_pretty(doc)?;
        atomic_write_file(&self.path, &data).await
    }
}

#[async_trait]
impl ProviderStore for FileProviderStore {
    async fn load(&self) -> StoreResult<ProviderCatalog> {
        let doc = self.read_document().await?;
        debug!(
            path = %self.path.display(),
            providers = doc.providers.len(),
            "loaded provider catalog"
        );
        Ok(ProviderCatalog::new(doc.providers))
    }
}

/// Write data to a temp file, fsync it, then atomically rename to the final
/// path.
///
/// The temp file name is generated internally using a ULID to avoid
/// collisions from concurrent writers targeting the same final path.
async fn atomic_write_file(final_path: &Path, data: &[u8]) -> StoreResult<()> {
    let file_name = final_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    let temp_path = final_path.with_file_name(format!("{}.{}.tmp", file_name, ulid::Ulid::new()));

    let mut file = fs::File::create(&temp_path)
        .await
        .map_err(|e| StoreError::file_io(&temp_path, e))?;
    file.write_all(data)
        .await
        .map_err(|e| StoreError::file_io(&temp_path, e))?;
    file.sync_all()
        .await
        .map_err(|e| StoreError::file_io(&temp_path, e))?;
    fs::rename(&temp_path, final_path)
        .await
        .map_err(|e| StoreError::file_io(final_path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str, model: &str, is_default: bool) -> ProviderRecord {
        ProviderRecord {
            name: name.to_string(),
            default_model_name: model.to_string(),
            is_default,
            ..Default::default()
        }
    }

    fn store_in(dir: &TempDir) -> FileProviderStore {
        FileProviderStore::new(dir.path().join("providers.json"))
    }

    #[tokio::test]
    async fn load_missing_file_yields_empty_catalog() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let catalog = store.load().await.unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.fetch_default_provider().is_none());
    }

    #[tokio::test]
    async fn upsert_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.upsert(record("openai", "gpt-4", true)).await.unwrap();
        store
            .upsert(record("anthropic", "claude-3-5-sonnet", false))
            .await
            .unwrap();

        let catalog = store.load().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.fetch_default_provider().unwrap().name, "openai");
        assert_eq!(
            catalog.fetch_provider("anthropic").unwrap().default_model_name,
            "claude-3-5-sonnet"
        );
    }

    #[tokio::test]
    async fn upsert_replaces_existing_record() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.upsert(record("openai", "gpt-4", false)).await.unwrap();
        store
            .upsert(record("openai", "gpt-4o", false))
            .await
            .unwrap();

        let catalog = store.load().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.fetch_provider("openai").unwrap().default_model_name,
            "gpt-4o"
        );
    }

    #[tokio::test]
    async fn upsert_default_clears_previous_default() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.upsert(record("openai", "gpt-4", true)).await.unwrap();
        store
            .upsert(record("anthropic", "claude-3-5-sonnet", true))
            .await
            .unwrap();

        let catalog = store.load().await.unwrap();
        let defaults: Vec<_> = catalog.iter().filter(|p| p.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].name, "anthropic");
    }

    #[tokio::test]
    async fn set_default_switches_flag() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.upsert(record("openai", "gpt-4", true)).await.unwrap();
        store
            .upsert(record("anthropic", "claude-3-5-sonnet", false))
            .await
            .unwrap();
        store.set_default("anthropic").await.unwrap();

        let catalog = store.load().await.unwrap();
        assert_eq!(catalog.fetch_default_provider().unwrap().name, "anthropic");
        assert!(!catalog.fetch_provider("openai").unwrap().is_default);
    }

    #[tokio::test]
    async fn set_default_unknown_name_fails() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store.set_default("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(name) if name == "missing"));
    }

    #[tokio::test]
    async fn remove_deletes_record() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.upsert(record("openai", "gpt-4", false)).await.unwrap();
        store.remove("openai").await.unwrap();

        let catalog = store.load().await.unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn remove_unknown_name_fails() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store.remove("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = FileProviderStore::new(dir.path().join("nested/deeper/providers.json"));

        store.upsert(record("openai", "gpt-4", false)).await.unwrap();

        let catalog = store.load().await.unwrap();
        assert_eq!(catalog.len(), 1);
    }
}
