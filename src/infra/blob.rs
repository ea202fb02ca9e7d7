//! Filesystem-backed blob store.
//!
//! Each namespace is a directory; each key is a single `<key>.json` file
//! inside it. Keys must be plain file names — anything that would resolve
//! outside the namespace directory is rejected.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::store::{BlobStore, StoreError};

const VALUE_EXTENSION: &str = "json";

/// Blob storage keeping one JSON document per key under a namespace directory.
#[derive(Debug)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Open storage for `namespace` under `directory`, creating it if necessary.
    pub fn open(directory: &Path, namespace: &str) -> Result<Self, std::io::Error> {
        let root = directory.join(namespace);
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Resolve the file path for a key, rejecting traversal attempts.
    fn resolve(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let mut components = relative.components();
        let plain_file_name = matches!(components.next(), Some(Component::Normal(_)))
            && components.next().is_none();

        if key.is_empty() || relative.is_absolute() || !plain_file_name {
            return Err(StoreError::invalid_key(key));
        }

        Ok(self.root.join(format!("{key}.{VALUE_EXTENSION}")))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn list_keys(&self) -> Result<Vec<String>, StoreError> {
        let mut dir = fs::read_dir(&self.root).await.map_err(StoreError::backend)?;
        let mut keys = Vec::new();

        while let Some(entry) = dir.next_entry().await.map_err(StoreError::backend)? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }

        Ok(keys)
    }

    async fn get_json(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let path = self.resolve(key)?;
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::backend(err)),
        };

        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|err| StoreError::backend(format!("corrupt value under `{key}`: {err}")))
    }

    async fn put_json(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        let path = self.resolve(key)?;
        let raw = serde_json::to_vec(value).map_err(StoreError::encoding)?;
        fs::write(&path, raw).await.map_err(StoreError::backend)
    }
}
