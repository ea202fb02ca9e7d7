//! Blob-store port describing the persistence adapter.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid storage key `{key}`")]
    InvalidKey { key: String },
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("value could not be encoded: {0}")]
    Encoding(String),
}

impl StoreError {
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }

    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }

    pub fn encoding(err: impl std::fmt::Display) -> Self {
        Self::Encoding(err.to_string())
    }
}

/// Key/value blob storage scoped to a single namespace.
///
/// Keys are opaque to the store; values are JSON documents. `get_json`
/// returns `None` for unknown keys, and `put_json` overwrites silently.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Enumerate every key currently present in the namespace.
    async fn list_keys(&self) -> Result<Vec<String>, StoreError>;

    /// Fetch the value stored under `key`.
    async fn get_json(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    async fn put_json(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError>;
}
