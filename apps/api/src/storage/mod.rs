//! Flat key-value store persisted as one JSON object.
//!
//! Values are overwritten in place; there is no history and no schema
//! versioning. Every write rewrites the file via a temp file + rename so a
//! crash never leaves a half-written store behind.

pub mod handlers;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

pub const API_KEY: &str = "api_key";
pub const RESUME_TEXT: &str = "resume_text";
pub const SELECTED_TEXT: &str = "selected_text";
pub const LAST_ANALYSIS: &str = "last_analysis";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    path: Option<PathBuf>,
    data: RwLock<Map<String, Value>>,
}

impl Store {
    /// Opens the store at `path`. A missing file is an empty store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => Map::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };
        info!("Store opened at {} ({} keys)", path.display(), data.len());
        Ok(Self {
            inner: Arc::new(StoreInner {
                path: Some(path),
                data: RwLock::new(data),
            }),
        })
    }

    /// A store that never touches disk.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                path: None,
                data: RwLock::new(Map::new()),
            }),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let data = self.inner.data.read().await;
        match data.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.inner.data.read().await.contains_key(key)
    }

    /// Memory only changes once the new contents are on disk.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value)?;
        let mut data = self.inner.data.write().await;
        let mut next = data.clone();
        next.insert(key.to_string(), value);
        self.persist(&next).await?;
        *data = next;
        debug!(key, "store key written");
        Ok(())
    }

    /// Removes `key`, returning whether it existed.
    pub async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut data = self.inner.data.write().await;
        if !data.contains_key(key) {
            return Ok(false);
        }
        let mut next = data.clone();
        next.remove(key);
        self.persist(&next).await?;
        *data = next;
        Ok(true)
    }

    /// Reads and removes `key` in one step. A value of the wrong type is an
    /// error and stays in the store.
    pub async fn take<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let mut data = self.inner.data.write().await;
        let Some(value) = data.get(key) else {
            return Ok(None);
        };
        let taken: T = serde_json::from_value(value.clone())?;
        let mut next = data.clone();
        next.remove(key);
        self.persist(&next).await?;
        *data = next;
        Ok(Some(taken))
    }

    async fn persist(&self, data: &Map<String, Value>) -> Result<(), StoreError> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };
        let body = serde_json::to_vec_pretty(data)?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("store.json")).await.unwrap();
        assert!(!store.contains(API_KEY).await);
        assert_eq!(store.get::<String>(API_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = Store::open(&path).await.unwrap();
        store.set(API_KEY, &"secret-key").await.unwrap();
        store.set(RESUME_TEXT, &"Rust engineer, 6 years").await.unwrap();
        drop(store);

        let reopened = Store::open(&path).await.unwrap();
        assert_eq!(
            reopened.get::<String>(API_KEY).await.unwrap().as_deref(),
            Some("secret-key")
        );
        assert!(reopened.contains(RESUME_TEXT).await);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = Store::in_memory();
        store.set(API_KEY, &"old").await.unwrap();
        store.set(API_KEY, &"new").await.unwrap();
        assert_eq!(store.get::<String>(API_KEY).await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_take_removes_key() {
        let store = Store::in_memory();
        store.set(SELECTED_TEXT, &"Job description text").await.unwrap();
        let taken: Option<String> = store.take(SELECTED_TEXT).await.unwrap();
        assert_eq!(taken.as_deref(), Some("Job description text"));
        assert_eq!(store.take::<String>(SELECTED_TEXT).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_reports_existence() {
        let store = Store::in_memory();
        assert!(!store.remove(API_KEY).await.unwrap());
        store.set(API_KEY, &"k").await.unwrap();
        assert!(store.remove(API_KEY).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(Store::open(&path).await, Err(StoreError::Serde(_))));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("store.json")).await.unwrap();
        store.set(API_KEY, &"old").await.unwrap();
        store.set(SELECTED_TEXT, &"pending selection").await.unwrap();

        // the rename target's directory disappears, so every persist fails
        drop(dir);

        assert!(store.set(API_KEY, &"new").await.is_err());
        assert_eq!(store.get::<String>(API_KEY).await.unwrap().as_deref(), Some("old"));

        assert!(store.remove(API_KEY).await.is_err());
        assert!(store.contains(API_KEY).await);

        assert!(store.take::<String>(SELECTED_TEXT).await.is_err());
        assert!(store.contains(SELECTED_TEXT).await);
    }

    #[tokio::test]
    async fn test_take_with_wrong_type_keeps_value() {
        let store = Store::in_memory();
        store.set(SELECTED_TEXT, &"Job description text").await.unwrap();
        assert!(matches!(
            store.take::<Vec<String>>(SELECTED_TEXT).await,
            Err(StoreError::Serde(_))
        ));
        assert_eq!(
            store.take::<String>(SELECTED_TEXT).await.unwrap().as_deref(),
            Some("Job description text")
        );
    }

    #[tokio::test]
    async fn test_wrong_type_is_an_error() {
        let store = Store::in_memory();
        store.set(API_KEY, &42).await.unwrap();
        assert!(store.get::<Vec<String>>(API_KEY).await.is_err());
    }
}
