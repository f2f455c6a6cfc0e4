//! File-based cache store keyed by fingerprint.
//!
//! One payload per key on durable storage: `<key>.json` for serialized
//! values, `<key>.bin` for raw bytes. Entries are never evicted and
//! never invalidated — a stale hit is an accepted trade-off.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use crate::error::CacheError;

/// Durable key/value store for generated artifacts
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Store rooted at a directory. Nothing touches the disk until the
    /// first write, so construction cannot fail — an unusable cache
    /// directory degrades to logged misses, never a startup error.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory backing this store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load a serialized value; `None` when the key is absent
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let path = self.dir.join(format!("{key}.json"));
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Store a serialized value under a key
    pub async fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{key}.json"));
        let raw = serde_json::to_string(value)?;
        fs::write(&path, raw).await?;
        Ok(())
    }

    /// Load raw bytes; `None` when the key is absent
    pub async fn load_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.dir.join(format!("{key}.bin"));
        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(fs::read(&path).await?))
    }

    /// Store raw bytes under a key
    pub async fn store_bytes(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{key}.bin"));
        fs::write(&path, bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_and_load_json() {
        let temp = TempDir::new().unwrap();
        let cache = CacheStore::new(temp.path());

        let value = vec!["a".to_string(), "b".to_string()];
        cache.store("abc123", &value).await.unwrap();

        let loaded: Option<Vec<String>> = cache.load("abc123").await.unwrap();
        assert_eq!(loaded, Some(value));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let temp = TempDir::new().unwrap();
        let cache = CacheStore::new(temp.path());

        let loaded: Option<String> = cache.load("nope").await.unwrap();
        assert!(loaded.is_none());
        assert!(cache.load_bytes("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_and_load_bytes() {
        let temp = TempDir::new().unwrap();
        let cache = CacheStore::new(temp.path());

        cache.store_bytes("img", &[1, 2, 3]).await.unwrap();
        assert_eq!(cache.load_bytes("img").await.unwrap(), Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_corrupt_payload_is_an_error() {
        let temp = TempDir::new().unwrap();
        let cache = CacheStore::new(temp.path());

        std::fs::write(temp.path().join("bad.json"), "{not json").unwrap();
        let result: Result<Option<String>, _> = cache.load("bad").await;
        assert!(matches!(result, Err(CacheError::Payload(_))));
    }
}
