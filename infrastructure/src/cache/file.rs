//! On-disk cache provider
//!
//! One JSON file per key. The file name is the blake3 hash of the key, so
//! keys of any shape map to safe, fixed-length names:
//!
//! ```text
//! <directory>/
//!   ├─ 5d41402abc4b2a76b9719d911017c592....json   ← "subscriptions:tenant-a"
//!   └─ 7d793037a0760186574b0282f2f435e7....json   ← "storage-account-list:sub-1"
//! ```
//!
//! Writes go to a temporary file in the same directory which is then
//! renamed over the target, so a reader sees either the old or the new
//! content, never a partial file.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cloudcmd_domain::{CacheEntry, CacheError, CacheProvider, Clock, SystemClock};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

static DEFAULT_CACHE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// `<platform cache dir>/cloudcmd`, computed once per process
pub fn default_cache_dir() -> &'static Path {
    DEFAULT_CACHE_DIR.get_or_init(|| {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("cloudcmd")
    })
}

/// On-disk representation of one entry
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    #[serde(default)]
    absolute_expiration: Option<DateTime<Utc>>,
    /// Hex-encoded value bytes
    value: String,
}

/// Cache tier persisted under a directory
#[derive(Debug)]
pub struct FileCacheProvider {
    directory: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileCacheProvider {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Provider rooted at [`default_cache_dir`]
    pub fn in_default_dir() -> Self {
        Self::new(default_cache_dir())
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file holding `key`
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let hash = blake3::hash(key.as_bytes());
        self.directory
            .join(format!("{}.json", hex::encode(hash.as_bytes())))
    }

    async fn remove_file(&self, key: &str, path: &Path) -> Result<bool, CacheError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::storage(key, e)),
        }
    }

    fn decode(key: &str, bytes: &[u8]) -> Option<CacheEntry> {
        let stored: StoredEntry = serde_json::from_slice(bytes).ok()?;
        if stored.key != key {
            return None;
        }
        let value = hex::decode(&stored.value).ok()?;
        Some(CacheEntry {
            value,
            absolute_expiration: stored.absolute_expiration,
        })
    }
}

#[async_trait]
impl CacheProvider for FileCacheProvider {
    fn id(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let path = self.entry_path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::storage(key, e)),
        };

        let Some(entry) = Self::decode(key, &bytes) else {
            debug!(key, path = %path.display(), "Removing unreadable cache file");
            self.remove_file(key, &path).await?;
            return Ok(None);
        };

        if entry.is_expired(self.clock.now()) {
            trace!(key, "Removing expired cache file");
            self.remove_file(key, &path).await?;
            return Ok(None);
        }

        Ok(Some(entry))
    }

    async fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let stored = StoredEntry {
            key: key.to_string(),
            absolute_expiration: entry.absolute_expiration,
            value: hex::encode(&entry.value),
        };
        let bytes = serde_json::to_vec(&stored)?;
        let directory = self.directory.clone();
        let path = self.entry_path(key);

        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            std::fs::create_dir_all(&directory)?;
            let mut file = tempfile::NamedTempFile::new_in(&directory)?;
            file.write_all(&bytes)?;
            file.as_file().sync_all()?;
            file.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| CacheError::storage(key, e))?
        .map_err(|e| CacheError::storage(key, e))
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let path = self.entry_path(key);
        self.remove_file(key, &path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use cloudcmd_domain::ManualClock;

    fn provider() -> (tempfile::TempDir, Arc<ManualClock>, FileCacheProvider) {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let provider = FileCacheProvider::new(dir.path().join("cache")).with_clock(clock.clone());
        (dir, clock, provider)
    }

    #[tokio::test]
    async fn test_round_trip_creates_directory() {
        let (_dir, _clock, provider) = provider();

        provider
            .set("subscriptions:tenant-a", CacheEntry::new(b"[\"sub-1\"]".to_vec()))
            .await
            .unwrap();

        assert!(provider.entry_path("subscriptions:tenant-a").exists());
        let entry = provider.get("subscriptions:tenant-a").await.unwrap().unwrap();
        assert_eq!(entry.value, b"[\"sub-1\"]".to_vec());
        assert!(entry.absolute_expiration.is_none());
    }

    #[tokio::test]
    async fn test_file_name_is_key_hash() {
        let (_dir, _clock, provider) = provider();

        let path = provider.entry_path("a/b:c d");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name.len(), 64 + ".json".len());
        assert!(name.trim_end_matches(".json").chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(path, provider.entry_path("a/b:c e"));
    }

    #[tokio::test]
    async fn test_overwrite_replaces_whole_file() {
        let (_dir, _clock, provider) = provider();

        provider
            .set("k", CacheEntry::new(b"a much longer first value".to_vec()))
            .await
            .unwrap();
        provider.set("k", CacheEntry::new(b"2".to_vec())).await.unwrap();

        assert_eq!(provider.get("k").await.unwrap().unwrap().value, b"2".to_vec());
    }

    #[tokio::test]
    async fn test_expired_file_removed_on_read() {
        let (_dir, clock, provider) = provider();

        let entry = CacheEntry::new(b"v".to_vec()).expiring_at(clock.now() + Duration::minutes(1));
        provider.set("k", entry).await.unwrap();

        clock.advance(Duration::minutes(1));
        assert!(provider.get("k").await.unwrap().is_none());
        assert!(!provider.entry_path("k").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_treated_as_absent() {
        let (_dir, _clock, provider) = provider();

        provider.set("k", CacheEntry::new(b"v".to_vec())).await.unwrap();
        std::fs::write(provider.entry_path("k"), b"{ truncated").unwrap();

        assert!(provider.get("k").await.unwrap().is_none());
        assert!(!provider.entry_path("k").exists());
    }

    #[tokio::test]
    async fn test_delete() {
        let (_dir, _clock, provider) = provider();

        assert!(!provider.delete("k").await.unwrap());
        provider.set("k", CacheEntry::new(b"v".to_vec())).await.unwrap();
        assert!(provider.delete("k").await.unwrap());
        assert!(provider.get("k").await.unwrap().is_none());
    }

    #[test]
    fn test_default_cache_dir_is_memoized() {
        let first = default_cache_dir();
        let second = default_cache_dir();
        assert!(std::ptr::eq(first, second));
        assert!(first.ends_with("cloudcmd"));
    }
}
