//! Cache provider abstraction
//!
//! A [`CacheProvider`] is one backing store (memory, file, ...). The cache
//! service composes several of them in order:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               CacheService               │
//! │  get: first hit wins · set/delete: all   │
//! └──────────────────────────────────────────┘
//!           │                     │
//!           ▼                     ▼
//!    ┌─────────────┐       ┌─────────────┐
//!    │   Memory    │       │    File     │
//!    └─────────────┘       └─────────────┘
//! ```
//!
//! Providers enforce expiration lazily: `get` on an expired entry deletes it
//! and reports a miss. There is no background sweep.

use async_trait::async_trait;
use thiserror::Error;

use super::entities::CacheEntry;

/// Error type for cache provider operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// Backing storage failed (I/O, lock poisoning)
    #[error("Cache storage error for '{key}': {message}")]
    Storage { key: String, message: String },

    /// A value could not be (de)serialized
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    pub fn storage(key: impl Into<String>, message: impl std::fmt::Display) -> Self {
        CacheError::Storage {
            key: key.into(),
            message: message.to_string(),
        }
    }
}

/// One key/value store with TTL
#[async_trait]
pub trait CacheProvider: Send + Sync {
    /// Identifier used in logs (e.g. "memory", "file")
    fn id(&self) -> &str;

    /// Read an entry. Expired entries are deleted and reported as `None`.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Store an entry, replacing any previous one.
    async fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError>;

    /// Remove an entry. Returns whether something was removed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// A mock provider for testing
    #[derive(Default)]
    struct MockProvider {
        entries: Mutex<HashMap<String, CacheEntry>>,
    }

    #[async_trait]
    impl CacheProvider for MockProvider {
        fn id(&self) -> &str {
            "mock"
        }

        async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
            let entries = self.entries.lock().map_err(|e| CacheError::storage(key, e))?;
            Ok(entries.get(key).cloned())
        }

        async fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
            let mut entries = self.entries.lock().map_err(|e| CacheError::storage(key, e))?;
            entries.insert(key.to_string(), entry);
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<bool, CacheError> {
            let mut entries = self.entries.lock().map_err(|e| CacheError::storage(key, e))?;
            Ok(entries.remove(key).is_some())
        }
    }

    #[tokio::test]
    async fn test_provider_as_trait_object() {
        let provider: Box<dyn CacheProvider> = Box::new(MockProvider::default());

        provider.set("k", CacheEntry::new(b"v".to_vec())).await.unwrap();
        assert_eq!(provider.get("k").await.unwrap().unwrap().value, b"v".to_vec());
        assert!(provider.delete("k").await.unwrap());
        assert!(!provider.delete("k").await.unwrap());
        assert!(provider.get("k").await.unwrap().is_none());
    }

    #[test]
    fn test_storage_error_display() {
        let error = CacheError::storage("subscriptions", "disk full");
        assert_eq!(
            error.to_string(),
            "Cache storage error for 'subscriptions': disk full"
        );
    }
}
