//! Multi-tier cache service
//!
//! Typed facade over an ordered list of [`CacheProvider`]s. Values are
//! serialized with `serde_json`; a relative TTL becomes an absolute
//! expiration using the service clock.
//!
//! - `get` returns the first live hit that decodes. Earlier providers that
//!   missed are not backfilled.
//! - `set` and `delete` go to every provider. One failing provider is logged
//!   and never prevents the others from being updated.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use cloudcmd_domain::{CacheEntry, CacheError, CacheProvider, Clock, SystemClock};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

#[derive(Clone)]
pub struct CacheService {
    providers: Vec<Arc<dyn CacheProvider>>,
    clock: Arc<dyn Clock>,
}

impl CacheService {
    pub fn new(providers: Vec<Arc<dyn CacheProvider>>) -> Self {
        Self {
            providers,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Look up `key` in provider order.
    pub async fn get<T: DeserializeOwned>(&self, key: impl AsRef<str>) -> Option<T> {
        let key = key.as_ref();
        let now = self.clock.now();

        for provider in &self.providers {
            let entry = match provider.get(key).await {
                Ok(Some(entry)) => entry,
                Ok(None) => continue,
                Err(e) => {
                    warn!(provider = provider.id(), key, error = %e, "Cache read failed");
                    continue;
                }
            };

            if entry.is_expired(now) {
                match provider.delete(key).await {
                    Ok(_) => trace!(provider = provider.id(), key, "Purged expired entry"),
                    Err(e) => {
                        warn!(provider = provider.id(), key, error = %e, "Could not purge expired entry")
                    }
                }
                continue;
            }

            match serde_json::from_slice::<T>(&entry.value) {
                Ok(value) => {
                    trace!(provider = provider.id(), key, "Cache hit");
                    return Some(value);
                }
                Err(e) => {
                    debug!(provider = provider.id(), key, error = %e, "Skipping undecodable cache entry");
                }
            }
        }

        trace!(key, "Cache miss");
        None
    }

    /// Store `value` under `key` in every provider.
    ///
    /// Fails only when `value` cannot be serialized; provider failures are
    /// logged.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: impl AsRef<str>,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let key = key.as_ref();
        let mut entry = CacheEntry::new(serde_json::to_vec(value)?);
        if let Some(expiration) = ttl.and_then(|ttl| self.expiration_after(ttl)) {
            entry = entry.expiring_at(expiration);
        }

        for provider in &self.providers {
            if let Err(e) = provider.set(key, entry.clone()).await {
                warn!(provider = provider.id(), key, error = %e, "Cache write failed");
            }
        }
        Ok(())
    }

    /// Remove `key` from every provider. Returns whether any held it.
    pub async fn delete(&self, key: impl AsRef<str>) -> bool {
        let key = key.as_ref();
        let mut removed = false;

        for provider in &self.providers {
            match provider.delete(key).await {
                Ok(hit) => removed |= hit,
                Err(e) => warn!(provider = provider.id(), key, error = %e, "Cache delete failed"),
            }
        }
        removed
    }

    /// Return the cached value, or compute it with `fetch` and store it.
    ///
    /// Errors from `fetch` are returned as-is and nothing is cached.
    pub async fn get_or_try_insert_with<T, E, F, Fut>(
        &self,
        key: impl AsRef<str>,
        ttl: Option<Duration>,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = key.as_ref();
        if let Some(value) = self.get::<T>(key).await {
            return Ok(value);
        }

        let value = fetch().await?;
        if let Err(e) = self.set(key, &value, ttl).await {
            warn!(key, error = %e, "Could not cache computed value");
        }
        Ok(value)
    }

    fn expiration_after(&self, ttl: Duration) -> Option<chrono::DateTime<chrono::Utc>> {
        // TTLs too large to represent never expire
        let ttl = chrono::Duration::from_std(ttl).ok()?;
        self.clock.now().checked_add_signed(ttl)
    }
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("providers", &self.provider_ids())
            .field("clock", &self.clock)
            .finish()
    }
}
