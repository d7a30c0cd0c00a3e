//! Cache entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Serialized value plus its absolute expiration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: Vec<u8>,
    pub absolute_expiration: Option<DateTime<Utc>>,
}

impl CacheEntry {
    pub fn new(value: Vec<u8>) -> Self {
        Self {
            value,
            absolute_expiration: None,
        }
    }

    pub fn expiring_at(mut self, at: DateTime<Utc>) -> Self {
        self.absolute_expiration = Some(at);
        self
    }

    /// An entry is logically absent from its expiration instant onwards.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.absolute_expiration.is_some_and(|at| at <= now)
    }
}

/// Composite cache key: operation name followed by scoping identifiers.
///
/// ```text
/// CacheKey::new("subscriptions").with_scope("tenant-a")  →  "subscriptions:tenant-a"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(operation: impl Into<String>) -> Self {
        Self(operation.into())
    }

    /// Append a scoping part; empty parts are skipped.
    pub fn with_scope(mut self, part: impl AsRef<str>) -> Self {
        let part = part.as_ref().trim();
        if !part.is_empty() {
            self.0.push(':');
            self.0.push_str(part);
        }
        self
    }

    /// Append a named slot `name=value`. The slot is written even when the
    /// value is absent, so keys from different scope options never collide.
    pub fn with_named_scope(mut self, name: &str, value: Option<&str>) -> Self {
        self.0.push(':');
        self.0.push_str(name);
        self.0.push('=');
        self.0.push_str(value.map(str::trim).unwrap_or_default());
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_entry_expiration_boundary() {
        let now = Utc::now();
        let entry = CacheEntry::new(b"v".to_vec()).expiring_at(now + Duration::seconds(10));

        assert!(!entry.is_expired(now));
        assert!(entry.is_expired(now + Duration::seconds(10)));
        assert!(entry.is_expired(now + Duration::seconds(11)));
        assert!(!CacheEntry::new(Vec::new()).is_expired(now + Duration::days(3650)));
    }

    #[test]
    fn test_cache_key_skips_empty_scopes() {
        let key = CacheKey::new("sql-servers")
            .with_scope("sub-1")
            .with_scope("")
            .with_scope(" tenant-a ");
        assert_eq!(key.as_str(), "sql-servers:sub-1:tenant-a");
    }

    #[test]
    fn test_named_scopes_keep_their_slot() {
        let tenant_only = CacheKey::new("op")
            .with_named_scope("tenant", Some("contoso"))
            .with_named_scope("subscription", None);
        let subscription_only = CacheKey::new("op")
            .with_named_scope("tenant", None)
            .with_named_scope("subscription", Some("contoso"));

        assert_eq!(tenant_only.as_str(), "op:tenant=contoso:subscription=");
        assert_eq!(subscription_only.as_str(), "op:tenant=:subscription=contoso");
        assert_ne!(tenant_only, subscription_only);
    }
}
