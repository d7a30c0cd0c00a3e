//! Read-through caching for business operations

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cloudcmd_domain::{BoundOptions, CacheKey, CommandError, CommandOutput};

use super::service::CacheService;
use crate::options::global::TENANT;
use crate::options::subscription::SUBSCRIPTION;
use crate::ports::business_operation::BusinessOperation;
use crate::ports::command::ExecutionContext;

/// Decorator that caches the payload of an inner operation.
///
/// The key is the operation name followed by one `name=value` slot per scope
/// option (tenant, subscription, then any extras). Absent values keep an
/// empty slot, so two callers scoped differently never share an entry. Failures are never cached.
pub struct CachedOperation {
    inner: Arc<dyn BusinessOperation>,
    cache: Arc<CacheService>,
    ttl: Option<Duration>,
    scope_options: Vec<String>,
}

impl CachedOperation {
    pub fn new(inner: Arc<dyn BusinessOperation>, cache: Arc<CacheService>) -> Self {
        Self {
            inner,
            cache,
            ttl: None,
            scope_options: vec![TENANT.to_string(), SUBSCRIPTION.to_string()],
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Add a bound option whose value scopes the cache entry
    pub fn with_scope_option(mut self, name: impl Into<String>) -> Self {
        self.scope_options.push(name.into());
        self
    }

    pub fn cache_key(&self, options: &BoundOptions) -> CacheKey {
        self.scope_options
            .iter()
            .fold(CacheKey::new(self.inner.name()), |key, name| {
                key.with_named_scope(name, options.get_str(name))
            })
    }
}

#[async_trait]
impl BusinessOperation for CachedOperation {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn run(
        &self,
        options: &BoundOptions,
        context: &ExecutionContext,
    ) -> Result<CommandOutput, CommandError> {
        let key = self.cache_key(options);
        self.cache
            .get_or_try_insert_with(&key, self.ttl, || self.inner.run(options, context))
            .await
    }
}
