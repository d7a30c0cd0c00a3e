//! `cache get|set|delete`: direct access to the cache tiers

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cloudcmd_application::{CacheService, Command, ExecutionContext, GlobalOptions};
use cloudcmd_domain::{
    BoundOptions, CommandError, CommandMetadata, CommandOutput, OptionChain, OptionDescriptor,
    OptionSet, OptionValueType,
};
use serde_json::{Value, json};

const KEY: &str = "key";
const VALUE: &str = "value";
const TTL_SECONDS: &str = "ttl-seconds";

fn key_option() -> OptionDescriptor {
    OptionDescriptor::new(KEY, "Cache key (e.g. \"subscriptions:tenant-a\")", true)
}

fn chain(id: &str, extra: Vec<OptionDescriptor>) -> OptionChain {
    let set = extra
        .into_iter()
        .fold(OptionSet::new(id).with(key_option()), OptionSet::with);
    OptionChain::new().with(GlobalOptions::new()).with(set)
}

pub struct CacheGetCommand {
    metadata: CommandMetadata,
    options: OptionChain,
    cache: Arc<CacheService>,
}

impl CacheGetCommand {
    pub fn new(cache: Arc<CacheService>) -> Self {
        Self {
            metadata: CommandMetadata::new("get", "Get Cache Entry", "Read one cached value.")
                .read_only()
                .secret(),
            options: chain("cache-get", Vec::new()),
            cache,
        }
    }
}

#[async_trait]
impl Command for CacheGetCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn options(&self) -> &OptionChain {
        &self.options
    }

    async fn execute(
        &self,
        _context: &ExecutionContext,
        options: &BoundOptions,
    ) -> Result<CommandOutput, CommandError> {
        let key = options.require_str(KEY)?;
        match self.cache.get::<Value>(key).await {
            Some(value) => Ok(Some(json!({ "key": key, "value": value }))),
            None => Err(CommandError::not_found(format!("cache entry '{}'", key))),
        }
    }
}

pub struct CacheSetCommand {
    metadata: CommandMetadata,
    options: OptionChain,
    cache: Arc<CacheService>,
    default_ttl: Duration,
}

impl CacheSetCommand {
    pub fn new(cache: Arc<CacheService>, default_ttl: Duration) -> Self {
        Self {
            metadata: CommandMetadata::new(
                "set",
                "Set Cache Entry",
                "Store a value in every cache tier. The value is parsed as JSON when possible.",
            )
            .destructive()
            .idempotent(),
            options: chain(
                "cache-set",
                vec![
                    OptionDescriptor::new(VALUE, "Value to store", true),
                    OptionDescriptor::new(TTL_SECONDS, "Time to live, in seconds (0 = never expires)", false)
                        .with_type(OptionValueType::Integer)
                        .with_default(default_ttl.as_secs()),
                ],
            ),
            cache,
            default_ttl,
        }
    }
}

#[async_trait]
impl Command for CacheSetCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn options(&self) -> &OptionChain {
        &self.options
    }

    async fn execute(
        &self,
        _context: &ExecutionContext,
        options: &BoundOptions,
    ) -> Result<CommandOutput, CommandError> {
        let key = options.require_str(KEY)?;
        let raw = options.require_str(VALUE)?;
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| json!(raw));

        let ttl = match options.get_i64(TTL_SECONDS) {
            Some(secs) if secs <= 0 => None,
            Some(secs) => Some(Duration::from_secs(secs.unsigned_abs())),
            None => Some(self.default_ttl),
        };

        self.cache
            .set(key, &value, ttl)
            .await
            .map_err(CommandError::other)?;

        Ok(Some(json!({
            "key": key,
            "ttlSeconds": ttl.map(|t| t.as_secs()),
        })))
    }
}

pub struct CacheDeleteCommand {
    metadata: CommandMetadata,
    options: OptionChain,
    cache: Arc<CacheService>,
}

impl CacheDeleteCommand {
    pub fn new(cache: Arc<CacheService>) -> Self {
        Self {
            metadata: CommandMetadata::new(
                "delete",
                "Delete Cache Entry",
                "Remove one key from every cache tier.",
            )
            .destructive()
            .idempotent(),
            options: chain("cache-delete", Vec::new()),
            cache,
        }
    }
}

#[async_trait]
impl Command for CacheDeleteCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn options(&self) -> &OptionChain {
        &self.options
    }

    async fn execute(
        &self,
        _context: &ExecutionContext,
        options: &BoundOptions,
    ) -> Result<CommandOutput, CommandError> {
        let key = options.require_str(KEY)?;
        let deleted = self.cache.delete(key).await;
        Ok(Some(json!({ "key": key, "deleted": deleted })))
    }
}
