//! Dispatch use case.
//!
//! Entry point for hosts: resolve a path against the registry, then hand the
//! command to the [`ExecutionPipeline`]. Unresolvable paths are answered with
//! a 400 envelope like any other input error.

use std::sync::Arc;

use cloudcmd_domain::{CommandError, CommandPath, RawArguments, ResponseEnvelope};
use tracing::debug;

use super::execute_command::ExecutionPipeline;
use crate::ports::command::ExecutionContext;
use crate::registry::CommandRegistry;

/// Resolves and executes invocations against one registry
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    pipeline: ExecutionPipeline,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            registry,
            pipeline: ExecutionPipeline::new(),
        }
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Invoke the command at `path` with raw caller input.
    pub async fn invoke(
        &self,
        path: &CommandPath,
        raw: &RawArguments,
        context: &ExecutionContext,
    ) -> ResponseEnvelope {
        let command = match self.registry.resolve(path) {
            Ok(command) => command,
            Err(error) => {
                debug!(path = %path, error = %error, "Unresolved command path");
                let error = CommandError::from(error);
                return ResponseEnvelope::failure(error.status(), error.user_message());
            }
        };

        self.pipeline.execute(command.as_ref(), raw, context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{GlobalOptions, SubscriptionOptions};
    use crate::ports::command::Command;
    use crate::registry::CommandGroup;
    use async_trait::async_trait;
    use cloudcmd_domain::{
        BoundOptions, CommandMetadata, CommandOutput, OptionChain, StatusCode, listing_output,
    };
    use serde_json::json;

    struct DatabaseList {
        metadata: CommandMetadata,
        options: OptionChain,
    }

    impl DatabaseList {
        fn new() -> Self {
            Self {
                metadata: CommandMetadata::new("list", "List Databases", "List SQL databases")
                    .read_only(),
                options: OptionChain::new()
                    .with(GlobalOptions::new())
                    .with(SubscriptionOptions::new()),
            }
        }
    }

    #[async_trait]
    impl Command for DatabaseList {
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
            let subscription = options.require_str("subscription")?;
            listing_output("databases", &[format!("{}/orders", subscription)])
        }
    }

    fn dispatcher() -> Dispatcher {
        let mut database = CommandGroup::new("database", "SQL databases");
        database.add_command("list", DatabaseList::new()).unwrap();
        let mut sql = CommandGroup::new("sql", "SQL");
        sql.add_subgroup(database).unwrap();

        let mut registry = CommandRegistry::new();
        registry.add_group(sql).unwrap();
        Dispatcher::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_invoke_resolved_command() {
        let dispatcher = dispatcher();
        let raw: RawArguments = serde_json::from_value(json!({"subscription": "sub-1"})).unwrap();

        let envelope = dispatcher
            .invoke(
                &CommandPath::parse("sql database list"),
                &raw,
                &ExecutionContext::default(),
            )
            .await;

        assert_eq!(envelope.status(), StatusCode::OK);
        assert_eq!(envelope.results().unwrap()["databases"][0], "sub-1/orders");
    }

    #[tokio::test]
    async fn test_missing_subscription_is_bad_request() {
        let dispatcher = dispatcher();

        let envelope = dispatcher
            .invoke(
                &CommandPath::parse("sql.database.list"),
                &RawArguments::new(),
                &ExecutionContext::default(),
            )
            .await;

        assert_eq!(envelope.status(), StatusCode::BAD_REQUEST);
        assert!(envelope.message().contains("subscription"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_bad_request() {
        let dispatcher = dispatcher();

        let envelope = dispatcher
            .invoke(
                &CommandPath::parse("sql.database.missing"),
                &RawArguments::new(),
                &ExecutionContext::default(),
            )
            .await;

        assert_eq!(envelope.status(), StatusCode::BAD_REQUEST);
        assert_eq!(envelope.message(), "Command not found: sql.database.missing");
    }

    #[tokio::test]
    async fn test_group_path_lists_children() {
        let dispatcher = dispatcher();

        let envelope = dispatcher
            .invoke(
                &CommandPath::parse("sql.database"),
                &RawArguments::new(),
                &ExecutionContext::default(),
            )
            .await;

        assert_eq!(envelope.status(), StatusCode::BAD_REQUEST);
        assert!(envelope.message().contains("command group"));
        assert!(envelope.message().contains("list"));
    }
}
