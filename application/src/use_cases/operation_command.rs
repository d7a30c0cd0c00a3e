//! Command backed by a business operation
//!
//! Most commands are nothing more than metadata, an option chain and a call
//! into one upstream operation. [`OperationCommand`] packages that so hosts
//! register operations without writing a `Command` impl for each.

use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_domain::{BoundOptions, CommandError, CommandMetadata, CommandOutput, OptionChain};

use crate::ports::business_operation::BusinessOperation;
use crate::ports::command::{Command, ExecutionContext};

pub struct OperationCommand {
    metadata: CommandMetadata,
    options: OptionChain,
    operation: Arc<dyn BusinessOperation>,
}

impl OperationCommand {
    pub fn new(
        metadata: CommandMetadata,
        options: OptionChain,
        operation: Arc<dyn BusinessOperation>,
    ) -> Self {
        Self {
            metadata,
            options,
            operation,
        }
    }

    pub fn operation(&self) -> &Arc<dyn BusinessOperation> {
        &self.operation
    }
}

#[async_trait]
impl Command for OperationCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn options(&self) -> &OptionChain {
        &self.options
    }

    async fn execute(
        &self,
        context: &ExecutionContext,
        options: &BoundOptions,
    ) -> Result<CommandOutput, CommandError> {
        tracing::debug!(
            invocation_id = context.invocation_id(),
            operation = self.operation.name(),
            "Running operation"
        );
        self.operation.run(options, context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{GlobalOptions, SubscriptionOptions};
    use crate::use_cases::execute_command::ExecutionPipeline;
    use cloudcmd_domain::{RawArguments, StatusCode};
    use serde_json::json;

    struct ListServers;

    #[async_trait]
    impl BusinessOperation for ListServers {
        fn name(&self) -> &str {
            "sql-server-list"
        }

        async fn run(
            &self,
            options: &BoundOptions,
            context: &ExecutionContext,
        ) -> Result<CommandOutput, CommandError> {
            if context.is_cancelled() {
                return Err(CommandError::other("cancelled"));
            }
            match options.get_str("subscription") {
                Some("empty") => Ok(None),
                Some(subscription) => Ok(Some(json!({"servers": [format!("{}-sql", subscription)]}))),
                None => Err(CommandError::not_found("subscription")),
            }
        }
    }

    fn command() -> OperationCommand {
        OperationCommand::new(
            CommandMetadata::new("list", "List Servers", "List SQL servers").read_only(),
            OptionChain::new()
                .with(GlobalOptions::new())
                .with(SubscriptionOptions::new()),
            Arc::new(ListServers),
        )
    }

    #[tokio::test]
    async fn test_operation_receives_bound_options() {
        let raw: RawArguments = serde_json::from_value(json!({"subscription": "prod"})).unwrap();
        let envelope = ExecutionPipeline::new()
            .execute(&command(), &raw, &ExecutionContext::default())
            .await;

        assert_eq!(envelope.status(), StatusCode::OK);
        assert_eq!(envelope.results().unwrap()["servers"][0], "prod-sql");
    }

    #[tokio::test]
    async fn test_operation_empty_result() {
        let raw: RawArguments = serde_json::from_value(json!({"subscription": "empty"})).unwrap();
        let envelope = ExecutionPipeline::new()
            .execute(&command(), &raw, &ExecutionContext::default())
            .await;

        assert!(envelope.is_success());
        assert!(envelope.results().is_none());
    }

    #[tokio::test]
    async fn test_operation_sees_cancellation() {
        let token = tokio_util::sync::CancellationToken::new();
        token.cancel();
        let context = ExecutionContext::default().with_cancellation(token);
        let raw: RawArguments = serde_json::from_value(json!({"subscription": "prod"})).unwrap();

        let envelope = ExecutionPipeline::new().execute(&command(), &raw, &context).await;
        assert_eq!(envelope.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(command().operation().name(), "sql-server-list");
    }
}
