//! Command port
//!
//! Defines the interface every invocable command implements, and the
//! per-invocation [`ExecutionContext`] handed to it.

use std::sync::Arc;

use async_trait::async_trait;
use cloudcmd_domain::{
    BoundOptions, CommandError, CommandMetadata, CommandOutput, OptionChain, RetryPolicy,
    StatusCode,
};
use tokio_util::sync::CancellationToken;

use super::credential::{CredentialProvider, NoCredentials};

/// Port for one invocable command
///
/// Implementations declare metadata and an ordered option chain once, at
/// construction, and are never mutated afterwards. Collaborators such as the
/// cache service or business operations are injected through the
/// implementation's constructor.
#[async_trait]
pub trait Command: Send + Sync {
    /// Name, title, description and behavior flags
    fn metadata(&self) -> &CommandMetadata;

    /// Ordered option contributors, shared options first
    fn options(&self) -> &OptionChain;

    /// Run the command body with validated options
    async fn execute(
        &self,
        context: &ExecutionContext,
        options: &BoundOptions,
    ) -> Result<CommandOutput, CommandError>;

    /// Status for a failed invocation.
    ///
    /// Override to add domain-specific cases; delegate to
    /// [`CommandError::status`] for everything else.
    fn error_status(&self, error: &CommandError) -> StatusCode {
        error.status()
    }

    /// Caller-facing message for a failed invocation.
    ///
    /// Override alongside [`error_status`](Self::error_status); delegate to
    /// [`CommandError::user_message`] for everything else.
    fn error_message(&self, error: &CommandError) -> String {
        error.user_message()
    }
}

/// Per-invocation values available to a command body
#[derive(Clone)]
pub struct ExecutionContext {
    invocation_id: u64,
    credentials: Arc<dyn CredentialProvider>,
    retry_policy: RetryPolicy,
    cancellation: CancellationToken,
}

impl ExecutionContext {
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            invocation_id: 0,
            credentials,
            retry_policy: RetryPolicy::default(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_invocation_id(mut self, id: u64) -> Self {
        self.invocation_id = id;
        self
    }

    pub fn invocation_id(&self) -> u64 {
        self.invocation_id
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    /// Retry policy bound from the global options; opaque to the pipeline
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(Arc::new(NoCredentials))
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("invocation_id", &self.invocation_id)
            .field("credentials", &self.credentials.id())
            .field("retry_policy", &self.retry_policy)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}
