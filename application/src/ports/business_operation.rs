//! Business operation port
//!
//! The per-resource logic behind a command (list servers, query logs, ...)
//! is opaque to the dispatch core. It receives the bound options and the
//! execution context (credentials, retry policy, cancellation) and returns a
//! payload or a classified [`CommandError`].

use async_trait::async_trait;
use cloudcmd_domain::{BoundOptions, CommandError, CommandOutput};

use super::command::ExecutionContext;

/// Port for one upstream operation
#[async_trait]
pub trait BusinessOperation: Send + Sync {
    /// Stable operation name, also used as the cache key prefix
    fn name(&self) -> &str;

    /// Run the operation. `Ok(None)` means it found nothing.
    async fn run(
        &self,
        options: &BoundOptions,
        context: &ExecutionContext,
    ) -> Result<CommandOutput, CommandError>;
}
