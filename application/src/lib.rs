//! Application layer for cloudcmd
//!
//! This crate contains the command registry, the execution pipeline, the
//! shared option contributors, the cache service and port definitions.
//! It depends only on the domain layer.

pub mod cache;
pub mod options;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use cache::{CacheService, CachedOperation};
pub use options::{GlobalOptions, SubscriptionOptions, resource_group_options};
pub use ports::{
    business_operation::BusinessOperation,
    command::{Command, ExecutionContext},
    command_schema::CommandSchemaPort,
    credential::{AccessToken, CredentialError, CredentialProvider, NoCredentials},
};
pub use registry::{CommandGroup, CommandNode, CommandRegistry, RegistryError, ResolveError};
pub use use_cases::dispatch::Dispatcher;
pub use use_cases::execute_command::{ExecutionPipeline, InvocationPhase};
pub use use_cases::operation_command::OperationCommand;
