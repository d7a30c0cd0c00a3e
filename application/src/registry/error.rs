//! Registry error types

use cloudcmd_domain::{CommandError, OptionConflict};
use thiserror::Error;

/// Error raised while building the command tree.
///
/// Every variant is a programming error; hosts fail at startup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("'{parent}' already has a child named '{name}'")]
    DuplicateName { parent: String, name: String },

    #[error("invalid command or group name '{0}': names must be non-empty and contain no '.', '/' or whitespace")]
    InvalidName(String),

    #[error("command '{command}' has conflicting options: {source}")]
    OptionConflict {
        command: String,
        #[source]
        source: OptionConflict,
    },
}

/// Why a path did not resolve to a command
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No command specified")]
    Empty,

    #[error("Command not found: {path}")]
    NotFound { path: String },

    #[error("'{path}' is a command group, not a command. Available: {}", .children.join(", "))]
    IsGroup { path: String, children: Vec<String> },
}

impl From<ResolveError> for CommandError {
    fn from(error: ResolveError) -> Self {
        CommandError::UnknownCommand(error.to_string())
    }
}
