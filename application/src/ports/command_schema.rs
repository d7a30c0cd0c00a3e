//! Command schema conversion port.
//!
//! Separates "which commands exist" (registry) from "how to describe them to
//! a tool-calling client" (infrastructure). The converter walks the registry
//! in its deterministic order so exported catalogs are reproducible.

use cloudcmd_domain::CommandPath;

use super::command::Command;
use crate::registry::CommandRegistry;

/// Port for converting commands to a machine-readable schema (JSON Schema).
pub trait CommandSchemaPort: Send + Sync {
    /// Convert a single command, addressed by its full path.
    fn command_to_schema(&self, path: &CommandPath, command: &dyn Command) -> serde_json::Value;

    /// Convert every registered command, in registry enumeration order.
    fn registry_schema(&self, registry: &CommandRegistry) -> Vec<serde_json::Value> {
        registry
            .enumerate()
            .map(|(path, command)| self.command_to_schema(&path, command.as_ref()))
            .collect()
    }
}
