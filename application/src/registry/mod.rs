//! Command registry
//!
//! The tree of groups and commands a host exposes. Built once at startup,
//! then shared read-only (behind an `Arc`) by every concurrent invocation.

mod error;
mod group;

pub use error::{RegistryError, ResolveError};
pub use group::{CommandGroup, CommandNode, Commands};

use std::sync::Arc;

use cloudcmd_domain::CommandPath;

use crate::ports::command::Command;

/// Root of the command tree
#[derive(Debug)]
pub struct CommandRegistry {
    root: CommandGroup,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            root: CommandGroup::new("root", "All commands"),
        }
    }

    /// Register a top-level group
    pub fn add_group(&mut self, group: CommandGroup) -> Result<&mut Self, RegistryError> {
        self.root.add_subgroup(group)?;
        Ok(self)
    }

    /// Register a top-level command
    pub fn add_command<C: Command + 'static>(
        &mut self,
        name: impl Into<String>,
        command: C,
    ) -> Result<&mut Self, RegistryError> {
        self.root.add_command(name, command)?;
        Ok(self)
    }

    pub fn root(&self) -> &CommandGroup {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut CommandGroup {
        &mut self.root
    }

    /// Find the command at `path`.
    ///
    /// Returns the same instance on every call; the registry never builds
    /// commands on demand.
    pub fn resolve(&self, path: &CommandPath) -> Result<Arc<dyn Command>, ResolveError> {
        self.root.resolve(path.segments()).map(Arc::clone)
    }

    /// Every command with its full path, depth-first in registration order
    pub fn enumerate(&self) -> Commands<'_> {
        self.root.commands()
    }

    /// Top-level groups, in registration order
    pub fn groups(&self) -> impl Iterator<Item = &CommandGroup> {
        self.root.children().iter().filter_map(|child| match child {
            CommandNode::Group(group) => Some(group),
            CommandNode::Command { .. } => None,
        })
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.enumerate().count()
    }

    pub fn is_empty(&self) -> bool {
        self.enumerate().next().is_none()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::command::ExecutionContext;
    use async_trait::async_trait;
    use cloudcmd_domain::{BoundOptions, CommandError, CommandMetadata, CommandOutput, OptionChain};

    struct NamedCommand {
        metadata: CommandMetadata,
        options: OptionChain,
    }

    impl NamedCommand {
        fn new(name: &str) -> Self {
            Self {
                metadata: CommandMetadata::new(name, name, "test command"),
                options: OptionChain::new(),
            }
        }
    }

    #[async_trait]
    impl Command for NamedCommand {
        fn metadata(&self) -> &CommandMetadata {
            &self.metadata
        }

        fn options(&self) -> &OptionChain {
            &self.options
        }

        async fn execute(
            &self,
            _context: &ExecutionContext,
            _options: &BoundOptions,
        ) -> Result<CommandOutput, CommandError> {
            Ok(None)
        }
    }

    fn registry() -> CommandRegistry {
        let mut database = CommandGroup::new("database", "Databases");
        database
            .add_command("list", NamedCommand::new("list"))
            .unwrap();
        let mut sql = CommandGroup::new("sql", "SQL");
        sql.add_subgroup(database).unwrap();

        let mut storage = CommandGroup::new("storage", "Storage");
        storage
            .add_command("list", NamedCommand::new("account-list"))
            .unwrap();

        let mut registry = CommandRegistry::new();
        registry
            .add_group(sql)
            .unwrap()
            .add_group(storage)
            .unwrap()
            .add_command("version", NamedCommand::new("version"))
            .unwrap();
        registry
    }

    #[test]
    fn test_resolve_full_path() {
        let registry = registry();
        let command = registry
            .resolve(&CommandPath::parse("sql.database.list"))
            .unwrap();
        assert_eq!(command.metadata().name, "list");
    }

    #[test]
    fn test_resolve_returns_same_instance() {
        let registry = registry();
        let path = CommandPath::parse("sql/database/list");
        let first = registry.resolve(&path).unwrap();
        let second = registry.resolve(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_resolve_missing_leaf() {
        let registry = registry();
        let err = registry
            .resolve(&CommandPath::parse("sql.database.missing"))
            .err().unwrap();
        assert_eq!(err.to_string(), "Command not found: sql.database.missing");
    }

    #[test]
    fn test_resolve_empty_path() {
        let registry = registry();
        assert_eq!(
            registry.resolve(&CommandPath::parse("")).err().unwrap(),
            ResolveError::Empty
        );
    }

    #[test]
    fn test_enumerate_full_paths() {
        let registry = registry();
        let paths: Vec<String> = registry
            .enumerate()
            .map(|(path, _)| path.to_string())
            .collect();
        assert_eq!(paths, vec!["sql.database.list", "storage.list", "version"]);
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
        assert!(CommandRegistry::new().is_empty());
    }

    #[test]
    fn test_groups() {
        let registry = registry();
        let names: Vec<&str> = registry.groups().map(|g| g.name()).collect();
        assert_eq!(names, vec!["sql", "storage"]);
    }
}
