//! Command groups
//!
//! A [`CommandGroup`] is one node of the command tree. Its children keep
//! insertion order, which makes enumeration (and every schema derived from
//! it) reproducible across runs.
//!
//! ```text
//! root
//!  └─ sql                 (group)
//!      ├─ server          (group)
//!      │   └─ list        (command)  → sql.server.list
//!      └─ database        (group)
//!          ├─ list        (command)  → sql.database.list
//!          └─ show        (command)  → sql.database.show
//! ```

use std::sync::Arc;

use cloudcmd_domain::CommandPath;

use super::error::{RegistryError, ResolveError};
use crate::ports::command::Command;

/// Child of a group
pub enum CommandNode {
    Command {
        name: String,
        command: Arc<dyn Command>,
    },
    Group(CommandGroup),
}

impl CommandNode {
    pub fn name(&self) -> &str {
        match self {
            CommandNode::Command { name, .. } => name,
            CommandNode::Group(group) => group.name(),
        }
    }
}

/// Named node aggregating commands and sub-groups
pub struct CommandGroup {
    name: String,
    description: String,
    children: Vec<CommandNode>,
}

impl CommandGroup {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    /// Attach a command under `name`.
    ///
    /// Rejects invalid or duplicate names and commands whose option chain
    /// declares one option in two incompatible ways.
    pub fn add_command<C: Command + 'static>(
        &mut self,
        name: impl Into<String>,
        command: C,
    ) -> Result<&mut Self, RegistryError> {
        self.add_command_arc(name, Arc::new(command))
    }

    /// Attach a command (Arc version)
    pub fn add_command_arc(
        &mut self,
        name: impl Into<String>,
        command: Arc<dyn Command>,
    ) -> Result<&mut Self, RegistryError> {
        let name = name.into();
        self.check_child_name(&name)?;
        command
            .options()
            .check_conflicts()
            .map_err(|source| RegistryError::OptionConflict {
                command: name.clone(),
                source,
            })?;

        tracing::trace!(group = %self.name, command = %name, "Registered command");
        self.children.push(CommandNode::Command { name, command });
        Ok(self)
    }

    /// Attach a sub-group
    pub fn add_subgroup(&mut self, group: CommandGroup) -> Result<&mut Self, RegistryError> {
        self.check_child_name(&group.name)?;
        tracing::trace!(group = %self.name, subgroup = %group.name, "Registered group");
        self.children.push(CommandNode::Group(group));
        Ok(self)
    }

    /// Mutable access to a direct sub-group, for incremental registration
    pub fn subgroup_mut(&mut self, name: &str) -> Option<&mut CommandGroup> {
        self.children.iter_mut().find_map(|child| match child {
            CommandNode::Group(group) if group.name == name => Some(group),
            _ => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|child| child.name() == name)
    }

    /// Walk `segments` below this group.
    pub fn resolve<S: AsRef<str>>(&self, segments: &[S]) -> Result<&Arc<dyn Command>, ResolveError> {
        if segments.is_empty() {
            return Err(ResolveError::Empty);
        }

        let mut group = self;
        for (index, segment) in segments.iter().enumerate() {
            let is_last = index + 1 == segments.len();
            match group.child(segment.as_ref()) {
                Some(CommandNode::Command { command, .. }) if is_last => return Ok(command),
                Some(CommandNode::Group(child)) if is_last => {
                    return Err(ResolveError::IsGroup {
                        path: join(segments),
                        children: child.children.iter().map(|c| c.name().to_string()).collect(),
                    });
                }
                Some(CommandNode::Group(child)) => group = child,
                // a command in the middle of the path, or an unknown segment
                Some(CommandNode::Command { .. }) | None => {
                    return Err(ResolveError::NotFound {
                        path: join(segments),
                    });
                }
            }
        }

        Err(ResolveError::NotFound {
            path: join(segments),
        })
    }

    /// Lazy depth-first traversal of every command below this group, in
    /// insertion order. Paths are relative to this group.
    pub fn commands(&self) -> Commands<'_> {
        Commands {
            stack: vec![(CommandPath::default(), self.children.iter())],
        }
    }

    fn check_child_name(&self, name: &str) -> Result<(), RegistryError> {
        if name.is_empty() || name.contains(|c: char| c == '.' || c == '/' || c.is_whitespace()) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        if self.child(name).is_some() {
            return Err(RegistryError::DuplicateName {
                parent: self.name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for CommandGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandGroup")
            .field("name", &self.name)
            .field(
                "children",
                &self.children.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Iterator returned by [`CommandGroup::commands`]
pub struct Commands<'a> {
    stack: Vec<(CommandPath, std::slice::Iter<'a, CommandNode>)>,
}

impl<'a> Iterator for Commands<'a> {
    type Item = (CommandPath, &'a Arc<dyn Command>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (prefix, children) = self.stack.last_mut()?;
            match children.next() {
                Some(CommandNode::Command { name, command }) => {
                    return Some((prefix.child(name), command));
                }
                Some(CommandNode::Group(group)) => {
                    let path = prefix.child(&group.name);
                    self.stack.push((path, group.children.iter()));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

fn join<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(".")
}
