//! Built-in commands
//!
//! Commands every host gets for free:
//!
//! ```text
//! tools
//!  └─ list        command catalog with input schemas
//! cache
//!  ├─ get
//!  ├─ set
//!  └─ delete
//! ```

pub mod cache;
pub mod schema;
pub mod tools;

use std::sync::Arc;
use std::time::Duration;

use cloudcmd_application::{CacheService, CommandGroup, CommandRegistry, RegistryError};

pub use cache::{CacheDeleteCommand, CacheGetCommand, CacheSetCommand};
pub use schema::JsonSchemaCommandConverter;
pub use tools::{ToolCatalog, ToolsListCommand};

/// Register the built-in groups. Fill `catalog` once every other command is
/// registered.
pub fn register_builtin_commands(
    registry: &mut CommandRegistry,
    cache: Arc<CacheService>,
    default_ttl: Duration,
    catalog: ToolCatalog,
) -> Result<(), RegistryError> {
    let mut tools = CommandGroup::new("tools", "Discover available commands");
    tools.add_command("list", ToolsListCommand::new(catalog))?;

    let mut cache_group = CommandGroup::new("cache", "Inspect and manage cached values");
    cache_group
        .add_command("get", CacheGetCommand::new(cache.clone()))?
        .add_command("set", CacheSetCommand::new(cache.clone(), default_ttl))?
        .add_command("delete", CacheDeleteCommand::new(cache))?;

    registry.add_group(tools)?.add_group(cache_group)?;
    Ok(())
}
