//! `tools list`: the command catalog as JSON Schema

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use cloudcmd_application::{
    Command, CommandRegistry, CommandSchemaPort, ExecutionContext, GlobalOptions,
};
use cloudcmd_domain::{
    BoundOptions, CommandError, CommandMetadata, CommandOutput, OptionChain, OptionDescriptor,
    OptionSet, listing_output,
};
use serde_json::Value;

use super::schema::JsonSchemaCommandConverter;

/// Schemas of every registered command.
///
/// The registry cannot describe itself while it is being built, so the
/// catalog starts empty and is filled once registration is complete.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    schemas: Arc<OnceLock<Vec<Value>>>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the registry. Later calls are ignored.
    pub fn fill(&self, registry: &CommandRegistry) {
        let schemas = JsonSchemaCommandConverter.registry_schema(registry);
        if self.schemas.set(schemas).is_err() {
            tracing::debug!("Tool catalog already filled");
        }
    }

    pub fn schemas(&self) -> &[Value] {
        self.schemas.get().map(Vec::as_slice).unwrap_or_default()
    }
}

pub struct ToolsListCommand {
    metadata: CommandMetadata,
    options: OptionChain,
    catalog: ToolCatalog,
}

impl ToolsListCommand {
    pub fn new(catalog: ToolCatalog) -> Self {
        Self {
            metadata: CommandMetadata::new(
                "list",
                "List Tools",
                "List every available command with its input schema.",
            )
            .read_only(),
            options: OptionChain::new().with(GlobalOptions::new()).with(
                OptionSet::new("tools-list").with(OptionDescriptor::new(
                    "prefix",
                    "Only list commands whose path starts with this prefix (e.g. \"sql.database\")",
                    false,
                )),
            ),
            catalog,
        }
    }
}

#[async_trait]
impl Command for ToolsListCommand {
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
        let prefix = options.get_str("prefix").unwrap_or_default();
        let tools: Vec<&Value> = self
            .catalog
            .schemas()
            .iter()
            .filter(|schema| {
                schema["path"]
                    .as_str()
                    .is_some_and(|path| path.starts_with(prefix))
            })
            .collect();

        listing_output("tools", &tools)
    }
}
