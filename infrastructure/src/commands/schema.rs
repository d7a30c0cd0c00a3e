//! JSON Schema command converter.
//!
//! Default implementation of [`CommandSchemaPort`] that produces
//! provider-neutral JSON Schema for tool-calling clients.

use cloudcmd_application::{Command, CommandSchemaPort};
use cloudcmd_domain::{CommandPath, OptionDescriptor, OptionValueType};
use serde_json::{Map, Value, json};

/// Default implementation producing provider-neutral JSON Schema.
///
/// Option type → JSON Schema mapping:
/// - `string` → `"string"`
/// - `integer` → `"integer"`
/// - `number` → `"number"`
/// - `boolean` → `"boolean"`
/// - `enum` → `"string"` with an `enum` list
///
/// The tool name is the command's full path joined with `_`, since most
/// clients reject dots in tool names.
pub struct JsonSchemaCommandConverter;

impl JsonSchemaCommandConverter {
    fn option_schema(descriptor: &OptionDescriptor) -> Value {
        let schema_type = match descriptor.value_type {
            OptionValueType::String | OptionValueType::Enum(_) => "string",
            OptionValueType::Integer => "integer",
            OptionValueType::Number => "number",
            OptionValueType::Boolean => "boolean",
        };

        let mut prop = Map::new();
        prop.insert("type".to_string(), json!(schema_type));
        prop.insert("description".to_string(), json!(descriptor.description));
        if let Some(values) = descriptor.value_type.allowed_values() {
            prop.insert("enum".to_string(), json!(values));
        }
        if let Some(default) = &descriptor.default_value {
            prop.insert("default".to_string(), default.clone());
        }
        Value::Object(prop)
    }
}

impl CommandSchemaPort for JsonSchemaCommandConverter {
    fn command_to_schema(&self, path: &CommandPath, command: &dyn Command) -> Value {
        let metadata = command.metadata();
        let mut properties = Map::new();
        let mut required = Vec::new();

        for descriptor in command.options().descriptors() {
            properties.insert(descriptor.name.clone(), Self::option_schema(descriptor));
            if descriptor.required {
                required.push(json!(descriptor.name));
            }
        }

        json!({
            "name": path.segments().join("_"),
            "path": path.to_string(),
            "description": metadata.description,
            "annotations": {
                "title": metadata.title,
                "destructiveHint": metadata.destructive,
                "readOnlyHint": metadata.read_only,
                "idempotentHint": metadata.idempotent,
                "secretHint": metadata.secret,
            },
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}
