//! Console output formatter for response envelopes

use crate::cli::commands::OutputFormat;
use crate::output::formatter::OutputFormatter;
use cloudcmd_application::{CommandGroup, CommandNode, CommandRegistry};
use cloudcmd_domain::ResponseEnvelope;
use colored::Colorize;
use serde_json::Value;

/// Formats envelopes for stdout in the selected format
#[derive(Debug, Clone, Copy)]
pub struct ConsoleFormatter {
    format: OutputFormat,
}

impl ConsoleFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Envelope as JSON (compact or indented)
    pub fn format_json(envelope: &ResponseEnvelope, pretty: bool) -> String {
        let rendered = if pretty {
            serde_json::to_string_pretty(envelope)
        } else {
            serde_json::to_string(envelope)
        };
        rendered.unwrap_or_else(|_| "{}".to_string())
    }

    /// Envelope as human-readable text
    pub fn format_text(envelope: &ResponseEnvelope) -> String {
        let mut output = String::new();

        let status = format!("[{}]", envelope.status());
        let status = if envelope.is_success() {
            status.green().bold()
        } else if envelope.status().is_client_error() {
            status.yellow().bold()
        } else {
            status.red().bold()
        };
        output.push_str(&format!("{} {}\n", status, envelope.message()));

        match envelope.results() {
            Some(results) => Self::write_value(&mut output, results, 1),
            None if envelope.is_success() => {
                output.push_str(&format!("  {}\n", "(no results)".dimmed()));
            }
            None => {}
        }

        output
    }

    fn write_value(output: &mut String, value: &Value, depth: usize) {
        let indent = "  ".repeat(depth);
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    if child.is_object() || child.is_array() {
                        output.push_str(&format!("{}{}\n", indent, format!("{}:", key).cyan()));
                        Self::write_value(output, child, depth + 1);
                    } else {
                        output.push_str(&format!(
                            "{}{} {}\n",
                            indent,
                            format!("{}:", key).cyan(),
                            Self::scalar(child)
                        ));
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    if item.is_object() || item.is_array() {
                        output.push_str(&format!("{}-\n", indent));
                        Self::write_value(output, item, depth + 1);
                    } else {
                        output.push_str(&format!("{}- {}\n", indent, Self::scalar(item)));
                    }
                }
            }
            scalar => output.push_str(&format!("{}{}\n", indent, Self::scalar(scalar))),
        }
    }

    fn scalar(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Null => "null".dimmed().to_string(),
            other => other.to_string(),
        }
    }

    fn write_group(output: &mut String, group: &CommandGroup, prefix: &str) {
        let children = group.children();
        for (index, child) in children.iter().enumerate() {
            let last = index + 1 == children.len();
            let branch = if last { "└─ " } else { "├─ " };
            match child {
                CommandNode::Command { name, command } => {
                    let metadata = command.metadata();
                    let mut flags = Vec::new();
                    if metadata.read_only {
                        flags.push("read-only");
                    }
                    if metadata.destructive {
                        flags.push("destructive");
                    }
                    let flags = if flags.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", flags.join(", "))
                    };
                    output.push_str(&format!(
                        "{}{}{}  {}{}\n",
                        prefix,
                        branch,
                        name.green(),
                        metadata.description,
                        flags.dimmed()
                    ));
                }
                CommandNode::Group(subgroup) => {
                    output.push_str(&format!(
                        "{}{}{}  {}\n",
                        prefix,
                        branch,
                        subgroup.name().cyan().bold(),
                        subgroup.description().dimmed()
                    ));
                    let nested = format!("{}{}", prefix, if last { "   " } else { "│  " });
                    Self::write_group(output, subgroup, &nested);
                }
            }
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_envelope(&self, envelope: &ResponseEnvelope) -> String {
        match self.format {
            OutputFormat::Json => Self::format_json(envelope, false),
            OutputFormat::Pretty => Self::format_json(envelope, true),
            OutputFormat::Text => Self::format_text(envelope),
        }
    }

    fn format_tree(&self, registry: &CommandRegistry) -> String {
        if self.format != OutputFormat::Text {
            let paths: Vec<String> = registry
                .enumerate()
                .map(|(path, _)| path.to_string())
                .collect();
            return serde_json::to_string_pretty(&paths).unwrap_or_else(|_| "[]".to_string());
        }

        let mut output = format!("{}\n", "Commands".cyan().bold());
        Self::write_group(&mut output, registry.root(), "");
        output.push_str(&format!("\n{} command(s)\n", registry.len()));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudcmd_domain::StatusCode;
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_json_formats() {
        let envelope = ResponseEnvelope::success(Some(json!({"databases": ["orders"]})));

        let compact = ConsoleFormatter::new(OutputFormat::Json).format_envelope(&envelope);
        assert!(!compact.contains('\n'));
        let parsed: Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(parsed["status"], 200);
        assert_eq!(parsed["message"], "Success");
        assert_eq!(parsed["results"]["databases"][0], "orders");

        let pretty = ConsoleFormatter::new(OutputFormat::Pretty).format_envelope(&envelope);
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_null_results_serialized() {
        let envelope = ResponseEnvelope::success(None);
        let compact = ConsoleFormatter::new(OutputFormat::Json).format_envelope(&envelope);
        let parsed: Value = serde_json::from_str(&compact).unwrap();
        assert!(parsed["results"].is_null());
        assert!(parsed.as_object().unwrap().contains_key("results"));
    }

    #[test]
    fn test_text_format() {
        plain();
        let envelope = ResponseEnvelope::success(Some(json!({
            "databases": [{"name": "orders", "sku": "S0"}],
            "count": 1
        })));

        let text = ConsoleFormatter::new(OutputFormat::Text).format_envelope(&envelope);
        assert!(text.starts_with("[200] Success"));
        assert!(text.contains("name: orders"));
        assert!(text.contains("count: 1"));

        let failure = ResponseEnvelope::failure(StatusCode::BAD_REQUEST, "Missing required options: key.");
        let text = ConsoleFormatter::format_text(&failure);
        assert_eq!(text, "[400] Missing required options: key.\n");
    }

    #[test]
    fn test_tree_json_lists_paths() {
        let registry = CommandRegistry::new();
        let tree = ConsoleFormatter::new(OutputFormat::Json).format_tree(&registry);
        assert_eq!(tree, "[]");
    }
}
