//! Output formatter trait

use cloudcmd_application::CommandRegistry;
use cloudcmd_domain::ResponseEnvelope;

/// Trait for rendering invocation results
pub trait OutputFormatter {
    /// Format one response envelope
    fn format_envelope(&self, envelope: &ResponseEnvelope) -> String;

    /// Format the command tree (for `--list`)
    fn format_tree(&self, registry: &CommandRegistry) -> String;
}
