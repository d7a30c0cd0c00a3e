//! Bound option values and binding issues
//!
//! [`BoundOptions`] is the per-invocation options object. It is created empty,
//! filled by each contributor of a command's option chain in order, and dropped
//! once the command returns.

use serde_json::Value;
use std::collections::HashMap;

use crate::core::error::CommandError;

/// Raw, unvalidated arguments supplied by the caller (option name → value).
pub type RawArguments = HashMap<String, Value>;

/// Normalize a raw option key (`--resource-group` → `resource-group`).
pub fn normalize_option_name(key: &str) -> &str {
    key.trim().trim_start_matches("--")
}

/// Why an option was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Required option with no value and no default
    Missing,
    /// Value failed type conversion
    Invalid(String),
    /// Name not declared by any contributor in the chain
    Unknown,
}

/// A single binding or validation problem tied to an option name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionIssue {
    pub name: String,
    pub kind: IssueKind,
}

impl OptionIssue {
    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: IssueKind::Missing,
        }
    }

    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: IssueKind::Invalid(reason.into()),
        }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: IssueKind::Unknown,
        }
    }
}

impl std::fmt::Display for OptionIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            IssueKind::Missing => write!(f, "missing required option '{}'", self.name),
            IssueKind::Invalid(reason) => write!(f, "invalid value for '{}': {}", self.name, reason),
            IssueKind::Unknown => write!(f, "unknown option '{}'", self.name),
        }
    }
}

/// Render every issue into one message, grouped by kind.
///
/// ```text
/// Missing required options: subscription, server. Invalid option values: top (expected integer, got "x").
/// ```
pub fn describe_issues(issues: &[OptionIssue]) -> String {
    let mut missing = Vec::new();
    let mut invalid = Vec::new();
    let mut unknown = Vec::new();

    for issue in issues {
        match &issue.kind {
            IssueKind::Missing => missing.push(issue.name.clone()),
            IssueKind::Invalid(reason) => invalid.push(format!("{} ({})", issue.name, reason)),
            IssueKind::Unknown => unknown.push(issue.name.clone()),
        }
    }

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("Missing required options: {}.", missing.join(", ")));
    }
    if !invalid.is_empty() {
        parts.push(format!("Invalid option values: {}.", invalid.join(", ")));
    }
    if !unknown.is_empty() {
        parts.push(format!("Unknown options: {}.", unknown.join(", ")));
    }

    if parts.is_empty() {
        "Invalid input.".to_string()
    } else {
        parts.join(" ")
    }
}

/// Per-invocation options object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundOptions {
    values: HashMap<String, Value>,
}

impl BoundOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value. An already-bound name is never overwritten; returns
    /// `false` in that case.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> bool {
        match self.values.entry(name.into()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_str())
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(|v| v.as_i64())
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(|v| v.as_f64())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(|v| v.as_bool())
    }

    /// Get a string option the command cannot run without.
    ///
    /// Validation normally guarantees presence of required options; this
    /// covers options a command treats as required only in some modes.
    pub fn require_str(&self, name: &str) -> Result<&str, CommandError> {
        self.get_str(name)
            .ok_or_else(|| CommandError::Input(vec![OptionIssue::missing(name)]))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_option_name() {
        assert_eq!(normalize_option_name("--subscription"), "subscription");
        assert_eq!(normalize_option_name(" tenant "), "tenant");
        assert_eq!(normalize_option_name("resource-group"), "resource-group");
    }

    #[test]
    fn test_bind_never_overwrites() {
        let mut options = BoundOptions::new();
        assert!(options.bind("subscription", json!("sub-1")));
        assert!(!options.bind("subscription", json!("sub-2")));
        assert_eq!(options.get_str("subscription"), Some("sub-1"));
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_typed_getters() {
        let mut options = BoundOptions::new();
        options.bind("top", json!(10));
        options.bind("delay", json!(0.5));
        options.bind("force", json!(true));

        assert_eq!(options.get_i64("top"), Some(10));
        assert_eq!(options.get_f64("delay"), Some(0.5));
        assert_eq!(options.get_bool("force"), Some(true));
        assert_eq!(options.get_str("top"), None);
        assert!(options.require_str("server").is_err());
    }

    #[test]
    fn test_describe_issues_lists_every_name() {
        let message = describe_issues(&[
            OptionIssue::missing("subscription"),
            OptionIssue::missing("server"),
            OptionIssue::invalid("top", "expected integer, got \"x\""),
            OptionIssue::unknown("colour"),
        ]);

        assert!(message.contains("Missing required options: subscription, server."));
        assert!(message.contains("top (expected integer"));
        assert!(message.contains("Unknown options: colour."));
    }

    #[test]
    fn test_issue_display() {
        assert_eq!(
            OptionIssue::missing("tenant").to_string(),
            "missing required option 'tenant'"
        );
        assert_eq!(OptionIssue::unknown("x").to_string(), "unknown option 'x'");
    }
}
