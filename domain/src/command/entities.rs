//! Command domain entities

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::CommandError;

/// Payload produced by a successful command; `None` when nothing was found.
pub type CommandOutput = Option<Value>;

/// Descriptive metadata of a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// Leaf name within its group (e.g. "list")
    pub name: String,
    /// Short human title
    pub title: String,
    /// Help text shown in listings and tool schemas
    pub description: String,
    /// Deletes or overwrites upstream state
    pub destructive: bool,
    /// Performs no upstream writes
    pub read_only: bool,
    /// Repeating the call with the same options has no further effect
    pub idempotent: bool,
    /// Results may contain secrets
    pub secret: bool,
}

impl CommandMetadata {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: description.into(),
            destructive: false,
            read_only: false,
            idempotent: false,
            secret: false,
        }
    }

    /// Mark as read-only (implies idempotent and non-destructive)
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.idempotent = true;
        self.destructive = false;
        self
    }

    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self.read_only = false;
        self
    }

    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

/// Dotted or slash-separated invocation path (e.g. `sql.database.list`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CommandPath {
    segments: Vec<String>,
}

impl CommandPath {
    /// Parse a path using `.`, `/` or whitespace as separators.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split(|c: char| c == '.' || c == '/' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined: Vec<String> = segments
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        Self::parse(&joined.join("."))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }
}

impl std::fmt::Display for CommandPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Wrap a listing under `key`, or `None` when the listing is empty.
///
/// Listing commands return `{"<key>": [...]}`; an empty listing is reported
/// as a successful invocation without results.
pub fn listing_output<T: Serialize>(key: &str, items: &[T]) -> Result<CommandOutput, CommandError> {
    if items.is_empty() {
        return Ok(None);
    }
    let items = serde_json::to_value(items).map_err(CommandError::other)?;
    let mut wrapped = serde_json::Map::new();
    wrapped.insert(key.to_string(), items);
    Ok(Some(Value::Object(wrapped)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_flags() {
        let list = CommandMetadata::new("list", "List Databases", "List databases").read_only();
        assert!(list.read_only && list.idempotent && !list.destructive);

        let delete = CommandMetadata::new("delete", "Delete Database", "Delete a database")
            .idempotent()
            .destructive();
        assert!(delete.destructive && delete.idempotent && !delete.read_only);
    }

    #[test]
    fn test_path_parse_separators() {
        let dotted = CommandPath::parse("sql.database.list");
        let slashed = CommandPath::parse("sql/database/list");
        let spaced = CommandPath::parse("  sql database  list ");

        assert_eq!(dotted.segments(), &["sql", "database", "list"]);
        assert_eq!(dotted, slashed);
        assert_eq!(dotted, spaced);
        assert_eq!(dotted.to_string(), "sql.database.list");
        assert!(CommandPath::parse("..").is_empty());
    }

    #[test]
    fn test_path_from_segments() {
        let path = CommandPath::from_segments(["sql", "database.list"]);
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.child("extra").to_string(), "sql.database.list.extra");
    }

    #[test]
    fn test_listing_output() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(listing_output("databases", &empty).unwrap(), None);

        let output = listing_output("databases", &["db1", "db2"]).unwrap().unwrap();
        assert_eq!(output["databases"][1], "db2");
    }
}
