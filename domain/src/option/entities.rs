//! Option descriptor entities

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value type accepted by an option
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "values")]
pub enum OptionValueType {
    /// Free-form text (scalars are stringified)
    String,
    /// Signed 64-bit integer
    Integer,
    /// Floating point number
    Number,
    /// `true` / `false`
    Boolean,
    /// One of a fixed set of string values
    Enum(Vec<String>),
}

impl OptionValueType {
    pub fn as_str(&self) -> &str {
        match self {
            OptionValueType::String => "string",
            OptionValueType::Integer => "integer",
            OptionValueType::Number => "number",
            OptionValueType::Boolean => "boolean",
            OptionValueType::Enum(_) => "enum",
        }
    }

    /// Allowed values for enum options, `None` for every other type
    pub fn allowed_values(&self) -> Option<&[String]> {
        match self {
            OptionValueType::Enum(values) => Some(values),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValueType::Enum(values) => write!(f, "one of [{}]", values.join(", ")),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Declarative definition of one named input to a command.
///
/// Descriptors are immutable once declared and are shared by `Arc` between
/// every command whose option chain includes the contributor that owns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    /// Option name in kebab-case (e.g. "resource-group")
    pub name: String,
    /// Help text
    pub description: String,
    /// Accepted value type
    pub value_type: OptionValueType,
    /// Whether a value must be present after defaults are applied
    pub required: bool,
    /// Value bound when the caller supplies none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl OptionDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value_type: OptionValueType::String,
            required,
            default_value: None,
        }
    }

    pub fn with_type(mut self, value_type: OptionValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn with_enum_values<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_type(OptionValueType::Enum(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Two descriptors conflict when they share a name but disagree on
    /// type or required-ness.
    pub fn conflicts_with(&self, other: &OptionDescriptor) -> bool {
        self.name == other.name
            && (self.value_type != other.value_type || self.required != other.required)
    }

    /// Convert a raw input value to this option's type.
    ///
    /// Returns `Ok(None)` for JSON `null`, which binds as absent.
    pub fn convert(&self, raw: &Value) -> Result<Option<Value>, String> {
        if raw.is_null() {
            return Ok(None);
        }

        let converted = match &self.value_type {
            OptionValueType::String => match raw {
                Value::String(s) => Value::String(s.clone()),
                Value::Number(n) => Value::String(n.to_string()),
                Value::Bool(b) => Value::String(b.to_string()),
                _ => return Err(format!("expected string, got {}", json_kind(raw))),
            },
            OptionValueType::Integer => match raw {
                Value::Number(n) => match n.as_i64() {
                    Some(i) => Value::from(i),
                    None => return Err(format!("expected integer, got {}", n)),
                },
                Value::String(s) => match s.trim().parse::<i64>() {
                    Ok(i) => Value::from(i),
                    Err(_) => return Err(format!("expected integer, got \"{}\"", s)),
                },
                _ => return Err(format!("expected integer, got {}", json_kind(raw))),
            },
            OptionValueType::Number => match raw {
                Value::Number(n) => Value::Number(n.clone()),
                Value::String(s) => match s.trim().parse::<f64>() {
                    Ok(f) if f.is_finite() => Value::from(f),
                    _ => return Err(format!("expected number, got \"{}\"", s)),
                },
                _ => return Err(format!("expected number, got {}", json_kind(raw))),
            },
            OptionValueType::Boolean => match raw {
                Value::Bool(b) => Value::Bool(*b),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "1" | "yes" => Value::Bool(true),
                    "false" | "0" | "no" => Value::Bool(false),
                    _ => return Err(format!("expected boolean, got \"{}\"", s)),
                },
                _ => return Err(format!("expected boolean, got {}", json_kind(raw))),
            },
            OptionValueType::Enum(values) => {
                let Value::String(s) = raw else {
                    return Err(format!("expected one of [{}]", values.join(", ")));
                };
                match values.iter().find(|v| v.eq_ignore_ascii_case(s.trim())) {
                    Some(canonical) => Value::String(canonical.clone()),
                    None => {
                        return Err(format!(
                            "expected one of [{}], got \"{}\"",
                            values.join(", "),
                            s
                        ));
                    }
                }
            }
        };

        Ok(Some(converted))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
