//! Option contributors and the ordered option chain
//!
//! A command's inputs are assembled from an ordered list of
//! [`OptionContributor`]s instead of a class hierarchy:
//!
//! ```text
//! OptionChain
//!   ├─ GlobalOptions        tenant, auth-method, retry-*      (binds first)
//!   ├─ SubscriptionOptions  subscription
//!   └─ OptionSet("sql")     resource-group, server, database   (binds last)
//! ```
//!
//! Binding runs contributor by contributor in that order, so shared options
//! are always declared (and listed in help) before command-specific ones.
//! A name bound by an earlier contributor is never overwritten by a later one.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use super::binding::{BoundOptions, OptionIssue, RawArguments, normalize_option_name};
use super::entities::OptionDescriptor;

/// Two contributors in one chain declared the same option differently.
///
/// This is a programming error and is reported when the command is
/// registered, never per invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "option '{name}' is declared by '{first}' as {first_shape} and by '{second}' as {second_shape}"
)]
pub struct OptionConflict {
    pub name: String,
    pub first: String,
    pub first_shape: String,
    pub second: String,
    pub second_shape: String,
}

/// Source of option descriptors plus the step that binds them
pub trait OptionContributor: Send + Sync {
    /// Identifier used in diagnostics (e.g. "global", "subscription")
    fn id(&self) -> &str;

    /// Descriptors owned by this contributor, in declaration order
    fn descriptors(&self) -> &[Arc<OptionDescriptor>];

    /// Bind this contributor's options from the raw arguments.
    ///
    /// The default converts each supplied value, falls back to the declared
    /// default, and records conversion failures as issues instead of failing.
    fn bind(&self, raw: &RawArguments, options: &mut BoundOptions, issues: &mut Vec<OptionIssue>) {
        for descriptor in self.descriptors() {
            bind_descriptor(descriptor, raw, options, issues);
        }
    }
}

/// Bind one descriptor. Missing required values are left for validation.
pub fn bind_descriptor(
    descriptor: &OptionDescriptor,
    raw: &RawArguments,
    options: &mut BoundOptions,
    issues: &mut Vec<OptionIssue>,
) {
    if options.contains(&descriptor.name) {
        return;
    }

    match raw.get(&descriptor.name).map(|value| descriptor.convert(value)) {
        Some(Ok(Some(value))) => {
            options.bind(descriptor.name.clone(), value);
        }
        Some(Err(reason)) => issues.push(OptionIssue::invalid(&descriptor.name, reason)),
        Some(Ok(None)) | None => {
            if let Some(default) = &descriptor.default_value {
                options.bind(descriptor.name.clone(), default.clone());
            }
        }
    }
}

/// A plain, named list of descriptors.
///
/// Used for command-specific options and for shared groups whose binding
/// needs nothing beyond the default behavior.
#[derive(Debug, Clone)]
pub struct OptionSet {
    id: String,
    descriptors: Vec<Arc<OptionDescriptor>>,
}

impl OptionSet {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            descriptors: Vec::new(),
        }
    }

    pub fn with(mut self, descriptor: OptionDescriptor) -> Self {
        self.descriptors.push(Arc::new(descriptor));
        self
    }

    /// Add a descriptor instance shared with other sets
    pub fn with_shared(mut self, descriptor: Arc<OptionDescriptor>) -> Self {
        self.descriptors.push(descriptor);
        self
    }
}

impl OptionContributor for OptionSet {
    fn id(&self) -> &str {
        &self.id
    }

    fn descriptors(&self) -> &[Arc<OptionDescriptor>] {
        &self.descriptors
    }
}

/// Outcome of binding raw arguments against a chain
#[derive(Debug, Clone, Default)]
pub struct Binding {
    pub options: BoundOptions,
    pub issues: Vec<OptionIssue>,
}

/// Ordered list of contributors for one command
#[derive(Clone, Default)]
pub struct OptionChain {
    contributors: Vec<Arc<dyn OptionContributor>>,
}

impl OptionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contributor; it binds after every contributor already added.
    pub fn with<C: OptionContributor + 'static>(mut self, contributor: C) -> Self {
        self.contributors.push(Arc::new(contributor));
        self
    }

    /// Append a contributor (Arc version)
    pub fn with_arc(mut self, contributor: Arc<dyn OptionContributor>) -> Self {
        self.contributors.push(contributor);
        self
    }

    pub fn contributor_ids(&self) -> Vec<&str> {
        self.contributors.iter().map(|c| c.id()).collect()
    }

    /// Every visible descriptor, base contributors first.
    ///
    /// A name declared twice is listed once, at its first position.
    pub fn descriptors(&self) -> Vec<&OptionDescriptor> {
        let mut seen = HashSet::new();
        self.contributors
            .iter()
            .flat_map(|c| c.descriptors().iter())
            .filter(|d| seen.insert(d.name.as_str()))
            .map(|d| d.as_ref())
            .collect()
    }

    pub fn descriptor(&self, name: &str) -> Option<&OptionDescriptor> {
        self.contributors
            .iter()
            .flat_map(|c| c.descriptors().iter())
            .find(|d| d.name == name)
            .map(|d| d.as_ref())
    }

    /// Reject chains in which two declarations of one name disagree on type
    /// or required-ness.
    pub fn check_conflicts(&self) -> Result<(), OptionConflict> {
        let mut declared: Vec<(&str, &OptionDescriptor)> = Vec::new();

        for contributor in &self.contributors {
            for descriptor in contributor.descriptors() {
                if let Some((owner, existing)) = declared
                    .iter()
                    .find(|(_, existing)| existing.name == descriptor.name)
                {
                    if existing.conflicts_with(descriptor) {
                        return Err(OptionConflict {
                            name: descriptor.name.clone(),
                            first: owner.to_string(),
                            first_shape: shape(existing),
                            second: contributor.id().to_string(),
                            second_shape: shape(descriptor),
                        });
                    }
                    continue;
                }
                declared.push((contributor.id(), descriptor));
            }
        }

        Ok(())
    }

    /// Bind raw arguments, contributor by contributor.
    ///
    /// Keys may carry a leading `--`. Keys that no contributor declares are
    /// reported as [`IssueKind::Unknown`](super::binding::IssueKind::Unknown),
    /// sorted by name. Two keys naming the same option (`server` and
    /// `--server`) are reported as invalid.
    pub fn bind(&self, raw: &RawArguments) -> Binding {
        let mut normalized = RawArguments::with_capacity(raw.len());
        let mut duplicates = Vec::new();
        for (key, value) in raw {
            let name = normalize_option_name(key);
            if normalized.insert(name.to_string(), value.clone()).is_some() {
                duplicates.push(name.to_string());
            }
        }
        duplicates.sort();
        duplicates.dedup();

        let mut binding = Binding::default();
        for contributor in &self.contributors {
            contributor.bind(&normalized, &mut binding.options, &mut binding.issues);
        }

        let mut unknown: Vec<&String> = normalized
            .keys()
            .filter(|name| self.descriptor(name).is_none())
            .collect();
        unknown.sort();
        binding
            .issues
            .extend(unknown.into_iter().map(OptionIssue::unknown));
        binding.issues.extend(
            duplicates
                .into_iter()
                .map(|name| OptionIssue::invalid(name, "given more than once")),
        );

        binding
    }

    /// Required descriptors with no bound value, in chain order
    pub fn missing_required(&self, options: &BoundOptions) -> Vec<OptionIssue> {
        self.descriptors()
            .into_iter()
            .filter(|d| d.required && !options.contains(&d.name))
            .map(|d| OptionIssue::missing(&d.name))
            .collect()
    }
}

impl std::fmt::Debug for OptionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionChain")
            .field("contributors", &self.contributor_ids())
            .finish()
    }
}

fn shape(descriptor: &OptionDescriptor) -> String {
    format!(
        "{} {}",
        if descriptor.required { "required" } else { "optional" },
        descriptor.value_type
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::binding::IssueKind;
    use crate::option::entities::OptionValueType;
    use serde_json::json;

    fn raw(pairs: &[(&str, serde_json::Value)]) -> RawArguments {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn base() -> OptionSet {
        OptionSet::new("base")
            .with(OptionDescriptor::new("tenant", "Tenant", false))
            .with(
                OptionDescriptor::new("retry-max-retries", "Retries", false)
                    .with_type(OptionValueType::Integer)
                    .with_default(3),
            )
    }

    fn sql() -> OptionSet {
        OptionSet::new("sql")
            .with(OptionDescriptor::new("server", "Server", true))
            .with(OptionDescriptor::new("database", "Database", true))
    }

    #[test]
    fn test_descriptors_base_first() {
        let chain = OptionChain::new().with(base()).with(sql());
        let names: Vec<&str> = chain.descriptors().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["tenant", "retry-max-retries", "server", "database"]);
    }

    #[test]
    fn test_shared_descriptor_is_listed_once() {
        let shared = Arc::new(OptionDescriptor::new("subscription", "Subscription", true));
        let chain = OptionChain::new()
            .with(OptionSet::new("a").with_shared(shared.clone()))
            .with(OptionSet::new("b").with_shared(shared));

        assert_eq!(chain.descriptors().len(), 1);
        assert!(chain.check_conflicts().is_ok());
    }

    #[test]
    fn test_conflicting_declarations_are_rejected() {
        let chain = OptionChain::new()
            .with(OptionSet::new("a").with(OptionDescriptor::new("top", "Top", false)))
            .with(
                OptionSet::new("b").with(
                    OptionDescriptor::new("top", "Top", false).with_type(OptionValueType::Integer),
                ),
            );

        let conflict = chain.check_conflicts().unwrap_err();
        assert_eq!(conflict.name, "top");
        assert_eq!(conflict.first, "a");
        assert_eq!(conflict.second, "b");
        assert!(conflict.to_string().contains("optional integer"));
    }

    #[test]
    fn test_bind_applies_defaults_and_strips_dashes() {
        let chain = OptionChain::new().with(base()).with(sql());
        let binding = chain.bind(&raw(&[
            ("--server", json!("srv")),
            ("database", json!("db")),
        ]));

        assert!(binding.issues.is_empty());
        assert_eq!(binding.options.get_str("server"), Some("srv"));
        assert_eq!(binding.options.get_i64("retry-max-retries"), Some(3));
        assert!(!binding.options.contains("tenant"));
    }

    #[test]
    fn test_bind_records_invalid_and_unknown() {
        let chain = OptionChain::new().with(base()).with(sql());
        let binding = chain.bind(&raw(&[
            ("retry-max-retries", json!("many")),
            ("zeta", json!(1)),
            ("alpha", json!(2)),
        ]));

        assert_eq!(binding.issues.len(), 3);
        assert!(matches!(binding.issues[0].kind, IssueKind::Invalid(_)));
        assert_eq!(binding.issues[1], OptionIssue::unknown("alpha"));
        assert_eq!(binding.issues[2], OptionIssue::unknown("zeta"));
        // invalid values do not fall back to the default
        assert!(!binding.options.contains("retry-max-retries"));
    }

    #[test]
    fn test_bind_rejects_same_option_given_twice() {
        let chain = OptionChain::new().with(base()).with(sql());
        let binding = chain.bind(&raw(&[
            ("--server", json!("srv-a")),
            ("server", json!("srv-b")),
            ("database", json!("db")),
        ]));

        assert_eq!(
            binding.issues,
            vec![OptionIssue::invalid("server", "given more than once")]
        );
    }

    #[test]
    fn test_missing_required_lists_all() {
        let chain = OptionChain::new().with(base()).with(sql());
        let binding = chain.bind(&RawArguments::new());
        let missing = chain.missing_required(&binding.options);

        assert_eq!(
            missing,
            vec![OptionIssue::missing("server"), OptionIssue::missing("database")]
        );
    }

    #[test]
    fn test_debug_lists_contributor_ids() {
        let chain = OptionChain::new().with(base()).with(sql());
        assert_eq!(format!("{:?}", chain), r#"OptionChain { contributors: ["base", "sql"] }"#);
    }
}
