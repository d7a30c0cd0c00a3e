//! Subscription and resource-group scoped options

use std::sync::{Arc, LazyLock};

use cloudcmd_domain::{
    BoundOptions, OptionContributor, OptionDescriptor, OptionIssue, OptionSet, RawArguments,
    bind_descriptor,
};
use serde_json::Value;

pub const SUBSCRIPTION: &str = "subscription";
pub const RESOURCE_GROUP: &str = "resource-group";

pub static SUBSCRIPTION_OPTION: LazyLock<Arc<OptionDescriptor>> = LazyLock::new(|| {
    Arc::new(OptionDescriptor::new(
        SUBSCRIPTION,
        "Subscription ID or name that owns the resource",
        true,
    ))
});

pub static RESOURCE_GROUP_OPTION: LazyLock<Arc<OptionDescriptor>> = LazyLock::new(|| {
    Arc::new(OptionDescriptor::new(
        RESOURCE_GROUP,
        "Name of the resource group",
        true,
    ))
});

/// Contributor for the `subscription` option.
///
/// When the caller supplies no subscription, the configured fallback (if
/// any) is bound instead, so validation only fails when neither exists.
#[derive(Debug, Clone)]
pub struct SubscriptionOptions {
    descriptors: [Arc<OptionDescriptor>; 1],
    fallback: Option<String>,
}

impl SubscriptionOptions {
    pub fn new() -> Self {
        Self {
            descriptors: [SUBSCRIPTION_OPTION.clone()],
            fallback: None,
        }
    }

    /// Subscription bound when the caller supplies none
    pub fn with_fallback(mut self, subscription: Option<String>) -> Self {
        self.fallback = subscription.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn subscription(options: &BoundOptions) -> Option<&str> {
        options.get_str(SUBSCRIPTION)
    }
}

impl Default for SubscriptionOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionContributor for SubscriptionOptions {
    fn id(&self) -> &str {
        "subscription"
    }

    fn descriptors(&self) -> &[Arc<OptionDescriptor>] {
        &self.descriptors
    }

    fn bind(&self, raw: &RawArguments, options: &mut BoundOptions, issues: &mut Vec<OptionIssue>) {
        bind_descriptor(&self.descriptors[0], raw, options, issues);

        if !options.contains(SUBSCRIPTION)
            && let Some(fallback) = &self.fallback
        {
            tracing::trace!(subscription = %fallback, "Using fallback subscription");
            options.bind(SUBSCRIPTION, Value::String(fallback.clone()));
        }
    }
}

/// Options for commands scoped to one resource group
pub fn resource_group_options() -> OptionSet {
    OptionSet::new("resource-group").with_shared(RESOURCE_GROUP_OPTION.clone())
}
