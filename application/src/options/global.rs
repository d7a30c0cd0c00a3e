//! Options every command accepts
//!
//! Descriptors are created once per process and shared by `Arc`, so every
//! command's chain points at the same `tenant`, `auth-method` and `retry-*`
//! instances.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use cloudcmd_domain::{
    BoundOptions, OptionContributor, OptionDescriptor, OptionValueType, RetryMode, RetryPolicy,
};

pub const TENANT: &str = "tenant";
pub const AUTH_METHOD: &str = "auth-method";
pub const RETRY_MAX_RETRIES: &str = "retry-max-retries";
pub const RETRY_DELAY: &str = "retry-delay";
pub const RETRY_MAX_DELAY: &str = "retry-max-delay";
pub const RETRY_MODE: &str = "retry-mode";
pub const RETRY_NETWORK_TIMEOUT: &str = "retry-network-timeout";

pub static TENANT_OPTION: LazyLock<Arc<OptionDescriptor>> = LazyLock::new(|| {
    Arc::new(OptionDescriptor::new(
        TENANT,
        "Tenant ID or name to authenticate against",
        false,
    ))
});

pub static AUTH_METHOD_OPTION: LazyLock<Arc<OptionDescriptor>> = LazyLock::new(|| {
    Arc::new(
        OptionDescriptor::new(AUTH_METHOD, "Authentication method", false)
            .with_enum_values(["credential", "key", "connectionString"])
            .with_default("credential"),
    )
});

static RETRY_OPTIONS: LazyLock<[Arc<OptionDescriptor>; 5]> = LazyLock::new(|| {
    let defaults = RetryPolicy::default();
    [
        Arc::new(
            OptionDescriptor::new(RETRY_MAX_RETRIES, "Maximum retry attempts", false)
                .with_type(OptionValueType::Integer)
                .with_default(defaults.max_retries),
        ),
        Arc::new(
            OptionDescriptor::new(RETRY_DELAY, "Initial delay between retries, in seconds", false)
                .with_type(OptionValueType::Number)
                .with_default(defaults.delay.as_secs()),
        ),
        Arc::new(
            OptionDescriptor::new(RETRY_MAX_DELAY, "Maximum delay between retries, in seconds", false)
                .with_type(OptionValueType::Number)
                .with_default(defaults.max_delay.as_secs()),
        ),
        Arc::new(
            OptionDescriptor::new(RETRY_MODE, "Retry backoff strategy", false)
                .with_enum_values(["fixed", "exponential"])
                .with_default(defaults.mode.as_str()),
        ),
        Arc::new(
            OptionDescriptor::new(
                RETRY_NETWORK_TIMEOUT,
                "Network operation timeout, in seconds",
                false,
            )
            .with_type(OptionValueType::Number)
            .with_default(defaults.network_timeout.as_secs()),
        ),
    ]
});

/// Contributor for the options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    descriptors: Vec<Arc<OptionDescriptor>>,
}

impl GlobalOptions {
    pub fn new() -> Self {
        let mut descriptors = vec![TENANT_OPTION.clone(), AUTH_METHOD_OPTION.clone()];
        descriptors.extend(RETRY_OPTIONS.iter().cloned());
        Self { descriptors }
    }

    /// Build the retry policy from bound `retry-*` options.
    ///
    /// Values outside the representable range fall back to the defaults.
    pub fn retry_policy(options: &BoundOptions) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        let seconds = |name: &str, fallback: Duration| {
            options
                .get_f64(name)
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .unwrap_or(fallback)
        };

        let delay = seconds(RETRY_DELAY, defaults.delay);
        RetryPolicy {
            max_retries: options
                .get_i64(RETRY_MAX_RETRIES)
                .map(|n| n.clamp(0, i64::from(u32::MAX)) as u32)
                .unwrap_or(defaults.max_retries),
            delay,
            max_delay: seconds(RETRY_MAX_DELAY, defaults.max_delay).max(delay),
            mode: options
                .get_str(RETRY_MODE)
                .and_then(|mode| mode.parse::<RetryMode>().ok())
                .unwrap_or(defaults.mode),
            network_timeout: seconds(RETRY_NETWORK_TIMEOUT, defaults.network_timeout),
        }
    }

    /// Tenant bound for this invocation, if any
    pub fn tenant(options: &BoundOptions) -> Option<&str> {
        options.get_str(TENANT)
    }
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionContributor for GlobalOptions {
    fn id(&self) -> &str {
        "global"
    }

    fn descriptors(&self) -> &[Arc<OptionDescriptor>] {
        &self.descriptors
    }
}
