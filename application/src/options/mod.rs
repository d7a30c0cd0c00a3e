//! Shared option contributors
//!
//! Cross-cutting options declared once and composed into each command's
//! [`OptionChain`](cloudcmd_domain::OptionChain), base contributors first.

pub mod global;
pub mod subscription;

pub use global::GlobalOptions;
pub use subscription::{SubscriptionOptions, resource_group_options};
