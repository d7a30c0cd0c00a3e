//! Option domain module
//!
//! Every command input is declared by an [`OptionDescriptor`] (name, type,
//! required flag, default, help text). Descriptors are grouped by
//! [`OptionContributor`]s, and a command's [`OptionChain`] orders those
//! contributors from shared to specific:
//!
//! ```text
//! RawArguments ──▶ OptionChain::bind ──▶ Binding { BoundOptions, issues }
//!                       │
//!                       ├─ contributor 1 (global)       binds first
//!                       ├─ contributor 2 (subscription)
//!                       └─ contributor N (command)      binds last
//! ```
//!
//! Binding never fails: type errors and unknown names are collected as
//! [`OptionIssue`]s so the caller sees all of them in one round trip.

pub mod binding;
pub mod contributor;
pub mod entities;

pub use binding::{BoundOptions, IssueKind, OptionIssue, RawArguments, describe_issues};
pub use contributor::{
    Binding, OptionChain, OptionConflict, OptionContributor, OptionSet, bind_descriptor,
};
pub use entities::{OptionDescriptor, OptionValueType};
