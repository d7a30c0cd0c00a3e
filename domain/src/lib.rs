//! Domain layer for cloudcmd
//!
//! This crate contains the pure data of the command dispatch framework:
//! option descriptors and binding, command metadata, the response envelope
//! with its error taxonomy, and cache entries. It performs no I/O.
//!
//! # Core Concepts
//!
//! ## Options
//!
//! Commands declare inputs through ordered option contributors. Binding is
//! strictly base → derived, and conflicting declarations are rejected when a
//! command is registered.
//!
//! ## Envelope
//!
//! Every invocation ends in a [`ResponseEnvelope`] whose status is derived
//! from a [`CommandError`] when the command fails.

pub mod cache;
pub mod command;
pub mod core;
pub mod option;
pub mod response;

// Re-export commonly used types
pub use cache::{CacheEntry, CacheError, CacheKey, CacheProvider, Clock, ManualClock, SystemClock};
pub use command::{CommandMetadata, CommandOutput, CommandPath, listing_output};
pub use core::{
    error::{BoxError, CommandError, TROUBLESHOOTING_HINT},
    retry::{RetryMode, RetryPolicy},
};
pub use option::{
    Binding, BoundOptions, IssueKind, OptionChain, OptionConflict, OptionContributor,
    OptionDescriptor, OptionIssue, OptionSet, OptionValueType, RawArguments, bind_descriptor,
    describe_issues,
};
pub use response::{ResponseEnvelope, SUCCESS_MESSAGE, StatusCode};
