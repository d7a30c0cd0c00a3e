//! Command error taxonomy
//!
//! Every failure an invocation can produce is a [`CommandError`]. The
//! execution pipeline maps it to an envelope status:
//!
//! | Variant | Status | Message |
//! |---------|--------|---------|
//! | `Input` | 400 | every offending option name |
//! | `UnknownCommand` | 400 | why the path did not resolve |
//! | `AuthorizationDenied` | 403 | upstream detail |
//! | `NotFound` | 404 | identifying names of the resource |
//! | `UpstreamTransient` | 429 | upstream detail, no retry |
//! | `Unclassified` | 500 | error text + troubleshooting hint |

use std::error::Error as StdError;
use std::time::Duration;

use thiserror::Error;

use crate::option::binding::{OptionIssue, describe_issues};
use crate::response::envelope::StatusCode;

/// Appended to the message of every unclassified failure
pub const TROUBLESHOOTING_HINT: &str = "To troubleshoot, verify the supplied options and your access to the target resource, then rerun with -vv for diagnostic logs.";

/// Boxed error source carried by [`CommandError::Unclassified`]
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Classified failure of a command invocation
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{}", describe_issues(.0))]
    Input(Vec<OptionIssue>),

    /// Path did not resolve to a command; carries the resolution message
    #[error("{0}")]
    UnknownCommand(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authorization failed: {0}")]
    AuthorizationDenied(String),

    #[error("Upstream service is throttling requests: {message}")]
    UpstreamTransient {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("{0}")]
    Unclassified(BoxError),
}

impl CommandError {
    /// Wrap any error as an unclassified failure
    pub fn other(error: impl Into<BoxError>) -> Self {
        CommandError::Unclassified(error.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        CommandError::NotFound(resource.into())
    }

    pub fn authorization_denied(detail: impl Into<String>) -> Self {
        CommandError::AuthorizationDenied(detail.into())
    }

    pub fn throttled(message: impl Into<String>, retry_after: Option<Duration>) -> Self {
        CommandError::UpstreamTransient {
            message: message.into(),
            retry_after,
        }
    }

    /// Default status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            CommandError::Input(_) | CommandError::UnknownCommand(_) => StatusCode::BAD_REQUEST,
            CommandError::NotFound(_) => StatusCode::NOT_FOUND,
            CommandError::AuthorizationDenied(_) => StatusCode::FORBIDDEN,
            CommandError::UpstreamTransient { .. } => StatusCode::TOO_MANY_REQUESTS,
            CommandError::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Default caller-facing message for this error
    pub fn user_message(&self) -> String {
        match self {
            CommandError::Unclassified(_) => format!("{}. {}", self, TROUBLESHOOTING_HINT),
            CommandError::UpstreamTransient {
                retry_after: Some(after),
                ..
            } => format!("{} (retry after {}s)", self, after.as_secs()),
            _ => self.to_string(),
        }
    }

    /// Underlying source of an unclassified error, for downcasting in
    /// command-specific mappings.
    pub fn unclassified_source(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            CommandError::Unclassified(source) => Some(source.as_ref()),
            _ => None,
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, CommandError::Input(_) | CommandError::UnknownCommand(_))
    }
}
