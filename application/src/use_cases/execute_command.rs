//! Execute Command use case.
//!
//! The single normalization point between a caller's raw input and a
//! [`ResponseEnvelope`]. Every invocation runs the same four steps, strictly
//! in order:
//!
//! 1. **Bind** raw input against the command's option chain
//! 2. **Validate** required options, conversion failures and unknown names
//! 3. **Execute** the command body with the bound options
//! 4. **Normalize** the payload or error into an envelope
//!
//! Validation failures never reach the command body, and a panicking body is
//! reported as a 500 instead of taking the process down.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};

use cloudcmd_domain::{CommandError, RawArguments, ResponseEnvelope};
use futures::FutureExt;
use tracing::{debug, trace, warn};

use crate::options::global::{GlobalOptions, RETRY_MODE};
use crate::ports::command::{Command, ExecutionContext};

/// Lifecycle of one invocation, as reported in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationPhase {
    Received,
    Bound,
    Validated,
    Executing,
    Succeeded,
    Failed,
    Responded,
}

impl InvocationPhase {
    pub fn as_str(&self) -> &str {
        match self {
            InvocationPhase::Received => "received",
            InvocationPhase::Bound => "bound",
            InvocationPhase::Validated => "validated",
            InvocationPhase::Executing => "executing",
            InvocationPhase::Succeeded => "succeeded",
            InvocationPhase::Failed => "failed",
            InvocationPhase::Responded => "responded",
        }
    }
}

impl std::fmt::Display for InvocationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Use case for running one command invocation.
///
/// Holds no per-invocation state; one pipeline serves any number of
/// concurrent invocations.
#[derive(Debug, Default)]
pub struct ExecutionPipeline {
    next_invocation: AtomicU64,
}

impl ExecutionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind, validate, execute and normalize one invocation.
    ///
    /// Never fails: every outcome, including a panic in the command body, is
    /// expressed as an envelope.
    pub async fn execute(
        &self,
        command: &dyn Command,
        raw: &RawArguments,
        context: &ExecutionContext,
    ) -> ResponseEnvelope {
        let invocation_id = self.next_invocation.fetch_add(1, Ordering::Relaxed) + 1;
        let name = command.metadata().name.as_str();
        trace!(invocation_id, command = name, phase = %InvocationPhase::Received, args = raw.len());

        let binding = command.options().bind(raw);
        trace!(invocation_id, command = name, phase = %InvocationPhase::Bound, bound = binding.options.len());

        // a required option given an unconvertible value is invalid, not missing
        let mut issues: Vec<_> = command
            .options()
            .missing_required(&binding.options)
            .into_iter()
            .filter(|missing| !binding.issues.iter().any(|issue| issue.name == missing.name))
            .collect();
        issues.extend(binding.issues);
        if !issues.is_empty() {
            let error = CommandError::Input(issues);
            debug!(invocation_id, command = name, error = %error, "Validation failed");
            return self.respond(invocation_id, name, command, Err(error));
        }
        trace!(invocation_id, command = name, phase = %InvocationPhase::Validated);

        let options = binding.options;
        let mut context = context.clone().with_invocation_id(invocation_id);
        if command.options().descriptor(RETRY_MODE).is_some() {
            context = context.with_retry_policy(GlobalOptions::retry_policy(&options));
        }

        debug!(invocation_id, command = name, phase = %InvocationPhase::Executing);
        let outcome = AssertUnwindSafe(command.execute(&context, &options))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let reason = panic_message(panic.as_ref());
                warn!(invocation_id, command = name, reason = %reason, "Command panicked");
                Err(CommandError::other(format!("Command '{}' panicked: {}", name, reason)))
            });

        self.respond(invocation_id, name, command, outcome)
    }

    fn respond(
        &self,
        invocation_id: u64,
        name: &str,
        command: &dyn Command,
        outcome: Result<cloudcmd_domain::CommandOutput, CommandError>,
    ) -> ResponseEnvelope {
        let envelope = match outcome {
            Ok(output) => {
                debug!(invocation_id, command = name, phase = %InvocationPhase::Succeeded, has_results = output.is_some());
                ResponseEnvelope::success(output)
            }
            Err(error) => {
                let status = command.error_status(&error);
                if let Some(source) = error.unclassified_source() {
                    warn!(invocation_id, command = name, status = %status, error = %source, "Command failed");
                } else {
                    debug!(invocation_id, command = name, phase = %InvocationPhase::Failed, status = %status, error = %error);
                }
                ResponseEnvelope::failure(status, command.error_message(&error))
            }
        };

        trace!(invocation_id, command = name, phase = %InvocationPhase::Responded, status = %envelope.status());
        envelope
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
