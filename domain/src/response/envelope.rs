//! Uniform response envelope returned for every invocation

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message carried by successful envelopes
pub const SUCCESS_MESSAGE: &str = "Success";

/// HTTP-style status code carried by the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const FORBIDDEN: StatusCode = StatusCode(403);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const TOO_MANY_REQUESTS: StatusCode = StatusCode(429);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        *self == Self::OK
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// Process exit code for a CLI front-end: 0 on success, 2 for bad
    /// input, 1 for every other failure.
    pub fn exit_code(&self) -> u8 {
        match *self {
            Self::OK => 0,
            Self::BAD_REQUEST => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of one invocation: `{status, message, results}`.
///
/// Constructors keep the invariants: a 200 envelope always has a message of
/// [`SUCCESS_MESSAGE`] and may carry results; any other status carries a
/// non-empty message and never carries results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    status: StatusCode,
    message: String,
    #[serde(default)]
    results: Option<Value>,
}

impl ResponseEnvelope {
    /// Successful envelope. `Some(Value::Null)` is stored as no results.
    pub fn success(results: Option<Value>) -> Self {
        Self {
            status: StatusCode::OK,
            message: SUCCESS_MESSAGE.to_string(),
            results: results.filter(|v| !v.is_null()),
        }
    }

    /// Failed envelope.
    ///
    /// A non-error status is coerced to 500 and an empty message is replaced,
    /// so a failure can never be mistaken for success.
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        let status = if status.as_u16() < 400 {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            status
        };
        let message = message.into();
        let message = if message.trim().is_empty() {
            format!("Request failed with status {}", status)
        } else {
            message
        };

        Self {
            status,
            message,
            results: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn results(&self) -> Option<&Value> {
        self.results.as_ref()
    }

    pub fn into_results(self) -> Option<Value> {
        self.results
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
