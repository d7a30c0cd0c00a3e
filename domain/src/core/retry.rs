//! Retry policy handed to business operations
//!
//! The dispatch core never retries anything itself. It binds the retry
//! options once, builds a [`RetryPolicy`], and passes it down untouched.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backoff strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryMode {
    Fixed,
    #[default]
    Exponential,
}

impl RetryMode {
    pub fn as_str(&self) -> &str {
        match self {
            RetryMode::Fixed => "fixed",
            RetryMode::Exponential => "exponential",
        }
    }
}

impl std::str::FromStr for RetryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(RetryMode::Fixed),
            "exponential" => Ok(RetryMode::Exponential),
            other => Err(format!("unknown retry mode: {}", other)),
        }
    }
}

impl std::fmt::Display for RetryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque retry configuration for upstream calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
    pub max_delay: Duration,
    pub mode: RetryMode,
    pub network_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
            mode: RetryMode::Exponential,
            network_timeout: Duration::from_secs(100),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based), capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = match self.mode {
            RetryMode::Fixed => self.delay,
            RetryMode::Exponential => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                self.delay.saturating_mul(factor)
            }
        };
        delay.min(self.max_delay)
    }
}
