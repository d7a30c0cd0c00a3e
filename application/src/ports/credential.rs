//! Credential provider port
//!
//! Credential acquisition is outside the dispatch core. Commands that call
//! upstream services ask the provider carried by the execution context for a
//! token; the core never inspects it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cloudcmd_domain::CommandError;
use thiserror::Error;

/// Errors from credential providers
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("No credential available: {0}")]
    Unavailable(String),

    #[error("Credential rejected: {0}")]
    Rejected(String),
}

impl From<CredentialError> for CommandError {
    fn from(error: CredentialError) -> Self {
        CommandError::AuthorizationDenied(error.to_string())
    }
}

/// Bearer token with optional expiry
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// Port for obtaining upstream credentials
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Identifier used in logs
    fn id(&self) -> &str;

    /// Token for the given tenant (or the provider's default tenant)
    async fn access_token(&self, tenant: Option<&str>) -> Result<AccessToken, CredentialError>;
}

/// Provider used when no credentials are configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

#[async_trait]
impl CredentialProvider for NoCredentials {
    fn id(&self) -> &str {
        "none"
    }

    async fn access_token(&self, _tenant: Option<&str>) -> Result<AccessToken, CredentialError> {
        Err(CredentialError::Unavailable(
            "no credential provider is configured".to_string(),
        ))
    }
}
