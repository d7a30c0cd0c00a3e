//! Credential provider backed by an environment variable

use async_trait::async_trait;
use cloudcmd_application::{AccessToken, CredentialError, CredentialProvider};

/// Hands out a bearer token read from an environment variable.
///
/// The variable is read on every request so a rotated token is picked up
/// without restarting. The token is the same for every tenant.
#[derive(Debug, Clone)]
pub struct EnvTokenCredentialProvider {
    variable: String,
}

impl EnvTokenCredentialProvider {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Whether the variable currently holds a token
    pub fn is_configured(&self) -> bool {
        std::env::var(&self.variable).is_ok_and(|v| !v.trim().is_empty())
    }
}

#[async_trait]
impl CredentialProvider for EnvTokenCredentialProvider {
    fn id(&self) -> &str {
        "env-token"
    }

    async fn access_token(&self, tenant: Option<&str>) -> Result<AccessToken, CredentialError> {
        match std::env::var(&self.variable) {
            Ok(token) if !token.trim().is_empty() => {
                tracing::trace!(variable = %self.variable, tenant, "Using token from environment");
                Ok(AccessToken {
                    token: token.trim().to_string(),
                    expires_on: None,
                })
            }
            Ok(_) => Err(CredentialError::Rejected(format!(
                "environment variable {} is empty",
                self.variable
            ))),
            Err(_) => Err(CredentialError::Unavailable(format!(
                "environment variable {} is not set",
                self.variable
            ))),
        }
    }
}
