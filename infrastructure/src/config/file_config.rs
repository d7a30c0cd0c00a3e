//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//!
//! ```toml
//! [cache]
//! memory = true
//! file = true
//! directory = "/var/cache/cloudcmd"
//! default_ttl_secs = 3600
//!
//! [credentials]
//! token_env = "CLOUDCMD_ACCESS_TOKEN"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems found in an otherwise well-formed configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("both cache tiers are disabled; cached operations will always call upstream")]
    NoCacheTiers,

    #[error("cache.default_ttl_secs is 0; cached values expire immediately")]
    ZeroTtl,

    #[error("cache.directory is set but the file tier is disabled")]
    UnusedCacheDirectory,

    #[error("credentials.token_env cannot be empty")]
    EmptyTokenEnv,
}

/// Raw cache configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// Enable the in-memory tier
    pub memory: bool,
    /// Enable the on-disk tier
    pub file: bool,
    /// Directory of the on-disk tier (default: platform cache dir)
    pub directory: Option<PathBuf>,
    /// TTL used by built-in caching helpers
    pub default_ttl_secs: u64,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            memory: true,
            file: true,
            directory: None,
            default_ttl_secs: 3600,
        }
    }
}

impl FileCacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }
}

/// Raw credentials configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCredentialsConfig {
    /// Environment variable holding a bearer token
    pub token_env: String,
}

impl Default for FileCredentialsConfig {
    fn default() -> Self {
        Self {
            token_env: "CLOUDCMD_ACCESS_TOKEN".to_string(),
        }
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Cache tiers
    pub cache: FileCacheConfig,
    /// Credential source
    pub credentials: FileCredentialsConfig,
}

impl FileConfig {
    /// Check for settings that parse but are probably mistakes
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if !self.cache.memory && !self.cache.file {
            issues.push(ConfigIssue::NoCacheTiers);
        }
        if self.cache.default_ttl_secs == 0 {
            issues.push(ConfigIssue::ZeroTtl);
        }
        if self.cache.directory.is_some() && !self.cache.file {
            issues.push(ConfigIssue::UnusedCacheDirectory);
        }
        if self.credentials.token_env.trim().is_empty() {
            issues.push(ConfigIssue::EmptyTokenEnv);
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert!(config.cache.memory && config.cache.file);
        assert_eq!(config.cache.default_ttl(), Duration::from_secs(3600));
        assert_eq!(config.credentials.token_env, "CLOUDCMD_ACCESS_TOKEN");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let config = FileConfig {
            cache: FileCacheConfig {
                memory: false,
                file: false,
                directory: Some(PathBuf::from("/tmp/cache")),
                default_ttl_secs: 0,
            },
            credentials: FileCredentialsConfig {
                token_env: " ".to_string(),
            },
        };

        assert_eq!(
            config.validate(),
            vec![
                ConfigIssue::NoCacheTiers,
                ConfigIssue::ZeroTtl,
                ConfigIssue::UnusedCacheDirectory,
                ConfigIssue::EmptyTokenEnv,
            ]
        );
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: FileConfig = serde_json::from_str(r#"{"cache": {"file": false}}"#).unwrap();
        assert!(config.cache.memory);
        assert!(!config.cache.file);
        assert_eq!(config.cache.default_ttl_secs, 3600);
    }
}
