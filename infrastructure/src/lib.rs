//! Infrastructure layer for cloudcmd
//!
//! This crate contains adapters that implement the ports defined in the
//! domain and application layers: cache providers, the JSON Schema command
//! converter, credentials, built-in commands and configuration file loading.

pub mod cache;
pub mod commands;
pub mod config;
pub mod credentials;

// Re-export commonly used types
pub use cache::{FileCacheProvider, MemoryCacheProvider, default_cache_dir};
pub use commands::{JsonSchemaCommandConverter, ToolCatalog, register_builtin_commands};
pub use config::{ConfigIssue, ConfigLoader, FileCacheConfig, FileConfig, FileCredentialsConfig};
pub use credentials::EnvTokenCredentialProvider;
