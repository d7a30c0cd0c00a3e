//! Configuration file loading for cloudcmd
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CLOUDCMD_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./cloudcmd.toml` or `./.cloudcmd.toml`
//! 4. Global: `$XDG_CONFIG_HOME/cloudcmd/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{ConfigIssue, FileCacheConfig, FileConfig, FileCredentialsConfig};
pub use loader::ConfigLoader;
