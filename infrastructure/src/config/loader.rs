//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

const PROJECT_CONFIG_FILES: [&str; 2] = ["cloudcmd.toml", ".cloudcmd.toml"];
const ENV_PREFIX: &str = "CLOUDCMD_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `CLOUDCMD_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./cloudcmd.toml` or `./.cloudcmd.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/cloudcmd/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Merged sources, before extraction
    pub fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Self::env_provider())
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn env_provider() -> Env {
        // CLOUDCMD_ACCESS_TOKEN is a credential, not a setting
        Env::prefixed(ENV_PREFIX)
            .split("__")
            .filter(|key| key.as_str().contains('.'))
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("cloudcmd").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for --show-config).
    ///
    /// The first line is the header; callers print the lines as-is.
    pub fn config_sources() -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push(format!("  [ENV  ] Environment: {}<SECTION>__<KEY>", ENV_PREFIX));

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./cloudcmd.toml or ./.cloudcmd.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let marker = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", marker, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.cache.memory);
        assert_eq!(config.cache.default_ttl_secs, 3600);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("cloudcmd"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[cache]\nfile = false\ndefault_ttl_secs = 60\n\n[credentials]\ntoken_env = \"MY_TOKEN\""
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let config: FileConfig = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file(&path))
            .extract()
            .unwrap();

        assert!(config.cache.memory);
        assert!(!config.cache.file);
        assert_eq!(config.cache.default_ttl_secs, 60);
        assert_eq!(config.credentials.token_env, "MY_TOKEN");
    }

    #[test]
    fn test_invalid_type_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[cache]\ndefault_ttl_secs = \"soon\"").unwrap();

        let path = file.path().to_path_buf();
        assert!(ConfigLoader::load(Some(&path)).is_err());
    }

    #[test]
    fn test_config_sources_lists_defaults() {
        let sources = ConfigLoader::config_sources();
        assert!(sources.last().unwrap().contains("Default"));
    }

    #[test]
    fn test_config_sources_has_one_header() {
        let sources = ConfigLoader::config_sources();
        let headers = sources
            .iter()
            .filter(|line| line.starts_with("Configuration sources"))
            .count();
        assert_eq!(headers, 1);
        assert!(sources[0].starts_with("Configuration sources"));
        assert!(sources[1..].iter().all(|line| line.starts_with("  [")));
    }
}
