//! CLI command definitions

use clap::{Parser, ValueEnum};
use cloudcmd_domain::{CommandPath, RawArguments};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Output format for response envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact single-line JSON
    Json,
    /// Indented JSON
    Pretty,
    /// Human-readable text
    Text,
}

/// Errors in the raw command-line input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("--input-json is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("--input-json must be a JSON object of option names to values")]
    NotAnObject,

    #[error("invalid --arg '{0}': option name cannot be empty")]
    EmptyName(String),
}

/// CLI arguments for cloudcmd
#[derive(Parser, Debug)]
#[command(name = "cloudcmd")]
#[command(author, version, about = "Uniform command dispatch for cloud resource operations")]
#[command(long_about = r#"
cloudcmd resolves a command path, validates its options and prints a uniform
response envelope: {"status", "message", "results"}.

Exit codes: 0 on success, 2 for invalid input, 1 for every other failure.

Configuration files are loaded from (in priority order):
1. CLOUDCMD_<SECTION>__<KEY>        Environment variables
2. --config <path>                  Explicit config file
3. ./cloudcmd.toml                  Project-level config
4. ~/.config/cloudcmd/config.toml   Global config

Example:
  cloudcmd tools list
  cloudcmd cache set -a key=subscriptions -a value='["sub-1"]' -a ttl-seconds=600
  cloudcmd cache.get --input-json '{"key": "subscriptions"}' -o text
"#)]
pub struct Cli {
    /// Command path, dotted or space-separated (e.g. `sql.database.list`)
    #[arg(value_name = "PATH", required_unless_present_any = ["list", "show_config"])]
    pub path: Vec<String>,

    /// Option value as KEY=VALUE; a bare KEY sets a flag to true (repeatable)
    #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE")]
    pub args: Vec<String>,

    /// Options as a JSON object; --arg values take precedence
    #[arg(long, value_name = "JSON")]
    pub input_json: Option<String>,

    /// Print the command tree and exit
    #[arg(long)]
    pub list: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    pub fn command_path(&self) -> CommandPath {
        CommandPath::from_segments(&self.path)
    }

    /// Collect `--input-json` and `--arg` values into one map.
    ///
    /// `--arg` values are passed as strings; the option chain converts them
    /// to the declared type.
    pub fn raw_arguments(&self) -> Result<RawArguments, ArgumentError> {
        let mut raw = RawArguments::new();

        if let Some(json) = &self.input_json {
            match serde_json::from_str::<Value>(json) {
                Ok(Value::Object(map)) => raw.extend(map),
                Ok(_) => return Err(ArgumentError::NotAnObject),
                Err(e) => return Err(ArgumentError::InvalidJson(e.to_string())),
            }
        }

        for arg in &self.args {
            let (name, value) = match arg.split_once('=') {
                Some((name, value)) => (name.trim(), Value::String(value.to_string())),
                None => (arg.trim(), Value::Bool(true)),
            };
            if name.trim_start_matches("--").is_empty() {
                return Err(ArgumentError::EmptyName(arg.clone()));
            }
            raw.insert(name.to_string(), value);
        }

        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cloudcmd").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_path_forms() {
        assert_eq!(
            parse(&["sql", "database", "list"]).command_path().to_string(),
            "sql.database.list"
        );
        assert_eq!(
            parse(&["sql.database.list"]).command_path(),
            parse(&["sql/database/list"]).command_path()
        );
    }

    #[test]
    fn test_path_required_unless_listing() {
        assert!(Cli::try_parse_from(["cloudcmd"]).is_err());
        assert!(parse(&["--list"]).path.is_empty());
        assert!(parse(&["--show-config"]).show_config);
    }

    #[test]
    fn test_raw_arguments_merge() {
        let cli = parse(&[
            "cache",
            "set",
            "--input-json",
            r#"{"key": "from-json", "ttl-seconds": 5}"#,
            "-a",
            "key=from-arg",
            "--arg",
            "include-metrics",
            "-a",
            "value=a=b",
        ]);

        let raw = cli.raw_arguments().unwrap();
        assert_eq!(raw["key"], "from-arg");
        assert_eq!(raw["ttl-seconds"], 5);
        assert_eq!(raw["include-metrics"], true);
        assert_eq!(raw["value"], "a=b");
    }

    #[test]
    fn test_raw_arguments_errors() {
        let cli = parse(&["x", "--input-json", "[1]"]);
        assert_eq!(cli.raw_arguments(), Err(ArgumentError::NotAnObject));

        let cli = parse(&["x", "--input-json", "{"]);
        assert!(matches!(cli.raw_arguments(), Err(ArgumentError::InvalidJson(_))));

        let cli = parse(&["x", "-a", "=1"]);
        assert!(matches!(cli.raw_arguments(), Err(ArgumentError::EmptyName(_))));
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(parse(&["x"]).output, OutputFormat::Pretty);
        assert_eq!(parse(&["x", "-o", "text"]).output, OutputFormat::Text);
    }
}
