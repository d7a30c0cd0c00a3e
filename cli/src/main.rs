//! CLI entrypoint for cloudcmd
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use cloudcmd_application::{CacheService, CommandRegistry, Dispatcher, ExecutionContext};
use cloudcmd_domain::{CacheProvider, ResponseEnvelope, StatusCode};
use cloudcmd_infrastructure::{
    ConfigLoader, EnvTokenCredentialProvider, FileCacheProvider, FileConfig, MemoryCacheProvider,
    ToolCatalog, register_builtin_commands,
};
use cloudcmd_presentation::{Cli, ConsoleFormatter, OutputFormatter};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        for line in ConfigLoader::config_sources() {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    for issue in config.validate() {
        warn!("Configuration: {}", issue);
    }

    // === Dependency Injection ===
    let cache = Arc::new(build_cache(&config));
    info!(providers = ?cache.provider_ids(), "Cache initialized");

    let catalog = ToolCatalog::new();
    let mut registry = CommandRegistry::new();
    register_builtin_commands(
        &mut registry,
        Arc::clone(&cache),
        config.cache.default_ttl(),
        catalog.clone(),
    )
    .context("Failed to register built-in commands")?;
    catalog.fill(&registry);
    debug!(commands = registry.len(), "Registry built");

    let formatter = ConsoleFormatter::new(cli.output);

    if cli.list {
        println!("{}", formatter.format_tree(&registry));
        return Ok(ExitCode::SUCCESS);
    }

    let raw = match cli.raw_arguments() {
        Ok(raw) => raw,
        Err(e) => {
            let envelope = ResponseEnvelope::failure(StatusCode::BAD_REQUEST, e.to_string());
            println!("{}", formatter.format_envelope(&envelope));
            return Ok(ExitCode::from(envelope.status().exit_code()));
        }
    };

    let cancellation = CancellationToken::new();
    let ctrl_c_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            ctrl_c_token.cancel();
        }
    });

    let credentials = Arc::new(EnvTokenCredentialProvider::new(
        config.credentials.token_env.clone(),
    ));
    let context = ExecutionContext::new(credentials).with_cancellation(cancellation);

    let dispatcher = Dispatcher::new(Arc::new(registry));
    let path = cli.command_path();
    info!(path = %path, "Invoking command");
    let envelope = dispatcher.invoke(&path, &raw, &context).await;

    println!("{}", formatter.format_envelope(&envelope));

    Ok(ExitCode::from(envelope.status().exit_code()))
}

/// Logs go to stderr so stdout only carries envelopes.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn build_cache(config: &FileConfig) -> CacheService {
    let mut providers: Vec<Arc<dyn CacheProvider>> = Vec::new();

    if config.cache.memory {
        providers.push(Arc::new(MemoryCacheProvider::new()));
    }
    if config.cache.file {
        let provider = match &config.cache.directory {
            Some(directory) => FileCacheProvider::new(directory.clone()),
            None => FileCacheProvider::in_default_dir(),
        };
        debug!(directory = %provider.directory().display(), "File cache tier enabled");
        providers.push(Arc::new(provider));
    }

    CacheService::new(providers)
}
