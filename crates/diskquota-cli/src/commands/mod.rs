//! CLI command definitions and dispatch.

pub mod check;
pub mod config;
pub mod defaults;
pub mod migrate;
pub mod quota;
pub mod report;
pub mod serve;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use diskquota_core::config::AppConfig;
use diskquota_core::error::AppError;
use diskquota_database::Backends;
use diskquota_service::QuotaEngine;

/// Actor recorded in admin logs for changes made through the CLI.
pub const CLI_ACTOR: &str = "cli";

/// DiskQuota: storage quota accounting and admission control
#[derive(Debug, Parser)]
#[command(name = "diskquota-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the DiskQuota server
    Serve(serve::ServeArgs),
    /// Apply database migrations
    Migrate,
    /// Dry-run an admission check for a pending upload
    Check(check::CheckArgs),
    /// Show the usage report for a scope
    Report(report::ReportArgs),
    /// Per-scope quota overrides
    Quota(quota::QuotaArgs),
    /// Process-wide quota defaults
    Defaults(defaults::DefaultsArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Migrate => migrate::execute(&self.config).await,
            Commands::Check(args) => check::execute(args, &self.config, self.format).await,
            Commands::Report(args) => report::execute(args, &self.config, self.format).await,
            Commands::Quota(args) => quota::execute(args, &self.config, self.format).await,
            Commands::Defaults(args) => defaults::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: connect the configured backends and assemble the engine.
///
/// The caller closes the returned backends when done.
pub async fn connect_engine(config: &AppConfig) -> Result<(Backends, QuotaEngine), AppError> {
    let backends = Backends::connect(&config.database, false).await?;
    let engine = QuotaEngine::new(
        Arc::clone(&backends.settings),
        Arc::clone(&backends.inventory),
        &config.quota,
    )
    .await;

    match engine {
        Ok(engine) => Ok((backends, engine)),
        Err(e) => {
            backends.close().await;
            Err(e)
        }
    }
}
