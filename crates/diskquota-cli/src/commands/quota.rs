//! Per-scope quota override commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use super::report::ReportRow;
use crate::output::{self, OutputFormat};
use diskquota_core::error::AppError;
use diskquota_entity::quota::UsageReport;
use diskquota_entity::scope::Scope;
use diskquota_service::{AdminContext, EffectiveLimit, QuotaEngine};

/// Arguments for quota commands
#[derive(Debug, Args)]
pub struct QuotaArgs {
    /// Quota subcommand
    #[command(subcommand)]
    pub command: QuotaCommand,
}

/// Quota subcommands
#[derive(Debug, Subcommand)]
pub enum QuotaCommand {
    /// Set an explicit limit for a scope (0 = unlimited)
    Set {
        /// Scope kind (account or collection)
        kind: String,
        /// Scope id
        id: String,
        /// Limit in megabytes
        #[arg(long, allow_negative_numbers = true)]
        mb: i64,
    },
    /// Remove a scope's override, reverting to the default
    Remove {
        /// Scope kind (account or collection)
        kind: String,
        /// Scope id
        id: String,
    },
    /// Show the effective limit and usage for a scope
    Show {
        /// Scope kind (account or collection)
        kind: String,
        /// Scope id
        id: String,
    },
}

/// Effective limit row for table display
#[derive(Debug, Tabled)]
struct LimitRow {
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Limit MB")]
    limit_mb: String,
    #[tabled(rename = "Source")]
    source: String,
}

impl From<&EffectiveLimit> for LimitRow {
    fn from(limit: &EffectiveLimit) -> Self {
        Self {
            scope: limit.scope.to_string(),
            limit_mb: if limit.unlimited {
                "unlimited".to_string()
            } else {
                limit.limit_mb.to_string()
            },
            source: format!("{:?}", limit.source),
        }
    }
}

#[derive(Debug, Serialize)]
struct QuotaOutput {
    limit: EffectiveLimit,
    usage: UsageReport,
}

/// Execute quota commands
pub async fn execute(
    args: &QuotaArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let (backends, engine) = super::connect_engine(&config).await?;
    let result = run(&args.command, &engine, format).await;
    backends.close().await;
    result
}

async fn run(
    command: &QuotaCommand,
    engine: &QuotaEngine,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = AdminContext::authorized(super::CLI_ACTOR);

    match command {
        QuotaCommand::Set { kind, id, mb } => {
            let scope = Scope::parse(kind, id)?;
            let ov = engine.admin.set_override(&ctx, scope, *mb).await?;
            if ov.limit_mb == 0 {
                output::print_success(&format!("{scope} is now unlimited"));
            } else {
                output::print_success(&format!("{scope} limited to {} MB", ov.limit_mb));
            }
        }
        QuotaCommand::Remove { kind, id } => {
            let scope = Scope::parse(kind, id)?;
            if engine.admin.remove_override(&ctx, scope).await? {
                output::print_success(&format!("Override removed for {scope}"));
            } else {
                output::print_warning(&format!("{scope} had no override"));
            }
        }
        QuotaCommand::Show { kind, id } => {
            let scope = Scope::parse(kind, id)?;
            let limit = engine.admin.get_effective_limit(scope).await?;
            let usage = engine.admin.get_usage_report(scope).await?;

            match format {
                OutputFormat::Json => output::print_item(&QuotaOutput { limit, usage }, format),
                OutputFormat::Table => {
                    output::print_rows(&[LimitRow::from(&limit)], &limit, format);
                    output::print_rows(&[ReportRow::from(&usage)], &usage, format);
                }
            }
        }
    }

    Ok(())
}
