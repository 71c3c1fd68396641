//! Process-wide quota default commands.

use clap::{Args, Subcommand};
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use diskquota_core::error::AppError;
use diskquota_entity::quota::QuotaDefaults;
use diskquota_service::{AdminContext, DefaultsUpdate};

/// Arguments for defaults commands
#[derive(Debug, Args)]
pub struct DefaultsArgs {
    /// Defaults subcommand
    #[command(subcommand)]
    pub command: DefaultsCommand,
}

/// Defaults subcommands
#[derive(Debug, Subcommand)]
pub enum DefaultsCommand {
    /// Show the current defaults
    Show,
    /// Update defaults; omitted values keep their current setting
    Set {
        /// Default account quota in MB (0 = unlimited)
        #[arg(long, allow_negative_numbers = true)]
        account_mb: Option<i64>,
        /// Default collection quota in MB (0 = unlimited)
        #[arg(long, allow_negative_numbers = true)]
        collection_mb: Option<i64>,
        /// Global quota in MB (informational)
        #[arg(long, allow_negative_numbers = true)]
        global_mb: Option<i64>,
        /// Warning threshold percentage (1-50)
        #[arg(long, allow_negative_numbers = true)]
        warning_threshold_percent: Option<i64>,
    },
}

/// Defaults row for table display
#[derive(Debug, Tabled)]
struct DefaultsRow {
    #[tabled(rename = "Account MB")]
    account_mb: u64,
    #[tabled(rename = "Collection MB")]
    collection_mb: u64,
    #[tabled(rename = "Global MB")]
    global_mb: u64,
    #[tabled(rename = "Warning %")]
    warning_threshold_percent: u32,
}

impl From<&QuotaDefaults> for DefaultsRow {
    fn from(d: &QuotaDefaults) -> Self {
        Self {
            account_mb: d.account_mb,
            collection_mb: d.collection_mb,
            global_mb: d.global_mb,
            warning_threshold_percent: d.warning_threshold_percent,
        }
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Execute defaults commands
pub async fn execute(
    args: &DefaultsArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let (backends, engine) = super::connect_engine(&config).await?;

    let result = match &args.command {
        DefaultsCommand::Show => Ok(engine.admin.get_defaults().await),
        DefaultsCommand::Set {
            account_mb,
            collection_mb,
            global_mb,
            warning_threshold_percent,
        } => {
            let current = engine.admin.get_defaults().await;
            let update = DefaultsUpdate {
                account_mb: account_mb.unwrap_or_else(|| saturating_i64(current.account_mb)),
                collection_mb: collection_mb.unwrap_or_else(|| saturating_i64(current.collection_mb)),
                global_mb: global_mb.unwrap_or_else(|| saturating_i64(current.global_mb)),
                warning_threshold_percent: warning_threshold_percent
                    .unwrap_or(i64::from(current.warning_threshold_percent)),
            };
            let ctx = AdminContext::authorized(super::CLI_ACTOR);
            engine.admin.update_defaults(&ctx, update).await
        }
    };
    backends.close().await;
    let defaults = result?;

    if matches!(args.command, DefaultsCommand::Set { .. }) {
        output::print_success("Defaults updated");
    }
    output::print_rows(&[DefaultsRow::from(&defaults)], &defaults, format);
    Ok(())
}
