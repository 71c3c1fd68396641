//! Configuration inspection commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use diskquota_core::error::AppError;
use diskquota_database::connection::mask_password;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration with secrets masked
    Show,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut config = super::load_config(config_path)?;
            config.database.url = mask_password(&config.database.url);
            if config.api.admin_enabled() {
                config.api.admin_token = "****".to_string();
            }

            match format {
                OutputFormat::Json => output::print_item(&config, format),
                OutputFormat::Table => {
                    println!("Configuration '{config_path}'");
                    output::print_kv(
                        "Server",
                        &format!("{}:{}", config.server.host, config.server.port),
                    );
                    output::print_kv("Backend", &format!("{:?}", config.database.backend));
                    output::print_kv("Database", &config.database.url);
                    output::print_kv(
                        "Account default",
                        &format!("{} MB", config.quota.default_account_mb),
                    );
                    output::print_kv(
                        "Collection default",
                        &format!("{} MB", config.quota.default_collection_mb),
                    );
                    output::print_kv(
                        "Global default",
                        &format!("{} MB", config.quota.default_global_mb),
                    );
                    output::print_kv(
                        "Warning threshold",
                        &format!("{}%", config.quota.warning_threshold_percent),
                    );
                    output::print_kv(
                        "Reservation TTL",
                        &format!("{}s", config.quota.reservation_ttl_seconds),
                    );
                    output::print_kv(
                        "Admin API",
                        if config.api.admin_enabled() { "enabled" } else { "disabled" },
                    );
                    output::print_kv("Log level", &config.logging.level);
                }
            }
        }
    }
    Ok(())
}
