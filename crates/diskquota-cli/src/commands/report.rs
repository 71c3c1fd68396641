//! Usage report command.

use clap::Args;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use diskquota_core::error::AppError;
use diskquota_entity::quota::UsageReport;
use diskquota_entity::scope::Scope;

/// Arguments for the report command
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Scope kind (account or collection)
    pub kind: String,
    /// Scope id
    pub id: String,
}

/// Usage row for table display
#[derive(Debug, Tabled)]
pub(crate) struct ReportRow {
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Used MB")]
    used_mb: String,
    #[tabled(rename = "Limit MB")]
    limit_mb: String,
    #[tabled(rename = "Usage %")]
    usage_percent: String,
    #[tabled(rename = "Assets")]
    assets: u64,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&UsageReport> for ReportRow {
    fn from(report: &UsageReport) -> Self {
        Self {
            scope: report.scope.to_string(),
            used_mb: format!("{:.2}", report.used_mb),
            limit_mb: if report.limit_bytes == 0 {
                "unlimited".to_string()
            } else {
                format!("{:.2}", report.limit_mb)
            },
            usage_percent: report
                .usage_percent
                .map(|p| format!("{p:.2}"))
                .unwrap_or_else(|| "-".to_string()),
            assets: report.asset_count,
            state: format!("{:?}", report.state),
        }
    }
}

/// Execute the report command
pub async fn execute(
    args: &ReportArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let scope = Scope::parse(&args.kind, &args.id)?;
    let config = super::load_config(config_path)?;
    let (backends, engine) = super::connect_engine(&config).await?;

    let result = engine.reporter.report(scope).await;
    backends.close().await;
    let report = result?;

    output::print_rows(&[ReportRow::from(&report)], &report, format);
    if report.warn && format == OutputFormat::Table {
        output::print_warning("Remaining capacity is at or below the warning threshold");
    }
    Ok(())
}
