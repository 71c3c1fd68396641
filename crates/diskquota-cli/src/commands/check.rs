//! Dry-run admission check.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use crate::output::{self, OutputFormat};
use diskquota_core::error::AppError;
use diskquota_core::types::id::{AccountId, ItemId};
use diskquota_entity::admission::{AdmissionDecision, ScopeCheck};
use diskquota_entity::asset::{AssetOperation, PendingAsset};
use diskquota_entity::units::format_mb;

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Owning account id
    #[arg(long)]
    pub owner: Uuid,

    /// Item the asset is attached to
    #[arg(long)]
    pub item: Option<Uuid>,

    /// Candidate size in bytes
    #[arg(long)]
    pub size: u64,

    /// Treat the write as an update of an existing asset
    #[arg(long)]
    pub update: bool,
}

/// One evaluated scope
#[derive(Debug, Tabled)]
struct CheckRow {
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Used MB")]
    used_mb: String,
    #[tabled(rename = "Reserved MB")]
    reserved_mb: String,
    #[tabled(rename = "Limit MB")]
    limit_mb: String,
}

impl From<&ScopeCheck> for CheckRow {
    fn from(check: &ScopeCheck) -> Self {
        Self {
            scope: check.scope.to_string(),
            outcome: format!("{:?}", check.outcome),
            used_mb: check
                .used_bytes
                .map(format_mb)
                .unwrap_or_else(|| "unknown".to_string()),
            reserved_mb: format_mb(check.reserved_bytes),
            limit_mb: if check.limit_bytes == 0 {
                "unlimited".to_string()
            } else {
                format_mb(check.limit_bytes)
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct CheckOutput<'a> {
    admitted: bool,
    reason: Option<String>,
    decision: &'a AdmissionDecision,
}

/// Execute the check command
///
/// Nothing is reserved past the end of the command: any ticket the check
/// produced is aborted before returning.
pub async fn execute(
    args: &CheckArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let (backends, engine) = super::connect_engine(&config).await?;

    let mut pending = PendingAsset::create(
        AccountId::from_uuid(args.owner),
        args.item.map(ItemId::from_uuid),
        args.size,
    );
    if args.update {
        pending.operation = AssetOperation::Update;
    }

    let result = engine.controller.check(&pending).await;
    backends.close().await;
    let admission = result?;

    if let Some(ticket) = admission.ticket {
        let _ = ticket.abort();
    }
    let decision = admission.decision;

    let rows: Vec<CheckRow> = decision.checks.iter().map(CheckRow::from).collect();
    let out = CheckOutput {
        admitted: decision.admitted,
        reason: decision.reason(),
        decision: &decision,
    };
    output::print_rows(&rows, &out, format);

    if format == OutputFormat::Table {
        match (&decision.skipped, decision.reason()) {
            (Some(skip), _) => output::print_success(&format!("Admitted without checks ({skip:?})")),
            (None, Some(reason)) => output::print_error(&reason),
            (None, None) if decision.degraded => {
                output::print_warning("Admitted fail-open: usage or limit could not be read")
            }
            (None, None) => output::print_success(&format!(
                "Admitted: {} MB fits every checked quota",
                format_mb(decision.candidate_bytes)
            )),
        }
    }

    Ok(())
}
