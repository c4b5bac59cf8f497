use anyhow::Context;
use hwv_client::ClientSession;
use hwv_config::HwvConfig;
use hwv_core::validation::{ValidationError, ValidationReport};
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::ValidateArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct ValidateResponse<'a> {
    pub valid: bool,
    pub errors: &'a [ValidationError],
}

impl<'a> From<&'a ValidationReport> for ValidateResponse<'a> {
    fn from(report: &'a ValidationReport) -> Self {
        Self {
            valid: report.is_valid(),
            errors: report.errors(),
        }
    }
}

/// Handle `hwv validate`. Fails when the document is invalid.
pub async fn handle(
    args: &ValidateArgs,
    config: &HwvConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let report = if args.offline {
        bootstrap::local_schema(config).await?.validate(&text)
    } else {
        ClientSession::start(bootstrap::client(config)?)
            .await
            .context("failed to fetch the server schema (use --offline for the local one)")?
            .validate(&text)
    };

    output(&ValidateResponse::from(&report), flags.format)?;
    if !report.is_valid() {
        anyhow::bail!("{} is invalid ({} error(s))", args.file.display(), report.errors().len());
    }
    Ok(())
}
