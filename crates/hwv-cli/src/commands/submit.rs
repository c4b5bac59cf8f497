use anyhow::Context;
use hwv_client::{ClientSession, SubmitOutcome};
use hwv_config::HwvConfig;
use serde::Serialize;
use serde_json::json;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::SubmitArgs;
use crate::commands::validate::ValidateResponse;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SubmitResponse {
    id: String,
}

/// Handle `hwv submit`.
pub async fn handle(args: &SubmitArgs, config: &HwvConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let session = ClientSession::start(bootstrap::client(config)?).await?;
    match session.submit(&text).await? {
        SubmitOutcome::Accepted(id) => output(&SubmitResponse { id }, flags.format),
        SubmitOutcome::Invalid(report) => {
            output(&ValidateResponse::from(&report), flags.format)?;
            anyhow::bail!("not submitted: document failed validation")
        }
        SubmitOutcome::Rejected(errors) => {
            output(&json!({ "valid": false, "errors": errors }), flags.format)?;
            anyhow::bail!("server rejected the submission")
        }
    }
}
