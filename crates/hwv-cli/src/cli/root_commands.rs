use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API (and the recalculation timer when configured).
    Serve(ServeArgs),
    /// Print the submission schema this installation validates against.
    Schema,
    /// Validate a survey document and print every problem found.
    Validate(ValidateArgs),
    /// Validate a survey document, then send it to the server.
    Submit(SubmitArgs),
    /// Fetch one stored submission from the server.
    Get(GetArgs),
    /// Show the aggregated statistics of one device.
    Device(DeviceArgs),
    /// Ask the server to rebuild all device statistics.
    Recalc,
    /// List the most recent submissions in the local store.
    List(ListArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen address, overriding `server.bind`.
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    /// Survey document (JSON).
    pub file: PathBuf,

    /// Use the local schema instead of fetching the server's.
    #[arg(long)]
    pub offline: bool,
}

#[derive(Clone, Debug, Args)]
pub struct SubmitArgs {
    /// Survey document (JSON).
    pub file: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct GetArgs {
    /// Submission identifier.
    pub id: String,
}

#[derive(Clone, Debug, Args)]
pub struct DeviceArgs {
    /// Device identifier as it appears in submissions.
    pub device_id: String,
}

#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    /// Max submissions to show.
    #[arg(short, long, default_value_t = 20)]
    pub limit: u32,
}
