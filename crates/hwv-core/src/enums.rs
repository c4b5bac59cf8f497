//! Policy and classification enums.
//!
//! All enums use `snake_case` serialization so they read the same in TOML
//! config, JSON responses, and SQL columns.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RecalcPolicy
// ---------------------------------------------------------------------------

/// What a recalculation trigger does when another pass is already running.
///
/// Two passes never run at the same time under either policy.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RecalcPolicy {
    /// Wait for the running pass, then run a fresh one that reflects this trigger.
    #[default]
    Queue,
    /// Return immediately; the running pass stands in for this trigger.
    Coalesce,
}

impl RecalcPolicy {
    /// Return the string representation used in config and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::Coalesce => "coalesce",
        }
    }
}

impl fmt::Display for RecalcPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecalcPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queue" => Ok(Self::Queue),
            "coalesce" => Ok(Self::Coalesce),
            other => Err(format!("unknown recalc policy '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

/// Why a document was judged invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The text is not well-formed JSON.
    Parse,
    /// The JSON does not conform to the schema.
    Schema,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Schema => "schema",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
