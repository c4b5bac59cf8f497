//! Submission schema source configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SchemaConfig {
    /// Path to a JSON Schema file. Empty means the built-in survey schema.
    #[serde(default)]
    pub path: String,
}

impl SchemaConfig {
    /// Whether a schema file overrides the built-in schema.
    #[must_use]
    pub fn has_file(&self) -> bool {
        !self.path.trim().is_empty()
    }
}
