//! HTTP server configuration.

use serde::{Deserialize, Serialize};

fn default_bind() -> String {
    "127.0.0.1:5080".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address the HTTP boundary listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}
