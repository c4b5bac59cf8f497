use std::path::Path;

use anyhow::Context;
use hwv_client::SurveyClient;
use hwv_config::HwvConfig;
use hwv_db::service::{ServiceOptions, SurveyService};
use hwv_schema::{EmbeddedSchemaProvider, FileSchemaProvider, SchemaSession};

pub fn load_config() -> anyhow::Result<HwvConfig> {
    HwvConfig::load_with_dotenv().context("failed to load configuration")
}

/// Schema from `schema.path`, or the built-in survey schema when unset.
pub async fn local_schema(config: &HwvConfig) -> anyhow::Result<SchemaSession> {
    let session = if config.schema.has_file() {
        SchemaSession::initialize(&FileSchemaProvider::new(&config.schema.path))
            .await
            .with_context(|| format!("failed to load schema from {}", config.schema.path))?
    } else {
        SchemaSession::initialize(&EmbeddedSchemaProvider)
            .await
            .context("failed to build the built-in schema")?
    };
    Ok(session)
}

pub fn service_options(config: &HwvConfig) -> ServiceOptions {
    ServiceOptions {
        recalc_policy: config.recalc.policy,
        device_key_pointer: config.recalc.device_key_pointer.clone(),
    }
}

/// Open the local store and build the service over it.
pub async fn open_service(config: &HwvConfig) -> anyhow::Result<SurveyService> {
    if !config.database.is_in_memory() {
        if let Some(parent) = Path::new(&config.database.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
    }

    let schema = local_schema(config).await?;
    SurveyService::new_local(&config.database.path, schema, service_options(config))
        .await
        .with_context(|| format!("failed to open database at {}", config.database.path))
}

pub fn client(config: &HwvConfig) -> anyhow::Result<SurveyClient> {
    SurveyClient::from_config(&config.client).context("failed to build HTTP client")
}
