//! Configuration split: secrets come from the environment, everything
//! declarative (base URLs, whitelists, template ids, object-type UUIDs,
//! channel labels) from a TOML file loaded once at startup.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

/// Secrets and env-specific values only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openzaak_api_key: String,
    pub openklant_api_key: String,
    pub objecten_api_key: String,
    pub besluiten_api_key: String,
    pub notify_api_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            openzaak_api_key: std::env::var("OPENZAAK_API_KEY")?,
            openklant_api_key: std::env::var("OPENKLANT_API_KEY")?,
            objecten_api_key: std::env::var("OBJECTEN_API_KEY")?,
            besluiten_api_key: std::env::var("BESLUITEN_API_KEY")?,
            notify_api_key: std::env::var("NOTIFY_API_KEY")?,
        };

        config.log_keys();
        Ok(config)
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.len().min(5);
            format!("{}… ({} chars)", &val[..n], val.len())
        }

        tracing::info!(
            openzaak = %preview(&self.openzaak_api_key),
            openklant = %preview(&self.openklant_api_key),
            objecten = %preview(&self.objecten_api_key),
            besluiten = %preview(&self.besluiten_api_key),
            notify = %preview(&self.notify_api_key),
            "Loaded API keys"
        );
    }
}

/// TOML-backed configuration loaded from disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub services: ServicesConfig,
    pub channels: ChannelsConfig,
    pub object_types: ObjectTypesConfig,
    pub whitelist: WhitelistConfig,
    pub templates: TemplatesConfig,
}

/// Base URLs of the upstream registers and the notification gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    pub openzaak: Url,
    pub openklant: Url,
    pub objecten: Url,
    pub besluiten: Url,
    pub notify: Url,
}

/// Free-text channel labels as maintained in the party register. The phone
/// label is matched by substring because the register renamed it between
/// versions.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelsConfig {
    pub email_label: String,
    pub phone_label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectTypesConfig {
    /// Object-type UUID that marks an object as a task.
    pub task: Uuid,
    /// Object-type UUID that marks an object as a message.
    pub message: Uuid,
    /// Information-object types whose decisions may be announced.
    pub decision_info_objects: Vec<Uuid>,
}

/// Allow-listed case-type identifications per scenario, plus the global
/// flag gating the message scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct WhitelistConfig {
    pub case_created: Vec<String>,
    pub case_status_updated: Vec<String>,
    pub case_closed: Vec<String>,
    pub decision_made: Vec<String>,
    pub task_assigned: Vec<String>,
    pub messages_allowed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    pub email: TemplateSet,
    pub sms: TemplateSet,
    pub letter: TemplateSet,
}

/// One template id per scenario for a single channel.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSet {
    pub case_created: Uuid,
    pub case_status_updated: Uuid,
    pub case_closed: Uuid,
    pub decision_made: Uuid,
    pub task_assigned: Uuid,
    pub message_received: Uuid,
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}
