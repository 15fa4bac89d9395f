use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "assethub.toml";

/// Client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the marketplace backend
    pub api_base_url: String,
    /// Image hosting upload endpoint
    pub upload_endpoint: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            upload_endpoint: "https://upload.imagekit.io/api/v1/files/upload".to_string(),
            request_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Layer embedded defaults, `assethub.toml` (or `config_path`) and
    /// `ASSETHUB_*` environment variables.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let defaults_json = serde_json::to_string(&Settings::default())
            .context("Failed to serialize default settings")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        match config_path {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    builder = builder.add_source(config::File::from(local));
                }
            }
        }

        builder = builder.add_source(config::Environment::with_prefix("ASSETHUB").try_parsing(true));

        builder
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Failed to parse settings")
    }
}
