//! Server configuration

use sentiment_classifiers::{ModelConfig, Variant};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load `KEY=value` pairs from a dotenv file into the process environment.
///
/// Variables already set in the environment are left alone. Returns whether
/// the file existed.
pub fn load_env_file(path: impl AsRef<Path>) -> anyhow::Result<bool> {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => {
            info!("Loaded environment from {}", path.display());
            Ok(true)
        }
        Err(e) if e.not_found() => {
            debug!("No env file at {}", path.display());
            Ok(false)
        }
        Err(e) => Err(anyhow::anyhow!("Failed to load {}: {}", path.display(), e)),
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CSV with `review` and `sentiment` columns
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Allow cross-origin requests from any origin
    #[serde(default = "default_true")]
    pub cors_allow_any_origin: bool,

    /// Pipeline fitting parameters
    #[serde(default)]
    pub model: ModelConfig,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dataset: Option<PathBuf>,
    pub variant: Option<Variant>,
    pub row_limit: Option<usize>,
    pub listen: Option<String>,
    pub port: Option<u16>,
}

impl ServerConfig {
    /// Load configuration from file and apply overrides.
    ///
    /// A missing file means defaults. A variant override replaces the whole
    /// model section with that variant's preset; `row_limit` is applied after.
    pub fn load(config_path: impl AsRef<Path>, overrides: &Overrides) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();
        let mut config = if config_path.exists() {
            info!("Reading configuration from {}", config_path.display());
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        if let Some(dataset) = &overrides.dataset {
            config.dataset_path = dataset.clone();
        }
        if let Some(variant) = overrides.variant {
            config.model = ModelConfig::preset(variant);
        }
        if let Some(row_limit) = overrides.row_limit {
            config.model.row_limit = row_limit;
        }
        if let Some(listen) = &overrides.listen {
            config.listen = listen.clone();
        }
        if let Some(port) = overrides.port {
            config.port = port;
        }

        config.model.validate()?;
        Ok(config)
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            dataset_path: default_dataset_path(),
            cors_allow_any_origin: true,
            model: ModelConfig::default(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("./data/IMDB Dataset.csv")
}

fn default_true() -> bool {
    true
}
