use anyhow::{anyhow, bail, Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    API_KEY_ENV, DEFAULT_GATEWAY_URL, DEFAULT_GEMINI_BASE_URL, DEFAULT_MODEL, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, ENV_PREFIX, UPSTREAM_TIMEOUT_SECS,
};
use crate::models::{default_entries, CatalogEntry, ModelCatalog};

const LOCAL_CONFIG_PATH: &str = ".chat-gateway/config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model used when a chat request does not name one
    #[serde(default = "default_model")]
    pub default_model: String,

    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream model provider settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Terminal client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Supported models, in listing order
    #[serde(default = "default_entries")]
    pub catalog: Vec<CatalogEntry>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            client: ClientConfig::default(),
            catalog: default_entries(),
        }
    }
}

impl Config {
    /// Build the read-only catalog and check that the default model is part of it
    pub fn build_catalog(&self) -> Result<ModelCatalog> {
        let catalog = ModelCatalog::new(self.catalog.clone()).map_err(|e| anyhow!(e))?;
        if !catalog.contains(&self.default_model) {
            bail!(
                "default model '{}' is not in the model catalog ({})",
                self.default_model,
                catalog.names().join(", ")
            );
        }
        Ok(catalog)
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

/// Upstream provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the Gemini REST API
    pub base_url: String,
    /// API key (normally supplied through GOOGLE_API_KEY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: UPSTREAM_TIMEOUT_SECS,
        }
    }
}

/// Terminal client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Where the gateway is listening
    pub gateway_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
        }
    }
}

/// Layer defaults, config files and environment variables
fn build_figment(files: &[PathBuf]) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    for file in files {
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }
    }

    // Provider credential under its conventional name
    figment = figment.merge(
        Env::raw()
            .only(&[API_KEY_ENV])
            .map(|_| "upstream.api_key".into()),
    );

    // Add environment variables (GATEWAY_ prefix, `__` for nesting)
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load configuration from multiple sources.
///
/// An explicit path replaces the local `.chat-gateway/config.toml` and must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut files = Vec::new();

    if let Some(dir) = config_dir() {
        files.push(dir.join("config.toml"));
    }

    match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("Configuration file not found: {}", path.display());
            }
            files.push(path.to_path_buf());
        }
        None => files.push(PathBuf::from(LOCAL_CONFIG_PATH)),
    }

    let config: Config = build_figment(&files)
        .extract()
        .context("Failed to load configuration")?;

    config.build_catalog().context("Invalid model configuration")?;
    Ok(config)
}

/// Platform configuration directory, if one can be determined
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "chat-gateway").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Save configuration to file
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist, returning its path
pub fn init_config(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_dir()
            .context("Could not determine configuration directory")?
            .join("config.toml"),
    };

    if !path.exists() {
        save_config(&Config::default(), &path)?;
    }

    Ok(path)
}
