use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ALLOWED_HOSTS: &[&str] =
    &["yearn.fi", "localhost:3000", "localhost", "app.yearn.fi"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Hosts permitted as the origin for font and asset requests.
    /// Empty means [`DEFAULT_ALLOWED_HOSTS`].
    pub allowed_hosts: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self { Self { port: 3000, allowed_hosts: Vec::new() } }
}

impl ServerConfig {
    pub fn allowed_hosts(&self) -> Vec<&str> {
        if self.allowed_hosts.is_empty() {
            DEFAULT_ALLOWED_HOSTS.to_vec()
        } else {
            self.allowed_hosts.iter().map(String::as_str).collect()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// yDaemon base URI. Requests are only made over `https://`.
    pub ydaemon_base_uri: Option<String>,
    pub katana_apr_service_api: Option<String>,
    /// Base URI for token icons.
    pub assets_base_uri: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            ydaemon_base_uri: None,
            katana_apr_service_api: None,
            assets_base_uri: String::new(),
            timeout_secs: 10,
            user_agent: "og-image-service/1.0".to_string(),
        }
    }
}

/// Split a comma-separated host list, dropping empty entries.
pub fn parse_host_list(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

impl Config {
    /// Load the config file if it exists, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config: Config = if path.exists() {
            let file = BufReader::new(
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
            );
            serde_yaml::from_reader(file)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Config::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = var("PORT") {
            self.server.port = port.parse().context("Invalid PORT")?;
        }
        if let Some(hosts) = var("ALLOWED_HOSTS") {
            self.server.allowed_hosts = parse_host_list(&hosts);
        }
        if let Some(uri) = var("YDAEMON_BASE_URI") {
            self.upstream.ydaemon_base_uri = Some(uri);
        }
        if let Some(url) = var("KATANA_APR_SERVICE_API") {
            self.upstream.katana_apr_service_api = Some(url);
        }
        if let Some(uri) = var("BASE_YEARN_ASSETS_URI") {
            self.upstream.assets_base_uri = uri;
        }
        Ok(())
    }
}
