use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sphinxql::{ConnectParams, DEFAULT_PORT};

use crate::error::{Result, ScoutError};

/// The configuration file shipped with the crate, written out by [`publish`].
pub const DEFAULT_CONFIG: &str = include_str!("../config/scout.toml");

/// Where [`publish`] writes when no destination is given.
pub const PROJECT_CONFIG_PATH: &str = "config/scout.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphinxConfig {
    pub default: String,
    pub hosts: BTreeMap<String, HostConfig>,
    pub options: ConnectionOptions,
}

impl Default for SphinxConfig {
    fn default() -> Self {
        let mut hosts = BTreeMap::new();
        hosts.insert("local".to_string(), HostConfig::default());
        Self {
            default: "local".to_string(),
            hosts,
            options: ConnectionOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: None,
            password: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionOptions {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub charset: String,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            connect_timeout_secs: 5,
            charset: "utf8".to_string(),
        }
    }
}

impl HostConfig {
    pub fn connect_params(&self, options: &ConnectionOptions) -> ConnectParams {
        ConnectParams {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            charset: options.charset.clone(),
            max_connections: options.max_connections.max(1),
            connect_timeout: Duration::from_secs(options.connect_timeout_secs),
        }
    }
}

impl SphinxConfig {
    /// Project config if present, else the user config directory, else defaults.
    pub fn load() -> Result<Self> {
        let project = PathBuf::from(PROJECT_CONFIG_PATH);
        if project.exists() {
            return Self::from_file(&project);
        }

        if let Some(global) = Self::global_path().filter(|p| p.exists()) {
            return Self::from_file(&global);
        }

        Ok(Self::default())
    }

    pub fn global_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "scout-sphinx")
            .map(|d| d.config_dir().join("scout.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hosts.is_empty() {
            return Err(ScoutError::Config("no hosts configured".to_string()));
        }
        if !self.hosts.contains_key(&self.default) {
            return Err(ScoutError::Config(format!(
                "default host `{}` is not defined under [hosts]",
                self.default
            )));
        }
        Ok(())
    }

    pub fn host(&self, name: &str) -> Result<&HostConfig> {
        self.hosts
            .get(name)
            .ok_or_else(|| ScoutError::Config(format!("unknown host `{name}`")))
    }

    pub fn default_host(&self) -> Result<&HostConfig> {
        self.host(&self.default)
    }
}

/// Writes [`DEFAULT_CONFIG`] to `dest`, refusing to overwrite unless `force`.
pub fn publish(dest: &Path, force: bool) -> Result<PathBuf> {
    if dest.exists() && !force {
        return Err(ScoutError::Config(format!(
            "{} already exists, pass --force to overwrite",
            dest.display()
        )));
    }

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, DEFAULT_CONFIG)?;
    tracing::info!(path = %dest.display(), "published default configuration");

    Ok(dest.to_path_buf())
}
