use std::path::{Path, PathBuf};

use sphinxql::MySqlConnection;

use crate::config::{self, SphinxConfig};
use crate::connector;
use crate::error::Result;
use crate::sphinx::SphinxEngine;

/// Driver name applications select the engine by.
pub const ENGINE_NAME: &str = "sphinxsearch";

/// Builds the engine from explicit configuration and publishes the default
/// configuration file.
#[derive(Debug, Clone)]
pub struct SphinxEngineProvider {
    config: SphinxConfig,
}

impl SphinxEngineProvider {
    pub const fn new(config: SphinxConfig) -> Self {
        Self { config }
    }

    pub fn load() -> Result<Self> {
        Ok(Self::new(SphinxConfig::load()?))
    }

    pub const fn config(&self) -> &SphinxConfig {
        &self.config
    }

    /// Builds the engine over the default host. Must be called from inside a
    /// Tokio runtime.
    pub fn boot(&self) -> Result<SphinxEngine<MySqlConnection>> {
        self.config.validate()?;
        let connection = connector::connect_default(&self.config)?;
        tracing::info!(
            engine = ENGINE_NAME,
            endpoint = connection.endpoint(),
            "search engine ready"
        );
        Ok(SphinxEngine::new(connection))
    }

    /// Copies the default configuration to `dest`, or to the project config path.
    pub fn publish(dest: Option<&Path>, force: bool) -> Result<PathBuf> {
        let dest = dest.map_or_else(|| PathBuf::from(config::PROJECT_CONFIG_PATH), Path::to_path_buf);
        config::publish(&dest, force)
    }
}
