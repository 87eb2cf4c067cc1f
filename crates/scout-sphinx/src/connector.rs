//! Builds driver handles from host configuration.
//!
//! Nothing here opens a socket: an unreachable daemon is reported by the first
//! statement sent through the handle. The driver pool spawns its maintenance
//! task on construction, so these functions must run inside a Tokio runtime;
//! outside one they fail with [`ScoutError::Config`].

use sphinxql::MySqlConnection;

use crate::config::{ConnectionOptions, HostConfig, SphinxConfig};
use crate::error::{Result, ScoutError};

pub fn connect(host: &HostConfig, options: &ConnectionOptions) -> Result<MySqlConnection> {
    if tokio::runtime::Handle::try_current().is_err() {
        return Err(ScoutError::Config(format!(
            "connecting to {}:{} requires a running Tokio runtime",
            host.host, host.port
        )));
    }

    let connection = MySqlConnection::connect_lazy(&host.connect_params(options));
    tracing::debug!(endpoint = connection.endpoint(), "configured sphinx connection");
    Ok(connection)
}

/// Connects to the host named `name`, or to the configured default host.
pub fn connect_named(config: &SphinxConfig, name: Option<&str>) -> Result<MySqlConnection> {
    let host = match name {
        Some(name) => config.host(name)?,
        None => config.default_host()?,
    };
    connect(host, &config.options)
}

pub fn connect_default(config: &SphinxConfig) -> Result<MySqlConnection> {
    connect_named(config, None)
}
