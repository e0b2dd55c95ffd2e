//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::Deserialize;

use crate::server::error::Error;
use crate::server::handler::Properties;

/// A route to register before the server starts accepting.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RouteConfig {
    /// The URI prefix, e.g. `/Status`.
    pub prefix: String,
    /// The handler kind name, e.g. `status`.
    pub kind: String,
    /// Static configuration passed to each handler instance.
    #[serde(default)]
    pub config: Properties,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The read buffer size.
    pub read_buffer_size: usize,
    /// The prefix to fall back to when no route matches.
    pub default_route: Option<String>,
    /// Routes registered when the server starts.
    pub routes: Vec<RouteConfig>,
}

impl ServerConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 17878)),
            read_buffer_size: 8192,
            default_route: None,
            routes: Vec::new(),
        }
    }
}
