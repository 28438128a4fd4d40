// ABOUTME: Configuration types and parsing for gangway.yml.
// ABOUTME: Handles YAML parsing, discovery and env var interpolation.

mod adapter;
mod env_value;
mod init;
mod store;

pub use adapter::AdapterConfig;
pub use env_value::EnvValue;
pub use init::init_config;
pub use store::{DEFAULT_STORE_PATH, StoreConfig};

use crate::error::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "gangway.yml";
pub const CONFIG_FILENAME_ALT: &str = "gangway.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".gangway/config.yml";

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8001";

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Deadline for each API request, forwarded to every adapter and store call.
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,

    pub adapter: AdapterConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

impl AgentConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Adapter endpoint with env references resolved.
    pub fn adapter_endpoint(&self) -> Result<String> {
        self.adapter.endpoint.resolve()
    }
}
