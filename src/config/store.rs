// ABOUTME: Deployment store selection.
// ABOUTME: A JSON file on disk (default) or an in-memory store.

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_STORE_PATH: &str = "gangway-deployments.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Records are lost when the agent stops.
    Memory,
    File {
        #[serde(default = "default_path")]
        path: PathBuf,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File {
            path: default_path(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}
