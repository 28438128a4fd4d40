// ABOUTME: Application-wide error types for agent bootstrap.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::adapter::AdapterError;
use crate::repo::RepoError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("adapter setup failed: {0}")]
    Adapter(#[from] AdapterError),

    #[error("deployment store unavailable: {0}")]
    Store(#[from] RepoError),
}

pub type Result<T> = std::result::Result<T, Error>;
