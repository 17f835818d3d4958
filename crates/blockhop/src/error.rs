use std::path::PathBuf;

use blockhop_engine::{AssetError, RenderError};
use thiserror::Error;

/// Failure to save, load or resolve a level. Every variant names the file.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("read level {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write level {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decode level {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("encode level: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
    #[error("load {path}: {source}")]
    Resource {
        path: String,
        #[source]
        source: AssetError,
    },
}

/// A typed editor command that could not be understood.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("volume must be a number from 0 to 1, got `{0}`")]
    Volume(String),
}

/// Fatal errors: the program cannot start or continue.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("renderer setup: {0}")]
    Shader(#[from] RenderError),
    #[error("config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigSource,
    },
}

/// Why a config file could not be used.
#[derive(Debug, Error)]
pub enum ConfigSource {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
