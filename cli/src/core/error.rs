use crate::core::paths::clean_path;
use spark_lib::ConfigError;
use std::io;
use std::path::PathBuf;

/// Errors that abort a spark invocation.
#[derive(Debug, thiserror::Error)]
pub enum SparkError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid output directory: pass -o/--output or set \"output\" in the config")]
    MissingOutput,
    #[error("Unable to prepare output directory {}: {source}", clean_path(.path))]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Config file already exists at {}. Use -f to replace", clean_path(.0))]
    ConfigExists(PathBuf),
    #[error("Unable to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Unable to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
