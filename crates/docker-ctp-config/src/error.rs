use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error("Registry must be 'docker' or 'github' (got '{0}')")]
    InvalidRegistry(String),

    #[error("Invalid log level '{0}' (expected quiet, normal or verbose)")]
    InvalidLogLevel(String),

    #[error("Failed to read {}: {message}", path.display())]
    EnvFile { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
