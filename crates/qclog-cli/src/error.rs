use qclog::engine::config::ConfigError;
use qclog::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    QclogCore(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("No {extension} files found in '{path}'", path = path.display())]
    NoLogsFound { path: PathBuf, extension: String },

    #[error("Failed to relocate '{path}': {source}", path = path.display())]
    Relocation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} file(s) could not be relocated")]
    IncompleteRelocation { failed: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}
