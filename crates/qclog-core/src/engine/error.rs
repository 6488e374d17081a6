use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::report::ReportError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Report could not be written: {source}")]
    Report {
        #[from]
        source: ReportError,
    },
}
