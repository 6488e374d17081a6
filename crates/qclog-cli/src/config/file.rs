use crate::error::{CliError, Result};
use qclog::core::patterns::Program;
use qclog::engine::config::IncompleteLogPolicy;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileOscillationConfig {
    pub enabled: Option<bool>,
    pub window: Option<usize>,
    pub tolerance: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FilePolicyConfig {
    #[serde(rename = "incomplete-log")]
    pub incomplete_log: Option<IncompleteLogPolicy>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileArtifactsConfig {
    #[serde(rename = "delete-chk")]
    pub delete_chk: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub program: Option<Program>,
    pub oscillation: Option<FileOscillationConfig>,
    pub policy: Option<FilePolicyConfig>,
    pub artifacts: Option<FileArtifactsConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
