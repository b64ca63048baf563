use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileToolConfig {
    pub executable: Option<String>,
    pub extra_args: Option<Vec<String>>,
}

/// Contents of a TOML configuration file. Every key is optional.
///
/// ```toml
/// tool = "dssp"
/// selection = "protein and chain A"
/// timeout = 300
///
/// [dssp]
/// executable = "/opt/dssp/bin/mkdssp"
/// extra-args = ["--verbose"]
/// ```
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub tool: Option<String>,
    pub selection: Option<String>,
    /// Seconds; 0 waits indefinitely.
    pub timeout: Option<u64>,
    pub stride: Option<FileToolConfig>,
    pub dssp: Option<FileToolConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::file_parsing(path, e))
    }
}
