use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileTemperatures {
    pub reference: Option<f64>,
    pub gas: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePhysics {
    pub c2: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FilePartitionSource {
    Table,
    Levels,
}

impl std::str::FromStr for FilePartitionSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "table" => Ok(Self::Table),
            "levels" => Ok(Self::Levels),
            other => Err(format!(
                "unknown partition function source '{}', expected 'table' or 'levels'",
                other
            )),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSummation {
    pub chunk_size: Option<usize>,
    pub rtol: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePartitionFunction {
    pub source: Option<FilePartitionSource>,
    pub path: Option<PathBuf>,
    pub summation: Option<FileSummation>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileColumns {
    pub molecule: Option<String>,
    pub isotopologue: Option<String>,
    pub intensity: Option<String>,
    pub lower_state_energy: Option<String>,
    pub wavenumber: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub temperatures: Option<FileTemperatures>,
    pub physics: Option<FilePhysics>,
    pub partition_function: Option<FilePartitionFunction>,
    pub columns: Option<FileColumns>,
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
