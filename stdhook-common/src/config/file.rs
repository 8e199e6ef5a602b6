//! Optional `config.toml` layer.

use crate::errors::ErrorCode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigFileError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::ConfigReadError,
            Self::Parse { .. } => ErrorCode::ConfigParseError,
        }
    }
}

/// Contents of `~/.config/stdhook/config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub repo: Option<String>,
    pub release_api: Option<String>,
    pub default_branch: Option<String>,
    pub network_timeout_ms: Option<u64>,
    pub verify_timeout_secs: Option<u64>,
    pub offline: Option<bool>,
    pub source_dirs: Option<Vec<String>>,
    pub banner: Option<String>,
}

impl ConfigFile {
    /// Default location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("stdhook").join("config.toml"))
    }

    /// Load the file at `path`. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigFileError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigFileError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&content)
            .map(Some)
            .map_err(|source| ConfigFileError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
