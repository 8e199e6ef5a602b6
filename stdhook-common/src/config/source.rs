//! Source tracking for configuration values.

use std::fmt;
use std::path::PathBuf;

/// Where a configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in default.
    Default,
    /// `config.toml` at the given path.
    File(PathBuf),
    /// Environment variable with the given name.
    Env(String),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::File(path) => write!(f, "file:{}", path.display()),
            Self::Env(var) => write!(f, "env:{}", var),
        }
    }
}

/// A configuration value together with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> Sourced<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    pub fn default_value(value: T) -> Self {
        Self::new(value, ConfigSource::Default)
    }

    pub fn from_env(value: T, var: impl Into<String>) -> Self {
        Self::new(value, ConfigSource::Env(var.into()))
    }

    pub fn from_file(value: T, path: impl Into<PathBuf>) -> Self {
        Self::new(value, ConfigSource::File(path.into()))
    }

    pub fn is_default(&self) -> bool {
        self.source == ConfigSource::Default
    }
}

impl<T: fmt::Display> fmt::Display for Sourced<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.source)
    }
}
