//! Configuration system for stdhook.
//!
//! Values are layered: environment (`STDHOOK_*`) over `config.toml` over
//! built-in defaults. Each resolved value remembers its source so `status`
//! can explain where a setting came from. Bad values are reported as
//! warnings and never stop an install.

pub mod env;
pub mod file;
pub mod source;

pub use env::{EnvError, EnvParser};
pub use file::{ConfigFile, ConfigFileError};
pub use source::{ConfigSource, Sourced};

use crate::errors::{ErrorCode, ErrorEntry};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_REPO: &str = "stdhook/coding-standards";
pub const DEFAULT_RELEASE_API: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_NETWORK_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BANNER: &str = "Coding Standards";

/// A configuration problem that was reported and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub code: ErrorCode,
    pub message: String,
}

impl ConfigWarning {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn entry(&self) -> ErrorEntry {
        self.code.entry()
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code_string(), self.message)
    }
}

/// Fully resolved installer configuration.
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    /// `owner/name` of the repository releases are published from.
    pub repo: Sourced<String>,
    /// Base URL of the release metadata API.
    pub release_api: Sourced<String>,
    /// Branch `edge` resolves to for the commit lookup.
    pub default_branch: Sourced<String>,
    pub network_timeout_ms: Sourced<u64>,
    pub verify_timeout_secs: Sourced<u64>,
    /// Skip every network request.
    pub offline: Sourced<bool>,
    /// Well-known directories searched for the asset bundle, in order,
    /// after the current working directory.
    pub source_dirs: Sourced<Vec<PathBuf>>,
    /// Text the verifier expects in the hook's response.
    pub banner: Sourced<String>,
    /// Problems found while resolving; reported, never fatal.
    pub warnings: Vec<ConfigWarning>,
}

impl InstallerConfig {
    /// Defaults only; used by tests and as the base layer.
    pub fn defaults(home: &Path) -> Self {
        Self {
            repo: Sourced::default_value(DEFAULT_REPO.to_string()),
            release_api: Sourced::default_value(DEFAULT_RELEASE_API.to_string()),
            default_branch: Sourced::default_value(DEFAULT_BRANCH.to_string()),
            network_timeout_ms: Sourced::default_value(DEFAULT_NETWORK_TIMEOUT_MS),
            verify_timeout_secs: Sourced::default_value(DEFAULT_VERIFY_TIMEOUT_SECS),
            offline: Sourced::default_value(false),
            source_dirs: Sourced::default_value(default_source_dirs(home)),
            banner: Sourced::default_value(DEFAULT_BANNER.to_string()),
            warnings: Vec::new(),
        }
    }

    /// Load from the process environment and the default config file.
    pub fn load(home: &Path) -> Self {
        let mut warnings = Vec::new();
        let file = ConfigFile::default_path().and_then(|path| match ConfigFile::load(&path) {
            Ok(Some(file)) => Some((file, path)),
            Ok(None) => None,
            Err(e) => {
                warnings.push(ConfigWarning::new(e.code(), e.to_string()));
                None
            }
        });

        let mut env = EnvParser::new();
        let file = file.as_ref().map(|(f, p)| (f, p.as_path()));
        let mut config = Self::resolve(home, file, &mut env);
        warnings.append(&mut config.warnings);
        config.warnings = warnings;
        config
    }

    /// Layer `env` over `file` over defaults.
    pub fn resolve(home: &Path, file: Option<(&ConfigFile, &Path)>, env: &mut EnvParser) -> Self {
        let mut config = Self::defaults(home);

        if let Some((file, path)) = file {
            config.apply_file(file, path, home);
        }

        if let Some(v) = env.get_string("REPO") {
            config.repo = v;
        }
        if let Some(v) = env.get_string("RELEASE_API") {
            config.release_api = v;
        }
        if let Some(v) = env.get_string("DEFAULT_BRANCH") {
            config.default_branch = v;
        }
        if let Some(v) = env.get_u64_range("NETWORK_TIMEOUT_MS", 100, 60_000) {
            config.network_timeout_ms = v;
        }
        if let Some(v) = env.get_u64_range("VERIFY_TIMEOUT_SECS", 1, 300) {
            config.verify_timeout_secs = v;
        }
        if let Some(v) = env.get_bool("OFFLINE") {
            config.offline = v;
        }
        if let Some(v) = env.get_path_list("SOURCE_DIRS") {
            config.source_dirs = Sourced::new(
                v.value.iter().map(|p| expand_path(p, home)).collect(),
                v.source,
            );
        }
        if let Some(v) = env.get_string("BANNER") {
            config.banner = v;
        }

        config.warnings.extend(
            env.take_errors()
                .into_iter()
                .map(|e| ConfigWarning::new(e.code(), e.to_string())),
        );
        config
    }

    fn apply_file(&mut self, file: &ConfigFile, path: &Path, home: &Path) {
        if let Some(repo) = &file.repo {
            self.repo = Sourced::from_file(repo.clone(), path);
        }
        if let Some(api) = &file.release_api {
            self.release_api = Sourced::from_file(api.clone(), path);
        }
        if let Some(branch) = &file.default_branch {
            self.default_branch = Sourced::from_file(branch.clone(), path);
        }
        if let Some(ms) = file.network_timeout_ms {
            if (100..=60_000).contains(&ms) {
                self.network_timeout_ms = Sourced::from_file(ms, path);
            } else {
                self.warnings.push(ConfigWarning::new(
                    ErrorCode::ConfigParseError,
                    format!(
                        "network_timeout_ms = {} in {} is out of range (100..=60000)",
                        ms,
                        path.display()
                    ),
                ));
            }
        }
        if let Some(secs) = file.verify_timeout_secs {
            if (1..=300).contains(&secs) {
                self.verify_timeout_secs = Sourced::from_file(secs, path);
            } else {
                self.warnings.push(ConfigWarning::new(
                    ErrorCode::ConfigParseError,
                    format!(
                        "verify_timeout_secs = {} in {} is out of range (1..=300)",
                        secs,
                        path.display()
                    ),
                ));
            }
        }
        if let Some(offline) = file.offline {
            self.offline = Sourced::from_file(offline, path);
        }
        if let Some(dirs) = &file.source_dirs {
            let expanded = dirs
                .iter()
                .map(|d| expand_path(Path::new(d), home))
                .collect();
            self.source_dirs = Sourced::from_file(expanded, path);
        }
        if let Some(banner) = &file.banner {
            self.banner = Sourced::from_file(banner.clone(), path);
        }
    }

    pub fn network_timeout(&self) -> Duration {
        Duration::from_millis(self.network_timeout_ms.value)
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs.value)
    }
}

/// Built-in search list for the asset bundle.
pub fn default_source_dirs(home: &Path) -> Vec<PathBuf> {
    vec![
        home.join(".local").join("share").join("stdhook"),
        home.join(".stdhook"),
        PathBuf::from("/usr/local/share/stdhook"),
        PathBuf::from("/opt/stdhook"),
    ]
}

/// Expand `~` and `$VARS` in a configured path; leaves it untouched when
/// expansion fails.
fn expand_path(path: &Path, home: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if let Some(rest) = raw.strip_prefix("~/") {
        return home.join(rest);
    }
    if raw == "~" {
        return home.to_path_buf();
    }
    match shellexpand::env(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}
