//! On-disk layout of the asset bundle and of each installation scope.

use crate::errors::ErrorCode;
use crate::types::InstallationScope;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Host-tool event the hook is registered for.
pub const HOOK_EVENT: &str = "UserPromptSubmit";

/// File name of the hook executable.
pub const HOOK_SCRIPT: &str = "stdhook-prompt.sh";

/// Distinguishing substring of every registration this tool writes.
pub const HOOK_MARKER: &str = "stdhook-prompt";

/// Support library directory shipped next to the script.
pub const LIB_DIR: &str = "lib";

/// Keyword-mapping data consumed by the hook at runtime.
pub const KEYWORD_MAP: &str = "keyword-map.json";

/// Directory inside a source checkout that holds the bundle.
pub const SOURCE_SUBDIR: &str = "hook";

/// Token in the script replaced with the resolved commit id.
pub const COMMIT_PLACEHOLDER: &str = "__STDHOOK_COMMIT__";

/// Shell variable the script assigns the placeholder to.
pub const COMMIT_VARIABLE: &str = "STDHOOK_COMMIT";

/// Description attached to the registered command.
pub const HOOK_DESCRIPTION: &str = "Inject matching coding standards into the prompt context";

const CLAUDE_DIR: &str = ".claude";
const SETTINGS_FILE: &str = "settings.json";
const BACKUP_SUFFIX: &str = ".backup";

/// Failure to find one of the two root directories.
#[derive(Debug, Error)]
pub enum RootsError {
    #[error("could not determine the home directory")]
    HomeUnavailable,

    #[error("could not determine the current directory: {0}")]
    ProjectUnavailable(#[source] io::Error),
}

impl RootsError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::HomeUnavailable => ErrorCode::ScopeHomeUnavailable,
            Self::ProjectUnavailable(_) => ErrorCode::ScopeProjectUnavailable,
        }
    }
}

/// The two directories every run needs: the user's home and the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRoots {
    pub home: PathBuf,
    pub project: PathBuf,
}

impl InstallRoots {
    pub fn new(home: impl Into<PathBuf>, project: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            project: project.into(),
        }
    }

    /// Home directory and current working directory of this process.
    pub fn from_process() -> Result<Self, RootsError> {
        Self::from_lookups(dirs::home_dir(), std::env::current_dir())
    }

    fn from_lookups(
        home: Option<PathBuf>,
        project: io::Result<PathBuf>,
    ) -> Result<Self, RootsError> {
        let home = home.ok_or(RootsError::HomeUnavailable)?;
        let project = project.map_err(RootsError::ProjectUnavailable)?;
        Ok(Self { home, project })
    }

    pub fn paths(&self, scope: InstallationScope) -> ScopePaths {
        ScopePaths::for_scope(scope, &self.home, &self.project)
    }
}

/// Every path that depends on the installation scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopePaths {
    pub scope: InstallationScope,
    /// `~/.claude` or `<project>/.claude`.
    pub claude_dir: PathBuf,
    pub settings: PathBuf,
    pub backup: PathBuf,
    /// Directory the asset bundle is staged into.
    pub asset_dir: PathBuf,
    /// Staged hook executable.
    pub script: PathBuf,
}

impl ScopePaths {
    pub fn for_scope(scope: InstallationScope, home: &Path, project: &Path) -> Self {
        let base = match scope {
            InstallationScope::Global => home,
            InstallationScope::Local => project,
        };
        let claude_dir = base.join(CLAUDE_DIR);
        let settings = claude_dir.join(SETTINGS_FILE);
        let asset_dir = claude_dir.join("hooks").join("stdhook");
        let script = asset_dir.join(HOOK_SCRIPT);
        Self {
            scope,
            backup: backup_path(&settings),
            claude_dir,
            settings,
            asset_dir,
            script,
        }
    }

    /// Command string written into the settings document.
    ///
    /// Global installs register the absolute script path. Local installs
    /// go through `$CLAUDE_PROJECT_DIR` so the registration survives the
    /// project being moved or cloned elsewhere. The host runs the command
    /// through a shell, so both forms are quoted.
    pub fn hook_command(&self) -> String {
        match self.scope {
            InstallationScope::Global => shell_quote(&self.script.to_string_lossy()),
            InstallationScope::Local => format!(
                "\"$CLAUDE_PROJECT_DIR\"/{}/hooks/stdhook/{}",
                CLAUDE_DIR, HOOK_SCRIPT
            ),
        }
    }
}

/// Wrap `raw` in double quotes, escaping what the shell would still expand.
fn shell_quote(raw: &str) -> String {
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for c in raw.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Sibling backup path for a settings document (`settings.json.backup`).
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| SETTINGS_FILE.into());
    name.push(BACKUP_SUFFIX);
    path.with_file_name(name)
}
