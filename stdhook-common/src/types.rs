//! Common types used across stdhook components.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the hook is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstallationScope {
    /// Applies to every project of the current user (`~/.claude`).
    #[default]
    Global,
    /// Applies only to the current project directory (`./.claude`).
    Local,
}

impl InstallationScope {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Local => "local",
        }
    }

    /// The CLI flag that selects this scope.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Global => "--global",
            Self::Local => "--local",
        }
    }
}

impl fmt::Display for InstallationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Installation state computed from the two candidate settings documents.
///
/// Never persisted. `Conflict` is terminal: the installer refuses to pick a
/// side on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationState {
    None,
    Global,
    Local,
    Conflict,
}

impl InstallationState {
    /// Classify from the two marker probes.
    pub fn from_markers(global: bool, local: bool) -> Self {
        match (global, local) {
            (false, false) => Self::None,
            (true, false) => Self::Global,
            (false, true) => Self::Local,
            (true, true) => Self::Conflict,
        }
    }

    /// The scope an existing installation pins the run to, if unambiguous.
    pub fn implied_scope(&self) -> Option<InstallationScope> {
        match self {
            Self::Global => Some(InstallationScope::Global),
            Self::Local => Some(InstallationScope::Local),
            Self::None | Self::Conflict => None,
        }
    }

    /// Scope to operate on given what the user asked for.
    ///
    /// An existing installation wins over the request so updates happen in
    /// place. Returns `None` for `Conflict`.
    pub fn effective_scope(&self, requested: InstallationScope) -> Option<InstallationScope> {
        match self {
            Self::None => Some(requested),
            Self::Conflict => None,
            other => other.implied_scope(),
        }
    }
}

impl fmt::Display for InstallationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "not installed"),
            Self::Global => write!(f, "installed (global)"),
            Self::Local => write!(f, "installed (local)"),
            Self::Conflict => write!(f, "conflict (global and local)"),
        }
    }
}

/// Tag used when no stable release can be determined.
pub const EDGE_TAG: &str = "edge";

/// Commit id recorded when the commit lookup fails or is skipped.
pub const UNKNOWN_COMMIT: &str = "unknown";

/// The version chosen for this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Explicit `--version` value, if any.
    pub requested_override: Option<String>,
    /// Whether `--edge` was passed.
    pub use_edge: bool,
    /// Tag that will be installed; `"edge"` when no stable release is known.
    pub resolved_tag: String,
    /// Commit the tag points at, stamped into the staged script.
    pub commit_id: String,
    /// Browsable URL of the resolved source tree.
    pub source_url: String,
}

impl VersionRecord {
    pub fn is_edge(&self) -> bool {
        self.resolved_tag == EDGE_TAG
    }
}

/// Outcome of an idempotent file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdempotentResult {
    /// The file was modified.
    Changed,
    /// Already in the desired state.
    Unchanged,
    /// Dry run: describes the change that would be made.
    WouldChange(String),
    /// Operation does not apply (with reason).
    NotApplicable(String),
}

impl fmt::Display for IdempotentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Changed => write!(f, "changed"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::WouldChange(what) => write!(f, "would change: {}", what),
            Self::NotApplicable(why) => write!(f, "not applicable: {}", why),
        }
    }
}
