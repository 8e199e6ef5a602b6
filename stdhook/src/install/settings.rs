//! Settings document writer.
//!
//! Merges the hook registration into the scope's `settings.json`, taking a
//! backup before every overwrite. A document that exists but cannot be merged
//! is never touched; the caller gets the fragment to apply by hand instead.

use super::error::InstallError;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use stdhook_common::fsops::{atomic_write, create_backup};
use stdhook_common::layout::HOOK_MARKER;
use stdhook_common::protocol::remove_registrations;
use stdhook_common::{IdempotentResult, ScopePaths, merge_documents, registration_fragment};
use tracing::{debug, info, warn};

/// Outcome of a settings operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOutcome {
    Applied {
        result: IdempotentResult,
        /// Backup taken before the overwrite, if any.
        backup: Option<PathBuf>,
    },
    /// The document could not be merged safely and was left alone.
    ManualEditRequired {
        path: PathBuf,
        reason: String,
        /// Pretty-printed JSON the user should merge themselves.
        fragment: String,
    },
}

impl SettingsOutcome {
    pub fn is_soft_failure(&self) -> bool {
        matches!(self, Self::ManualEditRequired { .. })
    }

    pub fn result(&self) -> Option<&IdempotentResult> {
        match self {
            Self::Applied { result, .. } => Some(result),
            Self::ManualEditRequired { .. } => None,
        }
    }
}

enum Existing {
    Absent,
    Parsed { raw: String, doc: Option<Value> },
    Unparseable { reason: String },
}

fn read_existing(path: &Path) -> Result<Existing, InstallError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Existing::Absent),
        Err(source) => {
            return Err(InstallError::SettingsRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    // An empty file counts as an empty document.
    if raw.trim().is_empty() {
        return Ok(Existing::Parsed { raw, doc: None });
    }
    match serde_json::from_str::<Value>(&raw) {
        Ok(doc) => Ok(Existing::Parsed { raw, doc: Some(doc) }),
        Err(e) => Ok(Existing::Unparseable {
            reason: format!("not valid JSON: {e}"),
        }),
    }
}

/// Render a document the way it is written to disk.
pub fn render_document(doc: &Value) -> String {
    let mut text = serde_json::to_string_pretty(doc).unwrap_or_else(|_| "{}".to_string());
    text.push('\n');
    text
}

/// Register `command` in the settings document at `paths.settings`.
pub fn apply_registration(
    paths: &ScopePaths,
    command: &str,
    dry_run: bool,
) -> Result<SettingsOutcome, InstallError> {
    let fragment = registration_fragment(command);
    let manual = |reason: String| {
        warn!("{} cannot be updated automatically: {}", paths.settings.display(), reason);
        SettingsOutcome::ManualEditRequired {
            path: paths.settings.clone(),
            reason,
            fragment: render_document(&fragment),
        }
    };

    let (existing_raw, existing_doc) = match read_existing(&paths.settings)? {
        Existing::Absent => (None, None),
        Existing::Parsed { raw, doc } => (Some(raw), doc),
        Existing::Unparseable { reason } => return Ok(manual(reason)),
    };

    let merged = match merge_documents(existing_doc.as_ref(), &fragment) {
        Ok(merged) => merged,
        Err(e) => return Ok(manual(e.to_string())),
    };

    commit_document(&paths.settings, existing_raw.as_deref(), &merged, dry_run)
}

/// Remove every registration carrying the hook marker.
pub fn remove_registration(
    paths: &ScopePaths,
    dry_run: bool,
) -> Result<SettingsOutcome, InstallError> {
    let (raw, mut doc) = match read_existing(&paths.settings)? {
        Existing::Absent | Existing::Parsed { doc: None, .. } => {
            return Ok(SettingsOutcome::Applied {
                result: IdempotentResult::NotApplicable(format!(
                    "{} does not exist",
                    paths.settings.display()
                )),
                backup: None,
            });
        }
        Existing::Parsed { raw, doc: Some(doc) } => (raw, doc),
        Existing::Unparseable { reason } => {
            return Ok(SettingsOutcome::ManualEditRequired {
                path: paths.settings.clone(),
                reason,
                fragment: render_document(&registration_fragment(&paths.hook_command())),
            });
        }
    };

    let removed = remove_registrations(&mut doc, HOOK_MARKER);
    if removed == 0 {
        return Ok(SettingsOutcome::Applied {
            result: IdempotentResult::Unchanged,
            backup: None,
        });
    }
    debug!("Removing {} registration(s) from {}", removed, paths.settings.display());
    commit_document(&paths.settings, Some(&raw), &doc, dry_run)
}

fn commit_document(
    path: &Path,
    existing_raw: Option<&str>,
    doc: &Value,
    dry_run: bool,
) -> Result<SettingsOutcome, InstallError> {
    let rendered = render_document(doc);
    if existing_raw == Some(rendered.as_str()) {
        debug!("{} already up to date", path.display());
        return Ok(SettingsOutcome::Applied {
            result: IdempotentResult::Unchanged,
            backup: None,
        });
    }

    if dry_run {
        let what = if existing_raw.is_some() {
            format!("update {}", path.display())
        } else {
            format!("create {}", path.display())
        };
        return Ok(SettingsOutcome::Applied {
            result: IdempotentResult::WouldChange(what),
            backup: None,
        });
    }

    let backup = match existing_raw {
        Some(_) => Some(create_backup(path).map_err(|e| InstallError::SettingsBackup {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })?),
        None => None,
    };

    atomic_write(path, rendered.as_bytes()).map_err(|e| InstallError::SettingsWrite {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })?;
    info!("Wrote {}", path.display());

    Ok(SettingsOutcome::Applied {
        result: IdempotentResult::Changed,
        backup,
    })
}
