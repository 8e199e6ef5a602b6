//! Installation-state detection.
//!
//! Reads the global and local settings documents and looks for an existing
//! hook registration in each. Nothing is written.

use super::error::InstallError;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use stdhook_common::layout::HOOK_MARKER;
use stdhook_common::protocol::document_has_marker;
use stdhook_common::{InstallRoots, InstallationScope, InstallationState};
use tracing::debug;

/// What was found in one settings document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsProbe {
    pub path: PathBuf,
    pub exists: bool,
    pub has_marker: bool,
    /// Set when the document exists but is not valid JSON; the marker was
    /// then searched for in the raw text.
    pub parse_error: Option<String>,
}

impl SettingsProbe {
    fn absent(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            exists: false,
            has_marker: false,
            parse_error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub state: InstallationState,
    pub global: SettingsProbe,
    pub local: SettingsProbe,
    /// The project directory is the home directory, so both scopes share a
    /// settings document.
    pub shared_document: bool,
}

impl Detection {
    /// Scope the install must target. An existing installation wins over
    /// `requested`; a conflict is an error.
    pub fn target_scope(
        &self,
        requested: InstallationScope,
    ) -> Result<InstallationScope, InstallError> {
        self.state
            .effective_scope(requested)
            .ok_or_else(|| InstallError::Conflict {
                global: self.global.path.clone(),
                local: self.local.path.clone(),
            })
    }
}

/// Probe both settings documents under `roots`.
pub fn detect_installation(roots: &InstallRoots) -> Result<Detection, InstallError> {
    let global_path = roots.paths(InstallationScope::Global).settings;
    let local_path = roots.paths(InstallationScope::Local).settings;

    let shared_document = same_file(&global_path, &local_path);
    let global = probe_settings(&global_path, HOOK_MARKER)?;
    let local = if shared_document {
        debug!("Project settings are the global settings; treating as global");
        SettingsProbe::absent(&local_path)
    } else {
        probe_settings(&local_path, HOOK_MARKER)?
    };

    let state = InstallationState::from_markers(global.has_marker, local.has_marker);
    debug!(
        "Installation state: {} (global={}, local={})",
        state, global.has_marker, local.has_marker
    );

    Ok(Detection {
        state,
        global,
        local,
        shared_document,
    })
}

/// Read one settings document and search it for `marker`.
pub fn probe_settings(path: &Path, marker: &str) -> Result<SettingsProbe, InstallError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SettingsProbe::absent(path)),
        Err(source) => {
            return Err(InstallError::SettingsRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let (has_marker, parse_error) = if content.trim().is_empty() {
        (false, None)
    } else {
        match serde_json::from_str::<Value>(&content) {
            Ok(doc) => (document_has_marker(&doc, marker), None),
            Err(e) => {
                debug!("{} is not valid JSON ({}); using text search", path.display(), e);
                (content.contains(marker), Some(e.to_string()))
            }
        }
    };

    Ok(SettingsProbe {
        path: path.to_path_buf(),
        exists: true,
        has_marker,
        parse_error,
    })
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => match (a.parent().map(Path::canonicalize), b.parent().map(Path::canonicalize)) {
            (Some(Ok(pa)), Some(Ok(pb))) => pa == pb && a.file_name() == b.file_name(),
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stdhook_common::registration_fragment;

    fn write_settings(dir: &Path, content: &str) {
        let claude = dir.join(".claude");
        fs::create_dir_all(&claude).unwrap();
        fs::write(claude.join("settings.json"), content).unwrap();
    }

    fn registered(command: &str) -> String {
        serde_json::to_string_pretty(&registration_fragment(command)).unwrap()
    }

    #[test]
    fn test_nothing_installed() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let roots = InstallRoots::new(home.path(), project.path());

        let detection = detect_installation(&roots).unwrap();

        assert_eq!(detection.state, InstallationState::None);
        assert!(!detection.global.exists);
        assert!(!detection.local.exists);
    }

    #[test]
    fn test_local_install_detected() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        write_settings(home.path(), r#"{"model": "opus"}"#);
        write_settings(
            project.path(),
            &registered("\"$CLAUDE_PROJECT_DIR\"/.claude/hooks/stdhook/stdhook-prompt.sh"),
        );

        let detection =
            detect_installation(&InstallRoots::new(home.path(), project.path())).unwrap();

        assert_eq!(detection.state, InstallationState::Local);
        assert_eq!(
            detection.target_scope(InstallationScope::Global).unwrap(),
            InstallationScope::Local
        );
    }

    #[test]
    fn test_conflict_is_error() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        write_settings(home.path(), &registered("/h/.claude/hooks/stdhook/stdhook-prompt.sh"));
        write_settings(project.path(), &registered("/p/.claude/hooks/stdhook/stdhook-prompt.sh"));

        let detection =
            detect_installation(&InstallRoots::new(home.path(), project.path())).unwrap();

        assert_eq!(detection.state, InstallationState::Conflict);
        let err = detection.target_scope(InstallationScope::Global).unwrap_err();
        assert!(matches!(err, InstallError::Conflict { .. }));
    }

    #[test]
    fn test_invalid_json_falls_back_to_text_search() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        write_settings(
            home.path(),
            "{ // hand edited\n \"hooks\": { \"command\": \"~/.claude/hooks/stdhook/stdhook-prompt.sh\" } }",
        );

        let detection =
            detect_installation(&InstallRoots::new(home.path(), project.path())).unwrap();

        assert_eq!(detection.state, InstallationState::Global);
        assert!(detection.global.parse_error.is_some());
    }

    #[test]
    fn test_marker_outside_hooks_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"notes": "remember stdhook-prompt"}"#).unwrap();

        let probe = probe_settings(&path, HOOK_MARKER).unwrap();

        assert!(probe.exists);
        assert!(!probe.has_marker);
    }

    #[test]
    fn test_project_is_home_counts_once() {
        let home = tempfile::tempdir().unwrap();
        write_settings(home.path(), &registered("/h/.claude/hooks/stdhook/stdhook-prompt.sh"));

        let detection = detect_installation(&InstallRoots::new(home.path(), home.path())).unwrap();

        assert!(detection.shared_document);
        assert_eq!(detection.state, InstallationState::Global);
    }
}
