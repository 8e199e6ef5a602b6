//! Errors that stop an install run.

use std::path::PathBuf;
use stdhook_common::{ErrorCode, ErrorEntry, InstallationScope};
use thiserror::Error;

/// Fatal installer errors. Each maps to an [`ErrorCode`] whose entry carries
/// the remediation shown to the user.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("hook is registered in both {global} and {local}")]
    Conflict { global: PathBuf, local: PathBuf },

    #[error("hook asset bundle not found in {} location(s)", .searched.len())]
    AssetsNotFound { searched: Vec<PathBuf> },

    #[error("failed to stage assets into {dir}: {reason}")]
    Stage { dir: PathBuf, reason: String },

    #[error("failed to restrict permissions on {path}: {reason}")]
    Permissions { path: PathBuf, reason: String },

    #[error("failed to read {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to back up {path}: {reason}")]
    SettingsBackup { path: PathBuf, reason: String },

    #[error("failed to write {path}: {reason}")]
    SettingsWrite { path: PathBuf, reason: String },
}

impl InstallError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Conflict { .. } => ErrorCode::ScopeConflict,
            Self::AssetsNotFound { .. } => ErrorCode::AssetsNotFound,
            Self::Stage { .. } => ErrorCode::AssetsStageFailed,
            Self::Permissions { .. } => ErrorCode::AssetsPermissionFailed,
            Self::SettingsRead { .. } => ErrorCode::SettingsReadFailed,
            Self::SettingsBackup { .. } => ErrorCode::SettingsBackupFailed,
            Self::SettingsWrite { .. } => ErrorCode::SettingsWriteFailed,
        }
    }

    /// Catalog entry with remediation specific to this run.
    pub fn entry(&self) -> ErrorEntry {
        let entry = self.code().entry();
        match self {
            Self::Conflict { global, local } => entry.with_remediation(vec![
                format!(
                    "Keep the global install: remove {} (or its stdhook entry), then re-run 'stdhook install'",
                    local.display()
                ),
                format!(
                    "Keep the local install: remove {} (or its stdhook entry), then re-run 'stdhook install {}'",
                    global.display(),
                    InstallationScope::Local.flag()
                ),
            ]),
            Self::AssetsNotFound { searched } => {
                let mut steps = vec![
                    "Run stdhook from a checkout of the coding-standards repository (it must contain hook/)"
                        .to_string(),
                ];
                steps.extend(
                    searched
                        .iter()
                        .skip(1)
                        .take(1)
                        .map(|dir| format!("Or clone the repository to {}", dir.display())),
                );
                steps.push(
                    "Or set STDHOOK_SOURCE_DIRS to the directory that contains hook/".to_string(),
                );
                entry.with_remediation(steps)
            }
            _ => entry,
        }
    }
}
