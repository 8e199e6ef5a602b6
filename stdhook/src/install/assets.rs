//! Asset bundle location and staging.
//!
//! A bundle is a directory holding `hook/stdhook-prompt.sh`, `hook/lib/` and
//! `hook/keyword-map.json`. Staging copies it into the scope's asset
//! directory and stamps the commit id into the hook script.

use super::error::InstallError;
use std::fs;
use std::path::{Path, PathBuf};
use stdhook_common::ScopePaths;
use stdhook_common::fsops::{atomic_write, copy_dir_recursive, set_owner_only_executable};
use stdhook_common::layout::{
    COMMIT_PLACEHOLDER, COMMIT_VARIABLE, HOOK_SCRIPT, KEYWORD_MAP, LIB_DIR, SOURCE_SUBDIR,
};
use tracing::{debug, info};

const MAX_COMMIT_LEN: usize = 64;

/// A located asset bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSource {
    /// Directory containing `hook/`.
    pub root: PathBuf,
}

impl AssetSource {
    pub fn hook_dir(&self) -> PathBuf {
        self.root.join(SOURCE_SUBDIR)
    }

    pub fn script(&self) -> PathBuf {
        self.hook_dir().join(HOOK_SCRIPT)
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.hook_dir().join(LIB_DIR)
    }

    pub fn keyword_map(&self) -> PathBuf {
        self.hook_dir().join(KEYWORD_MAP)
    }

    /// Whether `root` holds a complete bundle.
    pub fn is_bundle(root: &Path) -> bool {
        let candidate = Self {
            root: root.to_path_buf(),
        };
        candidate.script().is_file()
            && candidate.lib_dir().is_dir()
            && candidate.keyword_map().is_file()
    }
}

/// Search `cwd`, then each of `search_dirs`, for a bundle.
pub fn locate_assets(cwd: &Path, search_dirs: &[PathBuf]) -> Result<AssetSource, InstallError> {
    let candidates: Vec<PathBuf> = std::iter::once(cwd.to_path_buf())
        .chain(search_dirs.iter().cloned())
        .collect();

    for dir in &candidates {
        if AssetSource::is_bundle(dir) {
            debug!("Found asset bundle in {}", dir.display());
            return Ok(AssetSource { root: dir.clone() });
        }
        debug!("No asset bundle in {}", dir.display());
    }

    Err(InstallError::AssetsNotFound {
        searched: candidates,
    })
}

/// Result of staging a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedAssets {
    pub asset_dir: PathBuf,
    pub script: PathBuf,
    /// Commit id as written into the script.
    pub commit: String,
    /// Placeholder occurrences replaced in the script.
    pub stamped: usize,
    /// Files copied, script included.
    pub files: u64,
}

/// Copy `source` into `paths.asset_dir`, stamp `commit_id` into the script
/// and restrict the script to its owner.
pub fn stage_assets(
    source: &AssetSource,
    paths: &ScopePaths,
    commit_id: &str,
) -> Result<StagedAssets, InstallError> {
    let stage_err = |reason: String| InstallError::Stage {
        dir: paths.asset_dir.clone(),
        reason,
    };

    fs::create_dir_all(&paths.asset_dir)
        .map_err(|e| stage_err(format!("cannot create directory: {e}")))?;

    let lib_files = copy_dir_recursive(&source.lib_dir(), &paths.asset_dir.join(LIB_DIR))
        .map_err(|e| stage_err(format!("{e:#}")))?;

    fs::copy(source.keyword_map(), paths.asset_dir.join(KEYWORD_MAP))
        .map_err(|e| stage_err(format!("cannot copy {KEYWORD_MAP}: {e}")))?;

    let template = fs::read_to_string(source.script())
        .map_err(|e| stage_err(format!("cannot read {}: {e}", source.script().display())))?;
    let commit = sanitize_commit_id(commit_id);
    let (script_text, stamped) = stamp_commit(&template, &commit);
    if stamped == 0 {
        debug!("{} has no {} placeholder", HOOK_SCRIPT, COMMIT_PLACEHOLDER);
    }

    atomic_write(&paths.script, script_text.as_bytes()).map_err(|e| stage_err(format!("{e:#}")))?;
    set_owner_only_executable(&paths.script).map_err(|e| InstallError::Permissions {
        path: paths.script.clone(),
        reason: format!("{e:#}"),
    })?;

    info!(
        "Staged {} file(s) into {} (commit {})",
        lib_files + 2,
        paths.asset_dir.display(),
        commit
    );

    Ok(StagedAssets {
        asset_dir: paths.asset_dir.clone(),
        script: paths.script.clone(),
        commit,
        stamped,
        files: lib_files + 2,
    })
}

/// Restrict a commit id to `[A-Za-z0-9._-]`, at most 64 characters.
/// Anything else becomes `_`, so the id can never break out of the quoting
/// around the placeholder in the script.
pub fn sanitize_commit_id(raw: &str) -> String {
    raw.trim()
        .chars()
        .take(MAX_COMMIT_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Replace every placeholder occurrence with `commit`. Literal replacement;
/// the commit is never interpreted as a pattern.
pub fn stamp_commit(script: &str, commit: &str) -> (String, usize) {
    let count = script.matches(COMMIT_PLACEHOLDER).count();
    (script.replace(COMMIT_PLACEHOLDER, commit), count)
}

/// Commit id stamped into an installed script, read from its
/// `STDHOOK_COMMIT=` assignment.
pub fn read_stamped_commit(script: &Path) -> Option<String> {
    let content = fs::read_to_string(script).ok()?;
    let prefix = format!("{COMMIT_VARIABLE}=");
    content.lines().find_map(|line| {
        let line = line.trim().trim_start_matches("readonly ").trim_start_matches("export ");
        let value = line.strip_prefix(&prefix)?;
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        (!value.is_empty() && value != COMMIT_PLACEHOLDER).then(|| value.to_string())
    })
}
