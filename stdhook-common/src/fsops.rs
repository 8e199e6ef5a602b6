//! Filesystem primitives shared by the installer.

use crate::layout::backup_path;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Writes content to a file atomically using a temporary file.
///
/// The temp file lives in the target's directory so the final rename never
/// crosses filesystems. Readers see either the old or the new content.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path.parent().context("Path has no parent directory")?;
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {:?}", parent))?;
    let temp_path = parent.join(format!(".{}.tmp", Uuid::new_v4()));

    let result = (|| -> Result<()> {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file {:?}", temp_path))?;
        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file {:?}", temp_path))?;
        file.sync_all().context("Failed to sync temp file")?;

        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename {:?} to {:?}", temp_path, path))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Copy `path` verbatim to its `.backup` sibling, replacing any previous
/// backup. Only one generation is kept.
pub fn create_backup(path: &Path) -> Result<PathBuf> {
    let backup = backup_path(path);
    fs::copy(path, &backup).with_context(|| format!("Failed to create backup at {:?}", backup))?;
    debug!("Created backup: {:?}", backup);
    Ok(backup)
}

/// Recursively copy `src` into `dst`, creating directories as needed.
/// Existing files in `dst` are overwritten; extra files are left alone.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<u64> {
    fs::create_dir_all(dst).with_context(|| format!("Failed to create {:?}", dst))?;
    let mut copied = 0;
    for entry in fs::read_dir(src).with_context(|| format!("Failed to read {:?}", src))? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let target = dst.join(entry.file_name());
        if file_type.is_dir() {
            copied += copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {:?} to {:?}", entry.path(), target))?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Restrict a file to owner read/write/execute (`0700`).
#[cfg(unix)]
pub fn set_owner_only_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
        .with_context(|| format!("Failed to set permissions on {:?}", path))
}

#[cfg(not(unix))]
pub fn set_owner_only_executable(_path: &Path) -> Result<()> {
    Ok(())
}
