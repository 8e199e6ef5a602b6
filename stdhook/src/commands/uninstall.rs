//! `stdhook uninstall`: remove the registration and staged assets.

use super::helpers::{indent_lines, report_error};
use super::install::EXIT_FATAL;
use crate::install::{InstallError, SettingsOutcome, detect_installation, remove_registration};
use crate::ui::{OutputContext, StatusIndicator};
use std::fs;
use std::path::Path;
use stdhook_common::{
    ErrorCode, IdempotentResult, InstallRoots, InstallationScope, InstallationState,
};
use tracing::info;

/// Result of one uninstall run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallReport {
    pub scope: InstallationScope,
    pub settings: SettingsOutcome,
    pub assets: IdempotentResult,
}

/// Pick the scope to uninstall. An explicit flag wins, which is also how a
/// conflict is cleared one side at a time.
pub fn uninstall_scope(
    state: InstallationState,
    requested: Option<InstallationScope>,
) -> Option<InstallationScope> {
    match (requested, state) {
        (Some(scope), _) => Some(scope),
        (None, InstallationState::Conflict) => None,
        (None, state) => Some(state.implied_scope().unwrap_or_default()),
    }
}

pub fn run_uninstall(
    roots: &InstallRoots,
    requested: Option<InstallationScope>,
    dry_run: bool,
) -> Result<UninstallReport, InstallError> {
    let detection = detect_installation(roots)?;
    let scope = match uninstall_scope(detection.state, requested) {
        Some(scope) => scope,
        None => {
            return Err(InstallError::Conflict {
                global: detection.global.path,
                local: detection.local.path,
            });
        }
    };
    let paths = roots.paths(scope);

    let settings = remove_registration(&paths, dry_run)?;
    let assets = remove_assets(&paths.asset_dir, dry_run)?;

    Ok(UninstallReport {
        scope,
        settings,
        assets,
    })
}

fn remove_assets(dir: &Path, dry_run: bool) -> Result<IdempotentResult, InstallError> {
    if !dir.exists() {
        return Ok(IdempotentResult::NotApplicable(format!(
            "{} does not exist",
            dir.display()
        )));
    }
    if dry_run {
        return Ok(IdempotentResult::WouldChange(format!("remove {}", dir.display())));
    }
    fs::remove_dir_all(dir).map_err(|e| InstallError::Stage {
        dir: dir.to_path_buf(),
        reason: format!("cannot remove: {e}"),
    })?;
    info!("Removed {}", dir.display());
    Ok(IdempotentResult::Changed)
}

pub fn uninstall(
    ctx: &OutputContext,
    roots: &InstallRoots,
    requested: Option<InstallationScope>,
    dry_run: bool,
) -> u8 {
    ctx.header("Uninstall coding-standards hook");

    let report = match run_uninstall(roots, requested, dry_run) {
        Ok(report) => report,
        Err(e @ InstallError::Conflict { .. }) => {
            let entry = e.entry().with_remediation(vec![
                format!(
                    "Run 'stdhook uninstall {}' or 'stdhook uninstall {}' to remove one side",
                    InstallationScope::Global.flag(),
                    InstallationScope::Local.flag()
                ),
            ]);
            report_error(ctx, &entry);
            return EXIT_FATAL;
        }
        Err(e) => {
            report_error(ctx, &e.entry());
            ctx.error(&e.to_string());
            return EXIT_FATAL;
        }
    };

    ctx.info(&format!("Scope {}", ctx.theme().highlight(report.scope.name())));
    match &report.settings {
        SettingsOutcome::Applied { result, backup } => {
            print_result(ctx, "Settings", result);
            if let Some(backup) = backup {
                ctx.detail("backup", &backup.display().to_string());
            }
        }
        SettingsOutcome::ManualEditRequired {
            path,
            reason,
            fragment,
        } => {
            ctx.warn(&format!(
                "[{}] Could not update {} automatically ({reason})",
                ErrorCode::SettingsUnmergeable.code_string(),
                path.display()
            ));
            ctx.always(&format!(
                "\nRemove this registration from {} by hand:\n\n{}\n",
                path.display(),
                indent_lines(fragment.trim_end(), "    ")
            ));
        }
    }
    print_result(ctx, "Assets", &report.assets);
    0
}

fn print_result(ctx: &OutputContext, what: &str, result: &IdempotentResult) {
    match result {
        IdempotentResult::Changed => ctx.success(&format!("{what}: removed")),
        IdempotentResult::Unchanged => {
            ctx.status(StatusIndicator::Skipped, &format!("{what}: nothing registered"))
        }
        IdempotentResult::WouldChange(change) => {
            ctx.status(StatusIndicator::Skipped, &format!("{what}: would {change}"))
        }
        IdempotentResult::NotApplicable(why) => {
            ctx.status(StatusIndicator::Skipped, &format!("{what}: {why}"))
        }
    }
}
