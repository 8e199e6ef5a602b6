//! `stdhook install`.

use super::helpers::{indent_lines, report_error, short_commit};
use crate::install::{
    GitHubReleases, InstallOptions, InstallReport, OfflineSource, RunOutcome, SettingsOutcome,
    VersionOrigin, run_install,
};
use crate::ui::{OutputContext, StatusIndicator};
use stdhook_common::{ErrorCode, IdempotentResult, InstallRoots, InstallerConfig};
use tracing::warn;

/// Exit code for fatal conditions.
pub const EXIT_FATAL: u8 = 2;

pub async fn install(
    ctx: &OutputContext,
    roots: &InstallRoots,
    config: &InstallerConfig,
    options: &InstallOptions,
) -> u8 {
    ctx.header("Install coding-standards hook");
    if options.dry_run {
        ctx.line(&format!(
            "  {} {}",
            ctx.theme().muted("→"),
            ctx.theme().warning("DRY RUN - no changes will be made")
        ));
        ctx.line("");
    }

    let result = if config.offline.value {
        run_install(roots, config, options, &OfflineSource).await
    } else {
        match GitHubReleases::from_config(config) {
            Ok(github) => run_install(roots, config, options, &github).await,
            Err(e) => {
                warn!("HTTP client unavailable ({}); skipping release lookup", e);
                run_install(roots, config, options, &OfflineSource).await
            }
        }
    };

    match result {
        Ok(report) => {
            print_report(ctx, &report);
            report.outcome().exit_code()
        }
        Err(e) => {
            report_error(ctx, &e.entry());
            ctx.error(&format!("Install aborted: {e}"));
            EXIT_FATAL
        }
    }
}

fn print_report(ctx: &OutputContext, report: &InstallReport) {
    let theme = ctx.theme();
    let record = &report.resolution.record;

    for warning in &report.resolution.warnings {
        ctx.warn(warning);
    }

    let origin = match report.resolution.origin {
        VersionOrigin::Override => "requested",
        VersionOrigin::Edge => "edge channel",
        VersionOrigin::LatestRelease => "latest release",
        VersionOrigin::Fallback => "fallback",
    };
    ctx.info(&format!(
        "Version {} ({origin})",
        theme.highlight(&record.resolved_tag)
    ));
    ctx.detail("commit", short_commit(&record.commit_id));
    ctx.detail("source", &record.source_url);

    let scope_note = if report.scope_forced {
        format!(" (existing {} installation)", report.scope.name())
    } else {
        String::new()
    };
    ctx.info(&format!(
        "Scope {}{scope_note}",
        theme.highlight(report.scope.name())
    ));
    ctx.detail("bundle", &report.source.root.display().to_string());

    match &report.staged {
        Some(staged) => ctx.success(&format!(
            "Staged {} file(s) into {}",
            staged.files,
            staged.asset_dir.display()
        )),
        None => ctx.status(
            StatusIndicator::Skipped,
            &format!("Would stage assets into {}", report.paths.asset_dir.display()),
        ),
    }

    match &report.settings {
        SettingsOutcome::Applied { result, backup } => {
            match result {
                IdempotentResult::Changed => ctx.success(&format!(
                    "Registered hook in {}",
                    report.paths.settings.display()
                )),
                IdempotentResult::Unchanged => ctx.success(&format!(
                    "Hook already registered in {}",
                    report.paths.settings.display()
                )),
                IdempotentResult::WouldChange(what) => {
                    ctx.status(StatusIndicator::Skipped, &format!("Would {what}"))
                }
                IdempotentResult::NotApplicable(why) => ctx.status(StatusIndicator::Skipped, why),
            }
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
                "\nMerge this into {} by hand, keeping your existing keys:\n\n{}\n",
                path.display(),
                indent_lines(fragment.trim_end(), "    ")
            ));
        }
    }

    match &report.verification {
        Some(Ok(ok)) => ctx.success(&format!(
            "Verified hook response in {} ms",
            ok.elapsed.as_millis()
        )),
        Some(Err(failure)) => {
            let entry = failure.code().entry();
            ctx.error(&format!("Verification failed: {failure}"));
            for step in &entry.remediation {
                ctx.detail("hint", step);
            }
        }
        None => {}
    }

    ctx.line("");
    match report.outcome() {
        RunOutcome::Success => ctx.success(&theme.success("Install complete")),
        RunOutcome::Degraded => {
            ctx.warn("Install complete, but settings need a manual edit (see above)")
        }
        RunOutcome::CompletedWithErrors => ctx.error("Install completed with errors"),
        RunOutcome::DryRun => ctx.info("Dry run complete; nothing was changed"),
    }
}
