//! `stdhook status`: report where the hook is installed.

use super::helpers::{report_error, report_warning, short_commit};
use super::install::EXIT_FATAL;
use crate::install::assets::read_stamped_commit;
use crate::install::{SettingsProbe, detect_installation};
use crate::ui::{OutputContext, StatusIndicator};
use stdhook_common::{InstallRoots, InstallationScope, InstallationState, InstallerConfig};

pub fn status(ctx: &OutputContext, roots: &InstallRoots, config: &InstallerConfig) -> u8 {
    ctx.header("stdhook status");

    let detection = match detect_installation(roots) {
        Ok(detection) => detection,
        Err(e) => {
            report_error(ctx, &e.entry());
            return EXIT_FATAL;
        }
    };

    let theme = ctx.theme();
    ctx.info(&format!(
        "stdhook {} - state: {}",
        env!("CARGO_PKG_VERSION"),
        theme.highlight(&detection.state.to_string())
    ));
    ctx.line("");

    print_scope(ctx, roots, InstallationScope::Global, &detection.global);
    if detection.shared_document {
        ctx.status(
            StatusIndicator::Skipped,
            "Local: project directory is the home directory",
        );
    } else {
        print_scope(ctx, roots, InstallationScope::Local, &detection.local);
    }

    ctx.line("");
    ctx.line(&theme.muted("Configuration:"));
    ctx.detail("repo", &config.repo.to_string());
    ctx.detail("api", &config.release_api.to_string());
    ctx.detail("offline", &config.offline.to_string());
    ctx.detail("banner", &config.banner.to_string());
    let dirs = config
        .source_dirs
        .value
        .iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    ctx.detail("sources", &format!("{dirs} ({})", config.source_dirs.source));
    for warning in &config.warnings {
        report_warning(ctx, warning);
    }

    if detection.state == InstallationState::Conflict {
        ctx.line("");
        if let Err(err) = detection.target_scope(InstallationScope::default()) {
            report_error(ctx, &err.entry());
        }
        return EXIT_FATAL;
    }
    0
}

fn print_scope(
    ctx: &OutputContext,
    roots: &InstallRoots,
    scope: InstallationScope,
    probe: &SettingsProbe,
) {
    let paths = roots.paths(scope);
    let label = match scope {
        InstallationScope::Global => "Global",
        InstallationScope::Local => "Local",
    };

    let (indicator, summary) = match (probe.exists, probe.has_marker) {
        (_, true) => (StatusIndicator::Success, "registered"),
        (true, false) => (StatusIndicator::Skipped, "not registered"),
        (false, _) => (StatusIndicator::Skipped, "no settings file"),
    };
    ctx.status(indicator, &format!("{label}: {summary}"));
    ctx.detail("settings", &probe.path.display().to_string());
    if let Some(err) = &probe.parse_error {
        ctx.detail("warning", &format!("not valid JSON ({err})"));
    }

    if paths.script.is_file() {
        let commit = read_stamped_commit(&paths.script);
        ctx.detail("script", &paths.script.display().to_string());
        ctx.detail(
            "commit",
            commit.as_deref().map(short_commit).unwrap_or("not stamped"),
        );
    } else if probe.has_marker {
        ctx.warn(&format!(
            "{label} registration points at a missing script: {}",
            paths.script.display()
        ));
    }
}
