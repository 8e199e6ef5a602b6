//! Install engine.
//!
//! One run goes: resolve version, detect existing installs, locate the asset
//! bundle, stage it, merge the registration into settings, verify. Fatal
//! conditions stop the run before anything is written; everything after
//! staging degrades instead of aborting.

pub mod assets;
pub mod detect;
pub mod error;
pub mod settings;
pub mod verify;
pub mod version;

pub use assets::{AssetSource, StagedAssets, locate_assets, stage_assets};
pub use detect::{Detection, SettingsProbe, detect_installation};
pub use error::InstallError;
pub use settings::{SettingsOutcome, apply_registration, remove_registration};
pub use verify::{VerifyFailure, VerifySuccess, verify_hook};
pub use version::{
    GitHubReleases, LookupError, OfflineSource, ReleaseSource, Resolution, VersionOrigin,
    VersionRequest, resolve_version,
};

use stdhook_common::{InstallRoots, InstallationScope, InstallerConfig, ScopePaths};
use tracing::{debug, info, warn};

/// Options for one install run.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Scope asked for on the command line; an existing install overrides it.
    pub requested_scope: InstallationScope,
    pub version: VersionRequest,
    pub dry_run: bool,
}

/// Overall result of a run that was not aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    /// Finished, but the settings document needs a manual edit.
    Degraded,
    /// Verification failed; artifacts stay on disk.
    CompletedWithErrors,
    DryRun,
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::CompletedWithErrors => 1,
            _ => 0,
        }
    }
}

/// Everything a completed run did.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub resolution: Resolution,
    pub detection: Detection,
    pub scope: InstallationScope,
    /// Scope differs from the requested one because of an existing install.
    pub scope_forced: bool,
    pub paths: ScopePaths,
    pub source: AssetSource,
    pub staged: Option<StagedAssets>,
    pub settings: SettingsOutcome,
    /// `None` on dry runs.
    pub verification: Option<Result<VerifySuccess, VerifyFailure>>,
    pub dry_run: bool,
}

impl InstallReport {
    pub fn outcome(&self) -> RunOutcome {
        if self.dry_run {
            return RunOutcome::DryRun;
        }
        match &self.verification {
            Some(Err(_)) => RunOutcome::CompletedWithErrors,
            _ if self.settings.is_soft_failure() => RunOutcome::Degraded,
            _ => RunOutcome::Success,
        }
    }
}

/// Run an install against `roots` using `source` for release metadata.
pub async fn run_install<S: ReleaseSource>(
    roots: &InstallRoots,
    config: &InstallerConfig,
    options: &InstallOptions,
    source: &S,
) -> Result<InstallReport, InstallError> {
    let resolution = resolve_version(
        &options.version,
        source,
        &config.repo.value,
        &config.default_branch.value,
    )
    .await;
    info!(
        "Version {} ({:?}, commit {})",
        resolution.record.resolved_tag, resolution.origin, resolution.record.commit_id
    );

    let detection = detect_installation(roots)?;
    let scope = detection.target_scope(options.requested_scope)?;
    let scope_forced = scope != options.requested_scope;
    if scope_forced {
        info!(
            "Existing {} installation found; using {} scope",
            detection.state, scope
        );
    }

    let source_bundle = locate_assets(&roots.project, &config.source_dirs.value)?;
    let paths = roots.paths(scope);
    let command = paths.hook_command();
    debug!("Hook command: {}", command);

    if options.dry_run {
        let settings = apply_registration(&paths, &command, true)?;
        return Ok(InstallReport {
            resolution,
            detection,
            scope,
            scope_forced,
            paths,
            source: source_bundle,
            staged: None,
            settings,
            verification: None,
            dry_run: true,
        });
    }

    let staged = stage_assets(&source_bundle, &paths, &resolution.record.commit_id)?;
    let settings = apply_registration(&paths, &command, false)?;

    let verification = verify_hook(
        &staged.script,
        &roots.project,
        &config.banner.value,
        config.verify_timeout(),
    )
    .await;
    if let Err(failure) = &verification {
        warn!("[{}] verification failed: {}", failure.code().code_string(), failure);
    }

    Ok(InstallReport {
        resolution,
        detection,
        scope,
        scope_forced,
        paths,
        source: source_bundle,
        staged: Some(staged),
        settings,
        verification: Some(verification),
        dry_run: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use serial_test::serial;
    use std::fs;
    use std::path::Path;
    use stdhook_common::layout::{
        COMMIT_PLACEHOLDER, HOOK_SCRIPT, KEYWORD_MAP, LIB_DIR, SOURCE_SUBDIR,
    };
    use stdhook_common::{IdempotentResult, InstallationState, Sourced, registration_fragment};

    struct FixedRelease;

    impl ReleaseSource for FixedRelease {
        async fn latest_tag(&self) -> Result<String, LookupError> {
            Ok("v2.0.0".to_string())
        }

        async fn commit_for(&self, _reference: &str) -> Result<String, LookupError> {
            Ok("c0ffee42".to_string())
        }
    }

    fn make_bundle(root: &Path) {
        let hook = root.join(SOURCE_SUBDIR);
        fs::create_dir_all(hook.join(LIB_DIR)).unwrap();
        fs::write(
            hook.join(HOOK_SCRIPT),
            format!(
                "#!/bin/sh\nSTDHOOK_COMMIT=\"{COMMIT_PLACEHOLDER}\"\ncat > /dev/null\n\
                 printf '%s\\n' '{{\"systemMessage\":\"Coding Standards\",\"hookSpecificOutput\":{{\"hookEventName\":\"UserPromptSubmit\",\"additionalContext\":\"ok\"}}}}'\n"
            ),
        )
        .unwrap();
        fs::write(hook.join(LIB_DIR).join("common.sh"), ":\n").unwrap();
        fs::write(hook.join(KEYWORD_MAP), "{}").unwrap();
    }

    fn config(home: &Path) -> InstallerConfig {
        let mut config = InstallerConfig::defaults(home);
        config.source_dirs = Sourced::default_value(Vec::new());
        config
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial]
    async fn test_fresh_global_install() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        make_bundle(project.path());
        let roots = InstallRoots::new(home.path(), project.path());

        let config = config(home.path());
        let options = InstallOptions::default();

        let report = run_install(&roots, &config, &options, &FixedRelease)
            .await
            .unwrap();

        assert_eq!(report.outcome(), RunOutcome::Success);
        assert_eq!(report.scope, InstallationScope::Global);
        assert_eq!(report.detection.state, InstallationState::None);
        assert_eq!(report.resolution.record.resolved_tag, "v2.0.0");
        let script = fs::read_to_string(&report.paths.script).unwrap();
        assert!(script.contains("c0ffee42"));
        let doc: Value =
            serde_json::from_str(&fs::read_to_string(&report.paths.settings).unwrap()).unwrap();
        assert_eq!(doc, registration_fragment(&report.paths.hook_command()));
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial]
    async fn test_existing_local_install_forces_scope() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        make_bundle(project.path());
        let roots = InstallRoots::new(home.path(), project.path());
        let local = roots.paths(InstallationScope::Local);
        fs::create_dir_all(&local.claude_dir).unwrap();
        fs::write(
            &local.settings,
            serde_json::to_string(&registration_fragment(&local.hook_command())).unwrap(),
        )
        .unwrap();

        let config = config(home.path());
        let options = InstallOptions::default();

        let report = run_install(&roots, &config, &options, &FixedRelease)
            .await
            .unwrap();

        assert_eq!(report.scope, InstallationScope::Local);
        assert!(report.scope_forced);
        assert!(local.backup.exists());
        assert!(!roots.paths(InstallationScope::Global).asset_dir.exists());
        assert_eq!(report.outcome(), RunOutcome::Success);
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        make_bundle(project.path());
        let roots = InstallRoots::new(home.path(), project.path());
        let options = InstallOptions {
            dry_run: true,
            ..InstallOptions::default()
        };

        let report = run_install(&roots, &config(home.path()), &options, &OfflineSource)
            .await
            .unwrap();

        assert_eq!(report.outcome(), RunOutcome::DryRun);
        assert!(matches!(
            report.settings.result(),
            Some(IdempotentResult::WouldChange(_))
        ));
        assert!(!home.path().join(".claude").exists());
    }

    #[tokio::test]
    async fn test_missing_bundle_aborts_before_writing() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let roots = InstallRoots::new(home.path(), project.path());

        let config = config(home.path());
        let options = InstallOptions::default();

        let err = run_install(&roots, &config, &options, &OfflineSource)
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::AssetsNotFound { .. }));
        assert!(!home.path().join(".claude").exists());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(RunOutcome::Success.exit_code(), 0);
        assert_eq!(RunOutcome::Degraded.exit_code(), 0);
        assert_eq!(RunOutcome::DryRun.exit_code(), 0);
        assert_eq!(RunOutcome::CompletedWithErrors.exit_code(), 1);
    }
}
