//! Command implementations.

pub mod helpers;
pub mod install;
pub mod status;
pub mod uninstall;

use crate::cli::{Cli, Commands};
use crate::install::{InstallOptions, VersionRequest};
use crate::ui::OutputContext;
use helpers::{report_error, report_warning};
use stdhook_common::{InstallRoots, InstallerConfig};
use tracing::debug;

/// Dispatch a parsed command line; returns the process exit code.
pub async fn dispatch(cli: &Cli, ctx: &OutputContext) -> u8 {
    let roots = match InstallRoots::from_process() {
        Ok(roots) => roots,
        Err(e) => {
            report_error(ctx, &e.code().entry());
            ctx.error(&e.to_string());
            return install::EXIT_FATAL;
        }
    };
    let config = InstallerConfig::load(&roots.home);
    debug!("Home {:?}, project {:?}", roots.home, roots.project);

    let code = match cli.command.unwrap_or_default() {
        Commands::Install => {
            for warning in &config.warnings {
                report_warning(ctx, warning);
            }
            let options = InstallOptions {
                requested_scope: cli.scope().unwrap_or_default(),
                version: VersionRequest {
                    override_tag: cli.version.clone(),
                    edge: cli.edge,
                },
                dry_run: cli.dry_run,
            };
            install::install(ctx, &roots, &config, &options).await
        }
        Commands::Status => status::status(ctx, &roots, &config),
        Commands::Uninstall => uninstall::uninstall(ctx, &roots, cli.scope(), cli.dry_run),
    };
    code
}
