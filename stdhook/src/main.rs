//! stdhook - coding-standards hook installer.

#![forbid(unsafe_code)]

use clap::Parser;
use std::process::ExitCode;
use stdhook::cli::{Cli, filter_args};
use stdhook::commands;
use stdhook::ui::OutputContext;
use stdhook_common::logging::init_logging;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filtered = filter_args(std::env::args_os().map(|a| a.to_string_lossy().into_owned()));
    if filtered.print_version {
        println!("stdhook {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let cli = Cli::parse_from(&filtered.args);
    init_logging(cli.verbose, cli.quiet);
    for flag in &filtered.ignored {
        debug!("Ignoring unknown argument {:?}", flag);
    }

    let ctx = OutputContext::new(cli.quiet, cli.no_color);
    ExitCode::from(commands::dispatch(&cli, &ctx).await)
}
