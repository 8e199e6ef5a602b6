//! Command-line interface.
//!
//! Unknown flags are dropped before clap sees them so that scripts written
//! for newer or older releases keep working.

use clap::{CommandFactory, Parser, Subcommand};
use std::collections::{HashMap, HashSet};
use stdhook_common::InstallationScope;

#[derive(Parser, Debug)]
#[command(
    name = "stdhook",
    author,
    about = "Install the coding-standards UserPromptSubmit hook",
    disable_version_flag = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Install for every project under this user (default)
    #[arg(long, global = true, conflicts_with = "local")]
    pub global: bool,

    /// Install for the current project only
    #[arg(long, global = true)]
    pub local: bool,

    /// Track the development branch instead of the latest release
    #[arg(long, global = true)]
    pub edge: bool,

    /// Install a specific release tag
    #[arg(long = "version", value_name = "TAG", global = true)]
    pub version: Option<String>,

    /// Show what would change without writing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print warnings, errors and required manual steps
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Commands {
    /// Install or update the hook (default)
    #[default]
    Install,
    /// Show where the hook is installed
    Status,
    /// Remove the hook registration and staged assets
    Uninstall,
}

impl Cli {
    /// Scope given explicitly on the command line.
    pub fn scope(&self) -> Option<InstallationScope> {
        if self.local {
            Some(InstallationScope::Local)
        } else if self.global {
            Some(InstallationScope::Global)
        } else {
            None
        }
    }
}

/// Command line after unknown flags were removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredArgs {
    pub args: Vec<String>,
    pub ignored: Vec<String>,
    /// `-V` was given.
    pub print_version: bool,
}

/// Drop flags clap would reject. A bare word right after an unknown flag is
/// taken as that flag's value unless it names a subcommand.
pub fn filter_args(raw: impl IntoIterator<Item = String>) -> FilteredArgs {
    let cmd = Cli::command();
    let mut longs: HashMap<String, bool> = HashMap::from([("help".to_string(), false)]);
    let mut shorts: HashMap<char, bool> = HashMap::from([('h', false)]);
    for arg in cmd.get_arguments() {
        let takes_value = arg.get_action().takes_values();
        if let Some(long) = arg.get_long() {
            longs.insert(long.to_string(), takes_value);
        }
        if let Some(short) = arg.get_short() {
            shorts.insert(short, takes_value);
        }
    }
    let subcommands: HashSet<String> = cmd
        .get_subcommands()
        .map(|s| s.get_name().to_string())
        .chain(std::iter::once("help".to_string()))
        .collect();
    let is_value = |next: &String| !next.starts_with('-') && !subcommands.contains(next);

    let mut out = FilteredArgs::default();
    let mut iter = raw.into_iter();
    if let Some(program) = iter.next() {
        out.args.push(program);
    }
    let mut iter = iter.peekable();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            out.args.push(arg);
            out.args.extend(iter.by_ref());
            break;
        }

        if let Some(body) = arg.strip_prefix("--") {
            let (name, inline_value) = match body.split_once('=') {
                Some((name, _)) => (name, true),
                None => (body, false),
            };
            match longs.get(name) {
                Some(&takes_value) => {
                    out.args.push(arg.clone());
                    if takes_value
                        && !inline_value
                        && let Some(value) = iter.next()
                    {
                        out.args.push(value);
                    }
                }
                None => {
                    out.ignored.push(arg.clone());
                    if !inline_value
                        && let Some(value) = iter.next_if(|next| is_value(next))
                    {
                        out.ignored.push(value);
                    }
                }
            }
            continue;
        }

        if let Some(cluster) = arg.strip_prefix('-').filter(|c| !c.is_empty()) {
            let mut kept = String::new();
            let mut unknown = String::new();
            for c in cluster.chars() {
                match (c, shorts.get(&c)) {
                    ('V', None) => out.print_version = true,
                    (_, Some(false)) => kept.push(c),
                    _ => unknown.push(c),
                }
            }
            if !unknown.is_empty() {
                out.ignored.push(format!("-{unknown}"));
            }
            if !kept.is_empty() {
                out.args.push(format!("-{kept}"));
            }
            continue;
        }

        out.args.push(arg);
    }

    out
}
