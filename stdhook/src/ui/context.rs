//! Output context shared by every command.

use super::theme::{StatusIndicator, Theme};
use std::io::IsTerminal;

/// Where and how user-facing text is printed.
///
/// Progress and results go to stdout and are silenced by `--quiet`.
/// Warnings and errors go to stderr and are always shown.
#[derive(Debug, Clone)]
pub struct OutputContext {
    quiet: bool,
    theme: Theme,
}

impl OutputContext {
    /// Colour is used only on a terminal, and never with `--no-color` or
    /// `NO_COLOR` set.
    pub fn new(quiet: bool, no_color: bool) -> Self {
        let color = !no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_terminal();
        colored::control::set_override(color);
        Self {
            quiet,
            theme: Theme::new(color),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("{}", self.theme.format_header(title));
            println!();
        }
    }

    pub fn line(&self, text: &str) {
        if !self.quiet {
            println!("{text}");
        }
    }

    pub fn status(&self, indicator: StatusIndicator, text: &str) {
        match indicator {
            StatusIndicator::Warning | StatusIndicator::Error => {
                eprintln!("{} {}", indicator.display(&self.theme), text);
            }
            _ if !self.quiet => println!("{} {}", indicator.display(&self.theme), text),
            _ => {}
        }
    }

    /// Key/value detail line under a status line.
    pub fn detail(&self, label: &str, value: &str) {
        if !self.quiet {
            println!(
                "  {} {:<10} {}",
                self.theme.muted("→"),
                format!("{label}:"),
                value
            );
        }
    }

    pub fn success(&self, text: &str) {
        self.status(StatusIndicator::Success, text);
    }

    pub fn info(&self, text: &str) {
        self.status(StatusIndicator::Info, text);
    }

    pub fn warn(&self, text: &str) {
        self.status(StatusIndicator::Warning, text);
    }

    pub fn error(&self, text: &str) {
        self.status(StatusIndicator::Error, text);
    }

    /// Block of text printed even in quiet mode, such as manual-edit
    /// instructions the user has to act on.
    pub fn always(&self, text: &str) {
        println!("{text}");
    }
}
