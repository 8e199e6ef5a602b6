//! Shared helper functions for stdhook commands.

use crate::ui::OutputContext;
use stdhook_common::{ConfigWarning, ErrorEntry};

/// Indent each line of text with a given prefix.
pub fn indent_lines(text: &str, prefix: &str) -> String {
    let mut out = String::new();
    for (idx, line) in text.lines().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(prefix);
        out.push_str(line);
    }
    out
}

/// Print a catalog entry with its remediation steps to stderr.
pub fn report_error(ctx: &OutputContext, entry: &ErrorEntry) {
    let theme = ctx.theme();
    ctx.error(&theme.error(&entry.format_brief()));
    if !entry.remediation.is_empty() {
        eprintln!();
        eprintln!("{}", theme.muted("Remediation steps:"));
        for (i, step) in entry.remediation.iter().enumerate() {
            eprintln!("  {}. {}", i + 1, step);
        }
    }
}

/// Print a skipped configuration problem with its first remediation hint.
pub fn report_warning(ctx: &OutputContext, warning: &ConfigWarning) {
    ctx.warn(&warning.to_string());
    if let Some(hint) = warning.entry().remediation.first() {
        ctx.detail("hint", hint);
    }
}

/// Short form of a commit id for display.
pub fn short_commit(commit: &str) -> &str {
    let end = commit
        .char_indices()
        .nth(12)
        .map(|(idx, _)| idx)
        .unwrap_or(commit.len());
    &commit[..end]
}
