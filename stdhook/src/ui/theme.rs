//! Colour theme and status glyphs.

use colored::Colorize;

/// Styling helpers. Every method returns plain text when colour is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    color: bool,
}

impl Theme {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn format_header(&self, text: &str) -> String {
        if self.color {
            text.bold().underline().to_string()
        } else {
            format!("{text}\n{}", "=".repeat(text.chars().count()))
        }
    }

    pub fn highlight(&self, text: &str) -> String {
        self.paint(text, |t| t.cyan().bold().to_string())
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed().to_string())
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, |t| t.green().to_string())
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow().to_string())
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, |t| t.red().bold().to_string())
    }

    fn paint(&self, text: &str, f: impl Fn(&str) -> String) -> String {
        if self.color { f(text) } else { text.to_string() }
    }
}

/// Leading glyph for a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    Success,
    Warning,
    Error,
    Info,
    Skipped,
}

impl StatusIndicator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Error => "✗",
            Self::Info => "•",
            Self::Skipped => "-",
        }
    }

    pub fn display(&self, theme: &Theme) -> String {
        let symbol = self.symbol();
        match self {
            Self::Success => theme.success(symbol),
            Self::Warning => theme.warning(symbol),
            Self::Error => theme.error(symbol),
            Self::Info => theme.highlight(symbol),
            Self::Skipped => theme.muted(symbol),
        }
    }
}
