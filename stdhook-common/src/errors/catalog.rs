//! Error Catalog for stdhook
//!
//! Every failure the installer can report maps to a code in the `SH-Exxx`
//! format. Each code carries a message and remediation steps so that fatal
//! errors always tell the user what to do next.
//!
//! # Example
//!
//! ```rust
//! use stdhook_common::errors::catalog::ErrorCode;
//!
//! let entry = ErrorCode::AssetsNotFound.entry();
//! println!("Error {}: {}", entry.code, entry.message);
//! for step in entry.remediation {
//!     println!("  - {}", step);
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code enumeration covering all stdhook error scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    // =========================================================================
    // Config Errors (E001-E099)
    // =========================================================================
    /// Environment variable has invalid value
    ConfigEnvError,
    /// Configuration file could not be read
    ConfigReadError,
    /// Configuration file contains invalid TOML or an out-of-range value
    ConfigParseError,

    // =========================================================================
    // Scope Errors (E100-E199)
    // =========================================================================
    /// Hook registered in both global and local settings
    ScopeConflict,
    /// Home directory could not be determined
    ScopeHomeUnavailable,
    /// Project directory could not be determined
    ScopeProjectUnavailable,

    // =========================================================================
    // Asset Errors (E200-E299)
    // =========================================================================
    /// No asset bundle found in any search location
    AssetsNotFound,
    /// Copying the asset bundle failed
    AssetsStageFailed,
    /// Setting permissions on the staged hook failed
    AssetsPermissionFailed,

    // =========================================================================
    // Settings Errors (E300-E399)
    // =========================================================================
    /// Settings document could not be read
    SettingsReadFailed,
    /// Settings document is not a JSON object and cannot be merged
    SettingsUnmergeable,
    /// Backup of the settings document failed
    SettingsBackupFailed,
    /// Writing the settings document failed
    SettingsWriteFailed,

    // =========================================================================
    // Network Errors (E400-E499)
    // =========================================================================
    /// Release metadata request failed
    ReleaseLookupFailed,
    /// Release metadata response was malformed
    ReleaseMalformed,
    /// Commit lookup for the resolved tag failed
    CommitLookupFailed,

    // =========================================================================
    // Verify Errors (E500-E599)
    // =========================================================================
    /// Staged hook could not be started
    VerifySpawnFailed,
    /// Staged hook did not answer in time
    VerifyTimeout,
    /// Staged hook exited with a non-zero status
    VerifyExitStatus,
    /// Hook output lacks the banner
    VerifyMissingBanner,
    /// Hook output lacks the systemMessage field
    VerifyMissingSystemMessage,
}

impl ErrorCode {
    /// Returns the numeric error code (without prefix).
    #[must_use]
    pub const fn code_number(&self) -> u16 {
        match self {
            // Config (001-099)
            Self::ConfigEnvError => 1,
            Self::ConfigReadError => 2,
            Self::ConfigParseError => 3,

            // Scope (100-199)
            Self::ScopeConflict => 100,
            Self::ScopeHomeUnavailable => 101,
            Self::ScopeProjectUnavailable => 102,

            // Assets (200-299)
            Self::AssetsNotFound => 200,
            Self::AssetsStageFailed => 201,
            Self::AssetsPermissionFailed => 202,

            // Settings (300-399)
            Self::SettingsReadFailed => 300,
            Self::SettingsUnmergeable => 301,
            Self::SettingsBackupFailed => 302,
            Self::SettingsWriteFailed => 303,

            // Network (400-499)
            Self::ReleaseLookupFailed => 400,
            Self::ReleaseMalformed => 401,
            Self::CommitLookupFailed => 402,

            // Verify (500-599)
            Self::VerifySpawnFailed => 500,
            Self::VerifyTimeout => 501,
            Self::VerifyExitStatus => 502,
            Self::VerifyMissingBanner => 503,
            Self::VerifyMissingSystemMessage => 504,
        }
    }

    /// Returns the formatted error code string (e.g., "SH-E100").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("SH-E{:03}", self.code_number())
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self.code_number() {
            1..=99 => ErrorCategory::Config,
            100..=199 => ErrorCategory::Scope,
            200..=299 => ErrorCategory::Assets,
            300..=399 => ErrorCategory::Settings,
            400..=499 => ErrorCategory::Network,
            _ => ErrorCategory::Verify,
        }
    }

    /// Returns the full error entry with all metadata.
    #[must_use]
    pub fn entry(&self) -> ErrorEntry {
        ErrorEntry {
            code: self.code_string(),
            category: self.category(),
            message: self.message().to_string(),
            remediation: self
                .remediation()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::ConfigEnvError => "Environment variable has invalid value",
            Self::ConfigReadError => "Failed to read configuration file",
            Self::ConfigParseError => "Configuration file contains invalid TOML or values",

            Self::ScopeConflict => {
                "The hook is registered in both the global and the local settings"
            }
            Self::ScopeHomeUnavailable => "Could not determine the home directory",
            Self::ScopeProjectUnavailable => "Could not determine the project directory",

            Self::AssetsNotFound => "Hook asset bundle not found",
            Self::AssetsStageFailed => "Failed to copy the hook asset bundle",
            Self::AssetsPermissionFailed => "Failed to set permissions on the staged hook",

            Self::SettingsReadFailed => "Failed to read the settings document",
            Self::SettingsUnmergeable => "Settings document cannot be merged automatically",
            Self::SettingsBackupFailed => "Failed to back up the settings document",
            Self::SettingsWriteFailed => "Failed to write the settings document",

            Self::ReleaseLookupFailed => "Release metadata lookup failed",
            Self::ReleaseMalformed => "Release metadata response was malformed",
            Self::CommitLookupFailed => "Commit lookup for the resolved version failed",

            Self::VerifySpawnFailed => "Staged hook could not be started",
            Self::VerifyTimeout => "Staged hook did not respond in time",
            Self::VerifyExitStatus => "Staged hook exited with a failure status",
            Self::VerifyMissingBanner => "Hook response is missing the confirmation banner",
            Self::VerifyMissingSystemMessage => "Hook response is missing the systemMessage field",
        }
    }

    /// Returns remediation steps for this error.
    #[must_use]
    pub const fn remediation(&self) -> &'static [&'static str] {
        match self {
            Self::ConfigEnvError => &[
                "Check STDHOOK_* environment variables for typos",
                "Unset the variable to fall back to the default",
            ],
            Self::ConfigReadError => &[
                "Check permissions on ~/.config/stdhook/config.toml",
                "Remove the file to use built-in defaults",
            ],
            Self::ConfigParseError => &[
                "Fix the TOML syntax or the rejected value in ~/.config/stdhook/config.toml",
                "Remove the file to use built-in defaults",
            ],

            Self::ScopeConflict => &[
                "Keep the global install: remove the hook from the project's .claude/settings.json, then re-run 'stdhook install'",
                "Keep the local install: remove the hook from ~/.claude/settings.json, then re-run 'stdhook install --local'",
            ],
            Self::ScopeHomeUnavailable => &["Set the HOME environment variable"],
            Self::ScopeProjectUnavailable => &["Run stdhook from an existing, readable directory"],

            Self::AssetsNotFound => &[
                "Run stdhook from a checkout of the coding-standards repository",
                "Or clone it to ~/.local/share/stdhook",
                "Or point STDHOOK_SOURCE_DIRS at the directory containing hook/",
            ],
            Self::AssetsStageFailed => &[
                "Check free disk space and permissions on the .claude directory",
                "Re-run the installer",
            ],
            Self::AssetsPermissionFailed => &[
                "Check that you own the .claude/hooks/stdhook directory",
            ],

            Self::SettingsReadFailed => &["Check permissions on the settings document"],
            Self::SettingsUnmergeable => &[
                "Fix the JSON syntax of the settings document",
                "Or add the printed fragment by hand",
            ],
            Self::SettingsBackupFailed => &[
                "Check free disk space and write permissions next to settings.json",
            ],
            Self::SettingsWriteFailed => &[
                "Check free disk space and write permissions on the .claude directory",
                "The previous settings are still in place",
            ],

            Self::ReleaseLookupFailed => &[
                "Check network connectivity",
                "Pass --version <tag> to skip the lookup",
            ],
            Self::ReleaseMalformed => &["Pass --version <tag> to skip the lookup"],
            Self::CommitLookupFailed => &[
                "The installed script will record the commit as 'unknown'",
            ],

            Self::VerifySpawnFailed => &[
                "Check that the staged script is executable",
                "Check that its interpreter is installed",
            ],
            Self::VerifyTimeout => &[
                "Run the staged script by hand to see where it hangs",
                "Raise STDHOOK_VERIFY_TIMEOUT_SECS",
            ],
            Self::VerifyExitStatus => &["Run the staged script by hand and inspect stderr"],
            Self::VerifyMissingBanner | Self::VerifyMissingSystemMessage => &[
                "Check that keyword-map.json and lib/ were staged next to the script",
                "Re-run the installer with --edge or a different --version",
            ],
        }
    }

    /// Returns all error codes.
    #[must_use]
    pub fn all() -> &'static [ErrorCode] {
        &[
            Self::ConfigEnvError,
            Self::ConfigReadError,
            Self::ConfigParseError,
            Self::ScopeConflict,
            Self::ScopeHomeUnavailable,
            Self::ScopeProjectUnavailable,
            Self::AssetsNotFound,
            Self::AssetsStageFailed,
            Self::AssetsPermissionFailed,
            Self::SettingsReadFailed,
            Self::SettingsUnmergeable,
            Self::SettingsBackupFailed,
            Self::SettingsWriteFailed,
            Self::ReleaseLookupFailed,
            Self::ReleaseMalformed,
            Self::CommitLookupFailed,
            Self::VerifySpawnFailed,
            Self::VerifyTimeout,
            Self::VerifyExitStatus,
            Self::VerifyMissingBanner,
            Self::VerifyMissingSystemMessage,
        ]
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code_string(), self.message())
    }
}

/// Error category for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Scope,
    Assets,
    Settings,
    Network,
    Verify,
}

impl ErrorCategory {
    /// Returns a human-readable name for the category.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Config => "Configuration",
            Self::Scope => "Scope",
            Self::Assets => "Assets",
            Self::Settings => "Settings",
            Self::Network => "Network",
            Self::Verify => "Verification",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Complete error entry with all metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Error code string (e.g., "SH-E100")
    pub code: String,
    pub category: ErrorCategory,
    pub message: String,
    /// Steps to remediate the error
    pub remediation: Vec<String>,
}

impl ErrorEntry {
    /// Formats the error for display with full remediation steps.
    #[must_use]
    pub fn format_full(&self) -> String {
        let mut output = format!("[{}] {}\n", self.code, self.message);

        if !self.remediation.is_empty() {
            output.push_str("\nRemediation steps:\n");
            for (i, step) in self.remediation.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, step));
            }
        }

        output
    }

    /// Formats the error as a single line.
    #[must_use]
    pub fn format_brief(&self) -> String {
        format!("[{}] {}", self.code, self.message)
    }

    /// Replace the generic remediation steps with run-specific ones.
    #[must_use]
    pub fn with_remediation(mut self, steps: Vec<String>) -> Self {
        self.remediation = steps;
        self
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_brief())
    }
}
