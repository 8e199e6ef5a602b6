//! Shared types and utilities for stdhook.
//!
//! The installer binary drives these pieces in order: version resolution,
//! installation-state detection, asset staging, settings merge and
//! verification. Everything that has no knowledge of the CLI lives here.

pub mod config;
pub mod errors;
pub mod fsops;
pub mod layout;
pub mod logging;
pub mod merge;
pub mod protocol;
pub mod types;

pub use config::{ConfigSource, ConfigWarning, InstallerConfig, Sourced};
pub use errors::{ErrorCategory, ErrorCode, ErrorEntry};
pub use layout::{InstallRoots, RootsError, ScopePaths};
pub use merge::{MergeError, deep_merge, merge_documents};
pub use protocol::{PromptSubmitInput, PromptSubmitOutput, registration_fragment};
pub use types::{IdempotentResult, InstallationScope, InstallationState, VersionRecord};
