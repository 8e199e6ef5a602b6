//! Terminal output for the CLI.

pub mod context;
pub mod theme;

pub use context::OutputContext;
pub use theme::{StatusIndicator, Theme};
