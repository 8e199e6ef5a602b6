//! stdhook: installer for the coding-standards `UserPromptSubmit` hook.
//!
//! The binary is a thin wrapper around [`commands::dispatch`]; the install
//! engine in [`install`] is usable on its own.

pub mod cli;
pub mod commands;
pub mod install;
pub mod ui;
