//! Environment variable parsing with type safety.
//!
//! Provides a type-safe parser for `STDHOOK_*` environment variables with
//! validation, error collection, and source tracking. Invalid values never
//! abort the run: they are collected and the caller falls back to the next
//! configuration layer.

use super::source::Sourced;
use crate::errors::ErrorCode;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during environment variable parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// Invalid value for a variable.
    #[error("Invalid value for {var}: expected {expected}, got '{value}'")]
    InvalidValue {
        var: String,
        expected: String,
        value: String,
    },

    /// Value out of valid range.
    #[error("Value out of range for {var}: {value} (valid: {min}..={max})")]
    OutOfRange {
        var: String,
        value: String,
        min: String,
        max: String,
    },
}

impl EnvError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::ConfigEnvError
    }
}

type Lookup = Box<dyn Fn(&str) -> Option<String>>;

/// Type-safe environment variable parser.
///
/// Collects errors during parsing so all issues can be reported at once.
/// Every getter returns `None` when the variable is unset or invalid.
pub struct EnvParser {
    prefix: &'static str,
    lookup: Lookup,
    errors: Vec<EnvError>,
}

impl EnvParser {
    /// Create a parser over the process environment with the `STDHOOK_` prefix.
    pub fn new() -> Self {
        Self {
            prefix: "STDHOOK_",
            lookup: Box::new(|name| std::env::var(name).ok()),
            errors: Vec::new(),
        }
    }

    /// Create a parser over a fixed set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            prefix: "STDHOOK_",
            lookup: Box::new(move |name| map.get(name).cloned()),
            errors: Vec::new(),
        }
    }

    /// Get all accumulated errors.
    pub fn errors(&self) -> &[EnvError] {
        &self.errors
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Take ownership of errors.
    pub fn take_errors(&mut self) -> Vec<EnvError> {
        std::mem::take(&mut self.errors)
    }

    /// Get the full variable name with prefix.
    fn var_name(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    fn raw(&self, var_name: &str) -> Option<String> {
        (self.lookup)(var_name)
    }

    /// Get a non-empty string value.
    pub fn get_string(&mut self, name: &str) -> Option<Sourced<String>> {
        let var_name = self.var_name(name);
        let value = self.raw(&var_name)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Sourced::from_env(trimmed.to_string(), var_name))
    }

    /// Get a boolean value.
    ///
    /// Accepts: 1, true, yes, on (for true)
    ///          0, false, no, off, "" (for false)
    pub fn get_bool(&mut self, name: &str) -> Option<Sourced<bool>> {
        let var_name = self.var_name(name);
        let value = self.raw(&var_name)?;
        let parsed = match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" | "" => false,
            _ => {
                self.errors.push(EnvError::InvalidValue {
                    var: var_name,
                    expected: "boolean (true/false/1/0/yes/no)".to_string(),
                    value,
                });
                return None;
            }
        };
        Some(Sourced::from_env(parsed, var_name))
    }

    /// Get a u64 value with range validation.
    pub fn get_u64_range(&mut self, name: &str, min: u64, max: u64) -> Option<Sourced<u64>> {
        let var_name = self.var_name(name);
        let value = self.raw(&var_name)?;
        match value.trim().parse::<u64>() {
            Ok(n) if n >= min && n <= max => Some(Sourced::from_env(n, var_name)),
            Ok(n) => {
                self.errors.push(EnvError::OutOfRange {
                    var: var_name,
                    value: n.to_string(),
                    min: min.to_string(),
                    max: max.to_string(),
                });
                None
            }
            Err(_) => {
                self.errors.push(EnvError::InvalidValue {
                    var: var_name,
                    expected: "unsigned 64-bit integer".to_string(),
                    value,
                });
                None
            }
        }
    }

    /// Get a list of paths separated by the platform path separator
    /// (`:` on Unix). Empty segments are skipped.
    pub fn get_path_list(&mut self, name: &str) -> Option<Sourced<Vec<PathBuf>>> {
        let var_name = self.var_name(name);
        let value = self.raw(&var_name)?;
        let paths: Vec<PathBuf> = std::env::split_paths(&value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        if paths.is_empty() {
            return None;
        }
        Some(Sourced::from_env(paths, var_name))
    }
}

impl Default for EnvParser {
    fn default() -> Self {
        Self::new()
    }
}
