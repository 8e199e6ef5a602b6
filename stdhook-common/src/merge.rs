//! JSON document merge.
//!
//! Objects merge key by key, recursively. Anything else (arrays, strings,
//! numbers, booleans, null) in the overlay replaces the base value outright.
//! That makes an ordered sequence such as `hooks.UserPromptSubmit` a targeted
//! overwrite: partial merges of ordered command lists have no single right
//! answer.
//!
//! This module knows nothing about hooks or scopes.

use serde_json::Value;
use thiserror::Error;

/// Reasons two documents cannot be merged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("existing document is a JSON {found}, expected an object")]
    ExistingNotObject { found: &'static str },

    #[error("fragment is a JSON {found}, expected an object")]
    FragmentNotObject { found: &'static str },
}

/// Merge `overlay` into `base` in place.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Merge a fragment into an optional existing document.
///
/// An absent (or `null`) document yields the fragment itself. Both sides must
/// otherwise be JSON objects.
pub fn merge_documents(existing: Option<&Value>, fragment: &Value) -> Result<Value, MergeError> {
    if !fragment.is_object() {
        return Err(MergeError::FragmentNotObject {
            found: json_type_name(fragment),
        });
    }

    match existing {
        None | Some(Value::Null) => Ok(fragment.clone()),
        Some(doc @ Value::Object(_)) => {
            let mut merged = doc.clone();
            deep_merge(&mut merged, fragment);
            Ok(merged)
        }
        Some(other) => Err(MergeError::ExistingNotObject {
            found: json_type_name(other),
        }),
    }
}

/// Human-readable JSON type name for diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
