//! Claude Code hook protocol definitions.
//!
//! Covers the `UserPromptSubmit` payloads exchanged with the staged hook and
//! the shape of a hook registration inside `settings.json`.

use crate::layout::{HOOK_DESCRIPTION, HOOK_EVENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input the host tool sends to a `UserPromptSubmit` hook on stdin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSubmitInput {
    pub hook_event_name: String,
    /// The prompt the user submitted.
    pub prompt: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
}

impl PromptSubmitInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            hook_event_name: HOOK_EVENT.to_string(),
            prompt: prompt.into(),
            session_id: None,
            cwd: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Output a well-formed hook writes to stdout.
///
/// Only presence is checked by the installer; the content of both fields
/// belongs to the hook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptSubmitOutput {
    #[serde(rename = "systemMessage", default)]
    pub system_message: Option<String>,
    #[serde(rename = "hookSpecificOutput", default)]
    pub hook_specific_output: Option<PromptSubmitSpecificOutput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptSubmitSpecificOutput {
    #[serde(rename = "hookEventName", default)]
    pub hook_event_name: Option<String>,
    #[serde(rename = "additionalContext", default)]
    pub additional_context: Option<Value>,
}

impl PromptSubmitOutput {
    /// The `systemMessage` text, if present and not blank.
    pub fn system_message(&self) -> Option<&str> {
        self.system_message
            .as_deref()
            .filter(|message| !message.trim().is_empty())
    }

    /// Whether the structured context field is present and non-null.
    pub fn has_additional_context(&self) -> bool {
        self.hook_specific_output
            .as_ref()
            .and_then(|h| h.additional_context.as_ref())
            .is_some_and(|v| !v.is_null())
    }
}

/// One command entry inside a hook group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookCommand {
    #[serde(rename = "type")]
    pub kind: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A hook group: optional matcher plus an ordered list of commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    pub hooks: Vec<HookCommand>,
}

/// Registration fragment for `command`:
/// `{"hooks": {"UserPromptSubmit": [{"hooks": [{type, command, description}]}]}}`.
pub fn registration_fragment(command: &str) -> Value {
    let group = HookGroup {
        matcher: None,
        hooks: vec![HookCommand {
            kind: "command".to_string(),
            command: command.to_string(),
            description: Some(HOOK_DESCRIPTION.to_string()),
        }],
    };
    serde_json::json!({ "hooks": { HOOK_EVENT: [group] } })
}

/// Whether any registered hook command in `settings` contains `marker`.
///
/// Looks at `hooks.<event>[].hooks[].command` and at the flat
/// `hooks.<event>[].command` form written by older installers.
pub fn document_has_marker(settings: &Value, marker: &str) -> bool {
    let Some(events) = settings.get("hooks").and_then(Value::as_object) else {
        return false;
    };

    events
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .any(|group| group_has_marker(group, marker))
}

fn group_has_marker(group: &Value, marker: &str) -> bool {
    if command_has_marker(group, marker) {
        return true;
    }
    group
        .get("hooks")
        .and_then(Value::as_array)
        .is_some_and(|inner| inner.iter().any(|entry| command_has_marker(entry, marker)))
}

fn command_has_marker(entry: &Value, marker: &str) -> bool {
    entry
        .get("command")
        .and_then(Value::as_str)
        .is_some_and(|cmd| cmd.contains(marker))
}

/// Remove every registration carrying `marker`; returns how many commands
/// were dropped.
///
/// Groups left without commands are dropped, and so are events left without
/// groups. The `hooks` object itself is removed only when this call emptied
/// it.
pub fn remove_registrations(settings: &mut Value, marker: &str) -> usize {
    let Some(root) = settings.as_object_mut() else {
        return 0;
    };
    let Some(events) = root.get_mut("hooks").and_then(Value::as_object_mut) else {
        return 0;
    };

    let mut removed = 0;
    let mut emptied_events = Vec::new();
    for (event, groups) in events.iter_mut() {
        let Some(groups) = groups.as_array_mut() else {
            continue;
        };
        let before_groups = groups.len();
        let mut emptied = Vec::new();
        for (idx, group) in groups.iter_mut().enumerate() {
            if command_has_marker(group, marker) {
                removed += 1;
                emptied.push(idx);
                continue;
            }
            if let Some(inner) = group.get_mut("hooks").and_then(Value::as_array_mut) {
                let before = inner.len();
                inner.retain(|entry| !command_has_marker(entry, marker));
                let dropped = before - inner.len();
                removed += dropped;
                if dropped > 0 && inner.is_empty() {
                    emptied.push(idx);
                }
            }
        }
        for idx in emptied.into_iter().rev() {
            groups.remove(idx);
        }
        if before_groups > 0 && groups.is_empty() {
            emptied_events.push(event.clone());
        }
    }

    for event in &emptied_events {
        events.shift_remove(event);
    }
    if !emptied_events.is_empty() && events.is_empty() {
        root.shift_remove("hooks");
    }

    removed
}
