//! Post-install verification.
//!
//! Runs the staged hook once with a synthetic prompt and checks that its
//! response carries both the banner and a `systemMessage` field.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use stdhook_common::layout::HOOK_EVENT;
use stdhook_common::{ErrorCode, PromptSubmitInput, PromptSubmitOutput};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Prompt sent to the hook; mentions enough keywords to match common rules.
pub const VERIFY_PROMPT: &str =
    "stdhook install check: write a Rust function with error handling and unit tests";

const VERIFY_SESSION: &str = "stdhook-verify";
const STDERR_TAIL: usize = 400;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyFailure {
    #[error("could not run hook: {0}")]
    Spawn(String),

    #[error("hook did not finish within {0:?}")]
    Timeout(Duration),

    #[error("hook exited with {}{}", describe_status(.code), stderr_suffix(.stderr))]
    ExitStatus { code: Option<i32>, stderr: String },

    #[error("hook output does not contain the banner {0:?}")]
    MissingBanner(String),

    #[error("hook output has no systemMessage field")]
    MissingSystemMessage,
}

impl VerifyFailure {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Spawn(_) => ErrorCode::VerifySpawnFailed,
            Self::Timeout(_) => ErrorCode::VerifyTimeout,
            Self::ExitStatus { .. } => ErrorCode::VerifyExitStatus,
            Self::MissingBanner(_) => ErrorCode::VerifyMissingBanner,
            Self::MissingSystemMessage => ErrorCode::VerifyMissingSystemMessage,
        }
    }
}

fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

/// A passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifySuccess {
    pub elapsed: Duration,
    pub stdout_bytes: usize,
}

/// Run `script` from `cwd` and check its response.
pub async fn verify_hook(
    script: &Path,
    cwd: &Path,
    banner: &str,
    limit: Duration,
) -> Result<VerifySuccess, VerifyFailure> {
    let payload = PromptSubmitInput::new(VERIFY_PROMPT)
        .with_session(VERIFY_SESSION)
        .with_cwd(cwd.to_string_lossy());
    let payload =
        serde_json::to_vec(&payload).map_err(|e| VerifyFailure::Spawn(e.to_string()))?;

    debug!("Verifying {} ({} event, timeout {:?})", script.display(), HOOK_EVENT, limit);
    let started = Instant::now();

    let mut child = Command::new(script)
        .current_dir(cwd)
        .env("CLAUDE_PROJECT_DIR", cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| VerifyFailure::Spawn(e.to_string()))?;

    let stdin = child.stdin.take();
    let run = async move {
        if let Some(mut stdin) = stdin {
            // A hook that ignores stdin may close it early.
            if let Err(e) = stdin.write_all(&payload).await {
                debug!("Writing hook stdin failed: {}", e);
            }
            drop(stdin);
        }
        child.wait_with_output().await
    };

    let output = match tokio::time::timeout(limit, run).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return Err(VerifyFailure::Spawn(e.to_string())),
        Err(_) => return Err(VerifyFailure::Timeout(limit)),
    };

    if !output.status.success() {
        return Err(VerifyFailure::ExitStatus {
            code: output.status.code(),
            stderr: tail(&String::from_utf8_lossy(&output.stderr), STDERR_TAIL),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    check_response(&stdout, banner)?;

    Ok(VerifySuccess {
        elapsed: started.elapsed(),
        stdout_bytes: output.stdout.len(),
    })
}

/// Check a hook response for the banner and the `systemMessage` field.
///
/// The banner may appear in the message itself or anywhere else on stdout.
pub fn check_response(stdout: &str, banner: &str) -> Result<(), VerifyFailure> {
    let response = parse_response(stdout);
    let message = response.as_ref().and_then(PromptSubmitOutput::system_message);

    let banner_seen = stdout.contains(banner) || message.is_some_and(|m| m.contains(banner));
    if !banner_seen {
        return Err(VerifyFailure::MissingBanner(banner.to_string()));
    }
    if message.is_none() {
        return Err(VerifyFailure::MissingSystemMessage);
    }
    if !response.is_some_and(|r| r.has_additional_context()) {
        debug!("Hook response carries no hookSpecificOutput.additionalContext");
    }
    Ok(())
}

/// Parse the whole output as JSON, else its last non-empty line.
fn parse_response(stdout: &str) -> Option<PromptSubmitOutput> {
    serde_json::from_str(stdout.trim()).ok().or_else(|| {
        stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .and_then(|line| serde_json::from_str(line).ok())
    })
}

fn tail(text: &str, max: usize) -> String {
    let text = text.trim();
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    let skipped: String = text.chars().skip(count - max).collect();
    format!("...{skipped}")
}
