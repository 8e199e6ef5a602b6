use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// What the fixture hook script prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookBehavior {
    /// `systemMessage` carrying the banner, plus `additionalContext`.
    WellFormed,
    /// Banner and context, but no `systemMessage` field.
    MissingSystemMessage,
}

/// A sandbox with its own home directory and a project directory that
/// holds a hook bundle.
pub struct TestEnv {
    pub home: TempDir,
    pub project: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_hook(HookBehavior::WellFormed)
    }

    pub fn with_hook(behavior: HookBehavior) -> Self {
        crate::test_log!("FIXTURE: Creating sandbox with {:?} hook", behavior);
        let env = Self::without_bundle();
        write_bundle(env.project.path(), behavior);
        env
    }

    pub fn without_bundle() -> Self {
        Self {
            home: TempDir::new().expect("Failed to create home dir"),
            project: TempDir::new().expect("Failed to create project dir"),
        }
    }

    pub fn global_settings(&self) -> PathBuf {
        self.home.path().join(".claude").join("settings.json")
    }

    pub fn local_settings(&self) -> PathBuf {
        self.project.path().join(".claude").join("settings.json")
    }

    pub fn global_assets(&self) -> PathBuf {
        self.home.path().join(".claude").join("hooks").join("stdhook")
    }

    pub fn local_assets(&self) -> PathBuf {
        self.project.path().join(".claude").join("hooks").join("stdhook")
    }

    pub fn write_settings(&self, path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create settings dir");
        fs::write(path, content).expect("Failed to write settings");
    }

    pub fn read_json(&self, path: &Path) -> Value {
        let text = fs::read_to_string(path).expect("Failed to read settings");
        serde_json::from_str(&text).expect("Settings are not valid JSON")
    }

    /// Run the binary offline, sandboxed to this environment.
    pub fn run(&self, args: &[&str]) -> Output {
        crate::test_log!("RUN: stdhook {}", args.join(" "));
        let output = Command::new(env!("CARGO_BIN_EXE_stdhook"))
            .args(args)
            .current_dir(self.project.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("STDHOOK_OFFLINE", "1")
            .env("STDHOOK_SOURCE_DIRS", self.home.path().join("no-bundle-here"))
            .env("STDHOOK_VERIFY_TIMEOUT_SECS", "20")
            .env("NO_COLOR", "1")
            .env_remove("STDHOOK_LOG")
            .env_remove("STDHOOK_REPO")
            .env_remove("STDHOOK_BANNER")
            .env_remove("CLAUDE_PROJECT_DIR")
            .output()
            .expect("Failed to run stdhook");
        crate::test_log!("EXIT: {:?}", output.status.code());
        output
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_bundle(root: &Path, behavior: HookBehavior) {
    let hook = root.join("hook");
    let lib = hook.join("lib");
    fs::create_dir_all(&lib).expect("Failed to create hook/lib");

    let response = match behavior {
        HookBehavior::WellFormed => {
            r#"{"systemMessage":"Coding Standards: rust","hookSpecificOutput":{"hookEventName":"UserPromptSubmit","additionalContext":"Prefer Result over panics."}}"#
        }
        HookBehavior::MissingSystemMessage => {
            r#"{"hookSpecificOutput":{"hookEventName":"UserPromptSubmit","additionalContext":"Coding Standards: rust"}}"#
        }
    };
    let script = format!(
        "#!/bin/sh\nSTDHOOK_COMMIT=\"__STDHOOK_COMMIT__\"\n. \"$(dirname \"$0\")/lib/common.sh\"\ncat > /dev/null\nprintf '%s\\n' '{response}'\n"
    );
    fs::write(hook.join("stdhook-prompt.sh"), script).expect("Failed to write hook script");
    fs::write(lib.join("common.sh"), "STDHOOK_LIB_LOADED=1\n").expect("Failed to write lib");
    fs::write(
        hook.join("keyword-map.json"),
        r#"{"rust": ["rust.md"], "test": ["testing.md"]}"#,
    )
    .expect("Failed to write keyword map");
}
