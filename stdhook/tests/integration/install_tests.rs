use serde_json::json;
use serial_test::serial;
use std::fs;

use crate::common::fixtures::{stderr, stdout};
use crate::common::{
    HookBehavior, TestEnv, assert_contains, assert_exit_code, assert_path_exists,
    assert_path_missing, init_test_logging,
};

#[test]
#[serial]
fn test_fresh_install_defaults_to_global() {
    init_test_logging();
    crate::test_log!("TEST START: test_fresh_install_defaults_to_global");
    let env = TestEnv::new();

    let output = env.run(&["--version", "v2.0.0"]);

    assert_exit_code(&output, 0);
    let out = stdout(&output);
    assert_contains(&out, "v2.0.0");
    assert_contains(&out, "Verified hook response");

    let script = env.global_assets().join("stdhook-prompt.sh");
    assert_path_exists(&script);
    assert_path_exists(&env.global_assets().join("lib").join("common.sh"));
    assert_path_exists(&env.global_assets().join("keyword-map.json"));
    let staged = fs::read_to_string(&script).unwrap();
    assert_contains(&staged, "STDHOOK_COMMIT=\"unknown\"");

    let doc = env.read_json(&env.global_settings());
    assert_eq!(
        doc,
        json!({"hooks": {"UserPromptSubmit": [{"hooks": [{
            "type": "command",
            "command": format!("\"{}\"", script.display()),
            "description": "Inject matching coding standards into the prompt context"
        }]}]}})
    );
    assert_path_missing(&env.local_settings());
    crate::test_log!("TEST PASS: test_fresh_install_defaults_to_global");
}

#[test]
#[serial]
fn test_local_install_uses_project_dir_variable() {
    init_test_logging();
    let env = TestEnv::new();

    let output = env.run(&["install", "--local"]);

    assert_exit_code(&output, 0);
    let doc = env.read_json(&env.local_settings());
    assert_eq!(
        doc["hooks"]["UserPromptSubmit"][0]["hooks"][0]["command"],
        "\"$CLAUDE_PROJECT_DIR\"/.claude/hooks/stdhook/stdhook-prompt.sh"
    );
    assert_path_exists(&env.local_assets().join("stdhook-prompt.sh"));
    assert_path_missing(&env.global_assets());
}

#[test]
#[serial]
fn test_existing_local_install_forces_local_scope() {
    init_test_logging();
    let env = TestEnv::new();
    let original = r#"{
  "permissions": {"allow": ["Bash(ls)"]},
  "hooks": {"UserPromptSubmit": [{"hooks": [{"type": "command", "command": "\"$CLAUDE_PROJECT_DIR\"/.claude/hooks/stdhook/stdhook-prompt.sh"}]}]}
}"#;
    env.write_settings(&env.local_settings(), original);

    let output = env.run(&[]);

    assert_exit_code(&output, 0);
    assert_contains(&stdout(&output), "existing local installation");
    let backup = env.local_settings().with_file_name("settings.json.backup");
    assert_eq!(fs::read_to_string(&backup).unwrap(), original);
    let doc = env.read_json(&env.local_settings());
    assert_eq!(doc["permissions"]["allow"][0], "Bash(ls)");
    assert_eq!(
        doc["hooks"]["UserPromptSubmit"][0]["hooks"][0]["description"],
        "Inject matching coding standards into the prompt context"
    );
    assert_path_missing(&env.global_assets());
    assert_path_missing(&env.global_settings());
}

#[test]
#[serial]
fn test_conflict_aborts_without_touching_files() {
    init_test_logging();
    let env = TestEnv::new();
    let global = r#"{"hooks":{"UserPromptSubmit":[{"hooks":[{"type":"command","command":"/g/stdhook-prompt.sh"}]}]}}"#;
    let local = r#"{"hooks":{"UserPromptSubmit":[{"hooks":[{"type":"command","command":"/l/stdhook-prompt.sh"}]}]}}"#;
    env.write_settings(&env.global_settings(), global);
    env.write_settings(&env.local_settings(), local);

    let output = env.run(&[]);

    assert_exit_code(&output, 2);
    let err = stderr(&output);
    assert_contains(&err, "SH-E100");
    assert_contains(&err, "1. ");
    assert_contains(&err, "2. ");
    assert_contains(&err, "--local");
    assert_eq!(fs::read_to_string(env.global_settings()).unwrap(), global);
    assert_eq!(fs::read_to_string(env.local_settings()).unwrap(), local);
    assert_path_missing(&env.global_assets());
    assert_path_missing(&env.local_assets());
    assert_path_missing(&env.global_settings().with_file_name("settings.json.backup"));
}

#[test]
#[serial]
fn test_offline_falls_back_to_edge() {
    init_test_logging();
    let env = TestEnv::new();

    let output = env.run(&[]);

    assert_exit_code(&output, 0);
    assert_contains(&stderr(&output), "No stable release found");
    assert_contains(&stdout(&output), "edge");
    assert_path_exists(&env.global_settings());
}

#[test]
#[serial]
fn test_edge_flag_warns() {
    init_test_logging();
    let env = TestEnv::new();

    let output = env.run(&["--edge"]);

    assert_exit_code(&output, 0);
    assert_contains(&stderr(&output), "unstable");
}

#[test]
#[serial]
fn test_unmergeable_settings_prints_manual_instructions() {
    init_test_logging();
    let env = TestEnv::new();
    let broken = "{ \"model\": \"opus\", }";
    env.write_settings(&env.global_settings(), broken);

    let output = env.run(&[]);

    assert_exit_code(&output, 0);
    let out = stdout(&output);
    assert_contains(&out, "by hand");
    assert_contains(&out, "\"UserPromptSubmit\"");
    assert_contains(&out, "Verified hook response");
    assert_contains(&stderr(&output), "SH-E301");
    assert_eq!(fs::read_to_string(env.global_settings()).unwrap(), broken);
    assert_path_missing(&env.global_settings().with_file_name("settings.json.backup"));
}

#[test]
#[serial]
fn test_second_install_is_byte_identical() {
    init_test_logging();
    let env = TestEnv::new();

    assert_exit_code(&env.run(&["--version", "v1.0.0"]), 0);
    let first = fs::read(env.global_settings()).unwrap();

    let output = env.run(&["--version", "v1.0.0"]);

    assert_exit_code(&output, 0);
    assert_contains(&stdout(&output), "already registered");
    assert_eq!(fs::read(env.global_settings()).unwrap(), first);
    assert_path_missing(&env.global_settings().with_file_name("settings.json.backup"));
}

#[test]
#[serial]
fn test_failed_verification_exits_one_and_keeps_artifacts() {
    init_test_logging();
    let env = TestEnv::with_hook(HookBehavior::MissingSystemMessage);

    let output = env.run(&[]);

    assert_exit_code(&output, 1);
    let err = stderr(&output);
    assert_contains(&err, "completed with errors");
    assert_contains(&err, "systemMessage");
    assert_path_exists(&env.global_assets().join("stdhook-prompt.sh"));
    assert_path_exists(&env.global_settings());
}

#[test]
#[serial]
fn test_missing_bundle_is_fatal() {
    init_test_logging();
    let env = TestEnv::without_bundle();

    let output = env.run(&[]);

    assert_exit_code(&output, 2);
    assert_contains(&stderr(&output), "SH-E200");
    assert_path_missing(&env.home.path().join(".claude"));
}

#[test]
#[serial]
fn test_dry_run_changes_nothing() {
    init_test_logging();
    let env = TestEnv::new();

    let output = env.run(&["--dry-run", "--local"]);

    assert_exit_code(&output, 0);
    assert_contains(&stdout(&output), "DRY RUN");
    assert_path_missing(&env.project.path().join(".claude"));
}

#[test]
#[serial]
fn test_broken_config_file_warns_with_code() {
    init_test_logging();
    let env = TestEnv::new();
    let config = env.home.path().join(".config").join("stdhook").join("config.toml");
    env.write_settings(&config, "repo = [");

    let output = env.run(&[]);

    assert_exit_code(&output, 0);
    assert_contains(&stderr(&output), "[SH-E003]");
    assert_path_exists(&env.global_settings());
}
