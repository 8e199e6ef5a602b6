use serial_test::serial;

use crate::common::fixtures::{stderr, stdout};
use crate::common::{
    TestEnv, assert_contains, assert_exit_code, assert_path_exists, assert_path_missing,
    init_test_logging,
};

#[test]
#[serial]
fn test_status_reports_installed_scope() {
    init_test_logging();
    let env = TestEnv::new();
    assert_exit_code(&env.run(&["--version", "v3.0.0"]), 0);

    let output = env.run(&["status"]);

    assert_exit_code(&output, 0);
    let out = stdout(&output);
    assert_contains(&out, "state: installed (global)");
    assert_contains(&out, "Global: registered");
    assert_contains(&out, "unknown");
}

#[test]
#[serial]
fn test_status_conflict_exits_two() {
    init_test_logging();
    let env = TestEnv::new();
    let doc = r#"{"hooks":{"UserPromptSubmit":[{"hooks":[{"type":"command","command":"/x/stdhook-prompt.sh"}]}]}}"#;
    env.write_settings(&env.global_settings(), doc);
    env.write_settings(&env.local_settings(), doc);

    let output = env.run(&["status"]);

    assert_exit_code(&output, 2);
    assert_contains(&stderr(&output), "SH-E100");
}

#[test]
#[serial]
fn test_uninstall_after_install() {
    init_test_logging();
    let env = TestEnv::new();
    env.write_settings(&env.global_settings(), r#"{"model": "sonnet"}"#);
    assert_exit_code(&env.run(&[]), 0);
    assert_path_exists(&env.global_assets());

    let output = env.run(&["uninstall"]);

    assert_exit_code(&output, 0);
    assert_path_missing(&env.global_assets());
    let doc = env.read_json(&env.global_settings());
    assert_eq!(doc, serde_json::json!({"model": "sonnet"}));

    let again = env.run(&["uninstall"]);
    assert_exit_code(&again, 0);
    assert_contains(&stdout(&again), "nothing registered");
}

#[test]
#[serial]
fn test_uninstall_one_side_of_conflict() {
    init_test_logging();
    let env = TestEnv::new();
    let doc = r#"{"hooks":{"UserPromptSubmit":[{"hooks":[{"type":"command","command":"/x/stdhook-prompt.sh"}]}]}}"#;
    env.write_settings(&env.global_settings(), doc);
    env.write_settings(&env.local_settings(), doc);

    assert_exit_code(&env.run(&["uninstall"]), 2);
    assert_exit_code(&env.run(&["uninstall", "--local"]), 0);

    let output = env.run(&["status"]);
    assert_exit_code(&output, 0);
    assert_contains(&stdout(&output), "state: installed (global)");
}
