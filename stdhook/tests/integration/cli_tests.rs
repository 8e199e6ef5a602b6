use std::process::Command;

use crate::common::fixtures::stdout;
use crate::common::{TestEnv, assert_contains, assert_exit_code, init_test_logging};

#[test]
fn test_help_lists_subcommands() {
    init_test_logging();
    crate::test_log!("TEST START: test_help_lists_subcommands");

    let output = Command::new(env!("CARGO_BIN_EXE_stdhook"))
        .arg("--help")
        .output()
        .expect("Failed to run stdhook --help");

    assert!(output.status.success(), "stdhook --help failed");
    let out = stdout(&output);
    assert_contains(&out, "coding-standards");
    assert_contains(&out, "uninstall");
    assert_contains(&out, "--version <TAG>");
}

#[test]
fn test_capital_v_prints_tool_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_stdhook"))
        .arg("-V")
        .output()
        .expect("Failed to run stdhook -V");

    assert_exit_code(&output, 0);
    assert_contains(&stdout(&output), env!("CARGO_PKG_VERSION"));
}

#[test]
#[serial_test::serial]
fn test_unknown_flags_are_ignored() {
    init_test_logging();
    let env = TestEnv::new();

    let output = env.run(&["--frobnicate", "--channel=beta", "status"]);

    assert_exit_code(&output, 0);
    assert_contains(&stdout(&output), "state: not installed");
}
