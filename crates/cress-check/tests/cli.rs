//! End-to-end tests for the `cress-check` binary.
#![expect(clippy::expect_used, reason = "tests fail loudly on fixture setup errors")]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const PASSING: &str = "\
Feature: Addition
  Scenario: Add two numbers
    Given I have entered 2
    When I press add
";

const OUTLINE: &str = "\
Feature: Doubling
  Scenario Outline: Double
    When I double <n>

    Examples:
      | n |
      | 1 |
      | 4 |
";

const FRENCH: &str = "\
Fonctionnalité: Addition
  Scénario: Ajouter
    Soit un nombre
";

const BROKEN: &str = "Feature: Broken\n  Scenario: s\n    | a |\n";

#[fixture]
fn workspace() -> TempDir {
    TempDir::new().expect("temporary directory")
}

fn write(root: &Path, name: &str, text: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().expect("file has a parent")).expect("create directories");
    fs::write(path, text).expect("write feature");
}

fn command(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cress-check").expect("binary exists");
    cmd.current_dir(root)
        .env_remove("CRESS_LOG_LEVEL")
        .env_remove("CRESS_LANGUAGE");
    cmd
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf8 stdout")
}

#[rstest]
fn reports_every_feature_in_path_order(workspace: TempDir) {
    let root = workspace.path();
    write(root, "features/b.feature", PASSING);
    write(root, "features/a/double.feature", OUTLINE);
    write(root, "features/README.md", "not a feature");

    let output = command(root).arg("features").output().expect("runs");
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "features/a/double.feature: ok: Doubling (1 scenario, 2 examples)",
            "features/b.feature: ok: Addition (1 scenario, 1 example)",
            "2 files checked, 0 failed",
        ]
    );
}

#[rstest]
fn expand_lists_resolved_steps(workspace: TempDir) {
    let root = workspace.path();
    write(root, "double.feature", OUTLINE);

    let output = command(root)
        .args(["--expand", "double.feature"])
        .output()
        .expect("runs");
    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        stdout(&output),
        "double.feature: ok: Doubling (1 scenario, 2 examples)\n  \
         Scenario Outline: Double [n = 1]\n    When I double 1\n  \
         Scenario Outline: Double [n = 4]\n    When I double 4\n\
         1 file checked, 0 failed\n"
    );
}

#[rstest]
fn syntax_errors_fail_the_run(workspace: TempDir) {
    let root = workspace.path();
    write(root, "good.feature", PASSING);
    write(root, "broken.feature", BROKEN);

    let output = command(root)
        .args(["good.feature", "broken.feature"])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(
        text.contains("broken.feature:3:5: error: table must follow a step\n    | a |\n"),
        "{text}"
    );
    assert!(text.ends_with("2 files checked, 1 failed\n"), "{text}");
}

#[rstest]
fn json_output_describes_each_file(workspace: TempDir) {
    let root = workspace.path();
    write(root, "double.feature", OUTLINE);
    write(root, "broken.feature", BROKEN);

    let output = command(root)
        .args(["--format", "json", "--expand", "."])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON report");
    assert_eq!(report.pointer("/checked"), Some(&serde_json::json!(2)));
    assert_eq!(report.pointer("/failed"), Some(&serde_json::json!(1)));
    assert_eq!(
        report.pointer("/files/0/error/message"),
        Some(&serde_json::json!("table must follow a step"))
    );
    assert_eq!(
        report.pointer("/files/1/feature/scenarios/0/examples/1/steps"),
        Some(&serde_json::json!(["When I double 4"]))
    );
}

#[rstest]
#[case::flag(&["--language", "fr"], None)]
#[case::environment(&[], Some("fr"))]
#[case::flag_overrides_environment(&["--language", "fr"], Some("de"))]
fn language_comes_from_flag_or_environment(
    workspace: TempDir,
    #[case] flags: &[&str],
    #[case] env: Option<&str>,
) {
    let root = workspace.path();
    write(root, "ajout.feature", FRENCH);

    let mut cmd = command(root);
    cmd.args(flags).arg("ajout.feature");
    if let Some(language) = env {
        cmd.env("CRESS_LANGUAGE", language);
    }
    let output = cmd.output().expect("runs");
    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).starts_with("ajout.feature: ok: Addition (1 scenario, 1 example)"));
}

#[rstest]
fn unknown_language_is_a_file_error(workspace: TempDir) {
    let root = workspace.path();
    write(root, "odd.feature", PASSING);

    let output = command(root)
        .args(["--language", "xx", "odd.feature"])
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("odd.feature: error: unknown language 'xx'"));
}

#[rstest]
fn invalid_log_level_in_environment_exits_with_two(workspace: TempDir) {
    let root = workspace.path();
    write(root, "good.feature", PASSING);

    let output = command(root)
        .env("CRESS_LOG_LEVEL", "chatty")
        .arg("good.feature")
        .output()
        .expect("runs");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown log level 'chatty'"), "{stderr}");
}

#[rstest]
fn missing_paths_are_reported(workspace: TempDir) {
    let output = command(workspace.path())
        .arg("nowhere")
        .output()
        .expect("runs");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no such file or directory: nowhere"), "{stderr}");
}

#[rstest]
fn paths_are_required(workspace: TempDir) {
    let output = command(workspace.path()).output().expect("runs");
    assert_eq!(output.status.code(), Some(2));
}
