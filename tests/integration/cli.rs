//! Binary-level tests that need no network or editor.

use crate::TestProject;
use predicates::prelude::*;

#[test]
fn test_check_without_urls_warns_and_exits_zero() {
    let project = TestProject::new();
    project.write_config("");

    project
        .cmd()
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Extension Installer: No API Urls found in the settings.",
        ));

    let log = project.log();
    assert!(log.contains("[\"ERROR\" - "), "log was: {log}");
    assert!(log.contains("No API Urls found in the settings."));
}

#[test]
fn test_background_check_without_urls_is_quiet() {
    let project = TestProject::new();
    project.write_config("");

    project
        .cmd()
        .arg("background-check")
        .assert()
        .success()
        .stderr(predicate::str::contains("No API Urls").not());
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let project = TestProject::new();

    project
        .cmd()
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("No API Urls found in the settings."));
}

#[test]
fn test_config_path_prints_location() {
    let project = TestProject::new();

    project
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show() {
    let project = TestProject::new();

    project
        .cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));
    assert!(project.config_path().exists());

    project
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://updates.example.com/api/my-extension/latest"))
        .stdout(predicate::str::contains("version_policy = \"exact\""));

    project
        .cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_config_fails_with_message() {
    let project = TestProject::new();
    std::fs::write(project.config_path(), "api_urls = [").unwrap();

    project
        .cmd()
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_ignores_list_empty() {
    let project = TestProject::new();
    project.write_config("");

    project
        .cmd()
        .args(["ignores", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No ignored updates."));
}

#[test]
fn test_ignores_list_and_clear() {
    let project = TestProject::new();
    project.write_config("");
    std::fs::write(
        project.path().join("state.json"),
        r#"{"pub.ext-1.1.0-ignore":{"ignored":true,"set_at":"2020-01-01T00:00:00Z"}}"#,
    )
    .unwrap();

    project
        .cmd()
        .args(["ignores", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pub.ext-1.1.0-ignore"))
        .stdout(predicate::str::contains("(expired)"));

    project
        .cmd()
        .args(["ignores", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 ignore flag(s)"));

    project
        .cmd()
        .args(["ignores", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No ignored updates."));
}

#[test]
fn test_unreachable_endpoint_is_logged_not_fatal() {
    let project = TestProject::new();
    project.write_config("api_urls = [\"http://127.0.0.1:1/api\"]\n");

    project.cmd().arg("check").assert().success();

    let log = project.log();
    assert!(log.contains("Something went wrong during the fetch/installation logic"), "log was: {log}");
}
