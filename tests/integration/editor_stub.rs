//! Full runs of the binary against a local update endpoint and a shell
//! script standing in for the editor launcher.

use crate::{StubServer, TestProject, metadata, toml_string};
use predicates::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

const PACKAGE: &[u8] = b"PK\x03\x04 not really a vsix";

/// Editor stub reporting pub.ext at `installed`. Every invocation is
/// appended to `calls.log`; install calls also record whether the package
/// file existed at that moment.
fn editor_stub(project: &TestProject, installed: &str, install_exit: i32) -> PathBuf {
    let script = project.path().join("code-stub");
    let calls = project.path().join("calls.log");
    let body = format!(
        "#!/bin/sh\n\
         echo \"$@\" >> '{calls}'\n\
         case \"$1\" in\n\
           --list-extensions) echo 'other.thing@0.1.0'; echo 'pub.ext@{installed}' ;;\n\
           --install-extension) if [ -f \"$2\" ]; then echo present >> '{calls}'; fi; exit {install_exit} ;;\n\
         esac\n",
        calls = calls.display(),
    );
    std::fs::write(&script, body).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

fn calls(project: &TestProject) -> String {
    std::fs::read_to_string(project.path().join("calls.log")).unwrap_or_default()
}

/// Endpoint publishing pub.ext 1.2.0, config pointing at it and the stub.
fn setup(project: &TestProject, installed: &str, install_exit: i32) {
    let server = StubServer::bind();
    let api = server.url("/api");
    let download = server.url("/ext.vsix");
    server.serve(vec![
        ("/api", 200, metadata((1, 2, 0), &download)),
        ("/ext.vsix", 200, PACKAGE.to_vec()),
    ]);

    let stub = editor_stub(project, installed, install_exit);
    project.write_config(&format!(
        "api_urls = [\"{api}\"]\neditor_command = {}\n",
        toml_string(&stub)
    ));
}

#[test]
fn test_check_installs_and_deletes_package() {
    let project = TestProject::new();
    setup(&project, "1.1.0", 0);

    project
        .cmd()
        .args(["--yes", "check"])
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("Great news! ext got installed."));

    let package = project.downloads().join("ext.vsix");
    let calls = calls(&project);
    assert!(
        calls.contains(&format!("--install-extension {} --force", package.display())),
        "calls were: {calls}"
    );
    assert!(calls.contains("present"), "package missing at install time: {calls}");
    assert!(!package.exists(), "package should be deleted after install");

    let log = project.log();
    assert!(log.contains("Installing latest version of ext"));
    assert!(log.contains("/ext.vsix"));
}

#[test]
fn test_install_failure_still_deletes_package() {
    let project = TestProject::new();
    setup(&project, "1.1.0", 3);

    project.cmd().arg("check").write_stdin("").assert().success();

    assert!(calls(&project).contains("--install-extension"));
    assert!(!project.downloads().join("ext.vsix").exists());
    assert!(project.log().contains("[\"ERROR\" - "));
    assert!(!project.log().contains("Great news!"));
}

#[test]
fn test_background_check_up_to_date() {
    let project = TestProject::new();
    setup(&project, "1.2.0", 0);

    project.cmd().arg("background-check").write_stdin("").assert().success();

    assert!(project.log().contains("Ext is up to date"));
    assert!(!calls(&project).contains("--install-extension"));
}

#[test]
fn test_background_check_without_terminal_installs_nothing() {
    let project = TestProject::new();
    setup(&project, "1.1.0", 0);

    project
        .cmd()
        .arg("background-check")
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("A newer version of the Ext extension is available."));

    assert!(!calls(&project).contains("--install-extension"));
    assert!(!project.path().join("state.json").exists());
}

#[test]
fn test_background_check_with_yes_updates() {
    let project = TestProject::new();
    setup(&project, "1.1.0", 0);

    project.cmd().args(["--yes", "background-check"]).write_stdin("").assert().success();

    let calls = calls(&project);
    assert_eq!(calls.matches("--install-extension").count(), 1, "calls were: {calls}");
    assert!(!project.downloads().join("ext.vsix").exists());
}

#[test]
fn test_ignored_version_is_not_offered_again() {
    let project = TestProject::new();
    setup(&project, "1.1.0", 0);
    let now = chrono::Utc::now().to_rfc3339();
    std::fs::write(
        project.path().join("state.json"),
        format!(r#"{{"pub.ext-1.1.0-ignore":{{"ignored":true,"set_at":"{now}"}}}}"#),
    )
    .unwrap();

    project
        .cmd()
        .args(["--yes", "background-check"])
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("A newer version").not());

    assert!(!calls(&project).contains("--install-extension"));
}
