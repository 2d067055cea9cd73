//! Library workflows against real disk bindings.
//!
//! HTTP, editor and notifications are faked; the filesystem, the state file
//! and the settings file are real.

use crate::TestProject;
use std::sync::Arc;
use vsix_updater::host::{FileSettings, Host, JsonStateStore, LocalFileSystem};
use vsix_updater::logger::Logger;
use vsix_updater::test_utils::{TestHost, metadata_json};
use vsix_updater::updater::{RunStatus, Updater};

const API: &str = "https://updates.example.com/api/ext";
const DOWNLOAD: &str = "https://updates.example.com/ext.vsix";

/// Real fs, state and settings under `project`; fakes from `env` otherwise.
fn disk_host(env: &TestHost, project: &TestProject) -> Host {
    Host {
        fs: Arc::new(LocalFileSystem),
        state: Arc::new(JsonStateStore::new(project.path().join("state.json"))),
        settings: Arc::new(FileSettings::new(project.config_path())),
        ..env.host()
    }
}

fn published(env: &TestHost) {
    env.http.with_json(API, metadata_json("pub.ext", "ext", (1, 2, 0), Some(DOWNLOAD)));
    env.http.with_bytes(DOWNLOAD, 200, b"package bytes".to_vec());
}

#[tokio::test]
async fn test_package_written_to_disk_and_removed() {
    let project = TestProject::new();
    project.write_config(&format!("api_urls = [\"{API}\"]\n"));
    std::fs::create_dir_all(project.downloads()).unwrap();

    let env = TestHost::with_urls(&[]);
    published(&env);
    let updater = Updater::new(disk_host(&env, &project), Logger::to_file(&project.log_path()).unwrap());

    assert_eq!(updater.check_for_updates().await.unwrap(), RunStatus::Completed);

    let package = project.downloads().join("ext.vsix");
    assert_eq!(env.editor.installs(), vec![package.clone()]);
    assert!(!package.exists());
    assert!(project.log().contains("Great news! ext got installed."));
}

#[tokio::test]
async fn test_unwritable_storage_falls_back_to_workspace_on_disk() {
    let project = TestProject::new();
    let workspace = project.path().join("ws");
    std::fs::create_dir_all(&workspace).unwrap();
    // Storage directory that does not exist; writes never create parents.
    let storage = project.path().join("missing").join("storage");
    project.write_config(&format!(
        "api_urls = [\"{API}\"]\nstorage_dir = {}\nworkspace_folders = [{}]\n",
        crate::toml_string(&storage),
        crate::toml_string(&workspace),
    ));

    let env = TestHost::with_urls(&[]);
    published(&env);
    let updater = Updater::new(disk_host(&env, &project), Logger::to_file(&project.log_path()).unwrap());

    updater.check_for_updates().await.unwrap();

    assert_eq!(env.editor.installs(), vec![workspace.join("ext.vsix")]);
    assert!(!workspace.join("ext.vsix").exists());
    assert!(project.log().contains("Failed to write in extension storage, trying workspace folder..."));
}

#[tokio::test]
async fn test_ignore_persists_across_updater_instances() {
    let project = TestProject::new();
    project.write_config(&format!("api_urls = [\"{API}\"]\n"));

    let env = TestHost::with_urls(&[]);
    published(&env);
    env.editor.with_installed("pub.ext", "1.1.0");
    env.notifier.answer("Ignore");

    Updater::new(disk_host(&env, &project), Logger::disabled())
        .background_check()
        .await
        .unwrap();
    Updater::new(disk_host(&env, &project), Logger::disabled())
        .background_check()
        .await
        .unwrap();

    assert_eq!(env.notifier.prompts().len(), 1);
    let state = std::fs::read_to_string(project.path().join("state.json")).unwrap();
    assert!(state.contains("pub.ext-1.1.0-ignore"));
}

#[tokio::test]
async fn test_expired_ignore_is_pruned_and_prompt_returns() {
    let project = TestProject::new();
    project.write_config(&format!("api_urls = [\"{API}\"]\nignore_ttl_days = 7\n"));
    std::fs::write(
        project.path().join("state.json"),
        r#"{"pub.ext-1.1.0-ignore":{"ignored":true,"set_at":"2020-01-01T00:00:00Z"}}"#,
    )
    .unwrap();

    let env = TestHost::with_urls(&[]);
    published(&env);
    env.editor.with_installed("pub.ext", "1.1.0");

    Updater::new(disk_host(&env, &project), Logger::disabled())
        .background_check()
        .await
        .unwrap();

    assert_eq!(env.notifier.prompts().len(), 1);
    let state = std::fs::read_to_string(project.path().join("state.json")).unwrap();
    assert!(!state.contains("pub.ext-1.1.0-ignore"));
}

#[tokio::test]
async fn test_config_edits_apply_to_next_check() {
    let project = TestProject::new();
    project.write_config("");

    let env = TestHost::with_urls(&[]);
    published(&env);
    let updater = Updater::new(disk_host(&env, &project), Logger::disabled());

    assert_eq!(updater.background_check().await.unwrap(), RunStatus::NotConfigured);

    project.write_config(&format!("api_urls = [\"{API}\"]\n"));
    assert_eq!(updater.background_check().await.unwrap(), RunStatus::Completed);
    assert_eq!(env.http.requests(), vec![API.to_string()]);
}
