//! Integration test suite for vsix-updater
//!
//! End-to-end tests of the update workflows against real disk state and of
//! the `vsix-updater` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: binary invocations with `assert_cmd`
//! - **workflow**: library workflows with real filesystem and state bindings
//! - **editor_stub**: full `check` / `background-check` runs against a local
//!   HTTP server and a scripted editor launcher (unix only)

use assert_cmd::Command;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

mod cli;
#[cfg(unix)]
mod editor_stub;
mod workflow;

/// Isolated home and config directory for one test.
pub struct TestProject {
    pub temp: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.toml")
    }

    pub fn log_path(&self) -> PathBuf {
        self.path().join("updater.log")
    }

    pub fn downloads(&self) -> PathBuf {
        self.path().join("downloads")
    }

    /// Write `config.toml`, always routing the log file into the temp dir.
    pub fn write_config(&self, body: &str) {
        let log = toml_string(&self.log_path());
        std::fs::write(self.config_path(), format!("log_file = {log}\n{body}")).unwrap();
    }

    pub fn log(&self) -> String {
        std::fs::read_to_string(self.log_path()).unwrap_or_default()
    }

    /// The binary, isolated from the user's home and environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("vsix-updater").unwrap();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env_remove("VSIX_UPDATER_CONFIG")
            .env_remove("RUST_LOG")
            .env_remove("HTTP_PROXY")
            .env_remove("http_proxy")
            .env_remove("ALL_PROXY")
            .env_remove("all_proxy")
            .arg("--no-progress")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}

/// TOML basic string for a path.
pub fn toml_string(path: &Path) -> String {
    format!("{:?}", path.to_string_lossy())
}

/// Minimal HTTP server answering fixed responses on localhost.
pub struct StubServer {
    pub base: String,
    listener: TcpListener,
}

impl StubServer {
    /// Reserve a port. The base URL is known before routes are defined.
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        Self {
            base,
            listener,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Answer from a background thread. `routes` maps a request path to
    /// `(status, body)`; anything else is 404.
    pub fn serve(self, routes: Vec<(&'static str, u16, Vec<u8>)>) {
        let listener = self.listener;
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let Ok(read_half) = stream.try_clone() else { continue };
                let mut reader = BufReader::new(read_half);

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                loop {
                    let mut header = String::new();
                    match reader.read_line(&mut header) {
                        Ok(0) | Err(_) => break,
                        Ok(_) if header == "\r\n" => break,
                        Ok(_) => {}
                    }
                }

                let path = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = routes
                    .iter()
                    .find(|(route, _, _)| *route == path)
                    .map(|(_, status, body)| (*status, body.clone()))
                    .unwrap_or((404, Vec::new()));

                let head = format!(
                    "HTTP/1.1 {status} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
                let _ = stream.flush();
            }
        });
    }
}

/// Metadata document for pub.ext.
pub fn metadata(version: (u64, u64, u64), download: &str) -> Vec<u8> {
    serde_json::json!({
        "id": "pub.ext",
        "name": "ext",
        "displayName": "Ext",
        "version": { "major": version.0, "minor": version.1, "patch": version.2 },
        "download": download,
    })
    .to_string()
    .into_bytes()
}
