//! Argument parsing and command execution tests for the CLI.

#[cfg(test)]
mod cli_tests {
    use crate::cli::{Cli, CliConfig};
    use crate::config::{UpdaterConfig, state_path_for};
    use crate::host::{IgnoreEntry, JsonStateStore, StateStore};
    use chrono::Utc;
    use clap::Parser;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config_in(temp: &TempDir) -> CliConfig {
        CliConfig {
            config_path: Some(temp.path().join("config.toml")),
            no_progress: true,
            ..CliConfig::new()
        }
    }

    #[test]
    fn test_cli_parsing() {
        assert!(Cli::try_parse_from(["vsix-updater", "--help"]).is_err());
        assert!(Cli::try_parse_from(["vsix-updater", "check"]).is_ok());
        assert!(Cli::try_parse_from(["vsix-updater", "nonsense"]).is_err());
    }

    #[test]
    fn test_cli_all_commands() {
        let commands = [
            vec!["vsix-updater", "check"],
            vec!["vsix-updater", "background-check"],
            vec!["vsix-updater", "watch"],
            vec!["vsix-updater", "watch", "--now"],
            vec!["vsix-updater", "ignores", "list"],
            vec!["vsix-updater", "ignores", "clear"],
            vec!["vsix-updater", "config"],
            vec!["vsix-updater", "config", "show"],
            vec!["vsix-updater", "config", "init", "--force"],
            vec!["vsix-updater", "config", "path"],
        ];
        for args in commands {
            assert!(Cli::try_parse_from(&args).is_ok(), "failed to parse {args:?}");
        }
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["vsix-updater", "-v", "-q", "check"]).is_err());
    }

    #[test]
    fn test_build_config_levels() {
        let cli = Cli::try_parse_from(["vsix-updater", "check"]).unwrap();
        assert_eq!(cli.build_config().log_level.as_deref(), Some("warn"));

        let cli = Cli::try_parse_from(["vsix-updater", "--verbose", "check"]).unwrap();
        assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));

        let cli = Cli::try_parse_from(["vsix-updater", "--quiet", "check"]).unwrap();
        assert!(cli.build_config().log_level.is_none());
    }

    #[test]
    fn test_build_config_flags() {
        let cli = Cli::try_parse_from([
            "vsix-updater",
            "--yes",
            "--no-progress",
            "--config",
            "/tmp/vu/config.toml",
            "background-check",
        ])
        .unwrap();
        let config = cli.build_config();
        assert!(config.assume_yes);
        assert!(config.no_progress);
        assert_eq!(config.config_path, Some(PathBuf::from("/tmp/vu/config.toml")));
    }

    #[tokio::test]
    async fn test_config_init_writes_example() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);

        let cli = Cli::try_parse_from(["vsix-updater", "config", "init"]).unwrap();
        cli.execute_with_config(config.clone()).await.unwrap();

        let written = UpdaterConfig::load_from(&temp.path().join("config.toml")).await.unwrap();
        assert_eq!(written, UpdaterConfig::init_example());
    }

    #[tokio::test]
    async fn test_config_init_keeps_existing_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "api_urls = [\"https://mine/api\"]\n").await.unwrap();

        let cli = Cli::try_parse_from(["vsix-updater", "config", "init"]).unwrap();
        cli.execute_with_config(config_in(&temp)).await.unwrap();

        let kept = UpdaterConfig::load_from(&path).await.unwrap();
        assert_eq!(kept.api_urls, vec!["https://mine/api"]);
    }

    #[tokio::test]
    async fn test_ignores_clear_empties_state() {
        let temp = TempDir::new().unwrap();
        let state = JsonStateStore::new(state_path_for(&temp.path().join("config.toml")));
        state
            .set(
                "pub.ext-1.1.0-ignore",
                IgnoreEntry {
                    ignored: true,
                    set_at: Utc::now(),
                },
            )
            .await
            .unwrap();

        let cli = Cli::try_parse_from(["vsix-updater", "ignores", "clear"]).unwrap();
        cli.execute_with_config(config_in(&temp)).await.unwrap();

        assert!(state.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_check_without_urls_succeeds() {
        let temp = TempDir::new().unwrap();
        let config = CliConfig {
            config_path: Some(temp.path().join("config.toml")),
            no_progress: true,
            ..CliConfig::new()
        };
        tokio::fs::write(
            temp.path().join("config.toml"),
            format!("log_file = {:?}\n", temp.path().join("updater.log").to_string_lossy()),
        )
        .await
        .unwrap();

        let cli = Cli::try_parse_from(["vsix-updater", "check"]).unwrap();
        cli.execute_with_config(config).await.unwrap();

        let log = tokio::fs::read_to_string(temp.path().join("updater.log")).await.unwrap();
        assert!(log.contains("[\"ERROR\" - "));
        assert!(log.contains("No API Urls found in the settings."));
    }
}
