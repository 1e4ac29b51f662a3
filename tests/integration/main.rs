//! Integration tests for repolens

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated from the user's config, cache and token
    fn repolens(home: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("repolens");
        cmd.env_remove("GITHUB_TOKEN")
            .env("REPOLENS_CONFIG", home.path().join("config.toml"))
            .env("REPOLENS_DATA_DIR", home.path().join("data"));
        cmd
    }

    #[test]
    fn help_displays() {
        let home = TempDir::new().unwrap();
        repolens(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("browse GitHub repositories"));
    }

    #[test]
    fn version_displays() {
        let home = TempDir::new().unwrap();
        repolens(&home)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("repolens"));
    }

    #[test]
    fn list_empty() {
        let home = TempDir::new().unwrap();
        repolens(&home)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("No repositories cached"));
    }

    #[test]
    fn list_empty_json() {
        let home = TempDir::new().unwrap();
        repolens(&home)
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::diff("[]\n"));
    }

    #[test]
    fn list_creates_cache_layout() {
        let home = TempDir::new().unwrap();
        repolens(&home).arg("list").assert().success();
        assert!(home.path().join("data").join("repos").join(".staging").is_dir());
    }

    #[test]
    fn config_path() {
        let home = TempDir::new().unwrap();
        repolens(&home)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let home = TempDir::new().unwrap();
        repolens(&home)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[network]"))
            .stdout(predicate::str::contains("codeload.github.com"));
    }

    #[test]
    fn config_init_then_set() {
        let home = TempDir::new().unwrap();
        repolens(&home).args(["config", "init"]).assert().success();
        repolens(&home)
            .args(["config", "set", "network.stall_timeout_secs", "15"])
            .assert()
            .success();

        let saved = std::fs::read_to_string(home.path().join("config.toml")).unwrap();
        assert!(saved.contains("stall_timeout_secs = 15"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        let home = TempDir::new().unwrap();
        repolens(&home)
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn invalid_config_file_fails() {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join("config.toml"), "[network\n").unwrap();
        repolens(&home)
            .arg("list")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn cat_missing_repository() {
        let home = TempDir::new().unwrap();
        repolens(&home)
            .args(["cat", "octo_hello", "README.md"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not cached"))
            .stderr(predicate::str::contains("repolens list"));
    }

    #[test]
    fn tree_rejects_path_like_key() {
        let home = TempDir::new().unwrap();
        repolens(&home)
            .args(["tree", "../../etc"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not cached"));
    }

    #[test]
    fn path_missing_repository() {
        let home = TempDir::new().unwrap();
        repolens(&home)
            .args(["path", "octo/hello"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("octo_hello"));
    }

    #[test]
    fn rm_missing_repository_is_noop() {
        let home = TempDir::new().unwrap();
        repolens(&home)
            .args(["rm", "octo_hello", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("not cached"));
    }

    #[test]
    fn import_invalid_reference() {
        let home = TempDir::new().unwrap();
        repolens(&home)
            .args(["import", "https://gitlab.com/octo/hello"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid repository reference"));
    }

    #[test]
    fn import_unreachable_api_fails_cleanly() {
        let home = TempDir::new().unwrap();
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        std::fs::write(
            home.path().join("config.toml"),
            format!("[github]\napi_url = \"{base}\"\narchive_url = \"{base}\"\n"),
        )
        .unwrap();

        repolens(&home)
            .args(["import", "octo/hello"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Remote unavailable"));

        repolens(&home)
            .args(["list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn unknown_subcommand_fails() {
        let home = TempDir::new().unwrap();
        repolens(&home).arg("clone").assert().failure();
    }
}
