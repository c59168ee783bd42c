//! Integration tests for skeg

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// A command isolated from the user's config and home
    fn skeg(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("skeg");
        cmd.env_remove("SKEG_CONFIG")
            .env_remove("SKEG_HOME")
            .arg("--config")
            .arg(temp.path().join("config.toml"))
            .arg("--home")
            .arg(temp.path().join("home"));
        cmd
    }

    /// Write a config with one file:// repository holding wordpress 0.8.7
    /// and 0.9.0, plus redis 1.0.0 with a wrong digest
    fn write_repo(temp: &TempDir) {
        let repo = temp.path().join("repo");
        std::fs::create_dir_all(&repo).unwrap();
        std::fs::write(repo.join("wordpress-0.8.7.tgz"), b"wordpress 0.8.7").unwrap();
        std::fs::write(repo.join("wordpress-0.9.0.tgz"), b"wordpress 0.9.0").unwrap();
        std::fs::write(repo.join("redis-1.0.0.tgz"), b"redis").unwrap();

        let config = format!(
            r#"
[repositories.stable]
url = "file://{}"

[[repositories.stable.charts]]
name = "wordpress"
version = "0.8.7"

[[repositories.stable.charts]]
name = "wordpress"
version = "0.9.0"

[[repositories.stable.charts]]
name = "redis"
version = "1.0.0"
digest = "{}"
"#,
            repo.display(),
            "0".repeat(64)
        );
        std::fs::write(temp.path().join("config.toml"), config).unwrap();
    }

    fn archive(temp: &TempDir, name: &str) -> std::path::PathBuf {
        temp.path().join("home").join("cache").join("archive").join(name)
    }

    fn has_temp_files(dir: &Path) -> bool {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .flatten()
                    .any(|e| e.file_name().to_string_lossy().starts_with(".skeg-tmp-"))
            })
            .unwrap_or(false)
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("skeg")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("concurrent chart fetch cache"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("skeg")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("skeg"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        skeg(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        skeg(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"));
    }

    #[test]
    fn config_init_then_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        skeg(&temp)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration initialized"));
        assert!(temp.path().join("config.toml").exists());

        skeg(&temp)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--force"));
    }

    #[test]
    fn invalid_config_fails() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.toml"), "[fetch]\ntimeout_secs = \"x\"\n").unwrap();
        skeg(&temp)
            .args(["repo", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn repo_list_empty() {
        let temp = TempDir::new().unwrap();
        skeg(&temp)
            .args(["repo", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No repositories configured"));
    }

    #[test]
    fn repo_list_plain() {
        let temp = TempDir::new().unwrap();
        write_repo(&temp);
        skeg(&temp)
            .args(["repo", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout("stable\n");
    }

    #[test]
    fn cache_list_empty() {
        let temp = TempDir::new().unwrap();
        skeg(&temp)
            .args(["cache", "list", "--format", "json"])
            .assert()
            .success()
            .stdout("[]\n");
    }

    #[test]
    fn cache_path_under_home() {
        let temp = TempDir::new().unwrap();
        skeg(&temp)
            .args(["cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("archive"));
    }

    #[test]
    fn resolve_picks_highest() {
        let temp = TempDir::new().unwrap();
        write_repo(&temp);
        skeg(&temp)
            .args(["resolve", "stable/wordpress", "--format", "plain"])
            .assert()
            .success()
            .stdout("0.9.0\n");

        // Resolution never downloads
        assert!(!archive(&temp, "wordpress@0.9.0.tgz").exists());
    }

    #[test]
    fn fetch_stores_archive() {
        let temp = TempDir::new().unwrap();
        write_repo(&temp);
        skeg(&temp)
            .args(["fetch", "stable/wordpress", "--version", "0.8.7", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("wordpress@0.8.7.tgz"));

        assert_eq!(
            std::fs::read(archive(&temp, "wordpress@0.8.7.tgz")).unwrap(),
            b"wordpress 0.8.7"
        );

        skeg(&temp)
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout("wordpress@0.8.7.tgz\n");
    }

    #[test]
    fn fetch_same_chart_twice_in_one_call() {
        let temp = TempDir::new().unwrap();
        write_repo(&temp);
        skeg(&temp)
            .args(["fetch", "stable/wordpress", "stable/wordpress", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("wordpress@0.9.0.tgz").count(2));
    }

    #[test]
    fn fetch_digest_mismatch_leaves_nothing() {
        let temp = TempDir::new().unwrap();
        write_repo(&temp);
        skeg(&temp)
            .args(["fetch", "stable/redis"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Verification failed"));

        assert!(!archive(&temp, "redis@1.0.0.tgz").exists());
        assert!(!has_temp_files(&temp.path().join("home/cache/archive")));
    }

    #[test]
    fn fetch_reports_partial_failure() {
        let temp = TempDir::new().unwrap();
        write_repo(&temp);
        skeg(&temp)
            .args(["fetch", "stable/wordpress", "stable/redis", "--format", "plain"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("wordpress@0.9.0.tgz"))
            .stderr(predicate::str::contains("1 of 2 chart(s) failed"));
    }

    #[test]
    fn fetch_bad_reference() {
        let temp = TempDir::new().unwrap();
        skeg(&temp)
            .args(["fetch", "wordpress"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid chart reference"));
    }

    #[test]
    fn fetch_unknown_repository() {
        let temp = TempDir::new().unwrap();
        write_repo(&temp);
        skeg(&temp)
            .args(["fetch", "incubator/wordpress"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown repository: incubator"));
    }

    #[test]
    fn fetch_no_matching_version() {
        let temp = TempDir::new().unwrap();
        write_repo(&temp);
        skeg(&temp)
            .args(["fetch", "stable/wordpress", "--version", "^2"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No version of stable/wordpress"));
    }

    #[test]
    fn plan_install_prints_json() {
        let temp = TempDir::new().unwrap();
        write_repo(&temp);
        skeg(&temp)
            .args(["plan", "install", "stable/wordpress", "--namespace", "blog"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""action": "install""#))
            .stdout(predicate::str::contains(r#""namespace": "blog""#))
            .stdout(predicate::str::contains(r#""version": "0.9.0""#));
    }

    #[test]
    fn plan_list_status_all() {
        let temp = TempDir::new().unwrap();
        skeg(&temp)
            .args(["plan", "list", "--status", "all"])
            .assert()
            .success()
            .stdout(predicate::str::contains("PENDING_ROLLBACK"))
            .stdout(predicate::str::contains("SUPERSEDED").not());
    }

    #[test]
    fn plan_delete_options() {
        let temp = TempDir::new().unwrap();
        skeg(&temp)
            .args(["plan", "delete", "blog", "--purge"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""purge": true"#))
            .stdout(predicate::str::contains(r#""timeout": 300"#));
    }
}
