//! Integration tests for plugload

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn plugload(workspace: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("plugload");
        cmd.current_dir(workspace)
            .env_remove("PLUGLOAD_WORKSPACE")
            .env_remove("PLUGLOAD_CONFIG");
        cmd
    }

    fn write(workspace: &Path, rel: &str, contents: &str) {
        let path = workspace.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        plugload(temp.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Plugin resolver and compile cache"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        plugload(temp.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("plugload"));
    }

    #[test]
    fn load_file_plugin() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "plugins/myPlugin.toml",
            "[default]\nname = \"my-plugin\"\n",
        );

        plugload(temp.path())
            .args(["load", "./plugins/myPlugin.toml", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"{"name":"my-plugin"}"#));

        let cache_dir = temp.path().join(".__plugin__");
        let entries: Vec<_> = std::fs::read_dir(cache_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn load_missing_lenient_succeeds() {
        let temp = TempDir::new().unwrap();
        plugload(temp.path())
            .args(["load", "nonexistent-package"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("No such plugin"));
    }

    #[test]
    fn load_missing_strict_fails() {
        let temp = TempDir::new().unwrap();
        plugload(temp.path())
            .args(["load", "nonexistent-package", "--strict"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("aborting"));
    }

    #[test]
    fn load_broken_plugin() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "plugins/broken.toml", "[default\nname =");

        plugload(temp.path())
            .args(["load", "./plugins/broken.toml"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Module error"));

        plugload(temp.path())
            .args(["load", "./plugins/broken.toml", "--strict"])
            .assert()
            .failure();
    }

    #[test]
    fn load_builtin_module_leaves_cache_alone() {
        let temp = TempDir::new().unwrap();
        plugload(temp.path())
            .args(["load", "noop"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"noop\""));

        assert!(!temp.path().join(".__plugin__").exists());
    }

    #[test]
    fn load_directory_plugin() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "plugins/dir-plugin/index.json",
            r#"{"default": "untouched", "name": "dir"}"#,
        );

        plugload(temp.path())
            .args(["load", "./plugins/dir-plugin", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""default":"untouched""#));
    }

    #[test]
    fn workspace_from_env() {
        let workspace = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        write(elsewhere.path(), "p.toml", "[default]\nx = 1\n");

        plugload(elsewhere.path())
            .env("PLUGLOAD_WORKSPACE", workspace.path())
            .args(["load", "./p.toml"])
            .assert()
            .success();

        assert!(workspace.path().join(".__plugin__").is_dir());
        assert!(!elsewhere.path().join(".__plugin__").exists());
    }

    #[test]
    fn inspect_reports_type() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "plugins/a.toml", "[default]\n");

        plugload(temp.path())
            .args(["inspect", "./plugins/a.toml"])
            .assert()
            .success()
            .stdout(predicate::str::contains("file"))
            .stdout(predicate::str::contains("not compiled"));
    }

    #[test]
    fn inspect_missing_fails() {
        let temp = TempDir::new().unwrap();
        plugload(temp.path())
            .args(["inspect", "./nope.toml"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No such plugin identifier"));
    }

    #[test]
    fn cache_list_and_clear() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "plugins/a.toml", "[default]\n");

        plugload(temp.path())
            .args(["load", "./plugins/a.toml"])
            .assert()
            .success();

        plugload(temp.path())
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::is_match("^[0-9a-f]{32}\n$").unwrap());

        plugload(temp.path())
            .args(["cache", "clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cleared 1 file(s)"));

        plugload(temp.path())
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No compiled artifacts"));
    }

    #[test]
    fn cache_path() {
        let temp = TempDir::new().unwrap();
        plugload(temp.path())
            .args(["cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(".__plugin__"));
    }

    #[test]
    fn config_path_and_show() {
        let temp = TempDir::new().unwrap();
        plugload(temp.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("plugload.toml"));

        plugload(temp.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"));
    }

    #[test]
    fn missing_explicit_config_fails() {
        let temp = TempDir::new().unwrap();
        plugload(temp.path())
            .args(["--config", "absent.toml", "cache", "path"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("absent.toml"));

        plugload(temp.path())
            .args(["--config", "absent.toml", "config", "init"])
            .assert()
            .success();
        assert!(temp.path().join("absent.toml").is_file());

        plugload(temp.path())
            .args(["--config", "absent.toml", "cache", "path"])
            .assert()
            .success();
    }

    #[test]
    fn invalid_config_fails() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "plugload.toml", "[cache\n");

        plugload(temp.path())
            .args(["cache", "path"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }
}
