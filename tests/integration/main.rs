//! Integration tests for modforge

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Isolated cache and config for one test
    struct Sandbox {
        dir: TempDir,
    }

    impl Sandbox {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn path(&self) -> &Path {
            self.dir.path()
        }

        fn cache_dir(&self) -> PathBuf {
            self.path().join("cache")
        }

        fn config_path(&self) -> PathBuf {
            self.path().join("config.toml")
        }

        fn cmd(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("modforge");
            cmd.env_remove("MODFORGE_CONFIG")
                .env_remove("MODFORGE_CACHE_DIR")
                .arg("--config")
                .arg(self.config_path())
                .arg("--cache-dir")
                .arg(self.cache_dir());
            cmd
        }

        fn write_config(&self, content: &str) {
            fs::write(self.config_path(), content).unwrap();
        }

        /// Seed the cache with a small module graph
        fn seed(&self, template_url: &str) {
            fs::create_dir_all(self.cache_dir()).unwrap();
            let index = serde_json::json!({
                "sourceRepos": [],
                "modules": [
                    {"name": "fw_core", "type": "lib", "dependencies": []},
                    {"name": "fw_widgets", "type": "lib", "dependencies": ["fw_core"]},
                    {"name": "tp_utils", "type": "lib", "dependencies": []},
                    {
                        "name": "app_template",
                        "type": "app",
                        "path": "",
                        "gitRepoURL": template_url,
                        "gitRepoPrefix": "git@example.com:app/",
                        "dependencies": ["fw_widgets"]
                    }
                ]
            });
            fs::write(
                self.cache_dir().join("index.json"),
                serde_json::to_string_pretty(&index).unwrap(),
            )
            .unwrap();
        }
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("modforge")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("module graph"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("modforge")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("modforge"));
    }

    #[test]
    fn completions_bash() {
        cargo_bin_cmd!("modforge")
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("modforge"));
    }

    #[test]
    fn config_path_honors_flag() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_defaults() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[commands]"))
            .stdout(predicate::str::contains("tpUpdate noupdate"));
    }

    #[test]
    fn config_set_persists() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "set", "commands.refresh", "make qmake"])
            .assert()
            .success();

        let content = fs::read_to_string(sandbox.config_path()).unwrap();
        assert!(content.contains("make qmake"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let sandbox = Sandbox::new();
        sandbox.write_config("[general\n");
        sandbox
            .cmd()
            .args(["modules", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn repos_add_list_remove() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["repos", "add", "git@example.com:fw/fw_core.git"])
            .assert()
            .success();
        sandbox
            .cmd()
            .args(["repos", "add", "git@example.com:fw/fw_widgets.git"])
            .assert()
            .success();

        sandbox
            .cmd()
            .args(["repos", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "git@example.com:fw/fw_core.git\ngit@example.com:fw/fw_widgets.git",
            ));

        sandbox
            .cmd()
            .args(["repos", "remove", "git@example.com:fw/fw_core.git"])
            .assert()
            .success();

        let index = fs::read_to_string(sandbox.cache_dir().join("index.json")).unwrap();
        assert!(!index.contains("fw_core.git"));
        assert!(index.contains("fw_widgets.git"));
    }

    #[test]
    fn repos_remove_unknown_fails() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["repos", "remove", "nope.git"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Not a source repository"));
    }

    #[test]
    fn update_without_repos_hints() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .arg("update")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No source repositories"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn update_with_local_commands() {
        let sandbox = Sandbox::new();
        sandbox.write_config(
            r#"
            [commands]
            clone = "mkdir"
            fetch_submodules = "true"
            remote_url = "echo git@example.com:fw/$(basename \"$PWD\").git"
            "#,
        );
        sandbox
            .cmd()
            .args(["repos", "set", "fw_widgets", "fw_core"])
            .assert()
            .success();

        sandbox.cmd().arg("update").assert().success();

        sandbox
            .cmd()
            .args(["modules", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout("fw_core\nfw_widgets\n");

        let index: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(sandbox.cache_dir().join("index.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(index["modules"][0]["gitRepoURL"], "git@example.com:fw/fw_core.git");
        assert_eq!(index["modules"][0]["gitRepoPrefix"], "git@example.com:fw/");

        let audit = fs::read_to_string(sandbox.cache_dir().join("audit.log")).unwrap();
        assert!(audit.contains("cache.updated"));
    }

    #[test]
    fn update_failure_keeps_modules() {
        let sandbox = Sandbox::new();
        sandbox.seed("");
        sandbox.write_config("[commands]\nclone = \"false\"\n");
        sandbox
            .cmd()
            .args(["repos", "set", "git@example.com:fw/fw_core.git"])
            .assert()
            .success();

        sandbox
            .cmd()
            .arg("update")
            .assert()
            .failure()
            .stderr(predicate::str::contains("exit code: 1"));

        sandbox
            .cmd()
            .args(["modules", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("app_template"));

        let audit = fs::read_to_string(sandbox.cache_dir().join("audit.log")).unwrap();
        assert!(audit.contains("cache.update_failed"));
    }

    #[test]
    fn modules_list_empty() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["modules", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No modules cached"));
    }

    #[test]
    fn modules_list_filters_kind() {
        let sandbox = Sandbox::new();
        sandbox.seed("");
        sandbox
            .cmd()
            .args(["modules", "list", "--kind", "app", "--format", "plain"])
            .assert()
            .success()
            .stdout("app_template\n");
    }

    #[test]
    fn modules_show_json_lists_transitive_requirements() {
        let sandbox = Sandbox::new();
        sandbox.seed("");
        let output = sandbox
            .cmd()
            .args(["modules", "show", "app_template", "--format", "json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(json["type"], "app");
        assert_eq!(json["requires"], serde_json::json!(["fw_core", "fw_widgets"]));
    }

    #[test]
    fn modules_show_unknown_fails() {
        let sandbox = Sandbox::new();
        sandbox.seed("");
        sandbox
            .cmd()
            .args(["modules", "show", "nope_missing"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Module not found"));
    }

    #[test]
    fn modules_sort_rewrites_cache() {
        let sandbox = Sandbox::new();
        sandbox.seed("");
        sandbox.cmd().args(["modules", "sort"]).assert().success();

        sandbox
            .cmd()
            .args(["modules", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout("fw_core\nfw_widgets\ntp_utils\napp_template\n");
    }

    #[test]
    fn sort_submodules_file() {
        let sandbox = Sandbox::new();
        sandbox.seed("");
        let file = sandbox.path().join("submodules.pri");
        fs::write(&file, "SUBDIRS += fw_widgets\nSUBDIRS += tp_utils\nSUBDIRS += fw_core\n").unwrap();

        sandbox
            .cmd()
            .arg("sort-submodules")
            .arg(&file)
            .assert()
            .success();

        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "SUBDIRS += fw_core\nSUBDIRS += fw_widgets\n\nSUBDIRS += tp_utils\n\n"
        );
    }

    #[test]
    fn generate_dry_run_touches_nothing() {
        let sandbox = Sandbox::new();
        sandbox.seed("git@example.com:app/app_template.git");
        let root = sandbox.path().join("root");

        sandbox
            .cmd()
            .args(["generate", "-t", "app_template", "-p", "myco", "-s", "tool", "--dry-run"])
            .arg("--root")
            .arg(&root)
            .assert()
            .success()
            .stdout(predicate::str::contains("git@example.com:app/myco_tool.git"))
            .stdout(predicate::str::contains("SUBDIRS += fw_core"))
            .stdout(predicate::str::contains("DEPENDENCIES += fw_widgets"));

        assert!(!root.exists());
    }

    #[test]
    fn generate_rejects_bad_prefix() {
        let sandbox = Sandbox::new();
        sandbox.seed("");
        sandbox
            .cmd()
            .args(["generate", "-t", "app_template", "-p", "my_co", "-s", "tool", "--dry-run"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid module name"));
    }

    #[test]
    fn generate_unknown_template_fails() {
        let sandbox = Sandbox::new();
        sandbox.seed("");
        sandbox
            .cmd()
            .args(["generate", "-t", "app_missing", "-p", "myco", "-s", "tool", "--yes"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Template not found"));
    }

    #[test]
    fn generate_requires_template_when_not_interactive() {
        let sandbox = Sandbox::new();
        sandbox.seed("");
        sandbox
            .cmd()
            .args(["generate", "-p", "myco", "-s", "tool"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--template"));
    }

    #[test]
    fn generate_from_local_template() {
        let sandbox = Sandbox::new();

        let template = sandbox.path().join("templates").join("app_template");
        fs::create_dir_all(template.join("src")).unwrap();
        fs::write(template.join("template.pro"), "SUBDIRS += app_template\n").unwrap();
        fs::write(template.join("Makefile.top"), "all:\n").unwrap();
        fs::write(
            template.join("src").join("app_template.cpp"),
            "namespace app_template {}\n",
        )
        .unwrap();

        sandbox.seed(&format!("{}/.", template.display()));
        sandbox.write_config(
            r#"
            [commands]
            clone = "cp -R"
            refresh = "true"
            init = "true"
            remote_add = "true"
            "#,
        );
        let root = sandbox.path().join("root");

        sandbox
            .cmd()
            .args(["generate", "-t", "app_template", "-p", "myco", "-s", "tool", "--yes"])
            .arg("--root")
            .arg(&root)
            .assert()
            .success();

        let top = root.join("myco").join("tool");
        let app = top.join("myco_tool");
        assert_eq!(
            fs::read_to_string(app.join("src").join("myco_tool.cpp")).unwrap(),
            "namespace myco_tool {}\n"
        );
        assert_eq!(
            fs::read_to_string(app.join("tool.pro")).unwrap(),
            "SUBDIRS += myco_tool\n"
        );
        assert_eq!(
            fs::read_to_string(app.join("submodules.pri")).unwrap(),
            "SUBDIRS += fw_core\nSUBDIRS += fw_widgets\n\nSUBDIRS += myco_tool\n\n"
        );
        assert!(top.join("Makefile").exists());
        assert!(top.join("tool.pro").exists());

        let config = fs::read_to_string(sandbox.config_path()).unwrap();
        assert!(config.contains("root_path"));
        let audit = fs::read_to_string(sandbox.cache_dir().join("audit.log")).unwrap();
        assert!(audit.contains("module.generated"));
    }
}
