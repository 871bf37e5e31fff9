//! Integration tests for the `stencil` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

const TEMPLATES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates");

/// A sandbox with its own home, templates and scratch directory, so no test
/// reads the developer's configuration or prompts for author data. Rendering
/// writes into the template directory, hence the private copy.
struct Sandbox {
    tmp: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("home")).unwrap();
        fs::create_dir_all(tmp.path().join("work")).unwrap();
        copy_tree(Path::new(TEMPLATES), &tmp.path().join("templates"));
        Self { tmp }
    }

    fn work(&self) -> PathBuf {
        self.tmp.path().join("work")
    }

    fn project(&self, name: &str) -> PathBuf {
        self.work().join(name)
    }

    fn cmd(&self) -> Command {
        let home = self.tmp.path().join("home");
        let mut cmd = cargo::cargo_bin_cmd!("stencil");
        cmd.current_dir(self.work())
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("NO_COLOR", "1")
            .env("STENCIL__TEMPLATES__DIR", self.tmp.path().join("templates"))
            .env("STENCIL__TEMPLATES__SCRATCH_DIR", self.tmp.path().join("scratch"))
            .env("STENCIL__PREFERENCES__FULL_NAME", "Ada Lovelace")
            .env("STENCIL__PREFERENCES__EMAIL", "ada@example.org")
            .env("STENCIL__PREFERENCES__GITHUB_USERNAME", "ada");
        cmd
    }

    fn create(&self, name: &str, package: bool) -> PathBuf {
        let mut cmd = self.cmd();
        cmd.args(["-p", name, "create"]);
        if package {
            cmd.arg("--package");
        }
        cmd.assert().success();
        self.project(name)
    }
}

fn copy_tree(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_tree(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

#[test]
fn help_lists_commands() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("convert"));
}

#[test]
fn version_flag() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let sandbox = Sandbox::new();
    sandbox.cmd().arg("frobnicate").assert().code(2);
}

#[test]
fn create_module_project() {
    let sandbox = Sandbox::new();
    let project = sandbox.create("my-tool", false);

    assert!(project.join("pyproject.toml").is_file());
    assert!(project.join("my_tool.py").is_file());
    assert!(project.join("tests/test_my_tool.py").is_file());
    assert!(!project.join("my_tool").exists());

    let pyproject = read(&project.join("pyproject.toml"));
    assert!(pyproject.contains("name = \"my-tool\""));
    assert!(pyproject.contains("Ada Lovelace <ada@example.org>"));
    assert!(read(&project.join("LICENSE")).contains("MIT license"));
}

#[test]
fn create_records_parameters_for_later_commands() {
    let sandbox = Sandbox::new();
    let project = sandbox.create("demo", true);

    let manifest: serde_json::Value =
        serde_json::from_str(&read(&project.join("stencil.json"))).unwrap();
    assert_eq!(manifest["project_name"]["default"], "demo");
    assert_eq!(manifest["github_username"]["default"], "ada");
}

#[test]
fn create_package_project() {
    let sandbox = Sandbox::new();
    let project = sandbox.create("demo", true);

    assert!(project.join("demo/__init__.py").is_file());
    assert!(project.join("AUTHORS.rst").is_file());
    assert!(project.join("docs/installation.rst").is_file());
    assert!(!project.join("demo.py").exists());
    assert!(read(&project.join("AUTHORS.rst")).contains("ada@example.org"));
}

#[test]
fn housekeeping_files_are_not_rendered() {
    let sandbox = Sandbox::new();
    let project = sandbox.create("demo", false);
    assert!(!project.join("cookiecutter.json").exists());
    assert!(!sandbox.work().join("cookiecutter.json").exists());
}

#[test]
fn create_refuses_existing_project() {
    let sandbox = Sandbox::new();
    sandbox.create("demo", false);

    sandbox
        .cmd()
        .args(["-p", "demo", "create"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already"));
}

#[test]
fn create_refuses_nesting_unless_allowed() {
    let sandbox = Sandbox::new();
    sandbox.create("outer", false);

    sandbox
        .cmd()
        .args(["-p", "outer/inner", "create"])
        .assert()
        .failure();
    assert!(!sandbox.project("outer/inner").exists());

    sandbox
        .cmd()
        .args(["-p", "outer/inner", "create", "--allow-nesting"])
        .assert()
        .success();
    assert!(sandbox.project("outer/inner/inner.py").is_file());
}

#[test]
fn missing_author_data_without_input_fails_cleanly() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .env_remove("STENCIL__PREFERENCES__EMAIL")
        .args(["-p", "demo", "create"])
        .assert()
        .failure()
        .code(predicate::ne(0).and(predicate::ne(255)));
    assert!(!sandbox.project("demo").exists());
}

#[test]
fn prompted_values_come_from_stdin() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .env_remove("STENCIL__PREFERENCES__EMAIL")
        .args(["-p", "demo", "create"])
        .write_stdin("grace@example.org\n")
        .assert()
        .success();
    assert!(read(&sandbox.project("demo/pyproject.toml")).contains("grace@example.org"));
}

#[test]
fn add_app_to_package_project() {
    let sandbox = Sandbox::new();
    let project = sandbox.create("demo", true);

    sandbox
        .cmd()
        .args(["-p", "demo", "add", "my-app", "--app"])
        .assert()
        .success();

    let source = project.join("demo/cli_my_app.py");
    assert!(source.is_file());
    assert!(read(&source).contains("Application my-app"));
    assert!(project.join("tests/test_cli_my_app.py").is_file());

    sandbox
        .cmd()
        .args(["-p", "demo", "add", "my-app", "--group"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("exists already"));
}

#[test]
fn add_python_module_as_package() {
    let sandbox = Sandbox::new();
    let project = sandbox.create("demo", true);

    sandbox
        .cmd()
        .args(["-p", "demo", "add", "solver", "--package"])
        .assert()
        .success();

    assert!(project.join("demo/solver/__init__.py").is_file());
    assert!(!project.join("demo/solver.py").exists());
    assert!(project.join("tests/test_solver.py").is_file());
}

#[test]
fn add_binary_extension_modules() {
    let sandbox = Sandbox::new();
    let project = sandbox.create("demo", true);

    sandbox
        .cmd()
        .args(["-p", "demo", "add", "fast", "--cpp"])
        .assert()
        .success();
    sandbox
        .cmd()
        .args(["-p", "demo", "add", "numeric", "--f2py"])
        .assert()
        .success();

    assert!(project.join("demo/cpp_fast/fast.cpp").is_file());
    assert!(project.join("demo/cpp_fast/CMakeLists.txt").is_file());
    assert!(project.join("demo/f2py_numeric/numeric.f90").is_file());
    assert!(read(&project.join("tests/test_cpp_fast.py")).contains("import demo.fast as cpp"));
}

#[test]
fn add_outside_a_project_is_not_found() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["add", "tool", "--app"])
        .assert()
        .code(3);
}

#[test]
fn add_to_module_project_is_refused() {
    let sandbox = Sandbox::new();
    sandbox.create("demo", false);
    sandbox
        .cmd()
        .args(["-p", "demo", "add", "tool", "--app"])
        .assert()
        .failure();
}

#[test]
fn add_rejects_invalid_module_name() {
    let sandbox = Sandbox::new();
    sandbox.create("demo", true);
    sandbox
        .cmd()
        .args(["-p", "demo", "add", "My-Module", "--py"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("my_module"));
}

#[test]
fn convert_module_project_to_package() {
    let sandbox = Sandbox::new();
    let project = sandbox.create("demo", false);

    sandbox
        .cmd()
        .args(["-p", "demo", "convert"])
        .assert()
        .success();

    assert!(project.join("demo/__init__.py").is_file());
    assert!(!project.join("demo.py").exists());
    assert!(project.join("HISTORY.rst").is_file());

    // a package project cannot be converted again
    sandbox
        .cmd()
        .args(["-p", "demo", "convert"])
        .assert()
        .failure();
}

#[test]
fn conflict_backup_keeps_originals() {
    let sandbox = Sandbox::new();
    let project = sandbox.create("demo", false);
    fs::write(project.join("HISTORY.rst"), "my own history\n").unwrap();

    sandbox
        .cmd()
        .args(["-p", "demo", "convert"])
        .write_stdin("b\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("HISTORY.rst"));

    assert_eq!(read(&project.join("HISTORY.rst.bak")), "my own history\n");
    assert!(read(&project.join("HISTORY.rst")).contains("First release"));
}

#[test]
fn conflict_abort_leaves_project_untouched() {
    let sandbox = Sandbox::new();
    let project = sandbox.create("demo", false);
    fs::write(project.join("HISTORY.rst"), "my own history\n").unwrap();

    sandbox
        .cmd()
        .args(["-p", "demo", "convert"])
        .write_stdin("a\n")
        .assert()
        .code(255)
        .stderr(predicate::str::contains("Operation canceled"));

    assert_eq!(read(&project.join("HISTORY.rst")), "my own history\n");
    assert!(!project.join("HISTORY.rst.bak").exists());
    assert!(!project.join("AUTHORS.rst").exists());
    assert!(project.join("demo.py").is_file());
}

#[test]
fn conflict_empty_answer_aborts() {
    let sandbox = Sandbox::new();
    let project = sandbox.create("demo", false);
    fs::write(project.join("HISTORY.rst"), "mine\n").unwrap();

    sandbox
        .cmd()
        .args(["-p", "demo", "convert"])
        .write_stdin("\n")
        .assert()
        .code(255);
    assert_eq!(read(&project.join("HISTORY.rst")), "mine\n");
}

#[test]
fn backup_flag_skips_the_prompt() {
    let sandbox = Sandbox::new();
    let project = sandbox.create("demo", false);
    fs::write(project.join("HISTORY.rst"), "mine\n").unwrap();

    sandbox
        .cmd()
        .args(["-p", "demo", "convert", "--backup"])
        .assert()
        .success();
    assert_eq!(read(&project.join("HISTORY.rst.bak")), "mine\n");
}

#[test]
fn overwrite_flag_replaces_without_backup() {
    let sandbox = Sandbox::new();
    let project = sandbox.create("demo", false);
    fs::write(project.join("HISTORY.rst"), "mine\n").unwrap();

    sandbox
        .cmd()
        .args(["-p", "demo", "convert", "--overwrite"])
        .assert()
        .success();
    assert!(!project.join("HISTORY.rst.bak").exists());
    assert!(read(&project.join("HISTORY.rst")).contains("First release"));
}

#[test]
fn list_names_shipped_templates() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["list", "--format", "names"])
        .assert()
        .success()
        .stdout(predicate::str::contains("package-base"))
        .stdout(predicate::str::contains("module-cpp"))
        .stdout(predicate::str::contains("app-sub-commands"));
}

#[test]
fn list_json_is_parseable() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .cmd()
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed["package-base"]["version"], "0.0.0");
}

#[test]
fn config_get_reads_environment() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "get", "preferences.github_username"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ada"));
}

#[test]
fn config_get_unknown_key_is_a_config_error() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "get", "no.such.key"])
        .assert()
        .code(4);
}

#[test]
fn config_init_then_path() {
    let sandbox = Sandbox::new();
    let file = sandbox.tmp.path().join("cfg/stencil.toml");

    sandbox
        .cmd()
        .arg("-c")
        .arg(&file)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(read(&file).contains("[templates]"));

    sandbox
        .cmd()
        .arg("-c")
        .arg(&file)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stencil.toml"));
}

#[test]
fn completions_for_bash() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stencil"));
}
