//! Expansion against the real filesystem.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use stencil_adapters::{LocalFilesystem, RecordingReporter, ScriptedPrompter, SimpleRenderer};
use stencil_core::{
    application::{ExpansionOrchestrator, ExpansionRequest, TemplateLocations},
    domain::{EXIT_CANCEL, OverwritePolicy, ParameterSet},
    error::status_code_of,
};
use tempfile::TempDir;

struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let base = root.path().join("templates/base");
        fs::create_dir_all(base.join("{{cookiecutter.project_name}}/docs")).unwrap();
        fs::write(
            base.join("stencil.json"),
            r#"{"project_name": {"default": ""}, "project_short_description": {"default": "A project"}}"#,
        )
        .unwrap();
        fs::write(
            base.join("{{cookiecutter.project_name}}/README.md"),
            "# {{cookiecutter.project_name}}\n\n{{cookiecutter.project_short_description}}\n",
        )
        .unwrap();
        fs::write(
            base.join("{{cookiecutter.project_name}}/docs/index.rst"),
            "{{cookiecutter.project_name}}\n",
        )
        .unwrap();
        fs::create_dir_all(root.path().join("out")).unwrap();
        Self { root }
    }

    fn out(&self) -> PathBuf {
        self.root.path().join("out")
    }

    fn engine(&self, prompter: &ScriptedPrompter) -> ExpansionOrchestrator {
        ExpansionOrchestrator::new(
            Box::new(LocalFilesystem::new()),
            Box::new(SimpleRenderer::new(Arc::new(LocalFilesystem::new()))),
            Box::new(prompter.clone()),
            Box::new(RecordingReporter::new()),
            TemplateLocations::new(self.root.path().join("templates"))
                .with_working_dir(self.root.path()),
        )
        .with_scratch_dir(self.root.path().join("scratch"))
    }

    fn request(&self) -> ExpansionRequest {
        ExpansionRequest::new(["base"], self.out())
            .with_extra(ParameterSet::new().with("project_name", "demo"))
    }
}

/// Every file under `root` with its modification time.
fn listing(root: &Path) -> BTreeMap<PathBuf, SystemTime> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let modified = e.metadata().unwrap().modified().unwrap();
            (e.path().to_path_buf(), modified)
        })
        .collect()
}

#[test]
fn end_to_end_into_empty_directory() {
    let ws = Workspace::new();
    let prompter = ScriptedPrompter::empty();

    let result = ws.engine(&prompter).expand(&ws.request());

    assert_eq!(status_code_of(&result), 0);
    let readme = fs::read_to_string(ws.out().join("demo/README.md")).unwrap();
    assert_eq!(readme, "# demo\n\nA project\n");
    assert!(ws.out().join("demo/docs/index.rst").is_file());
    assert!(!ws.root.path().join("scratch").exists());
    assert!(!ws.root.path().join("templates/base/cookiecutter.json").exists());
}

#[test]
fn abort_preserves_paths_and_mtimes() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.out().join("demo")).unwrap();
    fs::write(ws.out().join("demo/README.md"), "original").unwrap();
    fs::write(ws.out().join("demo/other.txt"), "untouched").unwrap();
    let before = listing(&ws.out());

    let prompter = ScriptedPrompter::new(["a"]);
    let result = ws
        .engine(&prompter)
        .expand(&ws.request().with_policy(OverwritePolicy::Protective));

    assert_eq!(status_code_of(&result), EXIT_CANCEL);
    assert_eq!(listing(&ws.out()), before);
    assert_eq!(
        fs::read_to_string(ws.out().join("demo/README.md")).unwrap(),
        "original"
    );
}

#[test]
fn backup_then_overwrite_on_disk() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.out().join("demo")).unwrap();
    fs::write(ws.out().join("demo/README.md"), "original").unwrap();

    let prompter = ScriptedPrompter::new(["b"]);
    let result = ws.engine(&prompter).expand(&ws.request());

    assert_eq!(status_code_of(&result), 0);
    assert_eq!(
        fs::read_to_string(ws.out().join("demo/README.md.bak")).unwrap(),
        "original"
    );
    assert!(
        fs::read_to_string(ws.out().join("demo/README.md"))
            .unwrap()
            .starts_with("# demo")
    );
}

#[test]
fn repeated_backup_runs_on_disk_keep_the_original() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.out().join("demo")).unwrap();
    fs::write(ws.out().join("demo/README.md"), "user original").unwrap();
    let prompter = ScriptedPrompter::empty();
    let request = ws.request().with_policy(OverwritePolicy::Backup);

    assert_eq!(status_code_of(&ws.engine(&prompter).expand(&request)), 0);
    assert_eq!(status_code_of(&ws.engine(&prompter).expand(&request)), 0);

    let demo = ws.out().join("demo");
    assert_eq!(fs::read_to_string(demo.join("README.md.bak")).unwrap(), "user original");
    assert_eq!(
        fs::read_to_string(demo.join("README.md.bak.1")).unwrap(),
        "# demo\n\nA project\n"
    );
    assert_eq!(fs::read_to_string(demo.join("docs/index.rst.bak")).unwrap(), "demo\n");
    assert!(prompter.asked().is_empty());
}

#[test]
fn directory_at_backup_name_is_skipped() {
    let ws = Workspace::new();
    let demo = ws.out().join("demo");
    fs::create_dir_all(demo.join("docs/index.rst.bak")).unwrap();
    fs::write(demo.join("docs/index.rst"), "my docs").unwrap();

    let prompter = ScriptedPrompter::empty();
    let result = ws
        .engine(&prompter)
        .expand(&ws.request().with_policy(OverwritePolicy::Backup));

    assert_eq!(status_code_of(&result), 0);
    assert!(demo.join("docs/index.rst.bak").is_dir());
    assert_eq!(fs::read_to_string(demo.join("docs/index.rst.bak.1")).unwrap(), "my docs");
}

#[cfg(unix)]
#[test]
fn failed_backup_on_disk_changes_nothing() {
    let ws = Workspace::new();
    let demo = ws.out().join("demo");
    fs::create_dir_all(demo.join("docs")).unwrap();
    fs::write(demo.join("README.md"), "current").unwrap();
    fs::write(demo.join("README.md.bak"), "precious older backup").unwrap();
    fs::write(demo.join("docs/index.rst"), "my docs").unwrap();
    fs::write(demo.join("notes.txt"), "untouched").unwrap();
    // A dangling link makes the copy fail even when running as root.
    std::os::unix::fs::symlink(
        ws.root.path().join("missing/dir/index.rst"),
        demo.join("docs/index.rst.bak"),
    )
    .unwrap();
    let before = listing(&ws.out());

    let prompter = ScriptedPrompter::empty();
    let result = ws
        .engine(&prompter)
        .expand(&ws.request().with_policy(OverwritePolicy::Backup));

    assert_eq!(status_code_of(&result), 1);
    assert_eq!(listing(&ws.out()), before);
    assert_eq!(
        fs::read_to_string(demo.join("README.md.bak")).unwrap(),
        "precious older backup"
    );
    assert_eq!(fs::read_to_string(demo.join("README.md")).unwrap(), "current");
    assert_eq!(fs::read_to_string(demo.join("docs/index.rst")).unwrap(), "my docs");
    assert!(!demo.join("README.md.bak.1").exists());
}

#[test]
fn stale_scratch_directory_is_replaced() {
    let ws = Workspace::new();
    let scratch = ws.root.path().join("scratch");
    fs::create_dir_all(scratch.join("demo")).unwrap();
    fs::write(scratch.join("demo/stale.txt"), "from an aborted run").unwrap();
    fs::create_dir_all(ws.out().join("demo")).unwrap();
    fs::write(ws.out().join("demo/stale.txt"), "real file").unwrap();

    let prompter = ScriptedPrompter::empty();
    let result = ws.engine(&prompter).expand(&ws.request());

    assert_eq!(status_code_of(&result), 0, "stale scratch must not report conflicts");
    assert!(prompter.asked().is_empty());
    assert!(!scratch.exists());
}

#[test]
fn housekeeping_files_are_not_conflicts() {
    let ws = Workspace::new();
    let base = ws.root.path().join("templates/base/{{cookiecutter.project_name}}");
    fs::write(base.join(".DS_Store"), [0u8, 1, 2]).unwrap();
    fs::create_dir_all(ws.out().join("demo")).unwrap();
    fs::write(ws.out().join("demo/.DS_Store"), [9u8]).unwrap();

    let prompter = ScriptedPrompter::empty();
    let result = ws.engine(&prompter).expand(&ws.request());

    assert_eq!(status_code_of(&result), 0);
    assert!(prompter.asked().is_empty());
}
