//! End-to-end behaviour of the expansion engine on the in-memory filesystem.

use std::path::Path;
use std::sync::Arc;

use stencil_adapters::{MemoryFilesystem, RecordingReporter, ScriptedPrompter, SimpleRenderer};
use stencil_core::{
    application::{
        ApplicationError, DryRunDiffer, Filesystem, ExpansionOrchestrator, ExpansionRequest, TemplateLocations,
    },
    domain::{OverwritePolicy, ParameterSet, ResolvedTemplate, Template},
    error::{StencilError, status_code_of},
};

const OUT: &str = "/work";

struct Harness {
    fs: MemoryFilesystem,
    prompter: ScriptedPrompter,
    reporter: RecordingReporter,
}

impl Harness {
    fn new() -> Self {
        let fs = MemoryFilesystem::new();
        fs.add_file(
            "/templates/base/stencil.json",
            r#"{"project_name": {"default": "", "text": "Project name"}, "author": {"default": "anon"}}"#,
        );
        fs.add_file(
            "/templates/base/{{cookiecutter.project_name}}/README.md",
            "# {{ cookiecutter.project_name }} by {{ cookiecutter.author }}\n",
        );
        fs.add_file(
            "/templates/base/{{cookiecutter.project_name}}/LICENSE",
            "Copyright {{ cookiecutter.author }}\n",
        );
        fs.create_dir_all(Path::new(OUT)).unwrap();

        Self {
            fs,
            prompter: ScriptedPrompter::empty(),
            reporter: RecordingReporter::new(),
        }
    }

    fn add_template(&self, name: &str, declarations: &str, files: &[(&str, &str)]) {
        self.fs
            .add_file(format!("/templates/{name}/stencil.json"), declarations);
        for (path, content) in files {
            self.fs.add_file(format!("/templates/{name}/{path}"), content);
        }
    }

    fn engine(&self) -> ExpansionOrchestrator {
        ExpansionOrchestrator::new(
            Box::new(self.fs.clone()),
            Box::new(SimpleRenderer::new(Arc::new(self.fs.clone()))),
            Box::new(self.prompter.clone()),
            Box::new(self.reporter.clone()),
            TemplateLocations::new("/templates").with_working_dir("/cwd"),
        )
        .with_scratch_dir("/scratch")
    }

    fn exists(&self, path: &str) -> bool {
        self.fs.exists(Path::new(path))
    }

    fn request(&self, chain: &[&str], policy: OverwritePolicy) -> ExpansionRequest {
        ExpansionRequest::new(chain.iter().copied(), OUT)
            .with_policy(policy)
            .with_extra(ParameterSet::new().with("project_name", "demo"))
    }
}

#[test]
fn clean_output_expands_without_conflict_prompt() {
    let h = Harness::new();
    let result = h
        .engine()
        .expand(&h.request(&["base"], OverwritePolicy::Protective));

    assert_eq!(status_code_of(&result), 0);
    assert!(h.prompter.asked().is_empty());
    assert_eq!(
        h.fs.contents("/work/demo/README.md").as_deref(),
        Some("# demo by anon\n")
    );

    let outcome = result.unwrap();
    assert_eq!(outcome.parameters.get("project_name"), Some("demo"));
    assert_eq!(outcome.parameters.get("author"), Some("anon"));
}

#[test]
fn backup_choice_keeps_previous_content() {
    let h = Harness::new();
    h.fs.add_file("/work/demo/README.md", "hand written\n");
    h.prompter.push("b");

    let result = h
        .engine()
        .expand(&h.request(&["base"], OverwritePolicy::Protective));

    assert_eq!(status_code_of(&result), 0);
    assert_eq!(
        h.fs.contents("/work/demo/README.md.bak").as_deref(),
        Some("hand written\n")
    );
    assert_eq!(
        h.fs.contents("/work/demo/README.md").as_deref(),
        Some("# demo by anon\n")
    );
    assert!(!h.exists("/work/demo/LICENSE.bak"));
    assert!(
        h.reporter
            .warnings()
            .iter()
            .any(|w| w.contains("base : demo/README.md"))
    );
}

#[test]
fn every_conflict_gets_an_identical_backup() {
    let h = Harness::new();
    h.fs.add_file("/work/demo/README.md", "readme v0");
    h.fs.add_file("/work/demo/LICENSE", "license v0");

    let result = h.engine().expand(&h.request(&["base"], OverwritePolicy::Backup));

    assert!(result.unwrap().is_success());
    assert!(h.prompter.asked().is_empty(), "backup policy must not prompt");
    for (file, before) in [("README.md", "readme v0"), ("LICENSE", "license v0")] {
        let backup = h.fs.contents(format!("/work/demo/{file}.bak"));
        assert_eq!(backup.as_deref(), Some(before));
        assert_ne!(h.fs.contents(format!("/work/demo/{file}")).as_deref(), Some(before));
    }
}

#[test]
fn failed_backup_modifies_nothing() {
    let h = Harness::new();
    h.fs.add_file("/work/demo/README.md", "readme v0");
    h.fs.add_file("/work/demo/LICENSE", "license v0");
    h.fs.add_file("/work/demo/notes.txt", "not part of the template");
    h.fs.deny_writes_to("/work/demo/LICENSE.bak");
    let before = h.fs.snapshot(OUT);
    let paths = h.fs.file_paths();

    let result = h.engine().expand(&h.request(&["base"], OverwritePolicy::Backup));

    assert!(matches!(
        result,
        Err(StencilError::Application(ApplicationError::Backup { .. }))
    ));
    assert_ne!(status_code_of(&result), 0);
    assert_eq!(h.fs.snapshot(OUT), before);
    assert_eq!(h.fs.file_paths(), paths);
    assert!(!h.exists("/scratch"));
}

#[test]
fn failed_backup_keeps_an_older_backup() {
    let h = Harness::new();
    h.fs.add_file("/work/demo/README.md", "current");
    h.fs.add_file("/work/demo/README.md.bak", "precious older backup");
    h.fs.add_file("/work/demo/LICENSE", "license v0");
    h.fs.deny_writes_to("/work/demo/LICENSE.bak");
    let before = h.fs.snapshot(OUT);

    let result = h.engine().expand(&h.request(&["base"], OverwritePolicy::Backup));

    assert_eq!(status_code_of(&result), 1);
    assert_eq!(
        h.fs.contents("/work/demo/README.md.bak").as_deref(),
        Some("precious older backup")
    );
    assert!(!h.exists("/work/demo/README.md.bak.1"));
    assert_eq!(h.fs.snapshot(OUT), before);
}

#[test]
fn repeated_backup_runs_keep_the_first_original() {
    let h = Harness::new();
    h.fs.add_file("/work/demo/README.md", "user original");

    let first = h.engine().expand(&h.request(&["base"], OverwritePolicy::Backup));
    assert_eq!(status_code_of(&first), 0);
    let second = h.engine().expand(&h.request(&["base"], OverwritePolicy::Backup));
    assert_eq!(status_code_of(&second), 0);

    assert_eq!(
        h.fs.contents("/work/demo/README.md.bak").as_deref(),
        Some("user original")
    );
    assert_eq!(
        h.fs.contents("/work/demo/README.md.bak.1").as_deref(),
        Some("# demo by anon\n")
    );
    assert_eq!(
        h.fs.contents("/work/demo/LICENSE.bak").as_deref(),
        Some("Copyright anon\n")
    );
    let warnings = h.reporter.warnings();
    assert!(warnings.iter().any(|w| w.contains("/work/demo/README.md.bak\n")));
    assert!(
        warnings
            .iter()
            .any(|w| w.contains("README.md.bak.1 (kept existing backup /work/demo/README.md.bak)"))
    );
}

#[test]
fn abort_leaves_output_identical() {
    let h = Harness::new();
    h.fs.add_file("/work/demo/README.md", "keep me");
    h.fs.add_file("/work/notes.txt", "unrelated");
    h.prompter.push("a");
    let before = h.fs.snapshot(OUT);

    let result = h
        .engine()
        .expand(&h.request(&["base"], OverwritePolicy::Protective));

    assert_eq!(status_code_of(&result), stencil_core::domain::EXIT_CANCEL);
    assert_eq!(h.fs.snapshot(OUT), before);
}

#[test]
fn empty_answer_at_conflict_prompt_aborts() {
    let h = Harness::new();
    h.fs.add_file("/work/demo/LICENSE", "mine");
    h.prompter.push("");

    let outcome = h
        .engine()
        .expand(&h.request(&["base"], OverwritePolicy::Protective))
        .unwrap();

    assert!(outcome.is_cancelled());
    assert_eq!(h.fs.contents("/work/demo/LICENSE").as_deref(), Some("mine"));
}

#[test]
fn forced_overwrite_skips_detection() {
    let h = Harness::new();
    h.fs.add_file("/work/demo/README.md", "old");

    let outcome = h
        .engine()
        .expand(&h.request(&["base"], OverwritePolicy::Force))
        .unwrap();

    assert!(outcome.is_success());
    assert!(h.prompter.asked().is_empty());
    assert!(!h.exists("/work/demo/README.md.bak"));
    assert!(!h.exists("/scratch"), "no dry run under force");
    assert_eq!(
        h.fs.contents("/work/demo/README.md").as_deref(),
        Some("# demo by anon\n")
    );
}

#[test]
fn earlier_template_values_flow_forward() {
    let h = Harness::new();
    h.add_template(
        "a",
        r#"{"key": {"default": "foo"}}"#,
        &[("{{cookiecutter.project_name}}/a.txt", "{{cookiecutter.key}}")],
    );
    h.add_template(
        "b",
        r#"{"key": {"default": ""}}"#,
        &[("{{cookiecutter.project_name}}/b.txt", "{{cookiecutter.key}}")],
    );

    let outcome = h
        .engine()
        .expand(&h.request(&["a", "b"], OverwritePolicy::Protective))
        .unwrap();

    assert!(outcome.is_success());
    assert!(h.prompter.asked().is_empty());
    assert_eq!(h.fs.contents("/work/demo/b.txt").as_deref(), Some("foo"));
}

#[test]
fn chain_order_matters() {
    let declares = r#"{"package_name": {"default": "demo_pkg"}}"#;
    let requires = r#"{"package_name": {"default": ""}}"#;
    let files_a = [(
        "{{cookiecutter.project_name}}/pyproject.toml",
        "name = \"{{cookiecutter.package_name}}\"",
    )];
    let files_b = [("{{cookiecutter.project_name}}/{{cookiecutter.package_name}}.py", "")];

    let h = Harness::new();
    h.add_template("a", declares, &files_a);
    h.add_template("b", requires, &files_b);
    let ok = h
        .engine()
        .expand(&h.request(&["a", "b"], OverwritePolicy::Protective));
    assert_eq!(status_code_of(&ok), 0);
    assert!(h.exists("/work/demo/demo_pkg.py"));

    let h = Harness::new();
    h.add_template("a", declares, &files_a);
    h.add_template("b", requires, &files_b);
    let err = h
        .engine()
        .expand(&h.request(&["b", "a"], OverwritePolicy::Protective))
        .unwrap_err();
    assert!(matches!(
        err,
        StencilError::Application(ApplicationError::Parameter { .. })
    ));
    assert_eq!(h.fs.snapshot(OUT).len(), 0);
}

#[test]
fn missing_values_are_prompted_with_their_label() {
    let h = Harness::new();
    h.prompter.push("prompted");

    let request = ExpansionRequest::new(["base"], OUT);
    let outcome = h.engine().expand(&request).unwrap();

    assert_eq!(outcome.parameters.get("project_name"), Some("prompted"));
    let asked = h.prompter.asked();
    assert_eq!(asked.len(), 1);
    assert_eq!(asked[0].label, "Project name");
    assert!(h.exists("/work/prompted/README.md"));
}

#[test]
fn cancelled_parameter_prompt_touches_nothing() {
    let h = Harness::new();
    h.prompter.push_cancel();

    let outcome = h
        .engine()
        .expand(&ExpansionRequest::new(["base"], OUT))
        .unwrap();

    assert!(outcome.is_cancelled());
    assert!(h.fs.snapshot(OUT).is_empty());
}

#[test]
fn manifests_are_removed_after_each_render() {
    let h = Harness::new();
    h.engine()
        .expand(&h.request(&["base"], OverwritePolicy::Protective))
        .unwrap();

    assert!(!h.exists("/templates/base/cookiecutter.json"));
    assert!(!h.exists("/work/cookiecutter.json"));
    assert!(!h.exists("/work/demo/stencil.json"));
}

#[test]
fn render_failure_keeps_earlier_templates() {
    let h = Harness::new();
    h.add_template(
        "broken",
        "{}",
        &[("{{cookiecutter.project_name}}/x.txt", "{{ cookiecutter.undefined }}")],
    );

    let err = h
        .engine()
        .expand(&h.request(&["base", "broken"], OverwritePolicy::Force))
        .unwrap_err();

    assert!(matches!(
        err,
        StencilError::Application(ApplicationError::Render { .. })
    ));
    assert!(h.exists("/work/demo/README.md"));
    assert!(!h.exists("/templates/broken/cookiecutter.json"));
}

#[test]
fn working_dir_templates_resolve() {
    let h = Harness::new();
    h.fs.add_file("/cwd/custom/extra/stencil.json", "{}");
    h.fs.add_file("/cwd/custom/extra/{{cookiecutter.project_name}}/EXTRA", "x");

    let outcome = h
        .engine()
        .expand(&h.request(&["base", "custom/extra"], OverwritePolicy::Protective))
        .unwrap();

    assert!(outcome.is_success());
    assert!(h.exists("/work/demo/EXTRA"));
}

#[test]
fn dry_run_is_repeatable() {
    let h = Harness::new();
    h.fs.add_file("/work/demo/README.md", "x");
    let renderer = SimpleRenderer::new(Arc::new(h.fs.clone()));
    let chain = [ResolvedTemplate {
        template: Template::new("base", "/templates/base"),
        parameters: ParameterSet::new()
            .with("project_name", "demo")
            .with("author", "anon"),
    }];

    let scratch = Path::new("/scratch");
    let differ = DryRunDiffer::new(&h.fs, &renderer, scratch);
    let first = differ.diff(&chain, Path::new(OUT)).unwrap();
    let second = differ.diff(&chain, Path::new(OUT)).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert!(!h.exists("/scratch"));
}
