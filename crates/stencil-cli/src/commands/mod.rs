//! Command handlers.
//!
//! Handlers translate arguments into an [`ExpansionRequest`], run it through
//! an [`ExpansionOrchestrator`] wired to the local adapters, and report the
//! result. Project rules (what may be added where) live in
//! [`crate::project`].

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use stencil_adapters::{CookiecutterRenderer, LocalFilesystem, SimpleRenderer};
use stencil_core::{
    application::{ExpansionOrchestrator, ExpansionRequest, TemplateLocations, TemplateRenderer},
    domain::{DECLARATION_FILE, ParameterDeclaration, ParameterSet},
};

use crate::{
    config::{AppConfig, Engine},
    error::{CliError, CliResult, IntoCli as _},
    output::{ConsoleReporter, OutputManager},
    prompt::TerminalPrompter,
};

pub mod add;
pub mod completions;
pub mod config;
pub mod convert;
pub mod create;
pub mod list;

/// Orchestrator over the local filesystem, the configured engine, the
/// terminal and the console.
pub(crate) fn orchestrator(config: &AppConfig, output: &OutputManager) -> CliResult<ExpansionOrchestrator> {
    let cwd = std::env::current_dir().with_cli_context(|| "Failed to read the current directory")?;
    let mut locations = TemplateLocations::new(&config.templates.dir).with_working_dir(cwd);
    if let Some(dirs) = directories::BaseDirs::new() {
        locations = locations.with_home_dir(dirs.home_dir());
    }

    let renderer: Box<dyn TemplateRenderer> = match config.templates.engine {
        Engine::Builtin => Box::new(SimpleRenderer::new(Arc::new(LocalFilesystem::new()))),
        Engine::Cookiecutter => Box::new(CookiecutterRenderer::new()),
    };
    debug!(engine = config.templates.engine.as_str(), "renderer selected");

    Ok(ExpansionOrchestrator::new(
        Box::new(LocalFilesystem::new()),
        renderer,
        Box::new(TerminalPrompter::detect()),
        Box::new(ConsoleReporter::new(output.clone())),
        locations,
    )
    .with_scratch_dir(&config.templates.scratch_dir))
}

/// Run `request`; a cancelled expansion becomes [`CliError::Cancelled`].
pub(crate) fn expand(
    config: &AppConfig,
    output: &OutputManager,
    request: &ExpansionRequest,
) -> CliResult<ParameterSet> {
    info!(
        chain = ?request.templates,
        output_root = %request.output_root.display(),
        policy = %request.policy,
        "expanding"
    );
    let outcome = orchestrator(config, output)?.expand(request)?;
    if outcome.is_cancelled() {
        return Err(CliError::Cancelled);
    }
    Ok(outcome.parameters)
}

/// Parameters recorded in the project's manifest, topped up with the user's
/// preferences.
pub(crate) fn project_defaults(project: &Path, config: &AppConfig) -> CliResult<ParameterSet> {
    let manifest = project.join(DECLARATION_FILE);
    let mut defaults = if manifest.is_file() {
        let source = std::fs::read_to_string(&manifest)
            .with_cli_context(|| format!("Failed to read '{}'", manifest.display()))?;
        ParameterDeclaration::parse_all(&source, &manifest)
            .map_err(|e| CliError::Core(e.into()))?
            .into_iter()
            .map(|d| (d.key().to_string(), d.default_value().to_string()))
            .collect()
    } else {
        debug!(path = %manifest.display(), "project has no manifest");
        ParameterSet::new()
    };
    defaults.fill_from(&config.preference_parameters());
    Ok(defaults)
}

/// Write `parameters` as the project manifest, in declaration format.
pub(crate) fn write_project_manifest(project: &Path, parameters: &ParameterSet) -> CliResult<()> {
    let manifest = project.join(DECLARATION_FILE);
    std::fs::create_dir_all(project)
        .with_cli_context(|| format!("Failed to create '{}'", project.display()))?;
    std::fs::write(&manifest, parameters.to_declaration_json())
        .with_cli_context(|| format!("Failed to write '{}'", manifest.display()))?;
    debug!(path = %manifest.display(), entries = parameters.len(), "project manifest written");
    Ok(())
}

/// Directory the chain renders into: templates create the project
/// directory themselves.
pub(crate) fn output_root(project: &Path) -> CliResult<&Path> {
    project.parent().ok_or_else(|| CliError::InvalidInput {
        message: format!("'{}' has no parent directory", project.display()),
        source: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    #[test]
    fn manifest_round_trips_through_declaration_parser() {
        let tmp = TempDir::new().unwrap();
        let params = ParameterSet::new()
            .with("project_name", "demo")
            .with("github_username", "octo");

        write_project_manifest(tmp.path(), &params).unwrap();
        let defaults = project_defaults(tmp.path(), &AppConfig::default()).unwrap();
        assert_eq!(defaults, params);
    }

    #[test]
    fn manifest_values_beat_preferences() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(DECLARATION_FILE),
            r#"{"github_username": {"default": "from-project"}}"#,
        )
        .unwrap();
        let mut config = AppConfig::default();
        config.preferences.insert("github_username".into(), "from-prefs".into());
        config.preferences.insert("email".into(), "me@example.org".into());

        let defaults = project_defaults(tmp.path(), &config).unwrap();
        assert_eq!(defaults.get("github_username"), Some("from-project"));
        assert_eq!(defaults.get("email"), Some("me@example.org"));
    }

    #[test]
    fn missing_manifest_yields_preferences_only() {
        let tmp = TempDir::new().unwrap();
        let defaults = project_defaults(tmp.path(), &AppConfig::default()).unwrap();
        assert!(defaults.is_empty());
    }

    #[test]
    fn output_root_is_parent_of_project() {
        assert_eq!(
            output_root(Path::new("/work/demo")).unwrap(),
            Path::new("/work")
        );
        assert!(output_root(Path::new("/")).is_err());
    }
}
