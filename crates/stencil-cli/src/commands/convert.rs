//! `stencil convert`: module project to package project.

use tracing::instrument;

use stencil_core::{
    application::ExpansionRequest,
    domain::{OverwritePolicy, ParameterSet},
};

use crate::{
    cli::{ConvertArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli as _},
    output::OutputManager,
    project::{is_module_project, is_project_directory, module_to_package, package_name, project_name},
};

use super::{expand, output_root, project_defaults};

/// Documentation a package project has and a module project lacks.
pub const DOCS_TEMPLATE: &str = "package-general-docs";

#[instrument(skip_all)]
pub fn execute(
    args: ConvertArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project = global
        .project_dir()
        .with_cli_context(|| "Failed to resolve the project path")?;
    if !is_project_directory(&project) {
        return Err(CliError::NotAProject { path: project });
    }
    if !is_module_project(&project) {
        return Err(CliError::InvalidInput {
            message: format!("{} is not a module project", project.display()),
            source: None,
        });
    }

    let name = project_name(&project)?;
    let package = package_name(&project)?;
    output.header(&format!("Converting '{name}' to a package project"))?;

    let request = ExpansionRequest::new([DOCS_TEMPLATE], output_root(&project)?)
        .with_policy(OverwritePolicy::from_flags(
            args.overwrite.overwrite,
            args.overwrite.backup,
        ))
        .with_extra(
            ParameterSet::new()
                .with("project_name", name.as_str())
                .with("package_name", package.as_str()),
        )
        .with_defaults(project_defaults(&project, &config)?);
    expand(&config, &output, &request)?;

    let init = module_to_package(&project.join(format!("{package}.py")))?;
    output.success(&format!("Converted: {}", init.display()))?;
    Ok(())
}
