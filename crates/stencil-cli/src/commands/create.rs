//! Implementation of the `stencil create` command.
//!
//! The last component of the project path names the project. The default
//! chain builds a module project; `--package` builds a package project.
//! On success the resolved parameters are kept in `<project>/stencil.json`
//! so later `add` and `convert` runs reuse them.

use tracing::{info, instrument};

use stencil_core::{
    application::ExpansionRequest,
    domain::{OverwritePolicy, ParameterSet},
};

use crate::{
    cli::{CreateArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli as _},
    output::OutputManager,
    project::{enclosing_project, is_project_directory, project_name, to_module_name},
};

use super::{expand, output_root, write_project_manifest};

pub const MODULE_CHAIN: [&str; 2] = ["package-base", "package-simple"];
pub const PACKAGE_CHAIN: [&str; 3] = ["package-base", "package-general", "package-general-docs"];

/// Licenses offered by the templates; `--license` picks the first one it
/// is a prefix of.
pub const LICENSES: [&str; 6] = [
    "MIT license",
    "BSD license",
    "ISC license",
    "Apache Software License 2.0",
    "GNU General Public License v3",
    "Not open source",
];

/// Execute the `stencil create` command.
#[instrument(skip_all, fields(package = args.package))]
pub fn execute(
    args: CreateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project = global
        .project_dir()
        .with_cli_context(|| "Failed to resolve the project path")?;
    let name = project_name(&project)?;

    if is_project_directory(&project) {
        return Err(CliError::ProjectExists { path: project });
    }
    if !args.allow_nesting {
        if let Some(parent) = enclosing_project(&project) {
            return Err(CliError::NestedProject { parent });
        }
    }

    let templates = chain(&args);
    let structure = match (args.templates.is_empty(), args.package) {
        (false, _) => "user-defined chain".to_string(),
        (true, true) => format!("package ({}/__init__.py)", to_module_name(&name)),
        (true, false) => format!("module ({}.py)", to_module_name(&name)),
    };
    output.header(&format!("Creating project '{name}' as a {structure}"))?;

    let request = ExpansionRequest::new(templates, output_root(&project)?)
        .with_policy(OverwritePolicy::Protective)
        .with_extra(extra_parameters(&name, &args))
        .with_defaults(config.preference_parameters());

    let parameters = expand(&config, &output, &request)?;
    write_project_manifest(&project, &parameters)?;
    info!(project = %project.display(), "project created");

    output.success(&format!("Project '{name}' created at {}", project.display()))?;
    if !output.is_quiet() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", project.display()))?;
        output.print("  stencil add <name> --app    # add a command line app")?;
    }

    Ok(())
}

fn chain(args: &CreateArgs) -> Vec<String> {
    if !args.templates.is_empty() {
        return args.templates.clone();
    }
    let chain: &[&str] = if args.package {
        &PACKAGE_CHAIN
    } else {
        &MODULE_CHAIN
    };
    chain.iter().map(|t| t.to_string()).collect()
}

/// First known license starting with `prefix`, else MIT.
pub fn match_license(prefix: &str) -> &'static str {
    LICENSES
        .iter()
        .find(|license| license.starts_with(prefix))
        .copied()
        .unwrap_or(LICENSES[0])
}

fn extra_parameters(name: &str, args: &CreateArgs) -> ParameterSet {
    ParameterSet::new()
        .with("project_name", name)
        .with("package_name", to_module_name(name))
        .with("project_short_description", args.description.as_str())
        .with("open_source_license", match_license(&args.license))
        .with("year", chrono::Local::now().format("%Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(package: bool, templates: &[&str]) -> CreateArgs {
        CreateArgs {
            package,
            templates: templates.iter().map(|t| t.to_string()).collect(),
            description: "A demo".into(),
            license: "BSD".into(),
            allow_nesting: false,
        }
    }

    #[test]
    fn default_chains() {
        assert_eq!(chain(&args(false, &[])), MODULE_CHAIN);
        assert_eq!(chain(&args(true, &[])), PACKAGE_CHAIN);
    }

    #[test]
    fn explicit_templates_override_structure() {
        assert_eq!(chain(&args(true, &["mine", "./other"])), ["mine", "./other"]);
    }

    #[test]
    fn license_prefix_matching() {
        assert_eq!(match_license("BSD"), "BSD license");
        assert_eq!(match_license("GNU"), "GNU General Public License v3");
        assert_eq!(match_license("Not"), "Not open source");
        assert_eq!(match_license("WTFPL"), "MIT license");
    }

    #[test]
    fn extra_parameters_are_derived_from_the_name() {
        let extra = extra_parameters("My-Lib", &args(false, &[]));
        assert_eq!(extra.get("project_name"), Some("My-Lib"));
        assert_eq!(extra.get("package_name"), Some("my_lib"));
        assert_eq!(extra.get("open_source_license"), Some("BSD license"));
        assert_eq!(extra.get("year").map(str::len), Some(4));
    }
}
