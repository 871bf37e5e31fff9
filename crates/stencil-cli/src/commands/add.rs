//! Implementation of the `stencil add` command.

use tracing::{info, instrument};

use stencil_core::{
    application::ExpansionRequest,
    domain::{OverwritePolicy, ParameterSet},
};

use crate::{
    cli::{AddArgs, AddKind, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli as _},
    output::OutputManager,
    project::{
        app_exists, module_exists, module_to_package, package_name, project_name,
        require_package_project, to_module_name,
    },
};

use super::{expand, output_root, project_defaults};

impl AddKind {
    /// Chain used when no `-T` is given.
    pub fn default_template(self) -> &'static str {
        match self {
            Self::App => "app-simple",
            Self::AppGroup => "app-sub-commands",
            Self::Module | Self::ModulePackage => "module-py",
            Self::F2py => "module-f2py",
            Self::Cpp => "module-cpp",
        }
    }

    fn is_app(self) -> bool {
        matches!(self, Self::App | Self::AppGroup)
    }

    fn describe(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::AppGroup => "app with sub-commands",
            Self::Module => "Python module",
            Self::ModulePackage => "Python module package",
            Self::F2py => "f2py module",
            Self::Cpp => "C++ module",
        }
    }
}

/// Execute the `stencil add` command.
#[instrument(skip_all, fields(name = %args.name))]
pub fn execute(
    args: AddArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let project = global
        .project_dir()
        .with_cli_context(|| "Failed to resolve the project path")?;
    require_package_project(&project)?;

    let kind = args.kind();
    check_name(&project, &args.name, kind)?;

    let project_name = project_name(&project)?;
    let package = package_name(&project)?;
    let extra = ParameterSet::new()
        .with("project_name", project_name.as_str())
        .with("package_name", package.as_str());
    let extra = if kind.is_app() {
        extra
            .with("app_name", args.name.as_str())
            .with("app_module_name", to_module_name(&args.name))
    } else {
        extra.with("module_name", args.name.as_str())
    };

    let templates = if args.templates.is_empty() {
        vec![kind.default_template().to_string()]
    } else {
        args.templates.clone()
    };

    output.header(&format!(
        "Adding {} '{}' to {}",
        kind.describe(),
        args.name,
        project_name
    ))?;

    let request = ExpansionRequest::new(templates, output_root(&project)?)
        .with_policy(OverwritePolicy::from_flags(
            args.overwrite.overwrite,
            args.overwrite.backup,
        ))
        .with_extra(extra)
        .with_defaults(project_defaults(&project, &config)?);
    expand(&config, &output, &request)?;

    if kind == AddKind::ModulePackage {
        module_to_package(&project.join(&package).join(format!("{}.py", args.name)))?;
    }
    info!(kind = kind.describe(), "added");

    output.success(&format!("Added {} '{}'", kind.describe(), args.name))?;
    Ok(())
}

/// Refuse names already taken and module names Python cannot import.
fn check_name(project: &std::path::Path, name: &str, kind: AddKind) -> CliResult<()> {
    if kind.is_app() {
        if app_exists(project, name) {
            return Err(CliError::AlreadyExists {
                what: "App",
                name: name.to_string(),
                path: project.to_path_buf(),
            });
        }
        return Ok(());
    }

    let valid = to_module_name(name);
    if valid != name {
        return Err(CliError::InvalidModuleName {
            name: name.to_string(),
            suggestion: valid,
        });
    }
    if module_exists(project, name) {
        return Err(CliError::AlreadyExists {
            what: "Module",
            name: name.to_string(),
            path: project.to_path_buf(),
        });
    }
    Ok(())
}
