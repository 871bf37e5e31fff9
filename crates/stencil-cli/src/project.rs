//! What kind of project lives at a path.
//!
//! A project directory holds `pyproject.toml`. Its package name is the
//! module name derived from the directory name. A *module* project keeps
//! its code in `<package>.py`, a *package* project in
//! `<package>/__init__.py`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CliError, CliResult, IntoCli as _};

/// Name of the file whose presence marks a project directory.
pub const PROJECT_FILE: &str = "pyproject.toml";

/// Turn a name into a valid Python module name.
///
/// Lowercases, replaces `-` and spaces with `_`, and prefixes a leading
/// digit with `_`.
pub fn to_module_name(name: &str) -> String {
    let mut module: String = name
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect();
    if module.starts_with(|c: char| c.is_ascii_digit()) {
        module.insert(0, '_');
    }
    module
}

/// The project name: last component of the project path.
pub fn project_name(project: &Path) -> CliResult<String> {
    project
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| CliError::InvalidInput {
            message: format!("cannot derive a project name from '{}'", project.display()),
            source: None,
        })
}

/// Package name of the project at `project`.
pub fn package_name(project: &Path) -> CliResult<String> {
    project_name(project).map(|name| to_module_name(&name))
}

pub fn is_project_directory(path: &Path) -> bool {
    path.join(PROJECT_FILE).is_file()
}

pub fn is_module_project(path: &Path) -> bool {
    package_name(path).is_ok_and(|package| path.join(format!("{package}.py")).is_file())
}

pub fn is_package_project(path: &Path) -> bool {
    package_name(path).is_ok_and(|package| path.join(package).join("__init__.py").is_file())
}

/// Source file of an app: `<package>/cli_<app>.py`.
pub fn app_source(project: &Path, app_name: &str) -> CliResult<PathBuf> {
    Ok(project
        .join(package_name(project)?)
        .join(format!("cli_{}.py", to_module_name(app_name))))
}

pub fn app_exists(project: &Path, app_name: &str) -> bool {
    app_source(project, app_name).is_ok_and(|path| path.is_file())
}

/// Any module of that name: Python file or package, or a binary extension.
pub fn module_exists(project: &Path, module_name: &str) -> bool {
    let Ok(package) = package_name(project) else {
        return false;
    };
    let package_dir = project.join(package);
    package_dir.join(format!("{module_name}.py")).is_file()
        || package_dir.join(module_name).join("__init__.py").is_file()
        || package_dir.join(format!("f2py_{module_name}")).is_dir()
        || package_dir.join(format!("cpp_{module_name}")).is_dir()
}

/// Nearest proper ancestor of `path` that is a project directory.
pub fn enclosing_project(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .skip(1)
        .find(|ancestor| is_project_directory(ancestor))
        .map(Path::to_path_buf)
}

/// Require a package project at `project`.
pub fn require_package_project(project: &Path) -> CliResult<()> {
    if !is_project_directory(project) {
        return Err(CliError::NotAProject {
            path: project.to_path_buf(),
        });
    }
    if is_module_project(project) || !is_package_project(project) {
        return Err(CliError::NotAPackageProject {
            path: project.to_path_buf(),
        });
    }
    Ok(())
}

/// Move `<dir>/<name>.py` to `<dir>/<name>/__init__.py`.
pub fn module_to_package(module_py: &Path) -> CliResult<PathBuf> {
    if !module_py.is_file() {
        return Err(CliError::InvalidInput {
            message: format!("{} is not a file", module_py.display()),
            source: None,
        });
    }
    let package_dir = module_py.with_extension("");
    std::fs::create_dir_all(&package_dir)
        .with_cli_context(|| format!("Failed to create '{}'", package_dir.display()))?;

    let init = package_dir.join("__init__.py");
    std::fs::rename(module_py, &init).with_cli_context(|| {
        format!(
            "Failed to move '{}' to '{}'",
            module_py.display(),
            init.display()
        )
    })?;

    debug!(from = %module_py.display(), to = %init.display(), "module converted to package");
    Ok(init)
}
