//! Renderer that delegates to an installed `cookiecutter` executable.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use stencil_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::ParameterSet,
    error::StencilResult,
};
use tracing::{debug, instrument};

/// Runs `cookiecutter <root> --no-input --overwrite-if-exists --output-dir <out>`.
///
/// The parameters reach the tool through the manifest file written at the
/// template root.
#[derive(Debug, Clone)]
pub struct CookiecutterRenderer {
    program: OsString,
}

impl CookiecutterRenderer {
    pub fn new() -> Self {
        Self::with_program("cookiecutter")
    }

    /// Use another executable, e.g. a virtualenv-local one.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, template_root: &Path, output_root: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(template_root)
            .arg("--no-input")
            .arg("--overwrite-if-exists")
            .arg("--output-dir")
            .arg(output_root);
        cmd
    }
}

impl Default for CookiecutterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for CookiecutterRenderer {
    #[instrument(skip_all, fields(template = %template_root.display()))]
    fn render(
        &self,
        template_root: &Path,
        output_root: &Path,
        _parameters: &ParameterSet,
    ) -> StencilResult<()> {
        let template = template_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let output = self
            .command(template_root, output_root)
            .output()
            .map_err(|e| ApplicationError::Render {
                template: template.clone(),
                reason: format!("could not run {}: {}", self.program.to_string_lossy(), e),
            })?;

        if !output.status.success() {
            return Err(ApplicationError::Render {
                template,
                reason: format!(
                    "{} exited with {}: {}",
                    self.program.to_string_lossy(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            }
            .into());
        }

        debug!("cookiecutter finished");
        Ok(())
    }
}
