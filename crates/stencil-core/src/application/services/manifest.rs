//! Renderer manifest handling shared by the dry-run and commit phases.

use std::path::Path;

use tracing::{trace, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer},
    },
    domain::ResolvedTemplate,
    error::{StencilError, StencilResult},
};

/// Write the manifest, render `step` into `output_root`, then remove the
/// manifest again whatever the render returned.
pub(crate) fn render_with_manifest(
    filesystem: &dyn Filesystem,
    renderer: &dyn TemplateRenderer,
    step: &ResolvedTemplate,
    output_root: &Path,
) -> StencilResult<()> {
    let manifest = step.template.manifest_path();
    filesystem
        .write_file(&manifest, step.parameters.to_manifest_json().as_bytes())
        .map_err(|e| render_error(step, e))?;
    trace!(path = %manifest.display(), "manifest written");

    let rendered = renderer
        .render(step.template.resolved_path(), output_root, &step.parameters)
        .map_err(|e| render_error(step, e));

    let removed = filesystem.remove_file(&manifest);
    match (rendered, removed) {
        (Err(e), Err(cleanup)) => {
            warn!(path = %manifest.display(), error = %cleanup, "manifest left behind");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), Err(cleanup)) => Err(cleanup),
        (Ok(()), Ok(())) => Ok(()),
    }
}

fn render_error(step: &ResolvedTemplate, error: StencilError) -> StencilError {
    match error {
        e @ StencilError::Application(ApplicationError::Render { .. }) => e,
        other => ApplicationError::Render {
            template: step.template.name().to_string(),
            reason: other.to_string(),
        }
        .into(),
    }
}
