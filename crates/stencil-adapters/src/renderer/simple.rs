//! Placeholder substitution renderer.
//!
//! Understands the subset of the cookiecutter format the bundled templates
//! use: `{{ cookiecutter.<key> }}` in path components and in UTF-8 file
//! bodies. Binary files are copied unchanged.

use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use stencil_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer, read_text},
    },
    domain::{DECLARATION_FILE, MANIFEST_FILE, ParameterSet},
    error::{StencilError, StencilResult},
};
use thiserror::Error;
use tracing::{debug, instrument, trace};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*cookiecutter\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
        .expect("Invalid placeholder regex")
});

/// Why a render failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderFailure {
    #[error("manifest {0} not found")]
    MissingManifest(PathBuf),

    #[error("manifest {path} is not valid: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("unknown parameter '{key}' in {location}")]
    UnknownParameter { key: String, location: String },

    #[error("path {0} is not valid UTF-8")]
    NonUtf8Path(PathBuf),

    #[error("path {0} renders to an empty component")]
    EmptyComponent(PathBuf),
}

impl RenderFailure {
    fn into_error(self, template_root: &Path) -> StencilError {
        let template = template_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| template_root.display().to_string());
        ApplicationError::Render {
            template,
            reason: self.to_string(),
        }
        .into()
    }
}

/// Simple renderer using placeholder substitution.
pub struct SimpleRenderer {
    filesystem: Arc<dyn Filesystem>,
    declaration_file: String,
}

impl SimpleRenderer {
    /// Create a renderer reading and writing through `filesystem`.
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            declaration_file: DECLARATION_FILE.to_string(),
        }
    }

    /// Name of the declaration file to leave out of the output.
    pub fn with_declaration_file(mut self, name: impl Into<String>) -> Self {
        self.declaration_file = name.into();
        self
    }

    fn load_manifest(&self, template_root: &Path) -> Result<ParameterSet, RenderFailure> {
        let path = template_root.join(MANIFEST_FILE);
        if !self.filesystem.is_file(&path) {
            return Err(RenderFailure::MissingManifest(path));
        }
        let text = read_text(self.filesystem.as_ref(), &path).map_err(|e| {
            RenderFailure::InvalidManifest {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;
        serde_json::from_str(&text).map_err(|e| RenderFailure::InvalidManifest {
            path,
            reason: e.to_string(),
        })
    }

    fn is_bookkeeping(&self, relative: &Path) -> bool {
        relative == Path::new(MANIFEST_FILE) || relative == Path::new(&self.declaration_file)
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(template = %template_root.display(), output = %output_root.display()))]
    fn render(
        &self,
        template_root: &Path,
        output_root: &Path,
        _parameters: &ParameterSet,
    ) -> StencilResult<()> {
        let parameters = self
            .load_manifest(template_root)
            .map_err(|f| f.into_error(template_root))?;

        let mut written = 0usize;
        for relative in self.filesystem.list_files(template_root)? {
            let relative = relative.as_path();
            if self.is_bookkeeping(relative) {
                continue;
            }

            let target = render_path(relative, &parameters)
                .map_err(|f| f.into_error(template_root))?;
            let target = output_root.join(target);

            let source = template_root.join(relative);
            let bytes = self.filesystem.read_file(&source)?;
            let content = match String::from_utf8(bytes) {
                Ok(text) => substitute(&text, &parameters, &relative.display().to_string())
                    .map_err(|f| f.into_error(template_root))?
                    .into_bytes(),
                Err(binary) => binary.into_bytes(),
            };

            if let Some(parent) = target.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&target, &content)?;
            trace!(path = %target.display(), "file written");
            written += 1;
        }

        debug!(files = written, "template rendered");
        Ok(())
    }
}

/// Substitute placeholders in every component of `relative`.
fn render_path(relative: &Path, parameters: &ParameterSet) -> Result<PathBuf, RenderFailure> {
    let mut rendered = PathBuf::new();
    for component in relative.components() {
        let Component::Normal(part) = component else {
            rendered.push(component);
            continue;
        };
        let part = part
            .to_str()
            .ok_or_else(|| RenderFailure::NonUtf8Path(relative.to_path_buf()))?;
        let part = substitute(part, parameters, &relative.display().to_string())?;
        if part.is_empty() {
            return Err(RenderFailure::EmptyComponent(relative.to_path_buf()));
        }
        rendered.push(part);
    }
    Ok(rendered)
}

/// Replace every `{{ cookiecutter.<key> }}` in `text`.
fn substitute(text: &str, parameters: &ParameterSet, location: &str) -> Result<String, RenderFailure> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(text) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = parameters
            .get(key.as_str())
            .ok_or_else(|| RenderFailure::UnknownParameter {
                key: key.as_str().to_string(),
                location: location.to_string(),
            })?;
        out.push_str(&text[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}
