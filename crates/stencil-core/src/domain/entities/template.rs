//! Template identity.
//!
//! A [`Template`] is the resolved form of one element of a template chain.
//! It is built once by the resolver and never mutated afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use super::parameters::ParameterSet;

/// Conventional name of the parameter declaration file inside a template.
pub const DECLARATION_FILE: &str = "stencil.json";

/// Conventional name of the manifest handed to the renderer.
///
/// Written at the template root before each render and removed right after.
pub const MANIFEST_FILE: &str = "cookiecutter.json";

/// A template located on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template {
    identifier: String,
    resolved_path: PathBuf,
    parameter_file_name: String,
}

impl Template {
    /// Create a template with the conventional declaration file name.
    pub fn new(identifier: impl Into<String>, resolved_path: impl Into<PathBuf>) -> Self {
        Self {
            identifier: identifier.into(),
            resolved_path: resolved_path.into(),
            parameter_file_name: DECLARATION_FILE.to_string(),
        }
    }

    /// Override the declaration file name.
    pub fn with_parameter_file(mut self, name: impl Into<String>) -> Self {
        self.parameter_file_name = name.into();
        self
    }

    /// The identifier exactly as the caller gave it.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Absolute location of the template root.
    pub fn resolved_path(&self) -> &Path {
        &self.resolved_path
    }

    pub fn parameter_file_name(&self) -> &str {
        &self.parameter_file_name
    }

    /// Path of the declaration file (may not exist).
    pub fn declaration_path(&self) -> PathBuf {
        self.resolved_path.join(&self.parameter_file_name)
    }

    /// Path of the renderer manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.resolved_path.join(MANIFEST_FILE)
    }

    /// Short display name: the last component of the resolved path.
    pub fn name(&self) -> &str {
        self.resolved_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.identifier)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A template paired with the parameters it will be rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub template: Template,
    pub parameters: ParameterSet,
}
