//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the engine needs from external systems.
//! The `stencil-adapters` crate provides implementations.

use std::path::Path;

use crate::application::ApplicationError;
use crate::domain::{ParameterSet, RelativePath};
use crate::error::StencilResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stencil_adapters::filesystem::LocalFilesystem` (production)
/// - `stencil_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StencilResult<()>;

    /// Write content to a file, replacing it if present. Parents must exist.
    fn write_file(&self, path: &Path, content: &[u8]) -> StencilResult<()>;

    fn read_file(&self, path: &Path) -> StencilResult<Vec<u8>>;

    /// Copy a file byte for byte, replacing the destination.
    fn copy_file(&self, from: &Path, to: &Path) -> StencilResult<()>;

    fn remove_file(&self, path: &Path) -> StencilResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StencilResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Every file below `root`, relative to it, sorted. Directories are not
    /// listed.
    fn list_files(&self, root: &Path) -> StencilResult<Vec<RelativePath>>;
}

/// Read a UTF-8 file through the port.
pub fn read_text(fs: &dyn Filesystem, path: &Path) -> StencilResult<String> {
    let bytes = fs.read_file(path)?;
    String::from_utf8(bytes).map_err(|e| {
        ApplicationError::Filesystem {
            path: path.to_path_buf(),
            reason: format!("not valid UTF-8: {e}"),
        }
        .into()
    })
}

/// Port for the template rendering engine.
///
/// Implemented by:
/// - `stencil_adapters::renderer::SimpleRenderer` (placeholder substitution)
/// - `stencil_adapters::renderer::CookiecutterRenderer` (external process)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Expand the template at `template_root` under `output_root`.
    ///
    /// The engine reads the manifest file written at the template root; the
    /// `parameters` argument carries the same values for engines that want
    /// them directly. Nothing is reported about which files are written.
    fn render(
        &self,
        template_root: &Path,
        output_root: &Path,
        parameters: &ParameterSet,
    ) -> StencilResult<()>;
}

/// A question put to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub key: String,
    pub label: String,
    /// Allowed answers; empty means free text.
    pub choices: Vec<String>,
    /// Answer assumed when the user just presses enter.
    pub default: Option<String>,
}

impl Question {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            choices: Vec::new(),
            default: None,
        }
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Port for interactive answers.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync {
    /// `Ok(Some(answer))` (possibly empty), `Ok(None)` when the user cancels,
    /// `Err` when no answer can be obtained at all.
    fn ask(&self, question: &Question) -> StencilResult<Option<String>>;
}

/// Port for user-facing messages.
#[cfg_attr(test, mockall::automock)]
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}
