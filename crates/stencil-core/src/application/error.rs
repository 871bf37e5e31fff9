//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while expanding a template chain.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A template identifier does not point at an existing directory.
    #[error("Template '{identifier}' not found at {}", path.display())]
    TemplateNotFound { identifier: String, path: PathBuf },

    /// A declared parameter could not be given a value.
    #[error("Parameter '{key}' of template '{template}': {reason}")]
    Parameter {
        template: String,
        key: String,
        reason: String,
    },

    /// A backup copy could not be written; nothing was overwritten.
    #[error("Could not back up {}: {reason}", path.display())]
    Backup { path: PathBuf, reason: String },

    /// The rendering engine failed.
    #[error("Rendering template '{template}' failed: {reason}")]
    Render { template: String, reason: String },

    /// The dry-run scratch directory could not be prepared or removed.
    #[error("Scratch directory {} unusable: {reason}", path.display())]
    ScratchIo { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {}: {reason}", path.display())]
    Filesystem { path: PathBuf, reason: String },

    /// No answer could be obtained for an interactive question.
    #[error("No answer available for '{question}': {reason}")]
    PromptUnavailable { question: String, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { identifier, path } => vec![
                format!("Looked for '{}' at {}", identifier, path.display()),
                "Try: stencil list to see the built-in templates".into(),
                "Use a path containing '/' for a template relative to the current directory".into(),
            ],
            Self::Parameter { key, .. } => vec![
                format!("Supply a value for '{}' when prompted", key),
                format!("Or give '{}' a default in the declaration file", key),
            ],
            Self::Backup { path, .. } => vec![
                format!("Check write permissions next to {}", path.display()),
                "No file was overwritten; it is safe to retry".into(),
            ],
            Self::Render { template, .. } => vec![
                format!("Inspect the files of template '{}'", template),
                "Templates committed before this one were left in place".into(),
            ],
            Self::ScratchIo { path, .. } => vec![
                format!("Remove {} manually and retry", path.display()),
                "Or set templates.scratch_dir to a writable location".into(),
            ],
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::PromptUnavailable { .. } => vec![
                "Run the command in an interactive terminal".into(),
                "Or pass --backup / --overwrite to avoid the conflict prompt".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::Parameter { .. } | Self::PromptUnavailable { .. } => ErrorCategory::Parameter,
            Self::Backup { .. } | Self::ScratchIo { .. } | Self::Filesystem { .. } => {
                ErrorCategory::Io
            }
            Self::Render { .. } => ErrorCategory::Render,
        }
    }
}
