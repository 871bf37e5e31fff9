//! The error type every core operation returns, with suggestions and the
//! status code a failure maps to.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, ExpansionOutcome};

/// Root error type for Stencil Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StencilError {
    /// Errors from the domain layer (validation of chains and declarations).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl StencilError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup with: stencil config list".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in Stencil".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Parameter => ErrorCategory::Parameter,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Non-zero status propagated to the caller.
    pub fn status_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Parameter => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Io | ErrorCategory::Render | ErrorCategory::Internal => 1,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Parameter,
    NotFound,
    Io,
    Render,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type StencilResult<T> = Result<T, StencilError>;

/// Fold an expansion result into a single status integer: `0` on success,
/// `EXIT_CANCEL` when cancelled, the error's status code otherwise.
pub fn status_code_of(result: &StencilResult<ExpansionOutcome>) -> i32 {
    match result {
        Ok(outcome) => outcome.code(),
        Err(e) => e.status_code(),
    }
}
