// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Template chain is empty")]
    EmptyChain,

    #[error("Invalid template identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("Malformed declaration file {file}: {reason}")]
    MalformedDeclaration { file: String, reason: String },

    #[error("Parameter '{key}' uses unsupported prompt type '{kind}'")]
    UnsupportedPromptType { key: String, kind: String },

    #[error("Parameter '{key}' declares an empty choice list")]
    EmptyChoices { key: String },

    #[error("Parameter '{key}' has no value")]
    UnresolvedParameter { key: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyChain => vec![
                "Pass at least one template with -T/--template".into(),
                "Try: stencil list to see the built-in templates".into(),
            ],
            Self::MalformedDeclaration { file, reason } => vec![
                format!("Fix the declaration file {}", file),
                format!("Details: {}", reason),
                "Each entry must look like {\"key\": {\"default\": \"...\", \"text\": \"...\"}}".into(),
            ],
            Self::UnsupportedPromptType { kind, .. } => vec![
                format!("'{}' is not a known prompt type", kind),
                "Supported types: str, int, float, bool".into(),
            ],
            Self::EmptyChoices { key } => vec![
                format!("Give '{}' at least one choice or drop the \"choices\" field", key),
            ],
            Self::UnresolvedParameter { key } => vec![
                format!("Provide a value for '{}' or give it a default", key),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyChain
            | Self::InvalidIdentifier { .. }
            | Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Validation,
            Self::MalformedDeclaration { .. }
            | Self::UnsupportedPromptType { .. }
            | Self::EmptyChoices { .. }
            | Self::UnresolvedParameter { .. } => ErrorCategory::Parameter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Parameter,
}
