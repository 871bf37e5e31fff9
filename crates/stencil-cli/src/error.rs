//! CLI errors: what went wrong, what to try next, and the exit status.

use std::error::Error as _;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use stencil_core::error::StencilError;

pub use stencil_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Process status for a cancelled operation: the core's `-1` as an 8-bit
/// exit status.
pub const EXIT_CANCELLED: u8 = 255;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// `create` was pointed at an existing project.
    #[error("Project {path} exists already")]
    ProjectExists { path: PathBuf },

    /// `create` would place a project inside another one.
    #[error("Cannot create a project inside another project ({parent})")]
    NestedProject { parent: PathBuf },

    /// The project path holds no project.
    #[error("Not a project directory: {path}")]
    NotAProject { path: PathBuf },

    /// The project is a module project where a package project is needed.
    #[error("Cannot add to a module project: {path}")]
    NotAPackageProject { path: PathBuf },

    /// An app or module with that name is already present.
    #[error("{what} '{name}' exists already in {path}")]
    AlreadyExists {
        what: &'static str,
        name: String,
        path: PathBuf,
    },

    /// The name cannot be used as a Python module name.
    #[error("Not a valid module name: '{name}'")]
    InvalidModuleName { name: String, suggestion: String },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `stencil-core`.
    #[error("Expansion failed: {0}")]
    Core(#[from] StencilError),

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation canceled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::ProjectExists { path } => vec![
                format!("The directory '{}' already holds a project", path.display()),
                "Choose a different project path with -p".into(),
            ],

            Self::NestedProject { parent } => vec![
                format!("'{}' is a project directory", parent.display()),
                "Pass --allow-nesting to create the project anyway".into(),
            ],

            Self::NotAProject { path } => vec![
                format!("No pyproject.toml found in '{}'", path.display()),
                "Point -p at the project directory".into(),
                "Create a project first: stencil -p <dir> create --package".into(),
            ],

            Self::NotAPackageProject { .. } => vec![
                "Modules and apps can only be added to package projects".into(),
                "Convert the project first: stencil convert".into(),
            ],

            Self::AlreadyExists { what, name, .. } => vec![
                format!("Choose another name for the {} than '{}'", what, name),
            ],

            Self::InvalidModuleName { suggestion, .. } => vec![
                "Module names are lowercase and use underscores, not dashes or spaces".into(),
                format!("Try: {}", suggestion),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Print the config file location with: stencil config path".into(),
                "Use 'stencil config init' to create a default config".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Cancelled => vec![],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. }
            | Self::ProjectExists { .. }
            | Self::NestedProject { .. }
            | Self::NotAPackageProject { .. }
            | Self::AlreadyExists { .. }
            | Self::InvalidModuleName { .. } => ErrorCategory::UserError,
            Self::NotAProject { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Parameter => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Io | CoreCategory::Render | CoreCategory::Internal => {
                    ErrorCategory::Internal
                }
            },
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Cancelled => ErrorCategory::Cancelled,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    /// | Cancelled     | 255  |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
            ErrorCategory::Cancelled => EXIT_CANCELLED,
        }
    }

    /// The message printed on stderr: the error, its causes when `verbose`,
    /// then suggestions. Cancellation is a single neutral line.
    pub fn render(&self, verbose: bool, color: bool) -> String {
        let paint = Painter { color };
        if matches!(self, Self::Cancelled) {
            return format!("{}\n", paint.warn(&self.to_string()));
        }

        let mut out = format!("\n{} {}\n", paint.error("\u{2717} Error:"), self);

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                out.push_str(&format!("  {}\n", paint.dim(&format!("caused by: {err}"))));
                cause = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!("\n{}\n", paint.warn("Suggestions:")));
            for suggestion in suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            out.push_str(&format!("\n{}\n", paint.dim("Use -v / --verbose for more details.")));
        }
        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
            ErrorCategory::Cancelled => tracing::info!("Cancelled by user"),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// ANSI styling that collapses to plain text when colour is off.
struct Painter {
    color: bool,
}

impl Painter {
    fn error(&self, text: &str) -> String {
        self.apply(text, |t| t.red().bold().to_string())
    }

    fn warn(&self, text: &str) -> String {
        self.apply(text, |t| t.yellow().bold().to_string())
    }

    fn dim(&self, text: &str) -> String {
        self.apply(text, |t| t.dimmed().to_string())
    }

    fn apply(&self, text: &str, style: impl FnOnce(&str) -> String) -> String {
        if self.color { style(text) } else { text.to_owned() }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
    /// The user declined to go on.
    Cancelled,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, StencilError> {
    /// Core errors already carry their own context; the message is dropped.
    fn with_cli_context<F, S>(self, _f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(CliError::Core)
    }
}
