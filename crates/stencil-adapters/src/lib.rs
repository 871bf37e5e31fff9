//! Infrastructure adapters for Stencil.
//!
//! This crate implements the ports defined in `stencil-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod prompter;
pub mod renderer;
pub mod reporter;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use prompter::ScriptedPrompter;
pub use renderer::{CookiecutterRenderer, SimpleRenderer};
pub use reporter::{RecordingReporter, ReportLevel, TracingReporter};
