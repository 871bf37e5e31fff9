//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `stencil-adapters` and the CLI
//! implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateRenderer`: The opaque rendering engine
//!   - `Prompter`: Interactive answers
//!   - `Reporter`: User-facing progress and warnings

pub mod output;

pub use output::{Filesystem, Prompter, Question, Reporter, TemplateRenderer, read_text};

#[cfg(test)]
pub use output::{MockFilesystem, MockPrompter, MockReporter, MockTemplateRenderer};
