//! Application layer for Stencil.
//!
//! This layer contains:
//! - **Services**: The expansion engine (resolver, parameter store, dry run,
//!   conflict resolver, orchestrator)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Validation rules live in `crate::domain`; this layer sequences them
//! against the ports.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ConflictResolver, DryRunDiffer, ExpansionOrchestrator, ExpansionRequest, ParameterStore,
    TemplateLocations, TemplateResolver,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, Prompter, Question, Reporter, TemplateRenderer};

pub use error::ApplicationError;
