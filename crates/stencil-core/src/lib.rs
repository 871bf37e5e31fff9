//! Stencil Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of the Stencil
//! template expansion engine, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           stencil-cli (CLI)             │
//! │   (create / add / convert commands)     │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │        (ExpansionOrchestrator)          │
//! │ resolver · parameters · dry run · conflicts │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Renderer, Prompter, Reporter) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     stencil-adapters (Infrastructure)   │
//! │ (LocalFilesystem, SimpleRenderer, etc)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Template, ParameterSet, ConflictSet)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stencil_core::prelude::*;
//!
//! let orchestrator = ExpansionOrchestrator::new(
//!     filesystem, renderer, prompter, reporter,
//!     TemplateLocations::new("/usr/share/stencil/templates"),
//! );
//!
//! let request = ExpansionRequest::new(["package-base", "package-simple"], "/work")
//!     .with_extra(ParameterSet::new().with("project_name", "demo"));
//!
//! let outcome = orchestrator.expand(&request)?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ExpansionOrchestrator, ExpansionRequest, TemplateLocations,
        ports::{Filesystem, Prompter, Question, Reporter, TemplateRenderer},
    };
    pub use crate::domain::{
        EXIT_CANCEL, ExpansionOutcome, ExpansionStatus, OverwritePolicy, ParameterSet, Template,
    };
    pub use crate::error::{StencilError, StencilResult, status_code_of};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
