// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Stencil.
//!
//! Pure types for template chains: templates, parameter declarations and
//! values, conflicts and the decisions taken about them. No filesystem or
//! terminal access happens here; that goes through the ports of the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable entities**: `Template` is never mutated after resolution
//! - **Ordered parameters**: `ParameterSet` enforces insertion order and
//!   in-place replacement
//!
pub mod entities;
pub mod error;
pub mod value_objects;

mod validation;

pub use entities::{
    ConflictEntry, ConflictGroup, ConflictSet, DECLARATION_FILE, Decision, EXIT_CANCEL,
    ExpansionOutcome, ExpansionStatus, MANIFEST_FILE, ParameterDeclaration, ParameterSet,
    PromptKind, PromptSpec, RelativePath, ResolvedTemplate, Template, backup_candidates, backup_path,
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{ExpansionState, OverwritePolicy};

pub use validation::DomainValidator;
