pub mod common;
pub mod conflict;
pub mod outcome;
pub mod parameters;
pub mod template;

pub use crate::domain::DomainError;
pub use common::{RelativePath, backup_candidates, backup_path};
pub use conflict::{ConflictEntry, ConflictGroup, ConflictSet, Decision};
pub use outcome::{EXIT_CANCEL, ExpansionOutcome, ExpansionStatus};
pub use parameters::{ParameterDeclaration, ParameterSet, PromptKind, PromptSpec};
pub use template::{DECLARATION_FILE, MANIFEST_FILE, ResolvedTemplate, Template};
