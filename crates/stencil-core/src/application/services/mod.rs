//! Application services - orchestrate use cases.
//!
//! One module per engine component. Components borrow the ports they need;
//! the [`ExpansionOrchestrator`] owns them and wires the components together
//! for each expansion.

pub mod conflict_resolver;
pub mod dry_run;
pub mod expansion;
mod manifest;
pub mod parameter_store;
pub mod template_resolver;

pub use conflict_resolver::ConflictResolver;
pub use dry_run::{DryRunDiffer, HOUSEKEEPING_FILES};
pub use expansion::{ExpansionOrchestrator, ExpansionRequest, default_scratch_dir};
pub use parameter_store::ParameterStore;
pub use template_resolver::{TemplateLocations, TemplateResolver};
