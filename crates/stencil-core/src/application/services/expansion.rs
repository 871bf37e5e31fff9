//! Expansion Orchestrator - main application service.
//!
//! Expands a chain of templates into an output tree:
//! 1. Resolve every identifier of the chain
//! 2. Collect parameters template by template, carrying them forward
//! 3. Dry run the chain in scratch space and list conflicts (unless forced)
//! 4. Resolve the conflicts once for the whole chain
//! 5. Commit: render each template into the output root, in chain order
//!
//! Nothing under the output root is touched before step 5. A render failure
//! during step 5 leaves the templates committed before it in place.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use super::{
    conflict_resolver::ConflictResolver,
    dry_run::DryRunDiffer,
    manifest::render_with_manifest,
    parameter_store::ParameterStore,
    template_resolver::{TemplateLocations, TemplateResolver},
};
use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, Prompter, Reporter, TemplateRenderer},
    },
    domain::{
        DECLARATION_FILE, Decision, ExpansionOutcome, ExpansionState, OverwritePolicy, ParameterSet,
        ResolvedTemplate,
    },
    error::StencilResult,
};

/// Default scratch location for dry runs.
pub fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("stencil-dry-run")
}

/// One call of [`ExpansionOrchestrator::expand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionRequest {
    /// Template identifiers, in chain order.
    pub templates: Vec<String>,
    /// Directory the templates are rendered into.
    pub output_root: PathBuf,
    pub policy: OverwritePolicy,
    /// Values that override every template's own defaults.
    pub extra: ParameterSet,
    /// Carried defaults seeding the first template.
    pub defaults: ParameterSet,
}

impl ExpansionRequest {
    pub fn new<I, S>(templates: I, output_root: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            templates: templates.into_iter().map(Into::into).collect(),
            output_root: output_root.into(),
            policy: OverwritePolicy::Protective,
            extra: ParameterSet::new(),
            defaults: ParameterSet::new(),
        }
    }

    pub fn with_policy(mut self, policy: OverwritePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_extra(mut self, extra: ParameterSet) -> Self {
        self.extra = extra;
        self
    }

    pub fn with_defaults(mut self, defaults: ParameterSet) -> Self {
        self.defaults = defaults;
        self
    }
}

/// Tracks and logs state transitions of one expansion.
struct StateMachine {
    state: ExpansionState,
}

impl StateMachine {
    fn new() -> Self {
        debug!(state = %ExpansionState::ResolvingChain, "expansion started");
        Self {
            state: ExpansionState::ResolvingChain,
        }
    }

    fn advance(&mut self, next: ExpansionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
    }
}

/// Drives template chains through resolution, dry run, conflict resolution
/// and commit.
pub struct ExpansionOrchestrator {
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
    prompter: Box<dyn Prompter>,
    reporter: Box<dyn Reporter>,
    locations: TemplateLocations,
    scratch_dir: PathBuf,
    parameter_file: String,
}

impl ExpansionOrchestrator {
    /// Create an orchestrator with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use stencil_core::application::services::*;
    ///
    /// let orchestrator = ExpansionOrchestrator::new(
    ///     filesystem, // impl Filesystem
    ///     renderer,   // impl TemplateRenderer
    ///     prompter,   // impl Prompter
    ///     reporter,   // impl Reporter
    ///     TemplateLocations::new("/usr/share/stencil/templates"),
    /// );
    /// ```
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        renderer: Box<dyn TemplateRenderer>,
        prompter: Box<dyn Prompter>,
        reporter: Box<dyn Reporter>,
        locations: TemplateLocations,
    ) -> Self {
        Self {
            filesystem,
            renderer,
            prompter,
            reporter,
            locations,
            scratch_dir: default_scratch_dir(),
            parameter_file: DECLARATION_FILE.to_string(),
        }
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn with_parameter_file(mut self, name: impl Into<String>) -> Self {
        self.parameter_file = name.into();
        self
    }

    pub fn locations(&self) -> &TemplateLocations {
        &self.locations
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Expand a chain.
    ///
    /// `Ok` carries either success or cancellation, both with the parameters
    /// resolved so far. Every failure is an `Err`.
    #[instrument(
        skip_all,
        fields(
            chain = ?request.templates,
            output = %request.output_root.display(),
            policy = %request.policy
        )
    )]
    pub fn expand(&self, request: &ExpansionRequest) -> StencilResult<ExpansionOutcome> {
        let mut machine = StateMachine::new();
        let result = self.run(request, &mut machine);
        match &result {
            Ok(outcome) if outcome.is_cancelled() => info!("expansion cancelled"),
            Ok(_) => info!("expansion completed"),
            Err(e) => {
                machine.advance(ExpansionState::Failed);
                warn!(error = %e, "expansion failed");
            }
        }
        result
    }

    fn run(
        &self,
        request: &ExpansionRequest,
        machine: &mut StateMachine,
    ) -> StencilResult<ExpansionOutcome> {
        let fs = self.filesystem.as_ref();

        // ResolvingChain
        let templates = TemplateResolver::new(fs, &self.locations)
            .with_parameter_file(&self.parameter_file)
            .resolve_chain(&request.templates)?;

        // CollectingParameters
        machine.advance(ExpansionState::CollectingParameters);
        let store = ParameterStore::new(fs, self.prompter.as_ref());
        let mut carried = request.defaults.clone();
        let mut chain = Vec::with_capacity(templates.len());
        for template in templates {
            match store.collect(&template, &carried, &request.extra)? {
                Some(parameters) => {
                    carried = parameters.clone();
                    chain.push(ResolvedTemplate {
                        template,
                        parameters,
                    });
                }
                None => {
                    machine.advance(ExpansionState::Cancelled);
                    return Ok(ExpansionOutcome::cancelled(carried));
                }
            }
        }

        if request.policy.checks_conflicts() {
            // DryRunning
            machine.advance(ExpansionState::DryRunning);
            let conflicts = DryRunDiffer::new(fs, self.renderer.as_ref(), &self.scratch_dir)
                .diff(&chain, &request.output_root)?;

            // ResolvingConflicts
            machine.advance(ExpansionState::ResolvingConflicts);
            let decision = ConflictResolver::new(fs, self.prompter.as_ref(), self.reporter.as_ref())
                .resolve(&conflicts, request.policy, &request.output_root)?;
            if decision == Decision::Abort {
                machine.advance(ExpansionState::Cancelled);
                return Ok(ExpansionOutcome::cancelled(carried));
            }
        }

        // Committing
        machine.advance(ExpansionState::Committing);
        fs.create_dir_all(&request.output_root)
            .map_err(|e| ApplicationError::Filesystem {
                path: request.output_root.clone(),
                reason: e.to_string(),
            })?;
        for step in &chain {
            debug!(template = %step.template, "committing template");
            render_with_manifest(fs, self.renderer.as_ref(), step, &request.output_root)?;
        }

        machine.advance(ExpansionState::Done);
        Ok(ExpansionOutcome::success(carried))
    }
}
