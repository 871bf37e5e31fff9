//! Parameter collection for one template of a chain.

use tracing::{debug, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, Prompter, Question, read_text},
    },
    domain::{DomainValidator as validator, ParameterDeclaration, ParameterSet, PromptSpec, Template},
    error::StencilResult,
};

/// Reads declaration files and turns them into resolved parameter sets.
pub struct ParameterStore<'a> {
    filesystem: &'a dyn Filesystem,
    prompter: &'a dyn Prompter,
}

impl<'a> ParameterStore<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, prompter: &'a dyn Prompter) -> Self {
        Self {
            filesystem,
            prompter,
        }
    }

    /// Declarations of `template`, in file order. A missing file declares
    /// nothing.
    pub fn declarations(&self, template: &Template) -> StencilResult<Vec<ParameterDeclaration>> {
        let path = template.declaration_path();
        if !self.filesystem.is_file(&path) {
            debug!(path = %path.display(), "no declaration file");
            return Ok(Vec::new());
        }

        let source = read_text(self.filesystem, &path)?;
        Ok(ParameterDeclaration::parse_all(&source, &path)?)
    }

    /// Resolve every parameter of `template`.
    ///
    /// For each declared key the value is taken from `extra`, then `carried`,
    /// then the declared default. Keys of `carried` and `extra` that the
    /// template does not declare are appended afterwards so they keep flowing
    /// down the chain. Any value still empty is asked for until a non-empty
    /// answer arrives.
    ///
    /// Returns `Ok(None)` if the user cancels a prompt.
    #[instrument(skip_all, fields(template = %template))]
    pub fn collect(
        &self,
        template: &Template,
        carried: &ParameterSet,
        extra: &ParameterSet,
    ) -> StencilResult<Option<ParameterSet>> {
        let declarations = self.declarations(template)?;

        let mut effective = ParameterSet::new();
        for declaration in &declarations {
            let key = declaration.key();
            let value = extra
                .get(key)
                .or_else(|| carried.get(key))
                .unwrap_or(declaration.default_value());
            effective.insert(key, value);
        }
        effective.fill_from(carried);
        for (key, value) in extra.iter() {
            effective.insert(key, value);
        }

        let mut resolved = ParameterSet::new();
        for (key, value) in effective {
            if !value.is_empty() {
                resolved.insert(key, value);
                continue;
            }

            let prompt = declarations
                .iter()
                .find(|d| d.key() == key)
                .map(|d| d.prompt().clone())
                .unwrap_or_default();

            match self.ask_until_valid(template, &key, &prompt)? {
                Some(answer) => {
                    resolved.insert(key, answer);
                }
                None => {
                    debug!(key = %key, "prompt cancelled");
                    return Ok(None);
                }
            }
        }

        validator::validate_resolved(&declarations, &resolved)?;
        debug!(count = resolved.len(), "parameters resolved");
        Ok(Some(resolved))
    }

    fn ask_until_valid(
        &self,
        template: &Template,
        key: &str,
        prompt: &PromptSpec,
    ) -> StencilResult<Option<String>> {
        let question =
            Question::new(key, prompt.label(key)).with_choices(prompt.choices.iter().cloned());

        loop {
            let answer = self.prompter.ask(&question).map_err(|e| ApplicationError::Parameter {
                template: template.name().to_string(),
                key: key.to_string(),
                reason: e.to_string(),
            })?;

            let Some(answer) = answer else {
                return Ok(None);
            };

            match prompt.accept(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(reason) => warn!(key, %reason, "answer rejected, asking again"),
            }
        }
    }
}
