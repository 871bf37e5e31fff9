//! Template resolution: identifier to template location.
//!
//! Three shapes of identifier are accepted, checked in this order:
//! 1. `~`-prefixed or absolute paths are used as given
//! 2. identifiers containing a path separator are relative to the working directory
//! 3. anything else names a built-in template in the installation directory

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{DECLARATION_FILE, DomainValidator as validator, Template},
    error::StencilResult,
};

/// Directories identifiers are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLocations {
    /// Where named (built-in) templates live.
    pub install_dir: PathBuf,
    /// Base for identifiers that contain a separator.
    pub working_dir: PathBuf,
    /// Expansion of a leading `~`. Without it the identifier is used verbatim.
    pub home_dir: Option<PathBuf>,
}

impl TemplateLocations {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            working_dir: PathBuf::from("."),
            home_dir: None,
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn with_home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(dir.into());
        self
    }

    /// Compute the location for `identifier` without touching the disk.
    pub fn locate(&self, identifier: &str) -> PathBuf {
        if let Some(rest) = identifier.strip_prefix('~') {
            let rest = rest.trim_start_matches(['/', MAIN_SEPARATOR]);
            let is_own_home = identifier.len() == 1 || rest.len() < identifier.len() - 1;
            return match &self.home_dir {
                Some(home) if is_own_home => home.join(rest),
                _ => PathBuf::from(identifier),
            };
        }

        let path = Path::new(identifier);
        if path.is_absolute() {
            path.to_path_buf()
        } else if identifier.contains('/') || identifier.contains(MAIN_SEPARATOR) {
            self.working_dir.join(path)
        } else {
            self.install_dir.join(path)
        }
    }
}

/// Maps template identifiers to [`Template`]s that exist on disk.
pub struct TemplateResolver<'a> {
    filesystem: &'a dyn Filesystem,
    locations: &'a TemplateLocations,
    parameter_file: &'a str,
}

impl<'a> TemplateResolver<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, locations: &'a TemplateLocations) -> Self {
        Self {
            filesystem,
            locations,
            parameter_file: DECLARATION_FILE,
        }
    }

    /// Use a declaration file name other than the conventional one.
    pub fn with_parameter_file(mut self, name: &'a str) -> Self {
        self.parameter_file = name;
        self
    }

    /// Resolve one identifier.
    #[instrument(skip(self))]
    pub fn resolve(&self, identifier: &str) -> StencilResult<Template> {
        validator::validate_identifier(identifier)?;

        let path = self.locations.locate(identifier);
        if !self.filesystem.exists(&path) {
            return Err(ApplicationError::TemplateNotFound {
                identifier: identifier.to_string(),
                path,
            }
            .into());
        }

        debug!(path = %path.display(), "template resolved");
        Ok(Template::new(identifier, path).with_parameter_file(self.parameter_file))
    }

    /// Resolve a whole chain up front. The first failure wins.
    pub fn resolve_chain(&self, identifiers: &[String]) -> StencilResult<Vec<Template>> {
        validator::validate_chain(identifiers)?;
        identifiers.iter().map(|id| self.resolve(id)).collect()
    }
}
