//! Dry-run conflict detection.
//!
//! The chain is rendered into a disposable scratch directory; every file
//! produced there whose relative path already exists under the output root
//! is a conflict.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use super::manifest::render_with_manifest;
use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer},
    },
    domain::{ConflictEntry, ConflictSet, RelativePath, ResolvedTemplate},
    error::{StencilError, StencilResult},
};

/// Operating-system bookkeeping files never counted as conflicts.
pub const HOUSEKEEPING_FILES: [&str; 3] = [".DS_Store", "Thumbs.db", "desktop.ini"];

pub struct DryRunDiffer<'a> {
    filesystem: &'a dyn Filesystem,
    renderer: &'a dyn TemplateRenderer,
    scratch_dir: &'a Path,
}

impl<'a> DryRunDiffer<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        renderer: &'a dyn TemplateRenderer,
        scratch_dir: &'a Path,
    ) -> Self {
        Self {
            filesystem,
            renderer,
            scratch_dir,
        }
    }

    /// Conflicts the chain would cause under `output_root`, grouped by the
    /// first template that produces each path.
    ///
    /// The scratch directory is recreated empty on entry and removed on every
    /// exit path. Failing to remove it is an error.
    #[instrument(skip_all, fields(scratch = %self.scratch_dir.display(), output = %output_root.display()))]
    pub fn diff(&self, chain: &[ResolvedTemplate], output_root: &Path) -> StencilResult<ConflictSet> {
        self.prepare_scratch()?;

        let result = self.render_and_compare(chain, output_root);

        let cleanup = self
            .filesystem
            .remove_dir_all(self.scratch_dir)
            .map_err(|e| self.scratch_error(e));

        match (result, cleanup) {
            (Ok(conflicts), Ok(())) => {
                info!(conflicts = conflicts.len(), "dry run finished");
                Ok(conflicts)
            }
            (Ok(_), Err(e)) => Err(e),
            (Err(e), cleanup) => {
                if let Err(cleanup) = cleanup {
                    warn!(error = %cleanup, "scratch directory left behind");
                }
                Err(e)
            }
        }
    }

    fn prepare_scratch(&self) -> StencilResult<()> {
        if self.filesystem.exists(self.scratch_dir) {
            debug!("removing stale scratch directory");
            self.filesystem
                .remove_dir_all(self.scratch_dir)
                .map_err(|e| self.scratch_error(e))?;
        }
        self.filesystem
            .create_dir_all(self.scratch_dir)
            .map_err(|e| self.scratch_error(e))
    }

    fn render_and_compare(
        &self,
        chain: &[ResolvedTemplate],
        output_root: &Path,
    ) -> StencilResult<ConflictSet> {
        let mut seen: BTreeSet<RelativePath> = BTreeSet::new();
        let mut conflicts = ConflictSet::new();

        for step in chain {
            render_with_manifest(self.filesystem, self.renderer, step, self.scratch_dir)?;

            let produced = self
                .filesystem
                .list_files(self.scratch_dir)
                .map_err(|e| self.scratch_error(e))?;

            let mut entries = Vec::new();
            for path in produced {
                if !seen.insert(path.clone()) || is_housekeeping(&path) {
                    continue;
                }
                if self.filesystem.is_file(&path.under(output_root)) {
                    debug!(template = %step.template, path = %path, "conflict");
                    entries.push(ConflictEntry::new(path));
                }
            }
            conflicts.push(step.template.name(), entries);
        }

        Ok(conflicts)
    }

    fn scratch_error(&self, error: StencilError) -> StencilError {
        ApplicationError::ScratchIo {
            path: self.scratch_dir.to_path_buf(),
            reason: error.to_string(),
        }
        .into()
    }
}

fn is_housekeeping(path: &RelativePath) -> bool {
    path.file_name()
        .is_some_and(|name| HOUSEKEEPING_FILES.contains(&name))
}
