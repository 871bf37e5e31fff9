//! Conflict resolution: decide what to do about files a chain would
//! overwrite, and make the backups when asked to.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, Prompter, Question, Reporter},
    },
    domain::{ConflictSet, Decision, OverwritePolicy, backup_candidates, backup_path},
    error::StencilResult,
};

pub struct ConflictResolver<'a> {
    filesystem: &'a dyn Filesystem,
    prompter: &'a dyn Prompter,
    reporter: &'a dyn Reporter,
}

impl<'a> ConflictResolver<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        prompter: &'a dyn Prompter,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            filesystem,
            prompter,
            reporter,
        }
    }

    /// Decide, then make backups if the decision calls for them.
    ///
    /// When this returns [`Decision::BackupThenOverwrite`] every conflicting
    /// file already has a backup next to it.
    #[instrument(skip_all, fields(conflicts = conflicts.len(), policy = %policy))]
    pub fn resolve(
        &self,
        conflicts: &ConflictSet,
        policy: OverwritePolicy,
        output_root: &Path,
    ) -> StencilResult<Decision> {
        let decision = self.decide(conflicts, policy, output_root)?;
        info!(%decision, "conflicts resolved");

        match decision {
            Decision::Abort => self.reporter.warn("Exiting."),
            Decision::BackupThenOverwrite => {
                self.backup_all(conflicts, output_root)?;
                self.reporter.warn("Overwriting files ...");
            }
            Decision::OverwriteNoBackup if !conflicts.is_empty() => {
                self.reporter.warn("Overwriting files ... (no backup)");
            }
            Decision::OverwriteNoBackup => {}
        }
        Ok(decision)
    }

    /// Choose a [`Decision`] without touching the filesystem.
    ///
    /// An empty set needs no protection. Otherwise the full list is reported
    /// and, under the protective policy, the user picks `c`ontinue, `a`bort
    /// or `b`ackup; empty input means abort.
    pub fn decide(
        &self,
        conflicts: &ConflictSet,
        policy: OverwritePolicy,
        output_root: &Path,
    ) -> StencilResult<Decision> {
        if conflicts.is_empty() || policy == OverwritePolicy::Force {
            return Ok(Decision::OverwriteNoBackup);
        }

        self.reporter.warn(&self.describe(conflicts, output_root));

        if policy == OverwritePolicy::Backup {
            return Ok(Decision::BackupThenOverwrite);
        }

        let question = Question::new(
            "conflict",
            "Press 'c' to continue\n      'a' to abort\n      'b' to keep the original files with .bak extension",
        )
        .with_choices(Decision::CHOICES)
        .with_default(Decision::DEFAULT_CHOICE);

        loop {
            let answer = self
                .prompter
                .ask(&question)
                .map_err(|e| ApplicationError::PromptUnavailable {
                    question: question.key.clone(),
                    reason: e.to_string(),
                })?;

            let Some(answer) = answer else {
                return Ok(Decision::Abort);
            };
            let answer = if answer.trim().is_empty() {
                Decision::DEFAULT_CHOICE.to_string()
            } else {
                answer
            };

            match Decision::from_answer(&answer) {
                Some(decision) => return Ok(decision),
                None => warn!(%answer, "not a valid choice, asking again"),
            }
        }
    }

    /// Copy every conflicting file to its `.bak` sibling.
    ///
    /// An existing backup is never replaced: the copy goes to the first free
    /// name of `x.bak`, `x.bak.1`, `x.bak.2` and so on. All or nothing: if any
    /// copy fails, backups created by this call are removed again and the
    /// error is returned.
    pub fn backup_all(&self, conflicts: &ConflictSet, output_root: &Path) -> StencilResult<Vec<PathBuf>> {
        self.reporter
            .warn(&format!("Making backup files in {}:", output_root.display()));

        let mut created = Vec::with_capacity(conflicts.len());

        for (_, entry) in conflicts.entries() {
            let source = entry.path().under(output_root);
            let target = self.free_backup_path(&source);

            if let Err(e) = self.filesystem.copy_file(&source, &target) {
                self.roll_back(&created);
                return Err(ApplicationError::Backup {
                    path: source,
                    reason: e.to_string(),
                }
                .into());
            }

            debug!(backup = %target.display(), "backup created");
            let first = backup_path(&source);
            if target == first {
                self.reporter
                    .warn(&format!("     created backup file: {}", target.display()));
            } else {
                self.reporter.warn(&format!(
                    "     created backup file: {} (kept existing backup {})",
                    target.display(),
                    first.display()
                ));
            }
            created.push(target);
        }

        Ok(created)
    }

    fn free_backup_path(&self, source: &Path) -> PathBuf {
        backup_candidates(source)
            .find(|candidate| !self.filesystem.exists(candidate))
            .unwrap_or_else(|| backup_path(source))
    }

    fn roll_back(&self, created: &[PathBuf]) {
        for path in created {
            if let Err(e) = self.filesystem.remove_file(path) {
                warn!(path = %path.display(), error = %e, "could not remove partial backup");
            }
        }
    }

    fn describe(&self, conflicts: &ConflictSet, output_root: &Path) -> String {
        let mut msg = format!(
            "The following pre-existing files will be overwritten in {}:\n",
            output_root.display()
        );
        let mut kept = Vec::new();
        for (template, entry) in conflicts.entries() {
            msg.push_str(&format!("    {template} : {entry}\n"));
            let previous = backup_path(&entry.path().under(output_root));
            if self.filesystem.exists(&previous) {
                kept.push(previous);
            }
        }
        if !kept.is_empty() {
            msg.push_str("These backup files already exist and will be kept; new backups get a numbered suffix:\n");
            for path in kept {
                msg.push_str(&format!("    {}\n", path.display()));
            }
        }
        msg
    }
}
