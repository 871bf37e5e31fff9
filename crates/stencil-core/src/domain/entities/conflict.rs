//! Conflicts detected by a dry run and the decision taken about them.

use std::fmt;

use super::common::RelativePath;

/// A path, relative to the output root, that the chain would write and that
/// already exists at the destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConflictEntry {
    path: RelativePath,
}

impl ConflictEntry {
    pub fn new(path: RelativePath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &RelativePath {
        &self.path
    }
}

impl fmt::Display for ConflictEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path.fmt(f)
    }
}

/// Conflicts attributed to one template of the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictGroup {
    pub template: String,
    pub entries: Vec<ConflictEntry>,
}

/// All conflicts of one chain, grouped by originating template in chain order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictSet {
    groups: Vec<ConflictGroup>,
}

impl ConflictSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a group. Empty groups are dropped so that
    /// [`is_empty`](Self::is_empty) means "nothing to protect".
    pub fn push(&mut self, template: impl Into<String>, entries: Vec<ConflictEntry>) {
        if !entries.is_empty() {
            self.groups.push(ConflictGroup {
                template: template.into(),
                entries,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of conflicting paths.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn groups(&self) -> &[ConflictGroup] {
        &self.groups
    }

    /// Every `(template, entry)` pair, in chain order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ConflictEntry)> {
        self.groups
            .iter()
            .flat_map(|g| g.entries.iter().map(move |e| (g.template.as_str(), e)))
    }
}

/// Outcome of conflict resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Abort,
    BackupThenOverwrite,
    OverwriteNoBackup,
}

impl Decision {
    /// Answer keys offered at the conflict prompt.
    pub const CHOICES: [&'static str; 3] = ["c", "a", "b"];

    /// Key selected on empty input.
    pub const DEFAULT_CHOICE: &'static str = "a";

    /// Interpret a prompt answer: `c`ontinue, `a`bort or `b`ackup.
    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "c" | "continue" => Some(Self::OverwriteNoBackup),
            "a" | "abort" => Some(Self::Abort),
            "b" | "backup" => Some(Self::BackupThenOverwrite),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Abort => "abort",
            Self::BackupThenOverwrite => "backup then overwrite",
            Self::OverwriteNoBackup => "overwrite without backup",
        };
        f.write_str(s)
    }
}
