//! Domain value objects: overwrite policy and expansion state.
//!
//! Plain `Copy` types with no identity and no I/O.

use std::fmt;

// ── OverwritePolicy ──────────────────────────────────────────────────────────

/// How pre-existing files in the output tree are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OverwritePolicy {
    /// Dry run first; ask what to do about conflicts.
    #[default]
    Protective,
    /// Dry run first; back up every conflict without asking.
    Backup,
    /// Skip dry run and conflict resolution; overwrite silently.
    Force,
}

impl OverwritePolicy {
    /// Build from the `overwrite` / `backup` flags. `overwrite` wins.
    pub const fn from_flags(overwrite: bool, backup: bool) -> Self {
        match (overwrite, backup) {
            (true, _) => Self::Force,
            (false, true) => Self::Backup,
            (false, false) => Self::Protective,
        }
    }

    /// Whether the dry-run and conflict phases run at all.
    pub const fn checks_conflicts(&self) -> bool {
        !matches!(self, Self::Force)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Protective => "protective",
            Self::Backup => "backup",
            Self::Force => "force",
        }
    }
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ExpansionState ───────────────────────────────────────────────────────────

/// States of one chain expansion.
///
/// `Cancelled` and `Failed` are reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionState {
    ResolvingChain,
    CollectingParameters,
    DryRunning,
    ResolvingConflicts,
    Committing,
    Done,
    Cancelled,
    Failed,
}

impl ExpansionState {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::Failed)
    }

    /// Whether `next` is a legal successor of `self`.
    pub const fn can_transition_to(&self, next: ExpansionState) -> bool {
        use ExpansionState::*;

        if self.is_terminal() {
            return false;
        }
        if matches!(next, Cancelled | Failed) {
            return true;
        }
        matches!(
            (self, next),
            (ResolvingChain, CollectingParameters)
                | (CollectingParameters, DryRunning)
                | (CollectingParameters, Committing)
                | (DryRunning, ResolvingConflicts)
                | (ResolvingConflicts, Committing)
                | (Committing, Done)
        )
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ResolvingChain => "resolving-chain",
            Self::CollectingParameters => "collecting-parameters",
            Self::DryRunning => "dry-running",
            Self::ResolvingConflicts => "resolving-conflicts",
            Self::Committing => "committing",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ExpansionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
