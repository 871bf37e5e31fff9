use super::parameters::ParameterSet;

/// Status code returned when the user cancels an expansion.
pub const EXIT_CANCEL: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionStatus {
    Success,
    Cancelled,
}

/// Result of a chain expansion that did not fail.
///
/// Failures travel as `Err(StencilError)`; see `status_code_of` for the
/// single-integer view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionOutcome {
    pub status: ExpansionStatus,
    pub parameters: ParameterSet,
}

impl ExpansionOutcome {
    pub fn success(parameters: ParameterSet) -> Self {
        Self {
            status: ExpansionStatus::Success,
            parameters,
        }
    }

    pub fn cancelled(parameters: ParameterSet) -> Self {
        Self {
            status: ExpansionStatus::Cancelled,
            parameters,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExpansionStatus::Success
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ExpansionStatus::Cancelled
    }

    /// `0` on success, [`EXIT_CANCEL`] when cancelled.
    pub fn code(&self) -> i32 {
        match self.status {
            ExpansionStatus::Success => 0,
            ExpansionStatus::Cancelled => EXIT_CANCEL,
        }
    }
}
