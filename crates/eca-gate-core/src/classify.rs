//! Per-commit classification and aggregation.

use crate::outcome::PushOutcome;
use crate::validation::{CommitResult, ValidationResponse};

/// Verdict for a single commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitState {
    Clean,
    Warning,
    Error,
}

impl CommitState {
    /// Errors dominate warnings.
    pub fn of(result: &CommitResult) -> Self {
        if !result.errors.is_empty() {
            CommitState::Error
        } else if !result.warnings.is_empty() {
            CommitState::Warning
        } else {
            CommitState::Clean
        }
    }
}

/// A classified commit, ready for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitVerdict {
    pub sha: String,
    pub state: CommitState,
    pub result: CommitResult,
}

/// Classified response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Service order
    pub verdicts: Vec<CommitVerdict>,
    pub tracked: bool,
    pub outcome: PushOutcome,
}

impl Classification {
    pub fn states(&self) -> Vec<CommitState> {
        self.verdicts.iter().map(|v| v.state).collect()
    }

    /// Any commit is Warning or Error.
    pub fn any_warnings_or_errors(&self) -> bool {
        self.verdicts.iter().any(|v| v.state != CommitState::Clean)
    }
}

/// Classify every commit in `response`, in the order the service listed
/// them.
pub fn classify(response: &ValidationResponse) -> Classification {
    let verdicts: Vec<CommitVerdict> = response
        .commits
        .iter()
        .map(|(sha, result)| CommitVerdict {
            sha: sha.to_string(),
            state: CommitState::of(result),
            result: result.clone(),
        })
        .collect();

    let tracked = response.is_tracked();
    let outcome = aggregate(verdicts.iter().map(|v| v.state), tracked);

    Classification {
        verdicts,
        tracked,
        outcome,
    }
}

/// Fold commit states into the push decision.
///
/// Untracked projects are reported on but never blocked.
pub fn aggregate(states: impl IntoIterator<Item = CommitState>, tracked: bool) -> PushOutcome {
    let (mut any_error, mut any_warning) = (false, false);
    for state in states {
        match state {
            CommitState::Error => any_error = true,
            CommitState::Warning => any_warning = true,
            CommitState::Clean => {}
        }
    }

    match (tracked, any_error, any_warning) {
        (true, true, _) => PushOutcome::Rejected,
        (false, true, _) => PushOutcome::Accepted { all_clean: false },
        (_, false, true) => PushOutcome::AcceptedWithWarnings,
        (_, false, false) => PushOutcome::Accepted { all_clean: true },
    }
}
