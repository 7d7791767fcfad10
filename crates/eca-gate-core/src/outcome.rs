//! Aggregate decision for one push.

use crate::project::SkipReason;

/// Exactly one per invocation; the only thing mapped to the exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Validation did not run
    Skipped(SkipReason),
    /// Accepted; `all_clean` is false when an untracked project's commits
    /// carried errors that were reported but not enforced
    Accepted { all_clean: bool },
    /// Accepted, at least one commit has warnings
    AcceptedWithWarnings,
    /// At least one commit failed validation on an enforced project
    Rejected,
    /// The validation service gave no usable verdict
    ServerError,
}

impl PushOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            PushOutcome::Skipped(_)
                | PushOutcome::Accepted { .. }
                | PushOutcome::AcceptedWithWarnings
        )
    }

    /// Process exit status for the hook.
    pub fn exit_code(&self) -> i32 {
        if self.is_accepted() {
            0
        } else {
            1
        }
    }
}
