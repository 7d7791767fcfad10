//! Report rendering.
//!
//! Pure functions from classification to text. Lines that must surface as
//! hook errors carry [`HOOK_ERROR_PREFIX`].

use std::fmt::Write;

use crate::classify::{Classification, CommitState, CommitVerdict};
use crate::outcome::PushOutcome;

/// Sentinel GitLab recognises on pre-receive output lines.
pub const HOOK_ERROR_PREFIX: &str = "GL-HOOK-ERR: ";

/// Printed after any commit with warnings or errors.
pub const COMPLIANCE_FOOTER: &str = "Any warnings or errors noted above may indicate compliance \
issues with committer ECA requirements. More information may be found on \
https://www.eclipse.org/legal/ECA.php";

/// Printed for every fatal error; no detail is leaked to the pusher.
pub const FATAL_MESSAGE: &str = "Internal server error, please contact administrator.";

const SERVER_ERROR_MESSAGE: &str = "Unable to validate commit, server error encountered.";

const SERVER_ERROR_HINT: &str =
    "Please contact the administrator, and retry the commit at a later time.";

const REFUSAL_MESSAGE: &str =
    "The ECA validation service refused the submission; the push is rejected.";

/// Marker printed next to a commit.
pub fn glyph(state: CommitState) -> &'static str {
    match state {
        CommitState::Clean => "✓",
        CommitState::Warning => "⚠",
        CommitState::Error => "✗",
    }
}

/// Prefix `line` with the hook error sentinel.
pub fn hook_error(line: &str) -> String {
    format!("{}{}", HOOK_ERROR_PREFIX, line)
}

/// Render the block for one commit.
pub fn render_commit(verdict: &CommitVerdict) -> String {
    let mut out = String::new();
    let result = &verdict.result;

    let _ = writeln!(out, "Commit: {}\t\t{}", verdict.sha, glyph(verdict.state));
    out.push('\n');
    for msg in &result.messages {
        let _ = writeln!(out, "\t{}", msg.text);
    }
    if !result.warnings.is_empty() {
        out.push_str("Warnings:\n");
        for msg in &result.warnings {
            let _ = writeln!(out, "\t{}", msg.text);
        }
    }
    if !result.errors.is_empty() {
        out.push_str("Errors:\n");
        for msg in &result.errors {
            let _ = writeln!(out, "{}", hook_error(&msg.text));
        }
    }
    if !result.warnings.is_empty() || !result.errors.is_empty() {
        let _ = writeln!(out, "{}", COMPLIANCE_FOOTER);
    }
    out.push('\n');
    out
}

/// Render every commit block, in classification order.
pub fn render_report(classification: &Classification) -> String {
    classification.verdicts.iter().map(render_commit).collect()
}

/// One-paragraph verdict for the whole push.
pub fn render_summary(outcome: &PushOutcome) -> String {
    match outcome {
        PushOutcome::Skipped(reason) => format!("Skipping ECA validation: {}.", reason),
        PushOutcome::Accepted { all_clean: true } => "ECA validation passed.".to_string(),
        PushOutcome::Accepted { all_clean: false } => "Project is not tracked by the ECA \
            validation service; the errors above are not enforced and the push is accepted."
            .to_string(),
        PushOutcome::AcceptedWithWarnings => {
            "ECA validation passed with warnings; the push is accepted.".to_string()
        }
        PushOutcome::Rejected => {
            hook_error("One or more commits failed ECA validation; the push is rejected.")
        }
        PushOutcome::ServerError => format!(
            "{}\n\n{}\n",
            hook_error(SERVER_ERROR_MESSAGE),
            SERVER_ERROR_HINT
        ),
    }
}

/// Verdict when the service's 403 overrides a body that did not fail.
pub fn render_refusal() -> String {
    hook_error(REFUSAL_MESSAGE)
}
