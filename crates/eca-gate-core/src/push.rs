//! Pre-receive hook input.
//!
//! GitLab feeds the hook one line per updated ref:
//! `<previous-head> <new-head> <ref-name>`. Only the first line and its first
//! two tokens drive the gate; the ref name is kept for logging.

use crate::error::{GateError, GateResult};

/// One ref update as announced to the pre-receive hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    /// Tip of the ref before the push, or the all-zero sentinel for a new ref
    pub previous_head: String,
    /// Tip of the ref after the push, or the all-zero sentinel for a deletion
    pub new_head: String,
    /// Updated ref, when supplied
    pub ref_name: Option<String>,
}

impl PushEvent {
    /// Build an event from explicit pointers.
    pub fn new(previous_head: impl Into<String>, new_head: impl Into<String>) -> Self {
        Self {
            previous_head: previous_head.into(),
            new_head: new_head.into(),
            ref_name: None,
        }
    }

    /// Parse the hook's standard input.
    ///
    /// Tokens are split on any whitespace, so trailing newlines and further
    /// ref lines are tolerated; anything past the third token is ignored.
    pub fn parse(input: &str) -> GateResult<Self> {
        let mut tokens = input.split_whitespace();
        let previous_head = tokens.next();
        let new_head = tokens.next();

        match (previous_head, new_head) {
            (Some(previous_head), Some(new_head)) => Ok(Self {
                previous_head: previous_head.to_string(),
                new_head: new_head.to_string(),
                ref_name: tokens.next().map(str::to_string),
            }),
            _ => Err(GateError::InvalidInput(
                "expected '<previous-head> <new-head> [<ref>]'".into(),
            )),
        }
    }

    /// The push creates a ref that did not exist before.
    pub fn is_new_ref(&self) -> bool {
        is_null_revision(&self.previous_head)
    }

    /// The push deletes the ref; nothing can be introduced.
    pub fn is_deletion(&self) -> bool {
        is_null_revision(&self.new_head)
    }
}

/// Whether `rev` is git's all-zero "no object" id (SHA-1 or SHA-256 width).
pub fn is_null_revision(rev: &str) -> bool {
    matches!(rev.len(), 40 | 64) && rev.bytes().all(|b| b == b'0')
}
