//! # ECA Gate Core - Commit-range resolution and validation classification
//!
//! On every push to a hosted repository the gate works out which commits the
//! push actually introduces, submits their authorship metadata to the
//! Eclipse Contributor Agreement validation service, and turns the answer
//! into a pass/warn/fail report plus one accept/reject decision.
//!
//! ## Pipeline
//!
//! 1. [`project`]: fetch project metadata and decide whether to validate at
//!    all (unknown project, fork, no default branch)
//! 2. [`range`]: patch-equivalence diff against the default branch, anchored
//!    on the previous head
//! 3. [`VersionControl::read_many`]: commit metadata for the range
//! 4. [`ValidationApi`]: one submission, parsed once into
//!    [`ValidationResponse`]
//! 5. [`classify`] and [`report`]: per-commit [`CommitState`] and the
//!    aggregate [`PushOutcome`]
//!
//! The crate performs no I/O itself. Network and subprocess access sit
//! behind [`VersionControl`], [`ProjectApi`] and [`ValidationApi`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use eca_gate_core::{Gate, GateSettings, PushEvent, ProjectApi, ValidationApi, VersionControl};
//!
//! # async fn example(
//! #     vcs: &dyn VersionControl,
//! #     projects: &dyn ProjectApi,
//! #     validator: &dyn ValidationApi,
//! # ) -> eca_gate_core::GateResult<()> {
//! let push = PushEvent::parse("aaa111 ddd444 refs/heads/main")?;
//! let gate = Gate::new(vcs, projects, validator, GateSettings::default());
//! let evaluation = gate.evaluate("project-42", &push).await?;
//! print!("{}", evaluation.render());
//! std::process::exit(evaluation.outcome.exit_code());
//! # }
//! ```

#![deny(unsafe_code)]

pub mod classify;
pub mod commit;
pub mod error;
pub mod gate;
pub mod outcome;
pub mod project;
pub mod push;
pub mod range;
pub mod report;
pub mod validation;
pub mod vcs;

// Re-export main types
pub use classify::{aggregate, classify, Classification, CommitState, CommitVerdict};
pub use commit::{parse_parents, Commit, GitUser};
pub use error::{GateError, GateResult};
pub use gate::{Evaluation, Gate, GateSettings, ProjectApi, ValidationApi};
pub use outcome::PushOutcome;
pub use project::{
    ForkPolicy, GitLabProject, ProjectInfo, ProjectLookup, Resolution, SkipReason,
    UpstreamProject,
};
pub use push::{is_null_revision, PushEvent};
pub use range::{parse_cherry_output, resolve_range, CherryEntry, CherrySign};
pub use validation::{
    CommitResult, CommitResults, Message, ServiceReply, ValidationRequest, ValidationResponse,
    PROVIDER_GITLAB,
};
pub use vcs::VersionControl;
