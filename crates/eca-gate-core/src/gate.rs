//! The push gate pipeline.
//!
//! Project resolution → commit range → commit metadata → validation →
//! classification. Each stage runs only after the previous one succeeded;
//! skips short-circuit before any later collaborator is touched.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::classify::{classify, Classification};
use crate::error::GateResult;
use crate::outcome::PushOutcome;
use crate::project::{self, ForkPolicy, ProjectLookup, Resolution, SkipReason};
use crate::push::PushEvent;
use crate::range::resolve_range;
use crate::report::{render_refusal, render_report, render_summary};
use crate::validation::{ServiceReply, ValidationRequest, ValidationResponse};
use crate::vcs::VersionControl;

/// Hosting platform project metadata.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    /// Look up a project by id.
    async fn fetch_project(&self, project_id: &str) -> GateResult<ProjectLookup>;
}

/// Sign-off validation service.
#[async_trait]
pub trait ValidationApi: Send + Sync {
    /// Submit commits and return the raw reply; the body is parsed by the gate.
    async fn submit(&self, request: &ValidationRequest) -> GateResult<ServiceReply>;
}

/// Policy knobs of the gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateSettings {
    pub fork_policy: ForkPolicy,
    pub strict_mode: bool,
}

/// Result of evaluating one push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub outcome: PushOutcome,
    /// Identifiers submitted for validation, oldest first
    pub range: Vec<String>,
    /// Present once the service answered with a parseable body
    pub classification: Option<Classification>,
    /// The service's 403 rejected a push its body did not fail
    pub refused: bool,
}

impl Evaluation {
    fn finished(outcome: PushOutcome) -> Self {
        Self {
            outcome,
            range: Vec::new(),
            classification: None,
            refused: false,
        }
    }

    fn server_error(range: Vec<String>) -> Self {
        Self {
            range,
            ..Self::finished(PushOutcome::ServerError)
        }
    }

    /// Full hook output: per-commit report, then the verdict.
    pub fn render(&self) -> String {
        let mut out = self
            .classification
            .as_ref()
            .map(render_report)
            .unwrap_or_default();
        if self.refused {
            out.push_str(&render_refusal());
        } else {
            out.push_str(&render_summary(&self.outcome));
        }
        out.push('\n');
        out
    }
}

/// Evaluates pushes against the collaborators it was built with.
pub struct Gate<'a> {
    vcs: &'a dyn VersionControl,
    projects: &'a dyn ProjectApi,
    validator: &'a dyn ValidationApi,
    settings: GateSettings,
}

impl<'a> Gate<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        projects: &'a dyn ProjectApi,
        validator: &'a dyn ValidationApi,
        settings: GateSettings,
    ) -> Self {
        Self {
            vcs,
            projects,
            validator,
            settings,
        }
    }

    /// Evaluate a push to the repository named by `repository`
    /// (`GL_REPOSITORY`).
    ///
    /// Errors are fatal for the invocation; every non-fatal path, including
    /// service failures, is expressed in the returned outcome.
    pub async fn evaluate(&self, repository: &str, push: &PushEvent) -> GateResult<Evaluation> {
        let Some(project_id) = project::project_id_from_repository(repository)? else {
            return Ok(skipped(SkipReason::NonProjectRepository(
                repository.to_string(),
            )));
        };
        if push.is_deletion() {
            return Ok(skipped(SkipReason::RefDeletion));
        }

        let lookup = self.projects.fetch_project(project_id).await?;
        let info = match project::resolve(project_id, lookup, self.settings.fork_policy) {
            Resolution::Validate(info) => info,
            Resolution::Skip(reason) => return Ok(skipped(reason)),
        };
        debug!(
            project = %info.id,
            default_branch = %info.default_branch,
            fork = info.is_fork,
            "Project resolved"
        );

        let entries = self
            .vcs
            .range_diff(&info.default_branch_ref(), &push.new_head)?;
        let range = resolve_range(&entries, push);
        info!(
            previous = %push.previous_head,
            new = %push.new_head,
            new_ref = push.is_new_ref(),
            ref_name = push.ref_name.as_deref().unwrap_or("-"),
            commits = range.len(),
            "Resolved commit range"
        );

        let commits = self.vcs.read_many(&range)?;
        for commit in &commits {
            let missing = commit.missing_fields();
            if !missing.is_empty() {
                warn!(sha = %commit.hash, ?missing, "Commit is missing fields");
            }
            debug!(
                sha = %commit.hash,
                signed_off = commit.has_author_sign_off(),
                parents = commit.parents.len(),
                "Commit extracted"
            );
        }

        let request =
            ValidationRequest::new(info.repo_url(), commits, self.settings.strict_mode);
        let reply = match self.validator.submit(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Validation service call failed");
                return Ok(Evaluation::server_error(range));
            }
        };
        if !reply.is_success() && !reply.is_forbidden() {
            warn!(status = reply.status, "Validation service answered with an error status");
            return Ok(Evaluation::server_error(range));
        }

        let response = match ValidationResponse::parse(&reply.body) {
            Ok(response) => response,
            Err(e) => {
                warn!(status = reply.status, error = %e, "Unparseable validation response");
                return Ok(Evaluation::server_error(range));
            }
        };

        let mut classification = classify(&response);
        let refused = reply.is_forbidden() && classification.outcome != PushOutcome::Rejected;
        if refused {
            // A 403 rejects even when the body reads clean or the project is untracked
            warn!(outcome = ?classification.outcome, "Validation service answered 403");
            classification.outcome = PushOutcome::Rejected;
        } else if !reply.is_forbidden() {
            let unanswered = response.unanswered(&range);
            if !unanswered.is_empty() {
                warn!(?unanswered, "Validation service skipped submitted commits");
                return Ok(Evaluation::server_error(range));
            }
        }

        Ok(Evaluation {
            outcome: classification.outcome.clone(),
            range,
            classification: Some(classification),
            refused,
        })
    }
}

fn skipped(reason: SkipReason) -> Evaluation {
    info!(%reason, "Skipping validation");
    Evaluation::finished(PushOutcome::Skipped(reason))
}
