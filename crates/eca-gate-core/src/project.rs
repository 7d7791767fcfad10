//! Project resolution: decides whether a push is subject to validation at all.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GateError, GateResult};

/// Prefix GitLab puts on project repository identifiers in `GL_REPOSITORY`.
pub const PROJECT_REPOSITORY_PREFIX: &str = "project-";

/// Project metadata as returned by the hosting platform's project API.
///
/// Only the consumed fields are modelled; everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitLabProject {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub forked_from_project: Option<UpstreamProject>,
}

/// The `forked_from_project` sub-object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamProject {
    #[serde(default)]
    pub web_url: Option<String>,
}

/// Outcome of a project lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectLookup {
    /// Empty, null or list-shaped body, or a 404
    NotFound,
    /// A project object
    Found(GitLabProject),
}

impl ProjectLookup {
    /// Interpret a raw project API body.
    ///
    /// The platform answers unknown ids with `null` or `[]`, so anything that
    /// is not a JSON object is treated as "not found". A body that is not
    /// JSON at all is an API failure.
    pub fn from_body(body: &str) -> GateResult<Self> {
        if body.trim().is_empty() {
            return Ok(Self::NotFound);
        }
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| GateError::ProjectApi(format!("unparseable project body: {}", e)))?;
        if !value.is_object() {
            return Ok(Self::NotFound);
        }
        let project = serde_json::from_value(value)
            .map_err(|e| GateError::ProjectApi(format!("unexpected project shape: {}", e)))?;
        Ok(Self::Found(project))
    }
}

/// What to do with pushes to a forked project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForkPolicy {
    /// Leave validation to the upstream project
    #[default]
    Skip,
    /// Validate the fork's commits against the upstream repository URL
    ValidateAgainstUpstream,
}

/// Why a push bypasses validation. Every reason accepts the push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `GL_REPOSITORY` names a wiki, snippet or design repository
    NonProjectRepository(String),
    /// The push only deletes a ref
    RefDeletion,
    /// The project API did not return a project
    UntrackedProject,
    /// The project is a fork
    Fork,
    /// The project has no default branch yet
    NoDefaultBranch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NonProjectRepository(repo) => write!(
                f,
                "repository '{}' is not a project repository, bypassing check",
                repo
            ),
            SkipReason::RefDeletion => write!(f, "ref deletion introduces no commits"),
            SkipReason::UntrackedProject => write!(f, "assumed non-tracked project"),
            SkipReason::Fork => write!(
                f,
                "non-Eclipse-style project, validation deferred to upstream"
            ),
            SkipReason::NoDefaultBranch => write!(f, "new/unknown project, bypassing check"),
        }
    }
}

/// A project that will be validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub id: String,
    pub web_url: String,
    pub default_branch: String,
    pub is_fork: bool,
    /// Upstream URL; set only when forks are validated against their origin
    pub origin_url: Option<String>,
}

impl ProjectInfo {
    /// Repository URL submitted to the validation service.
    pub fn repo_url(&self) -> &str {
        self.origin_url.as_deref().unwrap_or(&self.web_url)
    }

    /// Fully qualified ref of the default branch.
    pub fn default_branch_ref(&self) -> String {
        format!("refs/heads/{}", self.default_branch)
    }
}

/// Result of resolving a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Validate(ProjectInfo),
    Skip(SkipReason),
}

/// Extract the project id from a `GL_REPOSITORY` value such as `project-42`.
///
/// Returns `None` for wiki, snippet and design repositories, which share the
/// hook but are not projects.
pub fn project_id_from_repository(repository: &str) -> GateResult<Option<&str>> {
    match repository.strip_prefix(PROJECT_REPOSITORY_PREFIX) {
        Some("") => Err(GateError::Config(format!(
            "repository identifier '{}' carries no project id",
            repository
        ))),
        Some(id) => Ok(Some(id)),
        None => Ok(None),
    }
}

/// Apply the bypass rules to a looked-up project, in order:
/// not found, fork, missing default branch.
pub fn resolve(id: &str, lookup: ProjectLookup, fork_policy: ForkPolicy) -> Resolution {
    let project = match lookup {
        ProjectLookup::NotFound => return Resolution::Skip(SkipReason::UntrackedProject),
        ProjectLookup::Found(project) => project,
    };

    let upstream = project.forked_from_project.as_ref();
    let is_fork = upstream.is_some();
    let upstream_url = upstream
        .and_then(|up| up.web_url.clone())
        .filter(|url| !url.is_empty());

    let origin_url = match (is_fork, fork_policy, upstream_url) {
        (false, _, _) => None,
        (true, ForkPolicy::ValidateAgainstUpstream, Some(url)) => Some(url),
        (true, _, _) => return Resolution::Skip(SkipReason::Fork),
    };

    let default_branch = match project.default_branch {
        Some(branch) if !branch.trim().is_empty() => branch,
        _ => return Resolution::Skip(SkipReason::NoDefaultBranch),
    };

    Resolution::Validate(ProjectInfo {
        id: id.to_string(),
        web_url: project.web_url.unwrap_or_default(),
        default_branch,
        is_fork,
        origin_url,
    })
}
