//! `git` subprocess adapter.

use std::path::PathBuf;
use std::process::Command;

use eca_gate_core::{
    parse_cherry_output, parse_parents, CherryEntry, Commit, GateError, GateResult, GitUser,
    VersionControl,
};
use tracing::debug;

/// One record per commit, fields NUL-separated, records RS-terminated.
const SHOW_FORMAT: &str = "--format=%H%x00%P%x00%an%x00%ae%x00%cn%x00%ce%x00%s%x00%B%x1e";
const FIELD_SEPARATOR: char = '\0';
const RECORD_SEPARATOR: char = '\x1e';
const FIELD_COUNT: usize = 8;

/// Runs `git` in the hook's working directory, or in `repo_dir` when set.
///
/// Inside a pre-receive hook the quarantine environment is inherited, so
/// objects of the incoming push are visible.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    repo_dir: Option<PathBuf>,
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: Some(dir.into()),
        }
    }

    fn git(&self, args: &[&str]) -> GateResult<String> {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.repo_dir {
            cmd.current_dir(dir);
        }
        debug!(?args, "Running git");
        let output = cmd
            .args(args)
            .output()
            .map_err(|e| GateError::VersionControl(format!("failed to run git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GateError::VersionControl(format!(
                "git {} exited with {}: {}",
                args.first().copied().unwrap_or_default(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Identifiers come from stdin; anything that looks like an option is refused.
fn ensure_revision(rev: &str) -> GateResult<()> {
    if rev.is_empty() || rev.starts_with('-') {
        return Err(GateError::InvalidInput(format!(
            "refusing revision argument {:?}",
            rev
        )));
    }
    Ok(())
}

fn parse_record(record: &str) -> GateResult<Commit> {
    let fields: Vec<&str> = record.splitn(FIELD_COUNT, FIELD_SEPARATOR).collect();
    let [hash, parents, author_name, author_mail, committer_name, committer_mail, subject, body] =
        fields[..]
    else {
        return Err(GateError::VersionControl(format!(
            "expected {} fields in git show record, got {}",
            FIELD_COUNT,
            fields.len()
        )));
    };

    Ok(Commit {
        hash: hash.to_string(),
        parents: parse_parents(parents),
        author: GitUser::new(author_name, author_mail),
        committer: GitUser::new(committer_name, committer_mail),
        subject: subject.to_string(),
        body: body.trim_end().to_string(),
    })
}

/// Split `git show` output produced with [`SHOW_FORMAT`].
fn parse_show_output(output: &str) -> GateResult<Vec<Commit>> {
    output
        .split(RECORD_SEPARATOR)
        .map(|record| record.strip_prefix('\n').unwrap_or(record))
        .filter(|record| !record.trim().is_empty())
        .map(parse_record)
        .collect()
}

impl VersionControl for GitCli {
    fn range_diff(&self, reference: &str, revision: &str) -> GateResult<Vec<CherryEntry>> {
        ensure_revision(reference)?;
        ensure_revision(revision)?;
        let output = self.git(&["cherry", reference, revision])?;
        Ok(parse_cherry_output(&output))
    }

    fn read_fields(&self, sha: &str) -> GateResult<Commit> {
        self.read_many(&[sha.to_string()])?
            .pop()
            .ok_or_else(|| GateError::VersionControl(format!("no commit found for {}", sha)))
    }

    fn read_many(&self, shas: &[String]) -> GateResult<Vec<Commit>> {
        if shas.is_empty() {
            return Ok(Vec::new());
        }
        for sha in shas {
            ensure_revision(sha)?;
        }

        let mut args = vec!["show", "-s", SHOW_FORMAT];
        args.extend(shas.iter().map(String::as_str));
        let commits = parse_show_output(&self.git(&args)?)?;

        if commits.len() != shas.len() {
            return Err(GateError::VersionControl(format!(
                "asked git for {} commits, got {}",
                shas.len(),
                commits.len()
            )));
        }
        Ok(commits)
    }
}
