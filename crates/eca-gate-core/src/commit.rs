//! Commit metadata submitted for validation.

use serde::{Deserialize, Serialize};

/// Author or committer identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitUser {
    pub name: String,
    pub mail: String,
}

impl GitUser {
    pub fn new(name: impl Into<String>, mail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mail: mail.into(),
        }
    }
}

/// A commit as the validation service expects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Full hash
    pub hash: String,
    /// Parent hashes; empty for a root commit, several for a merge
    pub parents: Vec<String>,
    pub author: GitUser,
    pub committer: GitUser,
    pub subject: String,
    pub body: String,
}

impl Commit {
    /// Fields the service needs that are empty on this commit.
    ///
    /// Incomplete commits are still submitted; the service decides.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.hash.is_empty() {
            missing.push("hash");
        }
        if self.author.mail.is_empty() {
            missing.push("author.mail");
        }
        if self.committer.mail.is_empty() {
            missing.push("committer.mail");
        }
        missing
    }

    /// Whether the body carries a `Signed-off-by: Name <mail>` footer for the
    /// author's address (case-insensitive).
    pub fn has_author_sign_off(&self) -> bool {
        if self.author.mail.is_empty() {
            return false;
        }
        self.body
            .lines()
            .filter_map(|line| line.trim().strip_prefix("Signed-off-by:"))
            .filter_map(sign_off_mail)
            .any(|mail| mail.eq_ignore_ascii_case(&self.author.mail))
    }
}

/// Address between the last `<` and the following `>`, if it looks like mail.
fn sign_off_mail(footer: &str) -> Option<&str> {
    let start = footer.rfind('<')? + 1;
    let len = footer[start..].find('>')?;
    let mail = footer[start..start + len].trim();
    mail.contains('@').then_some(mail)
}

/// Split a whitespace-separated parent list (`%P`).
pub fn parse_parents(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}
