//! Validation service request and response schema.
//!
//! The response is parsed once, here. Optional collections default to empty
//! so nothing downstream handles absence.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::commit::Commit;
use crate::error::GateResult;

/// Provider identifier sent with every request.
pub const PROVIDER_GITLAB: &str = "gitlab";

/// Body of a validation submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    pub repo_url: String,
    pub provider: String,
    /// Submission order is preserved
    pub commits: Vec<Commit>,
    pub strict_mode: bool,
}

impl ValidationRequest {
    pub fn new(repo_url: impl Into<String>, commits: Vec<Commit>, strict_mode: bool) -> Self {
        Self {
            repo_url: repo_url.into(),
            provider: PROVIDER_GITLAB.to_string(),
            commits,
            strict_mode,
        }
    }
}

/// A single service message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(rename = "message", default)]
    pub text: String,
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            code: None,
            text: text.into(),
        }
    }
}

/// Service verdict for one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub messages: Vec<Message>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub warnings: Vec<Message>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<Message>,
}

/// Per-commit results keyed by hash, in the order the service listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitResults(Vec<(String, CommitResult)>);

impl CommitResults {
    pub fn get(&self, sha: &str) -> Option<&CommitResult> {
        self.0
            .iter()
            .find(|(key, _)| key == sha)
            .map(|(_, result)| result)
    }

    pub fn contains(&self, sha: &str) -> bool {
        self.get(sha).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommitResult)> {
        self.0.iter().map(|(key, result)| (key.as_str(), result))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, CommitResult)> for CommitResults {
    fn from_iter<I: IntoIterator<Item = (String, CommitResult)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for CommitResults {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (sha, result) in &self.0 {
            map.serialize_entry(sha, result)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CommitResults {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CommitsVisitor;

        impl<'de> Visitor<'de> for CommitsVisitor {
            type Value = CommitResults;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of commit hash to validation result")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut commits = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, CommitResult>()? {
                    commits.push(entry);
                }
                Ok(CommitResults(commits))
            }
        }

        deserializer.deserialize_map(CommitsVisitor)
    }
}

/// Parsed validation response.
///
/// `commits` is required: a reply without it carries no verdict at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub commits: CommitResults,
    /// Absent means tracked
    #[serde(default)]
    pub tracked_project: Option<bool>,
}

impl ValidationResponse {
    /// Parse a response body. Anything that is not a JSON object with the
    /// expected shape is an error.
    pub fn parse(body: &str) -> GateResult<Self> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        // serde would accept a sequence for a struct; only objects are responses
        if !value.is_object() {
            return Err(<serde_json::Error as serde::de::Error>::custom(
                "validation response is not a JSON object",
            )
            .into());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Whether the project is subject to enforcement; unknown counts as yes.
    pub fn is_tracked(&self) -> bool {
        self.tracked_project.unwrap_or(true)
    }

    /// Submitted hashes the service returned no result for.
    pub fn unanswered<'a>(&self, submitted: &'a [String]) -> Vec<&'a str> {
        submitted
            .iter()
            .map(String::as_str)
            .filter(|sha| !self.commits.contains(sha))
            .collect()
    }
}

/// Raw reply from the validation service, before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    pub status: u16,
    pub body: String,
}

impl ServiceReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GateError;

    #[test]
    fn test_request_wire_shape() {
        let req = ValidationRequest::new("https://x/y", vec![Commit::default()], false);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["repoUrl"], "https://x/y");
        assert_eq!(value["provider"], "gitlab");
        assert_eq!(value["strictMode"], false);
        assert_eq!(value["commits"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_full_response() {
        let body = r#"{
            "passed": false,
            "trackedProject": true,
            "commits": {
                "abc": {
                    "messages": [{"code": 200, "message": "author is covered"}],
                    "warnings": [],
                    "errors": [{"code": -405, "message": "committer has no ECA"}]
                }
            }
        }"#;
        let resp = ValidationResponse::parse(body).unwrap();
        assert!(resp.is_tracked());
        let result = resp.commits.get("abc").unwrap();
        assert_eq!(result.messages[0].text, "author is covered");
        assert_eq!(result.messages[0].code, Some(200));
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_missing_and_null_fields_default_empty() {
        let resp =
            ValidationResponse::parse(r#"{"commits": {"abc": {"errors": null}}}"#).unwrap();
        let result = resp.commits.get("abc").unwrap();
        assert!(result.messages.is_empty());
        assert!(result.warnings.is_empty());
        assert!(result.errors.is_empty());
        assert!(resp.is_tracked());

        let resp = ValidationResponse::parse(r#"{"commits": {}, "trackedProject": false}"#)
            .unwrap();
        assert!(resp.commits.is_empty());
        assert!(!resp.is_tracked());
    }

    #[test]
    fn test_commits_map_is_required() {
        for body in [
            "{}",
            r#"{"commits": null}"#,
            r#"{"trackedProject": true}"#,
            r#"{"message": "Internal Server Error", "status": 500}"#,
        ] {
            assert!(
                matches!(
                    ValidationResponse::parse(body),
                    Err(GateError::MalformedResponse(_))
                ),
                "accepted {}",
                body
            );
        }
    }

    #[test]
    fn test_commits_keep_service_order() {
        let resp = ValidationResponse::parse(
            r#"{"commits": {"zzz": {}, "aaa": {}, "mmm": {"errors": [{"message": "x"}]}}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = resp.commits.iter().map(|(sha, _)| sha).collect();
        assert_eq!(keys, ["zzz", "aaa", "mmm"]);
    }

    #[test]
    fn test_unanswered_commits() {
        let resp = ValidationResponse::parse(r#"{"commits": {"bbb222": {}}}"#).unwrap();
        let submitted = vec!["bbb222".to_string(), "ccc333".to_string()];
        assert_eq!(resp.unanswered(&submitted), ["ccc333"]);
        assert!(resp.unanswered(&submitted[..1]).is_empty());
    }

    #[test]
    fn test_reply_status_classes() {
        let reply = |status| ServiceReply {
            status,
            body: String::new(),
        };
        assert!(reply(200).is_success());
        assert!(!reply(403).is_success());
        assert!(reply(403).is_forbidden());
        assert!(!reply(500).is_success());
    }

    #[test]
    fn test_malformed_bodies() {
        for body in ["", "<html>oops</html>", "[]", "[1,2]", "null", "{\"commits\": 3}"] {
            assert!(matches!(
                ValidationResponse::parse(body),
                Err(GateError::MalformedResponse(_))
            ));
        }
    }
}
