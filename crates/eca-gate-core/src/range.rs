//! Commit-range resolution.
//!
//! The range is computed from a patch-equivalence diff between the default
//! branch and the pushed tip (`git cherry <default-ref> <new-head>`). Each
//! entry is tagged `+` (no equivalent patch upstream) or `-` (already
//! upstream). Only `+` entries are candidates, oldest first.

use crate::push::PushEvent;

/// Tag of a patch-equivalence diff entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CherrySign {
    /// Commit has no equivalent upstream
    New,
    /// Commit's patch already exists upstream
    Upstream,
}

/// One line of a patch-equivalence diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CherryEntry {
    pub sign: CherrySign,
    pub sha: String,
}

impl CherryEntry {
    pub fn new(sign: CherrySign, sha: impl Into<String>) -> Self {
        Self {
            sign,
            sha: sha.into(),
        }
    }
}

/// Parse `git cherry` output.
///
/// Lines that carry neither tag are dropped. A tagged line whose identifier
/// is blank is kept with an empty `sha` so that [`resolve_range`] applies the
/// blank-entry rule in one place.
pub fn parse_cherry_output(output: &str) -> Vec<CherryEntry> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim_start();
            let (sign, rest) = if let Some(rest) = line.strip_prefix('+') {
                (CherrySign::New, rest)
            } else if let Some(rest) = line.strip_prefix('-') {
                (CherrySign::Upstream, rest)
            } else {
                return None;
            };
            let sha = rest.split_whitespace().next().unwrap_or_default();
            Some(CherryEntry::new(sign, sha))
        })
        .collect()
}

/// Compute the identifiers a push introduces, oldest first.
///
/// `-` entries and blank identifiers are discarded. If the push's previous
/// head is among the remaining entries the range starts at it (inclusive), so
/// rewritten history from the old tip forward is re-validated. Otherwise the
/// whole `+` list is returned: a force-push or a new ref validates everything
/// it can see rather than too little.
pub fn resolve_range(entries: &[CherryEntry], push: &PushEvent) -> Vec<String> {
    let candidates: Vec<&str> = entries
        .iter()
        .filter(|entry| entry.sign == CherrySign::New)
        .map(|entry| entry.sha.trim())
        .filter(|sha| !sha.is_empty())
        .collect();

    let anchor = candidates
        .iter()
        .position(|sha| *sha == push.previous_head)
        .unwrap_or(0);

    candidates[anchor..].iter().map(|sha| sha.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus(shas: &[&str]) -> Vec<CherryEntry> {
        shas.iter()
            .map(|sha| CherryEntry::new(CherrySign::New, *sha))
            .collect()
    }

    #[test]
    fn test_anchor_on_previous_head() {
        let push = PushEvent::new("b", "d");
        assert_eq!(resolve_range(&plus(&["a", "b", "c", "d"]), &push), ["b", "c", "d"]);
    }

    #[test]
    fn test_missing_previous_head_takes_everything() {
        let push = PushEvent::new("zzz", "d");
        assert_eq!(
            resolve_range(&plus(&["a", "b", "c", "d"]), &push),
            ["a", "b", "c", "d"]
        );
    }

    #[test]
    fn test_upstream_entries_dropped() {
        let entries = vec![
            CherryEntry::new(CherrySign::New, "x"),
            CherryEntry::new(CherrySign::Upstream, "y"),
            CherryEntry::new(CherrySign::New, "z"),
        ];
        assert_eq!(resolve_range(&entries, &PushEvent::new("q", "z")), ["x", "z"]);
    }

    #[test]
    fn test_upstream_previous_head_is_not_an_anchor() {
        let entries = vec![
            CherryEntry::new(CherrySign::New, "a"),
            CherryEntry::new(CherrySign::Upstream, "b"),
            CherryEntry::new(CherrySign::New, "c"),
        ];
        assert_eq!(resolve_range(&entries, &PushEvent::new("b", "c")), ["a", "c"]);
    }

    #[test]
    fn test_blank_identifiers_discarded() {
        let entries = plus(&["", "a", "  ", "b"]);
        assert_eq!(resolve_range(&entries, &PushEvent::new("b", "b")), ["b"]);
    }

    #[test]
    fn test_empty_diff() {
        assert!(resolve_range(&[], &PushEvent::new("a", "b")).is_empty());
        let entries = vec![CherryEntry::new(CherrySign::Upstream, "a")];
        assert!(resolve_range(&entries, &PushEvent::new("a", "b")).is_empty());
    }

    #[test]
    fn test_parse_cherry_output() {
        let output = "+ bbb222\n- ccc333\n+ddd444\n\nnoise\n+ \n";
        let entries = parse_cherry_output(output);
        assert_eq!(
            entries,
            vec![
                CherryEntry::new(CherrySign::New, "bbb222"),
                CherryEntry::new(CherrySign::Upstream, "ccc333"),
                CherryEntry::new(CherrySign::New, "ddd444"),
                CherryEntry::new(CherrySign::New, ""),
            ]
        );
        assert_eq!(
            resolve_range(&entries, &PushEvent::new("aaa111", "ddd444")),
            ["bbb222", "ddd444"]
        );
    }
}
