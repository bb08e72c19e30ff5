//! Unified diff reduction to per-file changed line sets.
//!
//! Removed lines are numbered in the pre-change file and added lines in the
//! post-change file. Both land in the same per-file set without being mapped
//! onto a common coordinate space. All numbers are zero-based.

use git2::{Delta, Diff, DiffDelta, DiffLineType, DiffOptions, Repository};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("invalid diff: {0}")]
    Parse(#[source] git2::Error),
    #[error("git diff against {rev} failed: {source}")]
    Git {
        rev: String,
        #[source]
        source: git2::Error,
    },
}


/// Changed line numbers keyed by workspace-relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangedLines(BTreeMap<String, BTreeSet<u32>>);

impl ChangedLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, line: u32) {
        self.0.entry(path.into()).or_default().insert(line);
    }

    pub fn lines(&self, path: &str) -> Option<&BTreeSet<u32>> {
        self.0.get(path)
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<u32>)> {
        self.0.iter().map(|(path, lines)| (path.as_str(), lines))
    }

    pub fn file_count(&self) -> usize {
        self.0.len()
    }

    pub fn total_lines(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keep only files the symbol service can resolve; returns the dropped paths.
    pub fn retain_files<F>(&mut self, mut keep: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let mut dropped = Vec::new();
        self.0.retain(|path, _| {
            let kept = keep(path);
            if !kept {
                dropped.push(path.clone());
            }
            kept
        });
        dropped
    }
}

impl FromIterator<(String, u32)> for ChangedLines {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        let mut changed = ChangedLines::new();
        for (path, line) in iter {
            changed.insert(path, line);
        }
        changed
    }
}


/// Parse unified diff text as produced by `git diff`.
pub fn parse_unified_diff(text: &str) -> Result<ChangedLines, DiffError> {
    let diff = Diff::from_buffer(text.as_bytes()).map_err(DiffError::Parse)?;
    changed_lines(&diff)
}

/// Equivalent of `git diff <rev>` in the repository containing `repo_path`:
/// the tree of `rev` against the working directory, staged changes included.
pub fn diff_against_rev(repo_path: &Path, rev: &str) -> Result<ChangedLines, DiffError> {
    let git = |source: git2::Error| DiffError::Git {
        rev: rev.to_string(),
        source,
    };
    let repo = Repository::discover(repo_path).map_err(git)?;
    let tree = repo
        .revparse_single(rev)
        .and_then(|object| object.peel_to_tree())
        .map_err(git)?;
    let mut opts = DiffOptions::new();
    let diff = repo
        .diff_tree_to_workdir_with_index(Some(&tree), Some(&mut opts))
        .map_err(git)?;
    changed_lines(&diff)
}

pub fn changed_lines(diff: &Diff<'_>) -> Result<ChangedLines, DiffError> {
    let mut changed = ChangedLines::new();
    diff.foreach(
        &mut |_, _| true,
        None,
        None,
        Some(&mut |delta, _, line| {
            let number = match line.origin_value() {
                DiffLineType::Addition => line.new_lineno(),
                DiffLineType::Deletion => line.old_lineno(),
                _ => None,
            };
            if let (Some(number), Some(path)) = (number, delta_path(&delta)) {
                changed.insert(path, number.saturating_sub(1));
            }
            true
        }),
    )
    .map_err(DiffError::Parse)?;
    Ok(changed)
}

/// Deleted files only have a pre-change path.
fn delta_path(delta: &DiffDelta<'_>) -> Option<String> {
    let file = match delta.status() {
        Delta::Deleted => delta.old_file(),
        _ => delta.new_file(),
    };
    file.path()
        .or_else(|| delta.old_file().path())
        .map(|p| p.to_string_lossy().into_owned())
}
