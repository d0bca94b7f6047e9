//! Grouping of changed files by the commit that last touched them.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{FixupError, Result};
use crate::git::{self, GitRunner};
use crate::log::LogEntry;

/// Files owned by one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedFiles {
    pub subject: String,
    pub files: BTreeSet<String>,
}

/// Changed files bucketed by owning commit.
///
/// Both the commits and each commit's files iterate in sorted order, which
/// keeps the printed summary stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerGroup {
    groups: BTreeMap<String, OwnedFiles>,
}

impl OwnerGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `path` was last touched by `owner`.
    ///
    /// The subject is overwritten on every insert for the same commit.
    pub fn insert(&mut self, owner: LogEntry, path: impl Into<String>) {
        let group = self.groups.entry(owner.id).or_default();
        group.subject = owner.subject;
        group.files.insert(path.into());
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// `(commit id, owned files)` pairs sorted by commit id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OwnedFiles)> {
        self.groups.iter().map(|(id, group)| (id.as_str(), group))
    }
}

/// Finds the most recent commit touching each of `paths` and groups the
/// paths by it.
///
/// # Errors
///
/// Fails on the first path with no history ([`FixupError::NoHistory`]) or the
/// first failing git command; nothing is returned for the paths already seen.
pub fn resolve<I, S>(git: &mut dyn GitRunner, paths: I) -> Result<OwnerGroup>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut owners = OwnerGroup::new();
    for path in paths {
        let path = path.as_ref();
        let owner = owning_commit(git, path)?;
        tracing::debug!(path, commit = %owner.id, "resolved owner");
        owners.insert(owner, path);
    }
    Ok(owners)
}

fn owning_commit(git: &mut dyn GitRunner, path: &str) -> Result<LogEntry> {
    let raw = git::last_commit_touching(git, path)?;
    raw.lines()
        .next()
        .and_then(LogEntry::parse)
        .ok_or_else(|| FixupError::NoHistory {
            path: path.to_string(),
        })
}
