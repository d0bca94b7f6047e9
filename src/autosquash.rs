//! Folding pending fixup/squash commits with an autosquash rebase.
//!
//! Only one `fixup! `/`squash! ` prefix is stripped when working out what a
//! pending commit targets. A fixup of a fixup therefore targets the first
//! fixup's subject, which older git versions do not always autosquash
//! correctly.

use std::collections::BTreeSet;

use crate::error::{FixupError, Result};
use crate::git::{self, GitRunner};
use crate::log::{self, LogEntry};

/// How many recent commits are scanned for pending fixups and their targets.
pub const HISTORY_LIMIT: usize = 1000;

const PREFIXES: [&str; 2] = ["fixup! ", "squash! "];

/// Subject a pending fixup/squash commit refers to, if `subject` is one.
fn autosquash_target(subject: &str) -> Option<&str> {
    PREFIXES
        .iter()
        .find_map(|prefix| subject.strip_prefix(*prefix))
}

/// Target subjects of every pending fixup/squash commit in `entries`.
pub fn pending_targets(entries: &[LogEntry]) -> BTreeSet<&str> {
    entries
        .iter()
        .filter_map(|e| autosquash_target(&e.subject))
        .collect()
}

/// Picks the commit to rebase onto the parent of.
///
/// `entries` must be newest first. Returns `Ok(None)` when nothing is pending,
/// otherwise the oldest entry whose subject is a pending target, so that one
/// rebase covers every pending fixup in the window.
///
/// # Errors
///
/// [`FixupError::UnresolvedTargets`] when fixups are pending but none of
/// their targets appear in `entries`.
pub fn find_rebase_target(entries: &[LogEntry]) -> Result<Option<&LogEntry>> {
    let pending = pending_targets(entries);
    if pending.is_empty() {
        return Ok(None);
    }

    match entries
        .iter()
        .rev()
        .find(|e| pending.contains(e.subject.as_str()))
    {
        Some(target) => Ok(Some(target)),
        None => Err(FixupError::UnresolvedTargets {
            subjects: pending.into_iter().map(String::from).collect(),
        }),
    }
}

/// Rebases with `--autosquash` from just before the oldest commit that has a
/// pending fixup or squash.
///
/// Does nothing when the recent history holds no fixup/squash commits.
pub fn rebase(git: &mut dyn GitRunner) -> Result<()> {
    let raw = git::recent_log(git, HISTORY_LIMIT)?;
    let entries = log::parse_entries(&raw);

    let Some(target) = find_rebase_target(&entries)? else {
        tracing::info!("no pending fixup or squash commits");
        return Ok(());
    };

    let anchor = format!("{}^", target.id);
    tracing::info!(commit = %target.id, subject = %target.subject, "rebasing onto parent");
    git::rebase_autosquash(git, &anchor)
}
