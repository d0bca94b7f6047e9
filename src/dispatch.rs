//! Printing the change summary and committing fixups.

use std::io::Write;

use console::style;

use crate::error::{FixupError, Result};
use crate::git::{self, CommitMarker, GitRunner};
use crate::owners::OwnerGroup;

/// Prints each owning commit followed by its files, or their diffs when
/// `show_diff` is set. Every group ends with a blank line.
///
/// Diffs are streamed by git directly to the terminal, so `out` is flushed
/// before each one to keep the two streams in order.
pub fn report(
    git: &mut dyn GitRunner,
    owners: &OwnerGroup,
    show_diff: bool,
    out: &mut dyn Write,
) -> Result<()> {
    for (commit, group) in owners.iter() {
        writeln!(out, "{} {}", style(commit).yellow(), group.subject)
            .map_err(FixupError::Output)?;
        for file in &group.files {
            if show_diff {
                out.flush().map_err(FixupError::Output)?;
                git::show_diff(git, file)?;
            } else {
                writeln!(out, "   {file}").map_err(FixupError::Output)?;
            }
        }
        writeln!(out).map_err(FixupError::Output)?;
    }
    out.flush().map_err(FixupError::Output)
}

/// Creates one fixup (or squash) commit per owning commit, each covering
/// exactly that commit's files.
///
/// Stops at the first failing commit; commits already made are kept.
pub fn commit(git: &mut dyn GitRunner, owners: &OwnerGroup, marker: CommitMarker) -> Result<()> {
    for (target, group) in owners.iter() {
        let files: Vec<&str> = group.files.iter().map(String::as_str).collect();
        git::commit_marked(git, marker, target, &files)?;
        tracing::info!(?marker, commit = %target, files = files.len(), "committed");
    }
    Ok(())
}
