//! Working-tree change enumeration.

use crate::error::Result;
use crate::git::{self, GitRunner};

/// Lists the files whose working-tree column in `git status` is `M`.
///
/// Added, deleted, renamed-without-edit and untracked paths are skipped.
/// Paths are relative to the repository root and come back in git's order.
pub fn modified_files(git: &mut dyn GitRunner) -> Result<Vec<String>> {
    let raw = git::status_porcelain(git)?;
    let files = parse_porcelain(&raw);
    tracing::debug!(count = files.len(), "modified files found");
    Ok(files)
}

/// Parses `git status --porcelain -z` output.
///
/// Each record is `XY <path>` terminated by NUL. Rename and copy records
/// (`R` or `C` in the index column) carry the original path as one more
/// NUL-terminated field, which is dropped.
fn parse_porcelain(raw: &str) -> Vec<String> {
    let mut files = Vec::new();
    let mut fields = raw.split('\0');

    while let Some(record) = fields.next() {
        if record.len() < 4 {
            continue;
        }
        let mut code = record.chars();
        let index = code.next();
        let worktree = code.next();

        if matches!(index, Some('R' | 'C')) {
            fields.next();
        }

        if worktree == Some('M') {
            if let Some(path) = record.get(3..) {
                files.push(path.to_string());
            }
        }
    }

    files
}
