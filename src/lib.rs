//! # git-fixup
//!
//! Automates `git commit --fixup` and `--squash`.
//!
//! For each modified file, finds the latest commit that touched the same file
//! and commits the change as a fixup (or squash) of it:
//!
//! - List the files modified in the working tree
//! - Group them by the most recent commit touching each one
//! - Print the groups, optionally with diffs
//! - Commit each group with `--fixup=<commit>` or `--squash=<commit>`
//! - Fold pending fixups with `git rebase --interactive --autosquash`
//!
//! ## Usage
//!
//! ```bash
//! git fixup              # view changes grouped by commit
//! git fixup -a           # commit all changes
//! git fixup <file>...    # commit only some changes
//! git fixup -s           # commit with --squash instead of --fixup
//! git fixup -r           # autosquash pending fixups
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface and main entry point
//! - [`git`] - Git command wrappers
//! - [`status`] - Modified-file enumeration
//! - [`owners`] - Grouping files by owning commit
//! - [`dispatch`] - Summary output and fixup commits
//! - [`autosquash`] - Autosquash rebase
//! - [`log`] - One-line log parsing
//! - [`logging`] - Diagnostic logging setup
//! - [`error`] - Error type

pub mod autosquash;
pub mod cli;
pub mod dispatch;
pub mod error;
pub mod git;
pub mod log;
pub mod logging;
pub mod owners;
pub mod status;
