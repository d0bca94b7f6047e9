use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{FixupError, Result};

/// Format for one-line log entries: abbreviated hash and subject separated by NUL.
const ONELINE_FORMAT: &str = "--format=%h%x00%s";

/// Runs `git` subcommands.
///
/// Every external effect of `git-fixup` goes through this trait, so the
/// workflows can be exercised against a recording fake in tests.
pub trait GitRunner {
    /// Runs `git <args>` with captured output and returns its standard output.
    ///
    /// # Errors
    ///
    /// Returns [`FixupError::CommandFailed`] on a non-zero exit and
    /// [`FixupError::Spawn`] if the process cannot be started.
    fn output(&mut self, args: &[&str]) -> Result<String>;

    /// Runs `git <args>` attached to the terminal (stdin, stdout and stderr
    /// are inherited) and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Same as [`GitRunner::output`]; the captured streams in the error are
    /// empty because they went straight to the terminal.
    fn passthrough(&mut self, args: &[&str]) -> Result<()>;
}

/// [`GitRunner`] backed by the `git` executable on `PATH`.
#[derive(Debug, Default)]
pub struct SystemGit {
    workdir: Option<PathBuf>,
}

impl SystemGit {
    /// Runs git in the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs git in `workdir` instead of the current directory.
    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(workdir.into()),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// The argv as reported in errors, including the leading `git`.
fn full_args(args: &[&str]) -> Vec<String> {
    std::iter::once("git")
        .chain(args.iter().copied())
        .map(String::from)
        .collect()
}

impl GitRunner for SystemGit {
    fn output(&mut self, args: &[&str]) -> Result<String> {
        tracing::debug!(?args, "running git (captured)");
        let mut cmd = self.command(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let out = match cmd.output() {
            Ok(out) => out,
            Err(source) => {
                return Err(FixupError::Spawn {
                    args: full_args(args),
                    source,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
        if out.status.success() {
            Ok(stdout)
        } else {
            Err(FixupError::CommandFailed {
                args: full_args(args),
                code: out.status.code(),
                stdout,
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            })
        }
    }

    fn passthrough(&mut self, args: &[&str]) -> Result<()> {
        tracing::debug!(?args, "running git (attached)");
        let mut cmd = self.command(args);
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        match cmd.status() {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(FixupError::CommandFailed {
                args: full_args(args),
                code: status.code(),
                stdout: String::new(),
                stderr: String::new(),
            }),
            Err(source) => Err(FixupError::Spawn {
                args: full_args(args),
                source,
            }),
        }
    }
}

/// Runs `git rev-parse <flag>` and returns its output as a trimmed string.
///
/// Used to locate the repository before any workflow runs.
///
/// # Parameters
///
/// * `git` — The runner to invoke git through.
/// * `flag` — The argument to pass to `git rev-parse`, e.g. `--show-toplevel`
///   or `--show-prefix`.
///
/// # Returns
///
/// * `Ok(String)` with surrounding whitespace (including the trailing
///   newline) removed. `--show-prefix` yields an empty string at the root.
/// * `Err(FixupError)` if git exits non-zero, e.g. outside a repository.
///
/// # Examples
///
/// ```ignore
/// // Ignored because it requires a Git repository.
/// use git_fixup::git::{SystemGit, rev_parse};
///
/// let mut git = SystemGit::new();
/// let root = rev_parse(&mut git, "--show-toplevel")?;
/// ```
pub fn rev_parse(git: &mut dyn GitRunner, flag: &str) -> Result<String> {
    let out = git.output(&["rev-parse", flag])?;
    Ok(out.trim().to_string())
}

/// Raw `git status --porcelain -z` output.
pub fn status_porcelain(git: &mut dyn GitRunner) -> Result<String> {
    git.output(&["status", "--porcelain", "-z"])
}

/// One-line log of the most recent commit touching `path`.
///
/// The output is empty if the path has no history.
pub fn last_commit_touching(git: &mut dyn GitRunner, path: &str) -> Result<String> {
    git.output(&["log", "-n", "1", ONELINE_FORMAT, "--", path])
}

/// Reads the `limit` most recent commits as one-line records.
///
/// This runs:
///
/// ```text
/// git log -n <limit> --format=%h%x00%s
/// ```
///
/// # Parameters
///
/// * `git` — The runner to invoke git through.
/// * `limit` — Maximum number of commits to read.
///
/// # Returns
///
/// * `Ok(String)` with one `<short hash>\0<subject>` line per commit,
///   newest first. Parse it with [`crate::log::parse_entries`].
/// * `Err(FixupError)` if `git log` fails, e.g. on a repository without commits.
pub fn recent_log(git: &mut dyn GitRunner, limit: usize) -> Result<String> {
    let limit = limit.to_string();
    git.output(&["log", "-n", &limit, ONELINE_FORMAT])
}

/// Streams the working-tree diff of `path` straight to the terminal.
pub fn show_diff(git: &mut dyn GitRunner, path: &str) -> Result<()> {
    git.passthrough(&["--no-pager", "diff", "--", path])
}

/// How a new commit is marked for autosquash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMarker {
    Fixup,
    Squash,
}

impl CommitMarker {
    fn flag(self, commit: &str) -> String {
        match self {
            CommitMarker::Fixup => format!("--fixup={commit}"),
            CommitMarker::Squash => format!("--squash={commit}"),
        }
    }
}

/// Commits exactly `files` as a fixup or squash of `commit`.
///
/// This runs:
///
/// ```text
/// git commit --fixup=<commit> -- <files>...
/// git commit --squash=<commit> -- <files>...
/// ```
///
/// # Parameters
///
/// * `git` — The runner to invoke git through.
/// * `marker` — Whether to create a `fixup!` or a `squash!` commit.
/// * `commit` — The commit the new commit will be folded into.
/// * `files` — Root-relative paths; only these are committed.
///
/// # Returns
///
/// * `Ok(())` if the commit was created.
/// * `Err(FixupError)` if `git commit` exited non-zero.
///
/// # Notes
///
/// * Stdio is inherited so git can open an editor for squash messages.
/// * Files are passed after `--` so a path named like a branch is not
///   mistaken for a revision.
///
/// # Examples
///
/// ```ignore
/// // Ignored because it requires a Git repository with changes to README.md.
/// use git_fixup::git::{CommitMarker, SystemGit, commit_marked};
///
/// let mut git = SystemGit::new();
/// commit_marked(&mut git, CommitMarker::Fixup, "abc123", &["README.md"])?;
/// ```
pub fn commit_marked(
    git: &mut dyn GitRunner,
    marker: CommitMarker,
    commit: &str,
    files: &[&str],
) -> Result<()> {
    let flag = marker.flag(commit);
    let mut args = vec!["commit", flag.as_str(), "--"];
    args.extend_from_slice(files);
    git.passthrough(&args)
}

/// Runs an interactive rebase that folds fixup and squash commits.
///
/// This runs:
///
/// ```text
/// git rebase --interactive --autosquash <anchor>
/// ```
///
/// # Parameters
///
/// * `git` — The runner to invoke git through.
/// * `anchor` — The revision to rebase onto, usually `<commit>^`.
///
/// # Returns
///
/// * `Ok(())` if the rebase completed.
/// * `Err(FixupError)` if git exited non-zero, e.g. on conflicts or when
///   `anchor` does not exist.
///
/// # Notes
///
/// * This rewrites history; only use it on branches where that is safe.
/// * The todo list opens in the user's sequence editor as for any
///   interactive rebase; `GIT_SEQUENCE_EDITOR` is honoured.
///
/// # Examples
///
/// ```ignore
/// // Ignored because it requires a Git repository.
/// use git_fixup::git::{SystemGit, rebase_autosquash};
///
/// let mut git = SystemGit::new();
/// rebase_autosquash(&mut git, "abc123^")?;
/// ```
pub fn rebase_autosquash(git: &mut dyn GitRunner, anchor: &str) -> Result<()> {
    git.passthrough(&["rebase", "--interactive", "--autosquash", anchor])
}
