use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use clap::Parser;

use crate::dispatch;
use crate::error::Result;
use crate::git::{self, CommitMarker, GitRunner, SystemGit};
use crate::logging::{self, Verbosity};
use crate::owners;
use crate::{autosquash, status};

/// Commit each modified file as a fixup of the commit that last touched it.
///
/// Without arguments only the summary is shown. Pass `-a` or a list of
/// files to commit, and `-r` afterwards to fold the fixups in.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "git-fixup", version, about, long_about = None)]
pub struct Options {
    /// Commit all modified files
    #[arg(short, long)]
    pub all: bool,

    /// Show the diff of each file instead of its name
    #[arg(short, long)]
    pub diff: bool,

    /// Log every git invocation to stderr
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// Only show the changes, never commit
    #[arg(short, long)]
    pub no_commit: bool,

    /// Use --squash=<commit> instead of --fixup=<commit>
    #[arg(short, long)]
    pub squash: bool,

    /// Fold pending fixup/squash commits with an autosquash rebase
    #[arg(short, long)]
    pub rebase: bool,

    /// Files to commit (default: every modified file)
    pub files: Vec<String>,
}

impl Options {
    /// Whether this run creates commits rather than only reporting.
    pub fn commits(&self) -> bool {
        !self.no_commit && (self.all || !self.files.is_empty())
    }

    pub fn marker(&self) -> CommitMarker {
        if self.squash {
            CommitMarker::Squash
        } else {
            CommitMarker::Fixup
        }
    }
}

/// Where the repository is, relative to where we were started.
struct RepoPaths {
    root: PathBuf,
    /// Path of the current directory below `root`, with a trailing `/`, or empty.
    prefix: String,
}

/// Verifies git is available and locates the repository.
fn verify_environment() -> Result<RepoPaths> {
    which::which("git")?;

    let mut git = SystemGit::new();
    let root = PathBuf::from(git::rev_parse(&mut git, "--show-toplevel")?);
    let prefix = git::rev_parse(&mut git, "--show-prefix")?;
    tracing::debug!(root = %root.display(), %prefix, "repository found");

    Ok(RepoPaths { root, prefix })
}

/// Rewrites a command-line path, given relative to the invocation directory,
/// as a path relative to the repository root.
///
/// Paths that leave the repository are returned unnormalized so git can
/// reject them with its own message.
fn root_relative(paths: &RepoPaths, arg: &str) -> String {
    let given = Path::new(arg);
    let joined = if given.is_absolute() {
        match given.strip_prefix(&paths.root) {
            Ok(rest) => rest.to_path_buf(),
            Err(_) => return arg.to_string(),
        }
    } else {
        Path::new(&paths.prefix).join(given)
    };

    let mut parts: Vec<String> = Vec::new();
    for component in joined.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return arg.to_string();
                }
            }
            Component::RootDir | Component::Prefix(_) => return arg.to_string(),
        }
    }
    if parts.is_empty() {
        return String::from(".");
    }
    parts.join("/")
}

/// Runs the workflow selected by `options` against a repository.
///
/// `files` are root-relative; when empty, every modified file is used.
/// The summary goes to `out`.
pub fn run(
    options: &Options,
    files: &[String],
    git: &mut dyn GitRunner,
    out: &mut dyn Write,
) -> Result<()> {
    if options.rebase {
        if !files.is_empty() {
            tracing::warn!("file arguments are ignored with --rebase");
        }
        return autosquash::rebase(git);
    }

    let owners = if files.is_empty() {
        let changed = status::modified_files(git)?;
        owners::resolve(git, &changed)?
    } else {
        owners::resolve(git, files)?
    };

    if owners.is_empty() {
        tracing::info!("no modified files");
        return Ok(());
    }
    tracing::debug!(commits = owners.len(), "files grouped");

    dispatch::report(git, &owners, options.diff, out)?;

    if options.commits() {
        dispatch::commit(git, &owners, options.marker())?;
    }
    Ok(())
}

/// Main CLI entry point for `git-fixup`.
///
/// Parses arguments (clap exits on usage errors), sets up logging, checks
/// that git and a repository are available, then runs the selected
/// workflow from the repository root.
///
/// # Errors
///
/// Any git failure, a file without history, or autosquash targets that
/// cannot be found. Nothing already committed is undone.
pub fn entry() -> Result<()> {
    let options = Options::parse();
    let _log = logging::init(Verbosity::from_debug_flag(options.debug));

    let paths = verify_environment()?;
    let files: Vec<String> = options
        .files
        .iter()
        .map(|f| root_relative(&paths, f))
        .collect();

    let mut git = SystemGit::in_dir(&paths.root);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&options, &files, &mut git, &mut out)
}

#[cfg(test)]
mod tests {
    use super::{Options, RepoPaths, root_relative, run};
    use crate::git::CommitMarker;
    use crate::git::testing::FakeGit;
    use clap::Parser;
    use std::path::PathBuf;

    const STATUS: [&str; 3] = ["status", "--porcelain", "-z"];

    fn log_args(path: &str) -> [&str; 6] {
        ["log", "-n", "1", "--format=%h%x00%s", "--", path]
    }

    fn parse(args: &[&str]) -> Options {
        Options::try_parse_from(std::iter::once("git-fixup").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    fn readme_repo() -> FakeGit {
        FakeGit::new()
            .reply(&STATUS, " M README.md\0")
            .reply(&log_args("README.md"), "abc123\0Update docs\n")
    }

    fn run_to_string(options: &Options, files: &[String], git: &mut FakeGit) -> String {
        console::set_colors_enabled(false);
        let mut out = Vec::new();
        run(options, files, git, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn flags_parse_short_and_long() {
        let o = parse(&["-a", "-d", "-D", "-n", "-s", "-r"]);
        assert!(o.all && o.diff && o.debug && o.no_commit && o.squash && o.rebase);

        let o = parse(&["--all", "--no-commit", "a.txt", "b.txt"]);
        assert!(o.all && o.no_commit);
        assert_eq!(o.files, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        let err = Options::try_parse_from(["git-fixup", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn commit_mode_needs_all_or_files() {
        assert!(!parse(&[]).commits());
        assert!(parse(&["-a"]).commits());
        assert!(parse(&["x.rs"]).commits());
        assert!(!parse(&["-a", "-n"]).commits());
        assert!(!parse(&["-n", "x.rs"]).commits());
    }

    #[test]
    fn squash_flag_selects_marker() {
        assert_eq!(parse(&[]).marker(), CommitMarker::Fixup);
        assert_eq!(parse(&["-s"]).marker(), CommitMarker::Squash);
    }

    #[test]
    fn report_mode_prints_summary_and_commits_nothing() {
        let mut git = readme_repo();

        let text = run_to_string(&parse(&[]), &[], &mut git);

        assert_eq!(text, "abc123 Update docs\n   README.md\n\n");
        assert!(git.attached().is_empty());
    }

    #[test]
    fn all_commits_one_fixup_per_owner() {
        let mut git = readme_repo();

        run_to_string(&parse(&["-a"]), &[], &mut git);

        assert_eq!(
            git.attached(),
            vec![vec!["commit", "--fixup=abc123", "--", "README.md"]]
        );
    }

    #[test]
    fn explicit_files_skip_status() {
        let mut git = FakeGit::new().reply(&log_args("src/a.rs"), "c1\0Add a\n");
        let options = parse(&["a.rs"]);

        run_to_string(&options, &["src/a.rs".to_string()], &mut git);

        assert!(git.calls.iter().all(|c| c.args[0] != "status"));
        assert_eq!(
            git.attached(),
            vec![vec!["commit", "--fixup=c1", "--", "src/a.rs"]]
        );
    }

    #[test]
    fn unknown_file_fails_before_committing() {
        let mut git = FakeGit::new()
            .reply(&log_args("a.rs"), "c1\0Add a\n")
            .reply(&log_args("new.rs"), "");
        let files = vec!["a.rs".to_string(), "new.rs".to_string()];
        let mut out = Vec::new();

        let err = run(&parse(&["a.rs", "new.rs"]), &files, &mut git, &mut out).unwrap_err();

        assert_eq!(err.kind(), "ResolutionError");
        assert!(err.to_string().contains("new.rs"));
        assert!(git.attached().is_empty());
    }

    #[test]
    fn clean_tree_prints_and_commits_nothing() {
        let mut git = FakeGit::new().reply(&STATUS, "?? untracked.rs\0");

        let text = run_to_string(&parse(&["-a"]), &[], &mut git);

        assert!(text.is_empty());
        assert!(git.attached().is_empty());
        assert_eq!(git.calls.len(), 1);
    }

    #[test]
    fn repository_root_argument_resolves_through_git() {
        let mut git = FakeGit::new().reply(&log_args("."), "abc123\0Update docs\n");

        let text = run_to_string(&parse(&["-n", "."]), &[".".to_string()], &mut git);

        assert_eq!(text, "abc123 Update docs\n   .\n\n");
        assert!(git.attached().is_empty());
    }

    #[test]
    fn rebase_flag_skips_the_fixup_workflow() {
        let mut git = FakeGit::new().reply(
            &["log", "-n", "1000", "--format=%h%x00%s"],
            "h1\0fixup! A\nh2\0A\n",
        );

        let text = run_to_string(&parse(&["-r", "-a"]), &[], &mut git);

        assert!(text.is_empty());
        assert_eq!(
            git.attached(),
            vec![vec!["rebase", "--interactive", "--autosquash", "h2^"]]
        );
        assert!(git.calls.iter().all(|c| c.args[0] != "status"));
    }

    fn paths(root: &str, prefix: &str) -> RepoPaths {
        RepoPaths {
            root: PathBuf::from(root),
            prefix: prefix.to_string(),
        }
    }

    #[test]
    fn paths_are_made_root_relative() {
        let p = paths("/repo", "sub/dir/");
        assert_eq!(root_relative(&p, "file.rs"), "sub/dir/file.rs");
        assert_eq!(root_relative(&p, "./file.rs"), "sub/dir/file.rs");
        assert_eq!(root_relative(&p, "../other.rs"), "sub/other.rs");
        assert_eq!(root_relative(&p, "/repo/top.rs"), "top.rs");
        assert_eq!(root_relative(&paths("/repo", "sub/"), ".."), ".");
        assert_eq!(root_relative(&p, "/repo"), ".");
    }

    #[test]
    fn paths_at_root_are_unchanged() {
        let p = paths("/repo", "");
        assert_eq!(root_relative(&p, "README.md"), "README.md");
        assert_eq!(root_relative(&p, "docs/read me.md"), "docs/read me.md");
        assert_eq!(root_relative(&p, "."), ".");
        assert_eq!(root_relative(&p, "./"), ".");
    }

    #[test]
    fn paths_outside_the_repository_are_left_alone() {
        let p = paths("/repo", "");
        assert_eq!(root_relative(&p, "../elsewhere.rs"), "../elsewhere.rs");
        assert_eq!(root_relative(&p, "/tmp/x.rs"), "/tmp/x.rs");
    }
}
