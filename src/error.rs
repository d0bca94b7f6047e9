use thiserror::Error;

/// Result type using [`FixupError`].
pub type Result<T> = std::result::Result<T, FixupError>;

/// Everything that can abort a `git-fixup` run.
///
/// Usage errors never reach this type; clap reports them before any git
/// command runs.
#[derive(Debug, Error)]
pub enum FixupError {
    /// A git command exited with a non-zero status.
    #[error(
        "command {args:?} failed with exit code {}, stdout={stdout:?}, stderr={stderr:?}",
        exit_code_label(.code)
    )]
    CommandFailed {
        args: Vec<String>,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// A git command could not be started at all.
    #[error("command {args:?} could not be started: {source}")]
    Spawn {
        args: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    /// A file has no commit in its history, so there is nothing to fix up.
    #[error("no commit found that touches {path:?}")]
    NoHistory { path: String },

    /// Pending fixup/squash commits whose target is not in the scanned history.
    #[error("no commit found for autosquash target(s): {}", join_quoted(.subjects))]
    UnresolvedTargets { subjects: Vec<String> },

    /// Writing the summary to standard output failed.
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),

    /// `git` is not installed or not on `PATH`.
    #[error("`git` not found in PATH: {0}")]
    GitNotFound(#[from] which::Error),
}

impl FixupError {
    /// Name of the error category, printed in front of the message.
    pub fn kind(&self) -> &'static str {
        match self {
            FixupError::CommandFailed { .. } | FixupError::Spawn { .. } => "ToolInvocationError",
            FixupError::NoHistory { .. } | FixupError::UnresolvedTargets { .. } => {
                "ResolutionError"
            }
            FixupError::Output(_) | FixupError::GitNotFound(_) => "EnvironmentError",
        }
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => String::from("<signal>"),
    }
}

fn join_quoted(subjects: &[String]) -> String {
    subjects
        .iter()
        .map(|s| format!("{s:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}
