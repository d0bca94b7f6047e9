//! Diagnostic logging through `tracing`.
//!
//! Logs go to stderr so stdout carries only the change summary. The
//! subscriber is installed as the default for the current thread for as long
//! as the returned guard lives, not as a process-wide global.

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only, unless `RUST_LOG` says otherwise.
    #[default]
    Quiet,
    /// Everything from this crate, including each git invocation.
    Debug,
}

impl Verbosity {
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug { Self::Debug } else { Self::Quiet }
    }

    /// Builds the filter for this verbosity.
    ///
    /// `--debug` always wins; otherwise a valid `RUST_LOG` is honoured and
    /// `warn` is the fallback.
    fn filter(self) -> EnvFilter {
        match self {
            Verbosity::Debug => EnvFilter::new("git_fixup=debug"),
            Verbosity::Quiet => {
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
            }
        }
    }
}

/// Installs the stderr logger; logging stops when the guard is dropped.
pub fn init(verbosity: Verbosity) -> DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(verbosity.filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_default(subscriber)
}
