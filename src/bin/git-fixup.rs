use console::style;
use std::io::Write;

/// Entry point for the `git-fixup` binary.
///
/// Delegates to the CLI entry function. Errors are printed to stdout as
/// `ERROR: <kind>: <message>` and turn into exit status 1, even when stdout
/// itself is gone (e.g. a closed pipe).
fn main() {
    match git_fixup::cli::entry() {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let _ = writeln!(
                std::io::stdout(),
                "{} {}: {}",
                style("ERROR:").red().bold(),
                e.kind(),
                e
            );
            std::process::exit(1)
        }
    }
}
