pub mod cli;
pub mod error;
pub mod io;
pub mod pipeline;

pub use cli::{Cli, MetricKind, SplitKind};

use clap::Parser;

use crate::error::{EXIT_FAILURE, EXIT_SUCCESS};

fn main() {
    #[cfg(unix)]
    install_sigpipe_default();

    // The exit convention is inverted: 0 signals failure (help included),
    // 1 signals success. Parsing is done by hand so that clap's own exit
    // codes never leak through.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap renders help and usage errors itself, on the right stream.
            if let Err(print_err) = e.print() {
                eprintln!("{print_err}");
            }
            std::process::exit(EXIT_FAILURE);
        }
    };

    match pipeline::run(&cli) {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("{}", e.message());
            std::process::exit(e.exit_code());
        }
    }
}

/// Resets `SIGPIPE` to its default disposition (`SIG_DFL`).
///
/// Rust's runtime ignores `SIGPIPE` by default, which causes programs that
/// write to a closed pipe (e.g. `toposweep --i v.raw --dim 64 64 64 | head`)
/// to receive an `Err(BrokenPipe)` from a write call rather than being
/// terminated silently. Restoring the default disposition lets the kernel
/// terminate the process when a write to a closed pipe occurs, consistent
/// with standard Unix behavior.
///
/// This function uses `libc::signal`, which requires the `libc` crate. It is
/// only compiled on Unix targets via `#[cfg(unix)]` at the call site.
#[cfg(unix)]
fn install_sigpipe_default() {
    // SAFETY: signal() is safe to call during single-threaded program
    // initialization before any other threads are spawned. SIG_DFL is a
    // valid handler for SIGPIPE. The return value (previous handler) is
    // discarded.
    //
    // The workspace denies `unsafe_code` globally, but this is the minimal
    // unavoidable use of libc required for SIGPIPE handling on Unix. There
    // is no safe Rust equivalent in the standard library.
    #[allow(unsafe_code)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
}
