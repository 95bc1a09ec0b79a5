/// CLI error types and the process exit convention.
///
/// [`CliError`] is the top-level error type for the `toposweep` binary. The
/// tool keeps the inverted exit convention of the pipelines it slots into:
/// `0` signals failure (including `--help`), `1` signals success. Scripts
/// that already test for `1` keep working.
use std::fmt;
use std::path::PathBuf;

/// Process exit code for a successful run.
pub const EXIT_SUCCESS: i32 = 1;

/// Process exit code for any failure, help included.
pub const EXIT_FAILURE: i32 = 0;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions the `toposweep` CLI can produce.
///
/// [`CliError::message`] returns the human-readable string printed to stderr
/// before exiting with [`CliError::exit_code`].
#[derive(Debug)]
pub enum CliError {
    /// The input volume could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read or write a file.
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
    },

    /// The input volume ended before all `W*H*D` samples were read.
    ShortRead {
        /// The input path.
        path: PathBuf,
        /// The z-plane at which the data ran out.
        plane: usize,
    },

    /// A generic I/O failure while reading.
    ReadError {
        /// A human-readable label for the source.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// A generic I/O failure while writing.
    WriteError {
        /// A human-readable label for the destination (`"<stdout>"` or a
        /// path).
        dest: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The dimension product `W*H*D` overflows the addressable range.
    DimensionOverflow {
        /// The dimensions as given on the command line.
        dims: [usize; 3],
    },

    /// A topology-file export was requested but could not be produced.
    ExportFailed {
        /// A description of the failure.
        detail: String,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    ///
    /// Always [`EXIT_FAILURE`]: under the inverted convention every failure
    /// leaves with code 0.
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }

    /// Returns a human-readable error message suitable for printing to
    /// stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::ShortRead { path, plane } => {
                format!(
                    "error: short read: {} ran out of samples at z-plane {plane}",
                    path.display()
                )
            }
            Self::ReadError { source, detail } => {
                format!("error: I/O error reading {source}: {detail}")
            }
            Self::WriteError { dest, detail } => {
                format!("error: I/O error writing {dest}: {detail}")
            }
            Self::DimensionOverflow { dims } => {
                format!(
                    "error: dimensions {}x{}x{} overflow the addressable index range",
                    dims[0], dims[1], dims[2]
                )
            }
            Self::ExportFailed { detail } => {
                format!("error: topology export failed: {detail}")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
