/// Raw-volume and topology-file I/O.
///
/// This module is the single place where the `toposweep` binary touches the
/// filesystem; `toposweep-core` never does. Raw volumes are `W*H*D`
/// little-endian 32-bit floats, read and written one z-plane at a time so
/// that very large files never need a single oversized transfer.
use std::fs::File;
use std::io::{BufReader, BufWriter, Read as _, Write};
use std::path::Path;

use serde::Serialize;
use toposweep_core::{Dims, FunctionType, ScalarField};

use crate::error::CliError;

/// Bytes per sample on disk.
const SAMPLE_BYTES: usize = size_of::<FunctionType>();

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Reads a raw volume of the given dimensions, plane by plane.
///
/// # Errors
///
/// Returns [`CliError`] for a missing or unreadable file, a volume shorter
/// than `W*H*D` samples, or dimensions whose product overflows.
pub fn read_volume(path: &Path, dims: Dims) -> Result<ScalarField, CliError> {
    let count = dims.vertex_count().ok_or(CliError::DimensionOverflow {
        dims: [dims.w, dims.h, dims.d],
    })?;
    let plane_len = dims.plane_len().ok_or(CliError::DimensionOverflow {
        dims: [dims.w, dims.h, dims.d],
    })?;

    let file = File::open(path).map_err(|e| open_error_to_cli(&e, path))?;
    let mut reader = BufReader::new(file);

    let mut data = Vec::with_capacity(count);
    let mut plane = vec![0u8; plane_len * SAMPLE_BYTES];
    for z in 0..dims.d {
        reader.read_exact(&mut plane).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                CliError::ShortRead {
                    path: path.to_path_buf(),
                    plane: z,
                }
            } else {
                CliError::ReadError {
                    source: path.display().to_string(),
                    detail: e.to_string(),
                }
            }
        })?;
        for sample in plane.chunks_exact(SAMPLE_BYTES) {
            data.push(FunctionType::from_le_bytes([
                sample[0], sample[1], sample[2], sample[3],
            ]));
        }
    }

    ScalarField::new(dims, data).map_err(|e| CliError::ReadError {
        source: path.display().to_string(),
        detail: e.to_string(),
    })
}

/// Maps a `std::io::Error` from opening a file to a [`CliError`].
fn open_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    if e.kind() == std::io::ErrorKind::NotFound {
        CliError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else if e.kind() == std::io::ErrorKind::PermissionDenied {
        CliError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        CliError::ReadError {
            source: path.display().to_string(),
            detail: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Writes a transformed volume, plane by plane, to `dest` or standard
/// output.
///
/// # Errors
///
/// Returns [`CliError::WriteError`] (or permission/creation failures mapped
/// the same way) when the destination cannot be created or written.
pub fn write_volume(
    dest: Option<&Path>,
    dims: Dims,
    values: &[FunctionType],
) -> Result<(), CliError> {
    let label = dest.map_or_else(|| "<stdout>".to_owned(), |p| p.display().to_string());

    let mut writer: Box<dyn Write> = match dest {
        Some(path) => {
            let file = File::create(path).map_err(|e| CliError::WriteError {
                dest: label.clone(),
                detail: e.to_string(),
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout().lock()),
    };

    let plane_len = dims.plane_len().unwrap_or(0);
    let mut plane: Vec<u8> = Vec::with_capacity(plane_len * SAMPLE_BYTES);
    for z in 0..dims.d {
        plane.clear();
        for &value in &values[z * plane_len..(z + 1) * plane_len] {
            plane.extend_from_slice(&value.to_le_bytes());
        }
        writer.write_all(&plane).map_err(|e| CliError::WriteError {
            dest: label.clone(),
            detail: e.to_string(),
        })?;
    }
    writer.flush().map_err(|e| CliError::WriteError {
        dest: label,
        detail: e.to_string(),
    })
}

/// Writes a serializable topology document as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`CliError::WriteError`] when the file cannot be created or
/// written.
pub fn write_json<T: Serialize>(path: &Path, doc: &T) -> Result<(), CliError> {
    let to_write_error = |detail: String| CliError::WriteError {
        dest: path.display().to_string(),
        detail,
    };

    let file = File::create(path).map_err(|e| to_write_error(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, doc).map_err(|e| to_write_error(e.to_string()))?;
    writer
        .write_all(b"\n")
        .map_err(|e| to_write_error(e.to_string()))?;
    writer.flush().map_err(|e| to_write_error(e.to_string()))
}
