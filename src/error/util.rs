//! Utility functions for error handling
//!
//! Helpers that turn raw filesystem failures into [`PipelineError`] values
//! carrying the offending path.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Check that an input file exists and is a regular file
///
/// # Errors
/// Returns `InputNotFound` if the path is missing or is not a file
pub fn ensure_input_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Open a file for reading with a path-aware error
///
/// A file that disappears between the existence check and the open call is
/// still reported as `InputNotFound`.
pub fn safe_open_file(path: &Path) -> Result<fs::File> {
    ensure_input_file(path)?;

    fs::File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PipelineError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => PipelineError::Io(io::Error::new(
            e.kind(),
            format!("Failed to open {}: {e}", path.display()),
        )),
    })
}

/// Make sure the directory that will hold `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|e| PipelineError::write_failure(path, e))
        }
        _ => Ok(()),
    }
}
