//! Utility functions for error handling
//!
//! Opening input and output locations with error messages that say what went wrong.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{AnalysisError, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
///
/// # Returns
/// * `Result<fs::File>` - The opened file or a `SourceNotFound` error
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(AnalysisError::SourceNotFound {
            path: path.to_path_buf(),
            reason: format!("file not found, needed for: {purpose}"),
        });
    }

    if !path.is_file() {
        return Err(AnalysisError::SourceNotFound {
            path: path.to_path_buf(),
            reason: format!("path is not a file, expected a file for: {purpose}"),
        });
    }

    fs::File::open(path).map_err(|e| {
        let reason = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "permission denied - check file permissions".to_string()
            }
            io::ErrorKind::NotFound => {
                "file not found - it may have been deleted during operation".to_string()
            }
            _ => format!("failed to open file for {purpose}: {e}"),
        };
        AnalysisError::SourceNotFound {
            path: path.to_path_buf(),
            reason,
        }
    })
}

/// Make sure an output directory exists, creating it when needed
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(AnalysisError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} exists and is not a directory", path.display()),
        )));
    }
    fs::create_dir_all(path)?;
    Ok(())
}
