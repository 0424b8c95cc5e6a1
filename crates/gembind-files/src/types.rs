//! Error types for the output writer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while writing generated files.
#[derive(Error, Debug)]
pub enum FilesError {
    /// The relative path is absolute or escapes the output root.
    #[error("Invalid output path: {path}")]
    InvalidPath {
        /// Offending path
        path: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        /// Path involved in the failed operation
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FilesError {
    /// Returns `true` if this is an invalid path error.
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }

    /// Returns `true` if this is an I/O error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::IoError { .. })
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}

impl From<FilesError> for gembind_core::Error {
    fn from(error: FilesError) -> Self {
        match error {
            FilesError::InvalidPath { path } => Self::InvalidArgument(format!("invalid output path: {path}")),
            FilesError::IoError { path, source } => Self::IoError {
                path: PathBuf::from(path),
                source,
            },
        }
    }
}

/// Result type alias for writer operations.
pub type Result<T> = std::result::Result<T, FilesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_into_core_error() {
        let err: gembind_core::Error = FilesError::io(
            std::path::Path::new("out/Core.cs"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        )
        .into();
        assert!(err.is_io_error());

        let err: gembind_core::Error = FilesError::InvalidPath {
            path: "../escape.cs".to_string(),
        }
        .into();
        assert!(format!("{err}").contains("escape.cs"));
    }
}
