//! Error types for gembind.
//!
//! A single error hierarchy with contextual information is shared by the
//! loader, the plugin discovery pass and the generator.
//!
//! # Examples
//!
//! ```
//! use gembind_core::{Error, Result};
//!
//! fn check_namespace(ns: &str) -> Result<()> {
//!     if ns.is_empty() {
//!         return Err(Error::ConfigError {
//!             message: "root namespace cannot be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_namespace("").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gembind.
///
/// Every fallible operation of the library crates returns this type, so the
/// caller sees a consistent error surface across loading, discovery and
/// generation.
#[derive(Error, Debug)]
pub enum Error {
    /// A reflection document or manifest could not be read or parsed.
    ///
    /// This is the "input malformation" failure: it aborts the run before
    /// any file is written.
    #[error("Invalid document {path}: {message}")]
    InvalidDocument {
        /// Path of the offending document
        path: PathBuf,
        /// Human-readable description of the problem
        message: String,
        /// Underlying parse error, if any
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A plugin descriptor (`gem.json`) could not be parsed.
    #[error("Invalid plugin descriptor {path}: {message}")]
    DescriptorError {
        /// Path of the descriptor file
        path: PathBuf,
        /// Description of the problem
        message: String,
    },

    /// A plugin that was explicitly requested is unknown.
    #[error("Plugin not found: {name}")]
    PluginNotFound {
        /// Requested plugin name
        name: String,
    },

    /// Configuration error.
    ///
    /// Raised when configuration is invalid, missing required fields,
    /// or contains contradictory settings.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Template registration or rendering failed.
    #[error("Template error in '{template}': {message}")]
    TemplateError {
        /// Name of the template
        template: String,
        /// Description of the failure
        message: String,
    },

    /// Filesystem error while reading inputs or writing outputs.
    #[error("I/O error at {path}: {source}")]
    IoError {
        /// Path involved in the failed operation
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns `true` if this is an input document error.
    ///
    /// # Examples
    ///
    /// ```
    /// use gembind_core::Error;
    ///
    /// let err = Error::InvalidDocument {
    ///     path: "reflection.json".into(),
    ///     message: "expected an object".to_string(),
    ///     source: None,
    /// };
    /// assert!(err.is_invalid_document());
    /// ```
    #[must_use]
    pub const fn is_invalid_document(&self) -> bool {
        matches!(self, Self::InvalidDocument { .. })
    }

    /// Returns `true` if this is a descriptor error.
    #[must_use]
    pub const fn is_descriptor_error(&self) -> bool {
        matches!(self, Self::DescriptorError { .. })
    }

    /// Returns `true` if this is a plugin-not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::PluginNotFound { .. })
    }

    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use gembind_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "solution name is empty".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a template error.
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::TemplateError { .. })
    }

    /// Returns `true` if this is an I/O error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::IoError { .. })
    }

    /// Wraps an I/O error with the path it occurred at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for gembind operations.
///
/// # Examples
///
/// ```
/// use gembind_core::{Error, Result};
///
/// fn plugin(name: &str) -> Result<&str> {
///     if name.is_empty() {
///         return Err(Error::InvalidArgument("empty plugin name".to_string()));
///     }
///     Ok(name)
/// }
///
/// assert!(plugin("PhysX").is_ok());
/// assert!(plugin("").is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_document_detection() {
        let err = Error::InvalidDocument {
            path: PathBuf::from("reflection.json"),
            message: "bad".to_string(),
            source: None,
        };
        assert!(err.is_invalid_document());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_not_found_detection() {
        let err = Error::PluginNotFound {
            name: "PhysX".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_io_error());
    }

    #[test]
    fn test_io_helper() {
        let err = Error::io(
            "out/Core.cs",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_io_error());
        assert!(format!("{err}").contains("out/Core.cs"));
    }

    #[test]
    fn test_error_display() {
        let err = Error::TemplateError {
            template: "project".to_string(),
            message: "missing field".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("Template error"));
        assert!(display.contains("project"));
        assert!(err.is_template_error());
    }

    #[test]
    fn test_result_alias() {
        fn returns_err() -> Result<i32> {
            Err(Error::ConfigError {
                message: "test error".to_string(),
            })
        }

        assert!(returns_err().is_err());
    }
}
