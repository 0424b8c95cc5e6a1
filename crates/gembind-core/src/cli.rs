//! Value types shared with the `gembind` binary.
//!
//! # Examples
//!
//! ```
//! use gembind_core::cli::{ExitCode, OutputFormat};
//!
//! let format: OutputFormat = "json".parse().unwrap();
//! assert_eq!(format, OutputFormat::Json);
//!
//! assert_eq!(ExitCode::from_success(true).as_i32(), 0);
//! assert_eq!(ExitCode::from_success(false).as_i32(), 1);
//! ```

use std::fmt;
use std::str::FromStr;

/// How a command summary is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Indented JSON
    Json,
    /// One `path=value` line per field
    Text,
    /// Colorized outline
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Every format, in the order they are listed in help text.
    pub const ALL: [Self; 3] = [Self::Json, Self::Text, Self::Pretty];

    /// Name accepted on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                crate::Error::InvalidArgument(format!(
                    "unknown output format '{s}'; use json, text or pretty"
                ))
            })
    }
}

/// Process exit status of the binary.
///
/// `0` when bindings were generated (or a listing printed), `1` when
/// reflection data failed to load or generation reported a failure.
/// Argument errors are reported by the parser with its own status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExitCode(i32);

impl ExitCode {
    /// The command completed.
    pub const SUCCESS: Self = Self(0);

    /// Loading or generation failed.
    pub const ERROR: Self = Self(1);

    /// Maps a success flag, such as a generation report's, to a status.
    #[must_use]
    pub const fn from_success(success: bool) -> Self {
        if success { Self::SUCCESS } else { Self::ERROR }
    }

    /// Raw status passed to `std::process::exit`.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Returns `true` for a zero status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_format_parses_from_its_name() {
        for format in OutputFormat::ALL {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_format_names_ignore_case() {
        assert_eq!("Pretty".parse::<OutputFormat>().unwrap(), OutputFormat::Pretty);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
    }

    #[test]
    fn test_unknown_format() {
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(err.to_string().contains("'yaml'"));
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(ExitCode::default(), ExitCode::SUCCESS);
        assert!(ExitCode::from_success(true).is_success());
        assert_eq!(ExitCode::from_success(false), ExitCode::ERROR);
        assert_eq!(ExitCode::ERROR.to_string(), "1");
    }
}
