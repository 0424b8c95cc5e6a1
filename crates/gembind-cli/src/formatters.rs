//! Output formatters for CLI commands.
//!
//! Every command summary is rendered as JSON, flat `key=value` text, or a
//! colorized outline.

use anyhow::Result;
use colored::Colorize;
use gembind_core::cli::OutputFormat;
use serde::Serialize;
use serde_json::Value;

/// Formats a command summary in the requested format.
///
/// # Errors
///
/// Returns an error if `data` cannot be serialized.
///
/// # Examples
///
/// ```
/// use gembind_cli::formatters::format_output;
/// use gembind_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Summary {
///     plugin: String,
///     files: u32,
/// }
///
/// let summary = Summary {
///     plugin: "PhysX".to_string(),
///     files: 3,
/// };
///
/// let output = format_output(&summary, OutputFormat::Text)?;
/// assert!(output.lines().any(|line| line == "plugin=PhysX"));
/// assert!(output.lines().any(|line| line == "files=3"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output.
pub mod json {
    use super::{Result, Serialize};

    /// Formats data as indented JSON.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

/// Line-oriented output for scripts.
///
/// Each leaf value becomes one `path=value` line. Object keys are joined
/// with `.` and array items are addressed by index; empty
/// containers produce no line.
pub mod text {
    use super::{Result, Serialize, Value};

    /// Formats data as `path=value` lines.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        flatten(&value, String::new(), &mut lines);
        Ok(lines.join("\n"))
    }

    fn flatten(value: &Value, path: String, lines: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (key, item) in map {
                    flatten(item, join(&path, key), lines);
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    flatten(item, join(&path, &index.to_string()), lines);
                }
            }
            Value::String(s) => lines.push(format!("{path}={s}")),
            Value::Null => lines.push(format!("{path}=")),
            other => lines.push(format!("{path}={other}")),
        }
    }

    fn join(path: &str, key: &str) -> String {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        }
    }
}

/// Colorized outline for terminals.
pub mod pretty {
    use super::{Colorize, Result, Serialize, Value};

    /// Formats data as an indented, colorized outline.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        outline(&value, 0, &mut lines);
        Ok(lines.join("\n"))
    }

    fn scalar(value: &Value) -> String {
        match value {
            Value::Null => "-".dimmed().to_string(),
            Value::Bool(true) => "yes".green().to_string(),
            Value::Bool(false) => "no".yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => s.clone(),
            Value::Array(items) if items.is_empty() => "(none)".dimmed().to_string(),
            Value::Object(map) if map.is_empty() => "(none)".dimmed().to_string(),
            Value::Array(_) | Value::Object(_) => String::new(),
        }
    }

    fn is_nested(value: &Value) -> bool {
        match value {
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            _ => false,
        }
    }

    fn outline(value: &Value, depth: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        match value {
            Value::Object(map) => {
                for (key, item) in map {
                    let label = key.replace('_', " ");
                    if is_nested(item) {
                        lines.push(format!("{indent}{}:", label.blue().bold()));
                        outline(item, depth + 1, lines);
                    } else {
                        lines.push(format!("{indent}{}: {}", label.blue().bold(), scalar(item)));
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    if is_nested(item) {
                        lines.push(format!("{indent}-"));
                        outline(item, depth + 1, lines);
                    } else {
                        lines.push(format!("{indent}- {}", scalar(item)));
                    }
                }
            }
            other => lines.push(format!("{indent}{}", scalar(other))),
        }
    }
}
