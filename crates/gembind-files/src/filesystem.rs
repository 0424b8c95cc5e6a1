//! Writing generated files to disk.
//!
//! # Strategy
//!
//! 1. **Path validation**: relative paths only, no `..` components
//! 2. **Directory creation**: parents are created on demand
//! 3. **Atomic operations**: writes to a temp file, then renames
//! 4. **Checksum gate**: with overwrite disabled, unchanged files are skipped
//!
//! # Examples
//!
//! ```no_run
//! use gembind_files::{ExportOptions, OutputWriter};
//!
//! let writer = OutputWriter::new("Generated/CSharp", ExportOptions::default());
//! let report = writer.write_all([("Core/Math.cs", "// math")])?;
//! println!("{} written, {} skipped", report.written.len(), report.skipped.len());
//! # Ok::<(), gembind_files::FilesError>(())
//! ```

use crate::types::{FilesError, Result};
use gembind_core::checksum::{calculate_checksum, matches_checksum};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Options for writing generated files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Use atomic writes (write to temp file, then rename)
    pub atomic: bool,
    /// Rewrite files even when their content is unchanged
    pub overwrite: bool,
}

impl ExportOptions {
    /// Creates options with atomic writes and overwrite enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            atomic: true,
            overwrite: true,
        }
    }

    /// Sets whether to use atomic writes.
    #[must_use]
    pub const fn with_atomic_writes(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Sets whether unchanged files are rewritten.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or replaced
    Written,
    /// The file already held identical content
    Skipped,
}

/// Relative paths of written and skipped files, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Files created or replaced
    pub written: Vec<String>,
    /// Files left untouched
    pub skipped: Vec<String>,
}

impl WriteReport {
    /// Total number of files handled.
    #[must_use]
    pub fn total(&self) -> usize {
        self.written.len() + self.skipped.len()
    }
}

/// Writes generated files beneath an output root.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
    options: ExportOptions,
}

impl OutputWriter {
    /// Creates a writer rooted at `root`. The root is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, options: ExportOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// Output root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write options.
    #[must_use]
    pub const fn options(&self) -> ExportOptions {
        self.options
    }

    /// Writes one file.
    ///
    /// # Errors
    ///
    /// Returns [`FilesError::InvalidPath`] if `relative` is absolute or
    /// escapes the root, and [`FilesError::IoError`] on filesystem failure.
    pub fn write(&self, relative: &str, content: &str) -> Result<WriteOutcome> {
        let target = self.resolve(relative)?;

        if !self.options.overwrite && is_unchanged(&target, content) {
            debug!("Unchanged, skipping {}", target.display());
            return Ok(WriteOutcome::Skipped);
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| FilesError::io(parent, e))?;
        }

        if self.options.atomic {
            write_file_atomic(&target, content)?;
        } else {
            fs::write(&target, content).map_err(|e| FilesError::io(&target, e))?;
        }

        debug!("Wrote {}", target.display());
        Ok(WriteOutcome::Written)
    }

    /// Writes every `(relative path, content)` record in order.
    ///
    /// Stops at the first failure; files written before it stay on disk.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`OutputWriter::write`].
    pub fn write_all<I, P, C>(&self, files: I) -> Result<WriteReport>
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: AsRef<str>,
    {
        let mut report = WriteReport::default();
        for (relative, content) in files {
            let relative = relative.as_ref();
            match self.write(relative, content.as_ref())? {
                WriteOutcome::Written => report.written.push(relative.to_string()),
                WriteOutcome::Skipped => report.skipped.push(relative.to_string()),
            }
        }

        info!(
            "Wrote {} files to {} ({} unchanged)",
            report.written.len(),
            self.root.display(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let path = Path::new(relative);
        let valid = !relative.is_empty()
            && path
                .components()
                .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if !valid {
            return Err(FilesError::InvalidPath {
                path: relative.to_string(),
            });
        }
        Ok(self.root.join(path))
    }
}

fn is_unchanged(path: &Path, content: &str) -> bool {
    fs::read(path).is_ok_and(|existing| {
        matches_checksum(&existing, &calculate_checksum(content.as_bytes()))
    })
}

fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file = fs::File::create(&temp_path).map_err(|e| FilesError::io(&temp_path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| FilesError::io(&temp_path, e))?;
    file.sync_all().map_err(|e| FilesError::io(&temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| FilesError::io(path, e))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or with no resolvable home directory, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use gembind_files::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("Generated/CSharp"), PathBuf::from("Generated/CSharp"));
/// ```
#[must_use]
pub fn expand_tilde(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest)),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_nested_file() {
        let temp_dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(temp_dir.path(), ExportOptions::default());

        let outcome = writer.write("PhysX/EBus/Physics.EBus.cs", "// bus").unwrap();
        assert_eq!(outcome, WriteOutcome::Written);

        let content =
            fs::read_to_string(temp_dir.path().join("PhysX/EBus/Physics.EBus.cs")).unwrap();
        assert_eq!(content, "// bus");
        assert!(!temp_dir.path().join("PhysX/EBus/Physics.EBus.cs.tmp").exists());
    }

    #[test]
    fn test_non_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(
            temp_dir.path(),
            ExportOptions::default().with_atomic_writes(false),
        );
        writer.write("a.cs", "x").unwrap();
        assert_eq!(fs::read_to_string(temp_dir.path().join("a.cs")).unwrap(), "x");
    }

    #[test]
    fn test_unchanged_file_skipped_without_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(temp_dir.path(), ExportOptions::new().with_overwrite(false));

        assert_eq!(writer.write("Core.cs", "same").unwrap(), WriteOutcome::Written);
        let before = fs::metadata(temp_dir.path().join("Core.cs"))
            .unwrap()
            .modified()
            .unwrap();

        std::thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(writer.write("Core.cs", "same").unwrap(), WriteOutcome::Skipped);

        let after = fs::metadata(temp_dir.path().join("Core.cs"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_changed_file_rewritten_without_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(temp_dir.path(), ExportOptions::new().with_overwrite(false));

        writer.write("Core.cs", "old").unwrap();
        assert_eq!(writer.write("Core.cs", "new").unwrap(), WriteOutcome::Written);
        assert_eq!(fs::read_to_string(temp_dir.path().join("Core.cs")).unwrap(), "new");
    }

    #[test]
    fn test_overwrite_rewrites_identical_content() {
        let temp_dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(temp_dir.path(), ExportOptions::default());

        writer.write("Core.cs", "same").unwrap();
        assert_eq!(writer.write("Core.cs", "same").unwrap(), WriteOutcome::Written);
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let temp_dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(temp_dir.path(), ExportOptions::default());

        assert!(writer.write("../outside.cs", "x").unwrap_err().is_invalid_path());
        assert!(writer.write("/abs/outside.cs", "x").unwrap_err().is_invalid_path());
        assert!(writer.write("", "x").unwrap_err().is_invalid_path());
    }

    #[test]
    fn test_write_all_report() {
        let temp_dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(temp_dir.path(), ExportOptions::new().with_overwrite(false));
        writer.write("a.cs", "a").unwrap();

        let report = writer
            .write_all(vec![("a.cs", "a"), ("b.cs", "b")])
            .unwrap();
        assert_eq!(report.skipped, vec!["a.cs"]);
        assert_eq!(report.written, vec!["b.cs"]);
        assert_eq!(report.total(), 2);
    }

    #[test]
    fn test_write_all_stops_at_first_error() {
        let temp_dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(temp_dir.path(), ExportOptions::default());

        let result = writer.write_all([("ok.cs", "1"), ("../bad.cs", "2"), ("later.cs", "3")]);
        assert!(result.is_err());
        assert!(temp_dir.path().join("ok.cs").exists());
        assert!(!temp_dir.path().join("later.cs").exists());
    }

    #[test]
    fn test_expand_tilde_absolute_unchanged() {
        assert_eq!(expand_tilde("/tmp/out"), PathBuf::from("/tmp/out"));
    }
}
