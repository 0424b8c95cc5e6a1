//! Generated file records.
//!
//! Every record carries the checksum of its full text, so the write step
//! can skip files whose content on disk is already identical.
//!
//! # Examples
//!
//! ```
//! use gembind_codegen::{GeneratedCode, GeneratedFile};
//!
//! let mut code = GeneratedCode::new();
//! assert!(code.add_file(GeneratedFile::new("Core/Math.cs", "namespace O3DE.Core {}")));
//! assert!(!code.add_file(GeneratedFile::new("Core/Math.cs", "duplicate")));
//!
//! assert_eq!(code.file_count(), 1);
//! assert!(code.files[0].checksum.starts_with("blake3:"));
//! ```

use gembind_core::checksum::calculate_checksum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// All files produced by one generation run, in emission order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedCode {
    /// Generated files
    pub files: Vec<GeneratedFile>,
    #[serde(skip)]
    paths: HashSet<String>,
}

impl GeneratedCode {
    /// Creates an empty collection.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file unless another file already claimed its path.
    ///
    /// Returns `false` when the path is taken; the earlier record is kept.
    pub fn add_file(&mut self, file: GeneratedFile) -> bool {
        if !self.paths.insert(file.path.clone()) {
            return false;
        }
        self.files.push(file);
        true
    }

    /// Returns the number of files.
    #[inline]
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Returns the file at `path`.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|file| file.path == path)
    }

    /// Returns an iterator over the files.
    #[inline]
    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter()
    }

    /// Relative paths of every file, in emission order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.files.iter().map(|file| file.path.clone()).collect()
    }
}

/// A single generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Path relative to the output root, `/`-separated
    pub path: String,
    /// Full file text
    pub content: String,
    /// Checksum of `content`
    pub checksum: String,
}

impl GeneratedFile {
    /// Creates a record, computing the checksum of `content`.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            checksum: calculate_checksum(content.as_bytes()),
            content,
        }
    }

    /// Returns the file path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the file content.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}
