//! Output writer for generated bindings.
//!
//! Writes `(relative path, content)` records under an output root. With
//! overwrite disabled, a file whose on-disk content already hashes to the
//! new content's checksum is left alone, so regenerating unchanged bindings
//! does not touch timestamps.
//!
//! # Examples
//!
//! ```
//! use gembind_files::{ExportOptions, OutputWriter};
//! # use tempfile::TempDir;
//!
//! # let temp_dir = TempDir::new().unwrap();
//! let writer = OutputWriter::new(temp_dir.path(), ExportOptions::default().with_overwrite(false));
//!
//! let first = writer.write_all([("Core/Math.cs", "namespace O3DE.Core {}")]).unwrap();
//! assert_eq!(first.written.len(), 1);
//!
//! let second = writer.write_all([("Core/Math.cs", "namespace O3DE.Core {}")]).unwrap();
//! assert_eq!(second.skipped.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod filesystem;
pub mod types;

pub use filesystem::{ExportOptions, OutputWriter, WriteOutcome, WriteReport, expand_tilde};
pub use types::{FilesError, Result};
