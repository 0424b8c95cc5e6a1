//! Input boundary of gembind.
//!
//! Loads the reflection document exported by the engine and discovers the
//! plugins a project uses, turning both into `gembind-core` types. Every
//! "string or object" and "missing field" quirk of the on-disk formats is
//! resolved here and never leaks past this crate.
//!
//! # Examples
//!
//! ```
//! use gembind_introspector::parse_reflection;
//!
//! let data = parse_reflection(r#"{"classes": [{"name": "Vector3"}]}"#, "inline.json").unwrap();
//! assert_eq!(data.class_count(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod descriptor;
pub mod discovery;
pub mod loader;

pub use descriptor::{ProjectManifest, load_descriptor, load_project_manifest, parse_descriptor};
pub use discovery::{
    DiscoveryFailure, DiscoveryOptions, DiscoveryReport, discover_from_engine,
    discover_from_project,
};
pub use loader::{load_reflection, parse_reflection};
