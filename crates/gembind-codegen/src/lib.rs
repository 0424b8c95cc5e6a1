//! C# binding generation for gembind.
//!
//! Assigns every reflected symbol to an owning plugin, then renders typed
//! C# wrappers grouped by plugin and category, plus the native binding
//! declarations, project files and a solution.
//!
//! # Examples
//!
//! ```
//! use gembind_codegen::Orchestrator;
//! use gembind_core::{GeneratorConfig, PluginGraph, ReflectedClass, ReflectionData};
//!
//! let config = GeneratorConfig::builder().write_to_disk(false).build();
//! let orchestrator = Orchestrator::new(config)?;
//!
//! let mut data = ReflectionData::new();
//! data.insert_class(ReflectedClass::new("Vector3").with_category("Math"));
//!
//! let report = orchestrator.run(&mut data, &PluginGraph::new());
//! assert!(report.success);
//! assert!(report.files.contains(&"Core/Math.cs".to_string()));
//! # Ok::<(), gembind_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod common;
pub mod emitter;
pub mod orchestrator;
pub mod ownership;
pub mod template_engine;

pub use common::{GeneratedCode, GeneratedFile};
pub use emitter::BindingEmitter;
pub use orchestrator::{Generation, GenerationReport, Orchestrator};
pub use ownership::{OwnershipResolver, OwnershipStrategy, Symbol};
pub use template_engine::TemplateEngine;
