//! Shared code generation types and C# helpers.

pub mod csharp;
pub mod types;

pub use types::{GeneratedCode, GeneratedFile};
