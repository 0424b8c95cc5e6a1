//! gembind CLI library.
//!
//! Exposes the command implementations and output formatters used by the
//! `gembind` binary so they can be tested without spawning a process.

#![allow(clippy::missing_errors_doc)]

pub mod commands;
pub mod formatters;

pub use commands::generate::GenerateArgs;
pub use commands::gems::GemsArgs;
