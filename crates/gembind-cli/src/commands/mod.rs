//! Command implementations for the gembind CLI.
//!
//! Each command loads its inputs, runs the operation, and prints a summary
//! in the requested output format.

pub mod common;
pub mod gems;
pub mod generate;
