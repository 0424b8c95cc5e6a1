//! Core types, graph and errors for gembind.
//!
//! This crate provides the foundational types shared by every other crate
//! in the workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - The reflection model (`ReflectionData` and the reflected symbols it owns)
//! - Plugin descriptors and the plugin dependency graph
//! - Error hierarchy with contextual information
//! - Generator configuration and generation statistics
//! - Content checksums used for incremental writes

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod checksum;
pub mod cli;
mod config;
mod error;
pub mod graph;
mod plugin;
pub mod reflection;
pub mod stats;

pub use config::{
    DEFAULT_PLUGIN_NAME, GeneratorConfig, GeneratorConfigBuilder, MappingConfig, PrefixMapping,
};
pub use error::{Error, Result};
pub use graph::{PluginGraph, TopologicalOrder};
pub use plugin::{PluginDescriptor, plugin_name_key};
pub use reflection::{
    ReflectedClass, ReflectedEBus, ReflectedEBusEvent, ReflectedMethod, ReflectedParameter,
    ReflectedProperty, ReflectionData,
};
pub use stats::{GenerationStats, PluginStats};
