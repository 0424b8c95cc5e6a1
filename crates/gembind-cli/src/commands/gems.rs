//! Gems command implementation.
//!
//! Lists the plugins discovered for a project or engine, and answers
//! dependency queries over the resulting graph.

use super::common::discover;
use crate::formatters::format_output;
use anyhow::{Result, bail};
use clap::Args;
use gembind_core::PluginGraph;
use gembind_core::cli::{ExitCode, OutputFormat};
use gembind_introspector::DiscoveryReport;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments of `gembind gems`.
#[derive(Args, Debug, Clone, Default)]
pub struct GemsArgs {
    /// Project directory whose plugins are listed
    #[arg(short, long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Engine root
    #[arg(short, long, value_name = "DIR", env = "O3DE_ENGINE_PATH")]
    pub engine: Option<PathBuf>,

    /// Show the transitive dependencies of a plugin
    #[arg(long, value_name = "NAME")]
    pub deps: Option<String>,

    /// Show the plugins depending on a plugin, directly or not
    #[arg(long, value_name = "NAME")]
    pub dependents: Option<String>,

    /// Show the generation order
    #[arg(long)]
    pub order: bool,
}

/// One discovered plugin.
#[derive(Debug, Clone, Serialize)]
pub struct GemEntry {
    /// Canonical name
    pub name: String,
    /// Declared version
    pub version: String,
    /// Requested by the project
    pub active: bool,
    /// Descriptor was found and parsed
    pub loaded: bool,
    /// Direct dependencies
    pub dependencies: Vec<String>,
}

/// Result of a `gems` query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GemsSummary {
    /// Project or engine name
    pub name: String,
    /// Every plugin, in registration order
    pub gems: Vec<GemEntry>,
    /// Transitive dependencies of the `--deps` plugin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    /// Transitive dependents of the `--dependents` plugin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependents: Option<Vec<String>>,
    /// Generation order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
    /// Plugins left in a dependency cycle
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cyclic: Vec<String>,
    /// Plugins whose descriptor could not be loaded
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

/// Builds the summary for a discovery report.
///
/// # Errors
///
/// Returns an error if `--deps` or `--dependents` names an unknown plugin.
pub fn summarize(report: &DiscoveryReport, args: &GemsArgs) -> Result<GemsSummary> {
    let graph = &report.graph;
    let gems = graph
        .iter()
        .map(|descriptor| GemEntry {
            name: descriptor.name.clone(),
            version: descriptor.version.clone(),
            active: descriptor.is_active,
            loaded: descriptor.is_loaded,
            dependencies: graph.dependencies_of(&descriptor.name, false),
        })
        .collect();

    let dependencies = args
        .deps
        .as_deref()
        .map(|name| known(graph, name).map(|name| graph.dependencies_of(name, true)))
        .transpose()?;
    let dependents = args
        .dependents
        .as_deref()
        .map(|name| known(graph, name).map(|name| graph.dependents_of(name, true)))
        .transpose()?;

    let (order, cyclic) = if args.order {
        let order = graph.topological_order();
        (Some(order.order), order.cyclic)
    } else {
        (None, Vec::new())
    };

    Ok(GemsSummary {
        name: report.name.clone(),
        gems,
        dependencies,
        dependents,
        order,
        cyclic,
        failed: report.failed.iter().map(|f| f.plugin.clone()).collect(),
    })
}

fn known<'g>(graph: &'g PluginGraph, name: &str) -> Result<&'g str> {
    match graph.canonical_name(name) {
        Some(name) => Ok(name),
        None => bail!("plugin '{name}' is not installed"),
    }
}

/// Runs the gems command.
///
/// # Errors
///
/// Returns an error if neither a project nor an engine is given, discovery
/// fails, or a queried plugin is unknown.
pub fn run(args: &GemsArgs, output_format: OutputFormat) -> Result<ExitCode> {
    let Some(report) = discover(args.project.as_deref(), args.engine.as_deref())? else {
        bail!("either --project or --engine is required");
    };
    let summary = summarize(&report, args)?;
    println!("{}", format_output(&summary, output_format)?);
    Ok(ExitCode::SUCCESS)
}
