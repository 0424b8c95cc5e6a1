//! Plugin discovery shared by the commands.

use anyhow::{Context, Result};
use gembind_core::PluginGraph;
use gembind_files::expand_tilde;
use gembind_introspector::{
    DiscoveryOptions, DiscoveryReport, discover_from_engine, discover_from_project,
};
use std::path::Path;
use tracing::{info, warn};

/// Discovers plugins from a project, or from an engine when no project is
/// given.
///
/// With a project, `engine` only overrides engine detection. Returns
/// `None` when neither location is given.
///
/// # Errors
///
/// Returns an error if the project manifest or engine directory cannot be
/// read.
pub fn discover(
    project: Option<&Path>,
    engine: Option<&Path>,
) -> Result<Option<DiscoveryReport>> {
    let report = match (project, engine) {
        (Some(project), engine) => {
            let project = expand_tilde(project);
            let mut options = DiscoveryOptions::default();
            if let Some(engine) = engine {
                options = options.with_engine_path(expand_tilde(engine));
            }
            discover_from_project(&project, &options).with_context(|| {
                format!("failed to discover plugins of project {}", project.display())
            })?
        }
        (None, Some(engine)) => {
            let engine = expand_tilde(engine);
            discover_from_engine(&engine).with_context(|| {
                format!("failed to discover plugins under engine {}", engine.display())
            })?
        }
        (None, None) => return Ok(None),
    };

    info!(
        "Discovered {} plugins for '{}'",
        report.graph.len(),
        report.name
    );
    for failure in &report.failed {
        warn!("Plugin '{}' not loaded: {}", failure.plugin, failure.reason);
    }
    Ok(Some(report))
}

/// The discovered graph, or an empty one.
#[must_use]
pub fn graph_of(report: Option<&DiscoveryReport>) -> PluginGraph {
    report.map(|r| r.graph.clone()).unwrap_or_default()
}
