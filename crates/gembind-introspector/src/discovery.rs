//! Plugin discovery.
//!
//! Locates the descriptors of the plugins a project (or an engine) provides
//! and registers them in a [`PluginGraph`]. A requested plugin whose
//! descriptor cannot be found is still registered, active but unloaded,
//! and reported in [`DiscoveryReport::failed`]; discovery only fails hard
//! when the project itself is unusable.
//!
//! # Examples
//!
//! ```no_run
//! use gembind_introspector::{DiscoveryOptions, discover_from_project};
//!
//! let report = discover_from_project("/projects/Racer", &DiscoveryOptions::default())?;
//! for failure in &report.failed {
//!     eprintln!("{}: {}", failure.plugin, failure.reason);
//! }
//! println!("{:?}", report.graph.topological_order().order);
//! # Ok::<(), gembind_core::Error>(())
//! ```

use crate::descriptor::{
    DESCRIPTOR_FILE, descriptor_path, load_descriptor, load_project_manifest, peek_descriptor_name,
};
use gembind_core::{Error, PluginGraph, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Marker file of an engine root.
pub const ENGINE_FILE: &str = "engine.json";

/// Options controlling where plugin descriptors are searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Engine root; located from the project when `None`.
    pub engine_path: Option<PathBuf>,
    /// Additional directories searched after the built-in ones.
    pub extra_search_paths: Vec<PathBuf>,
    /// Read external directories from the user manifest.
    pub use_user_manifest: bool,
    /// User manifest location; `~/.o3de/o3de_manifest.json` when `None`.
    pub user_manifest_path: Option<PathBuf>,
    /// How many ancestors of the project are checked for an engine root.
    pub engine_search_depth: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            engine_path: None,
            extra_search_paths: Vec::new(),
            use_user_manifest: true,
            user_manifest_path: None,
            engine_search_depth: 5,
        }
    }
}

impl DiscoveryOptions {
    /// Options that only search the project and explicitly given paths.
    ///
    /// # Examples
    ///
    /// ```
    /// use gembind_introspector::DiscoveryOptions;
    ///
    /// let options = DiscoveryOptions::isolated();
    /// assert!(!options.use_user_manifest);
    /// assert_eq!(options.engine_search_depth, 0);
    /// ```
    #[must_use]
    pub fn isolated() -> Self {
        Self {
            use_user_manifest: false,
            engine_search_depth: 0,
            ..Self::default()
        }
    }

    /// Sets the engine root.
    #[must_use]
    pub fn with_engine_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.engine_path = Some(path.into());
        self
    }

    /// Adds a search directory.
    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_search_paths.push(path.into());
        self
    }
}

/// A requested plugin that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryFailure {
    /// Plugin name
    pub plugin: String,
    /// Why it could not be loaded
    pub reason: String,
}

/// Outcome of a discovery pass.
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    /// Registered plugins, in discovery order
    pub graph: PluginGraph,
    /// Name of the discovering project or engine
    pub name: String,
    /// Requested plugin names, in request order
    pub active: Vec<String>,
    /// Plugins registered without a descriptor, or skipped as unparsable
    pub failed: Vec<DiscoveryFailure>,
    /// Directories that were searched
    pub search_paths: Vec<PathBuf>,
}

impl DiscoveryReport {
    /// Returns `true` if every requested plugin was loaded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserManifest {
    external_subdirectories: Vec<String>,
}

/// Discovers the plugins requested by a project.
///
/// Search order: `<project>/Gems`, `<engine>/Gems`, external directories
/// from the user manifest, then `options.extra_search_paths`. In each
/// directory a plugin is found either at `<dir>/<name>/gem.json` or by a
/// recursive scan for a descriptor declaring that name.
///
/// # Errors
///
/// Returns an error if the project directory does not exist or its
/// `project.json` is missing or malformed.
pub fn discover_from_project(
    project_dir: impl AsRef<Path>,
    options: &DiscoveryOptions,
) -> Result<DiscoveryReport> {
    let project_dir = project_dir.as_ref();
    if !project_dir.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "project path does not exist: {}",
            project_dir.display()
        )));
    }

    let manifest = load_project_manifest(project_dir)?;

    let mut search_paths = vec![project_dir.join("Gems")];
    let engine = options
        .engine_path
        .clone()
        .or_else(|| find_engine_root(project_dir, options.engine_search_depth));
    if let Some(engine) = &engine {
        debug!("Using engine at {}", engine.display());
        search_paths.push(engine.join("Gems"));
    }
    if options.use_user_manifest {
        search_paths.extend(external_directories(options.user_manifest_path.as_deref()));
    }
    search_paths.extend(options.extra_search_paths.iter().cloned());

    let mut graph = PluginGraph::new();
    let mut failed = Vec::new();

    for name in &manifest.plugins {
        match find_descriptor(name, &search_paths) {
            Some(path) => match load_descriptor(&path) {
                Ok(descriptor) => {
                    graph.register(descriptor.active(true));
                }
                Err(e) => {
                    warn!("Failed to load descriptor for '{name}': {e}");
                    failed.push(DiscoveryFailure {
                        plugin: name.clone(),
                        reason: e.to_string(),
                    });
                    graph.register(gembind_core::PluginDescriptor::unloaded(name));
                }
            },
            None => {
                warn!("Descriptor for active plugin '{name}' not found");
                failed.push(DiscoveryFailure {
                    plugin: name.clone(),
                    reason: format!("{DESCRIPTOR_FILE} not found"),
                });
                graph.register(gembind_core::PluginDescriptor::unloaded(name));
            }
        }
    }

    info!(
        "Discovered {} plugins ({} active, {} missing) for project '{}'",
        graph.len(),
        manifest.plugins.len(),
        failed.len(),
        manifest.name
    );

    Ok(DiscoveryReport {
        graph,
        name: manifest.name,
        active: manifest.plugins,
        failed,
        search_paths,
    })
}

/// Discovers every plugin shipped with an engine.
///
/// Each `gem.json` under `<engine>/Gems` is loaded and marked active.
/// Unparsable descriptors are skipped and reported in
/// [`DiscoveryReport::failed`].
///
/// # Errors
///
/// Returns an error if the engine directory or its `Gems` directory does
/// not exist.
pub fn discover_from_engine(engine_dir: impl AsRef<Path>) -> Result<DiscoveryReport> {
    let engine_dir = engine_dir.as_ref();
    if !engine_dir.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "engine path does not exist: {}",
            engine_dir.display()
        )));
    }

    let gems_dir = engine_dir.join("Gems");
    if !gems_dir.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "Gems directory not found at: {}",
            gems_dir.display()
        )));
    }

    let mut graph = PluginGraph::new();
    let mut active = Vec::new();
    let mut failed = Vec::new();

    for path in descriptor_files(&gems_dir) {
        match load_descriptor(&path) {
            Ok(descriptor) => {
                if !active.contains(&descriptor.name) {
                    active.push(descriptor.name.clone());
                }
                graph.register(descriptor.active(true));
            }
            Err(e) => {
                warn!("Failed to parse {}: {e}", path.display());
                failed.push(DiscoveryFailure {
                    plugin: parent_name(&path),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!("Discovered {} plugins from engine", graph.len());

    Ok(DiscoveryReport {
        graph,
        name: parent_name(&engine_dir.join(ENGINE_FILE)),
        active,
        failed,
        search_paths: vec![gems_dir],
    })
}

/// Walks up from the project looking for `engine.json`.
fn find_engine_root(project_dir: &Path, depth: usize) -> Option<PathBuf> {
    project_dir
        .ancestors()
        .skip(1)
        .take(depth)
        .find(|dir| dir.join(ENGINE_FILE).is_file())
        .map(Path::to_path_buf)
}

fn external_directories(manifest_path: Option<&Path>) -> Vec<PathBuf> {
    let Some(path) = manifest_path
        .map(Path::to_path_buf)
        .or_else(|| dirs::home_dir().map(|home| home.join(".o3de").join("o3de_manifest.json")))
    else {
        return Vec::new();
    };

    let Ok(text) = std::fs::read_to_string(&path) else {
        return Vec::new();
    };

    match serde_json::from_str::<UserManifest>(&text) {
        Ok(manifest) => manifest
            .external_subdirectories
            .into_iter()
            .map(PathBuf::from)
            .filter(|dir| dir.is_dir())
            .collect(),
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            Vec::new()
        }
    }
}

fn find_descriptor(name: &str, search_paths: &[PathBuf]) -> Option<PathBuf> {
    for search_path in search_paths {
        let direct = descriptor_path(&search_path.join(name));
        if direct.is_file() {
            return Some(direct);
        }

        if let Some(found) = descriptor_files(search_path)
            .into_iter()
            .find(|path| peek_descriptor_name(path).as_deref() == Some(name))
        {
            return Some(found);
        }
    }
    None
}

// Sorted so that discovery order does not depend on the filesystem.
fn descriptor_files(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == DESCRIPTOR_FILE)
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn parent_name(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
