//! Plugin descriptor.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata for a single plugin ("gem").
///
/// Descriptors are produced by discovery and registered in a
/// [`PluginGraph`](crate::PluginGraph). Dependents are not stored here; the
/// graph derives them from the dependency edges on demand.
///
/// A plugin is *active* when the consuming project requested it and
/// *loaded* when its descriptor file was found and parsed. An active but
/// unloaded plugin still takes part in generation with no dependencies.
///
/// # Examples
///
/// ```
/// use gembind_core::PluginDescriptor;
///
/// let vehicle = PluginDescriptor::new("Vehicle")
///     .with_dependencies(["Physics"])
///     .loaded(true)
///     .active(true);
///
/// assert_eq!(vehicle.display_name, "Vehicle");
/// assert_eq!(vehicle.version, "1.0.0");
/// assert_eq!(vehicle.dependencies, vec!["Physics"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Canonical, case-sensitive name
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// Version string
    pub version: String,
    /// Short description
    pub summary: String,
    /// Directory holding the descriptor file, if known
    pub path: Option<PathBuf>,
    /// Declared dependency names, in declaration order
    pub dependencies: Vec<String>,
    /// Native module names declared by the plugin
    pub module_names: Vec<String>,
    /// Descriptor tags
    pub tags: Vec<String>,
    /// Requested by the consuming project
    pub is_active: bool,
    /// Descriptor file was found and parsed
    pub is_loaded: bool,
}

impl PluginDescriptor {
    /// Creates an inactive, unloaded descriptor with default metadata.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            version: "1.0.0".to_string(),
            summary: String::new(),
            path: None,
            dependencies: Vec::new(),
            module_names: Vec::new(),
            tags: Vec::new(),
            is_active: false,
            is_loaded: false,
        }
    }

    /// Creates an active descriptor whose file could not be found.
    ///
    /// # Examples
    ///
    /// ```
    /// use gembind_core::PluginDescriptor;
    ///
    /// let missing = PluginDescriptor::unloaded("Terrain");
    /// assert!(missing.is_active);
    /// assert!(!missing.is_loaded);
    /// assert!(missing.dependencies.is_empty());
    /// ```
    #[must_use]
    pub fn unloaded(name: impl Into<String>) -> Self {
        Self::new(name).active(true)
    }

    /// Sets the declared dependencies.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the module names, used as extra ownership prefixes.
    #[must_use]
    pub fn with_module_names<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module_names = modules.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the descriptor directory.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Marks the plugin as requested by the project.
    #[must_use]
    pub const fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    /// Marks the descriptor as found and parsed.
    #[must_use]
    pub const fn loaded(mut self, loaded: bool) -> Self {
        self.is_loaded = loaded;
        self
    }
}

/// Normalizes a plugin name for fuzzy lookup.
///
/// Lowercases and drops `_` and `-`, so `Atom_RPI`, `atom-rpi` and
/// `AtomRPI` all compare equal.
///
/// # Examples
///
/// ```
/// use gembind_core::plugin_name_key;
///
/// assert_eq!(plugin_name_key("Atom_RPI"), "atomrpi");
/// assert_eq!(plugin_name_key("atom-rpi"), plugin_name_key("AtomRPI"));
/// ```
#[must_use]
pub fn plugin_name_key(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}
