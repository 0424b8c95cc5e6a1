//! Configuration types for gembind.
//!
//! `GeneratorConfig` controls what the generator emits and where;
//! `MappingConfig` controls how reflected symbols are assigned to plugins.
//! Both deserialize from TOML with every field defaulted, so a config file
//! only needs to list what it changes.
//!
//! # Examples
//!
//! ```
//! use gembind_core::GeneratorConfig;
//!
//! // Use default configuration
//! let config = GeneratorConfig::default();
//! assert_eq!(config.root_namespace, "O3DE.Generated");
//! assert!(config.validate().is_ok());
//!
//! // Override selected fields
//! let custom = GeneratorConfig {
//!     root_namespace: "MyGame.Bindings".to_string(),
//!     per_plugin_projects: true,
//!     ..Default::default()
//! };
//! assert!(custom.per_plugin_projects);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the always-present engine core module.
pub const DEFAULT_PLUGIN_NAME: &str = "O3DE.Core";

const DEFAULT_CORE_CATEGORIES: &[&str] = &[
    "Core",
    "Math",
    "Entity",
    "Components",
    "Transform",
    "Debug",
    "Time",
];

const DEFAULT_CORE_PREFIXES: &[&str] = &[
    "AZ",
    "Az",
    "Entity",
    "Component",
    "Transform",
    "Vector",
    "Quaternion",
    "Matrix",
];

// Ordered: first match wins.
const DEFAULT_PREFIX_MAPPINGS: &[(&str, &str)] = &[
    ("AZ", "AzCore"),
    ("Az", "AzCore"),
    ("Atom", "Atom"),
    ("AtomRPI", "Atom_RPI"),
    ("AtomRHI", "Atom_RHI"),
    ("AtomUtils", "Atom_Utils"),
    ("PhysX", "PhysX"),
    ("Script", "ScriptCanvas"),
    ("ScriptCanvas", "ScriptCanvas"),
    ("Multiplayer", "Multiplayer"),
    ("Network", "Multiplayer"),
    ("UI", "LyShine"),
    ("Ly", "LyShine"),
    ("AWS", "AWSCore"),
    ("Http", "HttpRequestor"),
    ("Input", "StartingPointInput"),
    ("Audio", "AudioSystem"),
    ("Terrain", "Terrain"),
    ("Vegetation", "Vegetation"),
    ("Landscape", "LandscapeCanvas"),
    ("EMotionFX", "EMotionFX"),
    ("Animation", "EMotionFX"),
    ("Debug", "ImGui"),
    ("ImGui", "ImGui"),
    ("Camera", "StartingPointCamera"),
    ("Transform", "AzCore"),
    ("Entity", "AzCore"),
    ("Component", "AzCore"),
];

const DEFAULT_CATEGORY_MAPPINGS: &[(&str, &str)] = &[
    ("Core", "AzCore"),
    ("Math", "AzCore"),
    ("Entity", "AzCore"),
    ("Components", "AzCore"),
    ("Rendering", "Atom"),
    ("Render", "Atom"),
    ("Graphics", "Atom"),
    ("Material", "Atom"),
    ("Mesh", "Atom"),
    ("Physics", "PhysX"),
    ("Collision", "PhysX"),
    ("Rigid Body", "PhysX"),
    ("Script", "ScriptCanvas"),
    ("Scripting", "ScriptCanvas"),
    ("Networking", "Multiplayer"),
    ("Multiplayer", "Multiplayer"),
    ("UI", "LyShine"),
    ("Audio", "AudioSystem"),
    ("Animation", "EMotionFX"),
    ("Terrain", "Terrain"),
    ("Vegetation", "Vegetation"),
    ("Camera", "StartingPointCamera"),
    ("Input", "StartingPointInput"),
    ("Debugging", "ImGui"),
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// One entry of the ordered name-prefix table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixMapping {
    /// Literal symbol-name prefix
    pub prefix: String,
    /// Plugin that owns symbols starting with `prefix`
    pub plugin: String,
}

impl PrefixMapping {
    /// Creates a prefix mapping.
    #[must_use]
    pub fn new(prefix: impl Into<String>, plugin: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            plugin: plugin.into(),
        }
    }
}

/// Ownership heuristics configuration.
///
/// The defaults reproduce the well-known engine tables. Explicit symbol
/// mappings listed here are registered before any heuristic runs.
///
/// # Examples
///
/// ```
/// use gembind_core::MappingConfig;
///
/// let mapping = MappingConfig::default();
/// assert_eq!(mapping.default_plugin, "O3DE.Core");
/// assert_eq!(mapping.category_mappings.get("Physics").map(String::as_str), Some("PhysX"));
/// assert_eq!(mapping.prefix_mappings[0].prefix, "AZ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Use the symbol category as an ownership hint.
    pub use_category: bool,
    /// Use the symbol name prefix as an ownership hint.
    pub use_name_prefixes: bool,
    /// Register each plugin's module names as extra prefixes.
    pub use_module_hints: bool,
    /// Ordered prefix table; first match wins.
    pub prefix_mappings: Vec<PrefixMapping>,
    /// Category table; exact category match.
    pub category_mappings: BTreeMap<String, String>,
    /// Explicit `symbol -> plugin` overrides.
    pub symbol_mappings: BTreeMap<String, String>,
    /// Fallback owner for unresolved symbols.
    pub default_plugin: String,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            use_category: true,
            use_name_prefixes: true,
            use_module_hints: true,
            prefix_mappings: DEFAULT_PREFIX_MAPPINGS
                .iter()
                .map(|(prefix, plugin)| PrefixMapping::new(*prefix, *plugin))
                .collect(),
            category_mappings: DEFAULT_CATEGORY_MAPPINGS
                .iter()
                .map(|(category, plugin)| ((*category).to_string(), (*plugin).to_string()))
                .collect(),
            symbol_mappings: BTreeMap::new(),
            default_plugin: DEFAULT_PLUGIN_NAME.to_string(),
        }
    }
}

impl MappingConfig {
    /// Creates a configuration with no tables, only the default plugin.
    ///
    /// Useful when every owner should come from plugin names alone.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            prefix_mappings: Vec::new(),
            category_mappings: BTreeMap::new(),
            ..Self::default()
        }
    }
}

/// Generator configuration.
///
/// Every field has a default, and the whole structure can be loaded from a
/// TOML file:
///
/// ```toml
/// root_namespace = "MyGame.Bindings"
/// per_plugin_projects = true
/// exclude_plugins = ["ImGui"]
///
/// [mapping]
/// default_plugin = "O3DE.Core"
///
/// [mapping.symbol_mappings]
/// RigidBodyRequests = "PhysX"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct GeneratorConfig {
    /// Output root directory.
    ///
    /// Default: `Generated/CSharp`
    pub output_dir: PathBuf,

    /// Root namespace for plugin bindings.
    ///
    /// Default: `O3DE.Generated`
    pub root_namespace: String,

    /// Write files to disk. `false` is a dry run.
    ///
    /// Default: true
    pub write_to_disk: bool,

    /// Overwrite existing files even when their content is unchanged.
    ///
    /// When disabled, files whose checksum matches are left untouched.
    /// Default: true
    pub overwrite: bool,

    /// Emit the core bucket.
    ///
    /// Default: true
    pub generate_core: bool,

    /// Namespace of the core bucket.
    ///
    /// Default: `O3DE.Core`
    pub core_namespace: String,

    /// Subdirectory of the output root holding core files.
    ///
    /// Default: `Core`
    pub core_output_dir: String,

    /// Categories always classified as core.
    pub core_categories: Vec<String>,

    /// Name prefixes always classified as core.
    pub core_prefixes: Vec<String>,

    /// Emit per-plugin buckets.
    ///
    /// Default: true
    pub generate_plugins: bool,

    /// One output directory per plugin.
    ///
    /// Default: true
    pub separate_plugin_dirs: bool,

    /// Emit a project file and `AssemblyInfo.cs` per plugin.
    ///
    /// Default: false
    pub per_plugin_projects: bool,

    /// Plugins to generate; empty means every active plugin.
    pub include_plugins: Vec<String>,

    /// Plugins never generated.
    pub exclude_plugins: Vec<String>,

    /// Expand the selection with transitive dependencies.
    ///
    /// Default: true
    pub include_dependencies: bool,

    /// Emit XML documentation comments.
    ///
    /// Default: true
    pub generate_docs: bool,

    /// Emit static wrappers for event buses.
    ///
    /// Default: true
    pub generate_ebus_wrappers: bool,

    /// Mark deprecated symbols `[Obsolete]`.
    ///
    /// Default: true
    pub mark_obsolete: bool,

    /// Declare classes `partial`.
    ///
    /// Default: true
    pub partial_classes: bool,

    /// Replaces the generated-file header comment when set.
    pub file_header: Option<String>,

    /// Emit a solution file.
    ///
    /// Default: true
    pub generate_solution: bool,

    /// Solution file name, without extension.
    ///
    /// Default: `O3DE.Generated`
    pub solution_name: String,

    /// Emit a core project even without per-plugin projects.
    ///
    /// Default: true
    pub combined_assembly: bool,

    /// Target framework moniker for project files.
    ///
    /// Default: `net8.0`
    pub target_framework: String,

    /// Ownership heuristics.
    pub mapping: MappingConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("Generated/CSharp"),
            root_namespace: "O3DE.Generated".to_string(),
            write_to_disk: true,
            overwrite: true,
            generate_core: true,
            core_namespace: "O3DE.Core".to_string(),
            core_output_dir: "Core".to_string(),
            core_categories: owned(DEFAULT_CORE_CATEGORIES),
            core_prefixes: owned(DEFAULT_CORE_PREFIXES),
            generate_plugins: true,
            separate_plugin_dirs: true,
            per_plugin_projects: false,
            include_plugins: Vec::new(),
            exclude_plugins: Vec::new(),
            include_dependencies: true,
            generate_docs: true,
            generate_ebus_wrappers: true,
            mark_obsolete: true,
            partial_classes: true,
            file_header: None,
            generate_solution: true,
            solution_name: "O3DE.Generated".to_string(),
            combined_assembly: true,
            target_framework: "net8.0".to_string(),
            mapping: MappingConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use gembind_core::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::builder()
    ///     .root_namespace("MyGame")
    ///     .output_dir("out")
    ///     .overwrite(false)
    ///     .build();
    ///
    /// assert_eq!(config.root_namespace, "MyGame");
    /// assert!(!config.overwrite);
    /// ```
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new()
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the text is not valid TOML or a
    /// field has the wrong type.
    ///
    /// # Examples
    ///
    /// ```
    /// use gembind_core::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::from_toml_str(r#"
    ///     root_namespace = "MyGame"
    ///     exclude_plugins = ["ImGui"]
    /// "#).unwrap();
    ///
    /// assert_eq!(config.root_namespace, "MyGame");
    /// assert_eq!(config.exclude_plugins, vec!["ImGui"]);
    /// assert!(config.generate_core);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::ConfigError {
            message: format!("failed to parse configuration: {e}"),
        })
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IoError`] if the file cannot be read, or
    /// [`Error::ConfigError`] if it cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Serializes the configuration to TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ConfigError {
            message: format!("failed to serialize configuration: {e}"),
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if:
    /// - The root or core namespace is empty
    /// - The default plugin name is empty
    /// - The solution name is empty while solution generation is enabled
    /// - A plugin is both included and excluded
    ///
    /// # Examples
    ///
    /// ```
    /// use gembind_core::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// let mut invalid = GeneratorConfig::default();
    /// invalid.root_namespace.clear();
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.root_namespace.trim().is_empty() {
            return Err(config_error("root namespace cannot be empty"));
        }

        if self.core_namespace.trim().is_empty() {
            return Err(config_error("core namespace cannot be empty"));
        }

        if self.mapping.default_plugin.trim().is_empty() {
            return Err(config_error("default plugin name cannot be empty"));
        }

        if self.generate_solution && self.solution_name.trim().is_empty() {
            return Err(config_error("solution name cannot be empty"));
        }

        if let Some(name) = self
            .include_plugins
            .iter()
            .find(|name| self.exclude_plugins.contains(name))
        {
            return Err(config_error(&format!(
                "plugin '{name}' is both included and excluded"
            )));
        }

        Ok(())
    }

    /// Returns `true` if a single plugin was requested.
    #[must_use]
    pub fn is_single_plugin(&self) -> bool {
        self.include_plugins.len() == 1
    }

    /// Returns `true` if `category` is classified as core.
    #[must_use]
    pub fn is_core_category(&self, category: &str) -> bool {
        self.core_categories.iter().any(|c| c == category)
    }

    /// Returns `true` if `name` starts with a core prefix.
    #[must_use]
    pub fn has_core_prefix(&self, name: &str) -> bool {
        self.core_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && name.starts_with(prefix.as_str()))
    }
}

fn config_error(message: &str) -> Error {
    Error::ConfigError {
        message: message.to_string(),
    }
}

/// Builder for `GeneratorConfig`.
///
/// # Examples
///
/// ```
/// use gembind_core::{GeneratorConfig, MappingConfig};
///
/// let config = GeneratorConfig::builder()
///     .include_plugins(vec!["PhysX".to_string()])
///     .per_plugin_projects(true)
///     .mapping(MappingConfig::empty())
///     .build();
///
/// assert!(config.is_single_plugin());
/// assert!(config.mapping.prefix_mappings.is_empty());
/// ```
#[derive(Debug)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
        }
    }

    /// Sets the output directory.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = path.into();
        self
    }

    /// Sets the root namespace.
    #[must_use]
    pub fn root_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.root_namespace = namespace.into();
        self
    }

    /// Sets the core namespace.
    #[must_use]
    pub fn core_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.core_namespace = namespace.into();
        self
    }

    /// Enables or disables writing to disk.
    #[must_use]
    pub const fn write_to_disk(mut self, enable: bool) -> Self {
        self.config.write_to_disk = enable;
        self
    }

    /// Enables or disables overwriting unchanged files.
    #[must_use]
    pub const fn overwrite(mut self, enable: bool) -> Self {
        self.config.overwrite = enable;
        self
    }

    /// Enables or disables the core bucket.
    #[must_use]
    pub const fn generate_core(mut self, enable: bool) -> Self {
        self.config.generate_core = enable;
        self
    }

    /// Enables or disables plugin buckets.
    #[must_use]
    pub const fn generate_plugins(mut self, enable: bool) -> Self {
        self.config.generate_plugins = enable;
        self
    }

    /// Enables or disables per-plugin directories.
    #[must_use]
    pub const fn separate_plugin_dirs(mut self, enable: bool) -> Self {
        self.config.separate_plugin_dirs = enable;
        self
    }

    /// Enables or disables per-plugin projects.
    #[must_use]
    pub const fn per_plugin_projects(mut self, enable: bool) -> Self {
        self.config.per_plugin_projects = enable;
        self
    }

    /// Sets the plugin include list.
    #[must_use]
    pub fn include_plugins(mut self, plugins: Vec<String>) -> Self {
        self.config.include_plugins = plugins;
        self
    }

    /// Sets the plugin exclude list.
    #[must_use]
    pub fn exclude_plugins(mut self, plugins: Vec<String>) -> Self {
        self.config.exclude_plugins = plugins;
        self
    }

    /// Enables or disables dependency expansion.
    #[must_use]
    pub const fn include_dependencies(mut self, enable: bool) -> Self {
        self.config.include_dependencies = enable;
        self
    }

    /// Enables or disables documentation comments.
    #[must_use]
    pub const fn generate_docs(mut self, enable: bool) -> Self {
        self.config.generate_docs = enable;
        self
    }

    /// Enables or disables the solution file.
    #[must_use]
    pub const fn generate_solution(mut self, enable: bool) -> Self {
        self.config.generate_solution = enable;
        self
    }

    /// Sets the solution name.
    #[must_use]
    pub fn solution_name(mut self, name: impl Into<String>) -> Self {
        self.config.solution_name = name.into();
        self
    }

    /// Sets the target framework.
    #[must_use]
    pub fn target_framework(mut self, framework: impl Into<String>) -> Self {
        self.config.target_framework = framework.into();
        self
    }

    /// Sets a custom file header.
    #[must_use]
    pub fn file_header(mut self, header: impl Into<String>) -> Self {
        self.config.file_header = Some(header.into());
        self
    }

    /// Sets the ownership heuristics.
    #[must_use]
    pub fn mapping(mut self, mapping: MappingConfig) -> Self {
        self.config.mapping = mapping;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> GeneratorConfig {
        self.config
    }
}

impl Default for GeneratorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();

        assert_eq!(config.output_dir, PathBuf::from("Generated/CSharp"));
        assert_eq!(config.core_namespace, "O3DE.Core");
        assert!(config.generate_core);
        assert!(config.generate_plugins);
        assert!(!config.per_plugin_projects);
        assert!(config.overwrite);
        assert_eq!(config.target_framework, "net8.0");
        assert_eq!(config.core_categories.len(), 7);
        assert_eq!(config.mapping.default_plugin, DEFAULT_PLUGIN_NAME);
    }

    #[test]
    fn test_config_validation() {
        assert!(GeneratorConfig::default().validate().is_ok());

        let invalid = GeneratorConfig {
            solution_name: String::new(),
            ..Default::default()
        };
        assert!(invalid.validate().unwrap_err().is_config_error());

        let no_solution = GeneratorConfig {
            solution_name: String::new(),
            generate_solution: false,
            ..Default::default()
        };
        assert!(no_solution.validate().is_ok());

        let mut no_default = GeneratorConfig::default();
        no_default.mapping.default_plugin = " ".to_string();
        assert!(no_default.validate().is_err());
    }

    #[test]
    fn test_overlapping_include_exclude() {
        let config = GeneratorConfig::builder()
            .include_plugins(vec!["PhysX".to_string()])
            .exclude_plugins(vec!["PhysX".to_string()])
            .build();
        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("PhysX"));
    }

    #[test]
    fn test_toml_partial_document() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            per_plugin_projects = true

            [mapping]
            use_category = false

            [mapping.symbol_mappings]
            RigidBody = "PhysX"
            "#,
        )
        .unwrap();

        assert!(config.per_plugin_projects);
        assert!(!config.mapping.use_category);
        assert!(config.mapping.use_name_prefixes);
        assert_eq!(
            config.mapping.symbol_mappings.get("RigidBody").map(String::as_str),
            Some("PhysX")
        );
        // Untouched tables keep their defaults
        assert!(!config.mapping.prefix_mappings.is_empty());
    }

    #[test]
    fn test_toml_prefix_table() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            [mapping]
            prefix_mappings = [
                { prefix = "Veh", plugin = "Vehicle" },
                { prefix = "V", plugin = "Other" },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(config.mapping.prefix_mappings.len(), 2);
        assert_eq!(config.mapping.prefix_mappings[0], PrefixMapping::new("Veh", "Vehicle"));
    }

    #[test]
    fn test_toml_invalid() {
        let err = GeneratorConfig::from_toml_str("overwrite = \"yes\"").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = GeneratorConfig::builder()
            .root_namespace("Game")
            .file_header("// custom")
            .build();
        let text = config.to_toml_string().unwrap();
        let parsed = GeneratorConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gembind.toml");
        std::fs::write(&path, "solution_name = \"Game\"\n").unwrap();

        let config = GeneratorConfig::from_file(&path).unwrap();
        assert_eq!(config.solution_name, "Game");

        let missing = GeneratorConfig::from_file(dir.path().join("missing.toml"));
        assert!(missing.unwrap_err().is_io_error());
    }

    #[test]
    fn test_core_classification_helpers() {
        let config = GeneratorConfig::default();
        assert!(config.is_core_category("Math"));
        assert!(!config.is_core_category("Rendering"));
        assert!(config.has_core_prefix("AZStd"));
        assert!(config.has_core_prefix("Vector3"));
        assert!(!config.has_core_prefix("PhysXRigidBody"));
    }

    #[test]
    fn test_empty_mapping() {
        let mapping = MappingConfig::empty();
        assert!(mapping.prefix_mappings.is_empty());
        assert!(mapping.category_mappings.is_empty());
        assert_eq!(mapping.default_plugin, DEFAULT_PLUGIN_NAME);
    }
}
