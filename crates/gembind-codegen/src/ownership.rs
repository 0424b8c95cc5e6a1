//! Ownership resolution.
//!
//! Assigns an owning plugin to every reflected symbol that lacks one. The
//! resolver evaluates an ordered list of strategies and takes the first
//! answer; the configured default plugin is the final fallback.
//!
//! Priority:
//! 1. explicit `symbol -> plugin` mappings
//! 2. category hint (`"Atom/Rendering"`, then the category table)
//! 3. name-prefix hint (`PhysX::Foo`, literal plugin-name prefix, then the prefix table)
//! 4. default plugin
//!
//! Every target a strategy can return is a known plugin name or the default
//! plugin; table entries naming anything else are dropped when the resolver
//! is built. Owners already present in the reflection data are rewritten to
//! their canonical plugin name, and unknown ones fall back to the default
//! plugin with a warning.
//!
//! # Examples
//!
//! ```
//! use gembind_codegen::OwnershipResolver;
//! use gembind_core::{MappingConfig, PluginDescriptor, PluginGraph, ReflectedClass, ReflectionData};
//!
//! let graph = PluginGraph::from_descriptors([
//!     PluginDescriptor::new("PhysX"),
//!     PluginDescriptor::new("Atom"),
//! ]);
//! let mut resolver = OwnershipResolver::new(&graph, &MappingConfig::default());
//!
//! let mut data = ReflectionData::new();
//! data.insert_class(ReflectedClass::new("PhysXRigidBody"));
//! data.insert_class(ReflectedClass::new("MeshHandle").with_category("Atom/Rendering"));
//! resolver.resolve(&mut data);
//!
//! assert_eq!(data.class("PhysXRigidBody").unwrap().source_gem_name, "PhysX");
//! assert_eq!(data.class("MeshHandle").unwrap().source_gem_name, "Atom");
//! ```

use gembind_core::{MappingConfig, PluginGraph, PrefixMapping, ReflectionData, plugin_name_key};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, warn};

/// The parts of a reflected symbol that ownership heuristics look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol<'a> {
    /// Symbol name
    pub name: &'a str,
    /// Symbol category, possibly empty
    pub category: &'a str,
}

impl<'a> Symbol<'a> {
    /// Creates a symbol view.
    #[must_use]
    pub const fn new(name: &'a str, category: &'a str) -> Self {
        Self { name, category }
    }
}

/// One step of the ownership chain.
pub trait OwnershipStrategy: Debug + Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Returns the owning plugin, or `None` to defer to the next strategy.
    fn resolve(&self, symbol: Symbol<'_>) -> Option<String>;
}

/// Plugin names known to the resolver, with exact and normalized lookup.
#[derive(Debug, Clone, Default)]
pub struct KnownPlugins {
    names: Vec<String>,
    by_key: HashMap<String, String>,
    default_plugin: String,
}

impl KnownPlugins {
    /// Snapshots the plugin names of `graph`.
    #[must_use]
    pub fn from_graph(graph: &PluginGraph, default_plugin: &str) -> Self {
        Self::from_names(graph.names(), default_plugin)
    }

    /// Builds the lookup from plain names, in order.
    #[must_use]
    pub fn from_names<I, S>(names: I, default_plugin: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut known = Self {
            default_plugin: default_plugin.to_string(),
            ..Self::default()
        };
        for name in names {
            let name = name.into();
            known.by_key.entry(plugin_name_key(&name)).or_insert_with(|| name.clone());
            known.names.push(name);
        }
        known
    }

    /// Exact, case-sensitive match.
    #[must_use]
    pub fn exact(&self, name: &str) -> Option<&str> {
        self.names.iter().find(|n| *n == name).map(String::as_str)
    }

    /// Match ignoring case, `_` and `-`.
    #[must_use]
    pub fn normalized(&self, name: &str) -> Option<&str> {
        self.by_key.get(&plugin_name_key(name)).map(String::as_str)
    }

    /// Exact match, then normalized match.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        if name.is_empty() {
            return None;
        }
        self.exact(name).or_else(|| self.normalized(name))
    }

    /// The first known plugin, in registration order, whose name `symbol`
    /// literally starts with.
    #[must_use]
    pub fn first_prefix_of(&self, symbol: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|name| !name.is_empty() && symbol.starts_with(name.as_str()))
            .map(String::as_str)
    }

    /// Canonical form of a mapping target: the default plugin, or a known plugin.
    #[must_use]
    pub fn canonicalize(&self, target: &str) -> Option<String> {
        if !target.is_empty() && target == self.default_plugin {
            return Some(target.to_string());
        }
        self.lookup(target).map(str::to_string)
    }

    /// Configured default plugin.
    #[must_use]
    pub fn default_plugin(&self) -> &str {
        &self.default_plugin
    }
}

/// Caller-registered overrides keyed by symbol name.
#[derive(Debug, Clone, Default)]
pub struct ExplicitMapping {
    mappings: BTreeMap<String, String>,
}

impl ExplicitMapping {
    /// Creates the strategy from already-canonical mappings.
    #[must_use]
    pub const fn new(mappings: BTreeMap<String, String>) -> Self {
        Self { mappings }
    }
}

impl OwnershipStrategy for ExplicitMapping {
    fn name(&self) -> &'static str {
        "explicit"
    }

    fn resolve(&self, symbol: Symbol<'_>) -> Option<String> {
        self.mappings.get(symbol.name).cloned()
    }
}

/// Owner hinted by the symbol category.
#[derive(Debug, Clone)]
pub struct CategoryHint {
    plugins: Arc<KnownPlugins>,
    table: BTreeMap<String, String>,
}

impl CategoryHint {
    /// Creates the strategy with a canonical category table.
    #[must_use]
    pub const fn new(plugins: Arc<KnownPlugins>, table: BTreeMap<String, String>) -> Self {
        Self { plugins, table }
    }
}

impl OwnershipStrategy for CategoryHint {
    fn name(&self) -> &'static str {
        "category"
    }

    fn resolve(&self, symbol: Symbol<'_>) -> Option<String> {
        let category = symbol.category;
        if category.is_empty() {
            return None;
        }

        if let Some((first, _)) = category.split_once('/')
            && let Some(plugin) = self.plugins.lookup(first)
        {
            return Some(plugin.to_string());
        }

        self.plugins
            .lookup(category)
            .map(str::to_string)
            .or_else(|| self.table.get(category).cloned())
    }
}

/// Owner hinted by the symbol name.
#[derive(Debug, Clone)]
pub struct NamePrefixHint {
    plugins: Arc<KnownPlugins>,
    table: Vec<PrefixMapping>,
}

impl NamePrefixHint {
    /// Creates the strategy with a canonical, ordered prefix table.
    #[must_use]
    pub const fn new(plugins: Arc<KnownPlugins>, table: Vec<PrefixMapping>) -> Self {
        Self { plugins, table }
    }
}

impl OwnershipStrategy for NamePrefixHint {
    fn name(&self) -> &'static str {
        "name-prefix"
    }

    fn resolve(&self, symbol: Symbol<'_>) -> Option<String> {
        let name = symbol.name;

        if let Some((namespace, _)) = name.split_once("::")
            && let Some(plugin) = self.plugins.lookup(namespace)
        {
            return Some(plugin.to_string());
        }

        if let Some(plugin) = self.plugins.first_prefix_of(name) {
            return Some(plugin.to_string());
        }

        self.table
            .iter()
            .find(|entry| !entry.prefix.is_empty() && name.starts_with(entry.prefix.as_str()))
            .map(|entry| entry.plugin.clone())
    }
}

/// Unconditional fallback owner.
#[derive(Debug, Clone)]
pub struct DefaultOwner {
    plugin: String,
}

impl DefaultOwner {
    /// Creates the fallback strategy.
    #[must_use]
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
        }
    }
}

impl OwnershipStrategy for DefaultOwner {
    fn name(&self) -> &'static str {
        "default"
    }

    fn resolve(&self, _symbol: Symbol<'_>) -> Option<String> {
        Some(self.plugin.clone())
    }
}

/// Ordered chain of ownership strategies.
#[derive(Debug)]
pub struct OwnershipResolver {
    strategies: Vec<Box<dyn OwnershipStrategy>>,
    plugins: Arc<KnownPlugins>,
    warnings: Vec<String>,
}

impl OwnershipResolver {
    /// Builds the standard chain for a plugin set.
    ///
    /// Table and mapping targets are canonicalized against the known
    /// plugins. An explicit mapping naming an unknown plugin is dropped with
    /// a warning; table entries naming plugins that are not installed are
    /// dropped silently.
    #[must_use]
    pub fn new(graph: &PluginGraph, mapping: &MappingConfig) -> Self {
        let plugins = Arc::new(KnownPlugins::from_graph(graph, &mapping.default_plugin));
        let mut warnings = Vec::new();

        let mut explicit = BTreeMap::new();
        for (symbol, target) in &mapping.symbol_mappings {
            match plugins.canonicalize(target) {
                Some(plugin) => {
                    explicit.insert(symbol.clone(), plugin);
                }
                None => {
                    let message = format!(
                        "ignoring mapping '{symbol}' -> '{target}': unknown plugin"
                    );
                    warn!("{message}");
                    warnings.push(message);
                }
            }
        }

        let mut strategies: Vec<Box<dyn OwnershipStrategy>> =
            vec![Box::new(ExplicitMapping::new(explicit))];

        if mapping.use_category {
            let table = mapping
                .category_mappings
                .iter()
                .filter_map(|(category, target)| {
                    let plugin = plugins.canonicalize(target);
                    if plugin.is_none() {
                        debug!("Category mapping '{category}' -> '{target}' skipped: not installed");
                    }
                    plugin.map(|plugin| (category.clone(), plugin))
                })
                .collect();
            strategies.push(Box::new(CategoryHint::new(Arc::clone(&plugins), table)));
        }

        if mapping.use_name_prefixes {
            let module_hints: Vec<PrefixMapping> = if mapping.use_module_hints {
                graph
                    .iter()
                    .flat_map(|plugin| {
                        plugin
                            .module_names
                            .iter()
                            .map(|module| PrefixMapping::new(module.clone(), plugin.name.clone()))
                    })
                    .collect()
            } else {
                Vec::new()
            };
            let table = mapping
                .prefix_mappings
                .iter()
                .cloned()
                .chain(module_hints)
                .filter_map(|entry| {
                    let plugin = plugins.canonicalize(&entry.plugin);
                    if plugin.is_none() {
                        debug!(
                            "Prefix mapping '{}' -> '{}' skipped: not installed",
                            entry.prefix, entry.plugin
                        );
                    }
                    plugin.map(|plugin| PrefixMapping::new(entry.prefix, plugin))
                })
                .collect();
            strategies.push(Box::new(NamePrefixHint::new(Arc::clone(&plugins), table)));
        }

        strategies.push(Box::new(DefaultOwner::new(mapping.default_plugin.clone())));

        Self {
            strategies,
            plugins,
            warnings,
        }
    }

    /// Builds a resolver from a custom chain.
    ///
    /// The default plugin of `plugins` is used when no strategy answers, and
    /// existing annotations are canonicalized against `plugins`.
    #[must_use]
    pub fn with_strategies(
        strategies: Vec<Box<dyn OwnershipStrategy>>,
        plugins: KnownPlugins,
    ) -> Self {
        Self {
            strategies,
            plugins: Arc::new(plugins),
            warnings: Vec::new(),
        }
    }

    /// Names of the strategies, in evaluation order.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Diagnostics raised while building the chain or resolving symbols.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Owner of a single symbol.
    #[must_use]
    pub fn resolve_symbol(&self, symbol: Symbol<'_>) -> String {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.resolve(symbol))
            .unwrap_or_else(|| self.plugins.default_plugin().to_string())
    }

    /// Rewrites an existing annotation to its canonical plugin name.
    ///
    /// An owner that is neither a known plugin nor the default plugin is
    /// replaced by `fallback` with a warning. Returns `true` if the
    /// annotation changed.
    fn canonicalize_owner(&mut self, symbol: &str, owner: &mut String, fallback: &str) -> bool {
        match self.plugins.canonicalize(owner.as_str()) {
            Some(canonical) if canonical == *owner => false,
            Some(canonical) => {
                debug!("Owner '{owner}' of {symbol} canonicalized to '{canonical}'");
                *owner = canonical;
                true
            }
            None => {
                let message =
                    format!("{symbol} is owned by unknown plugin '{owner}'; using '{fallback}'");
                warn!("{message}");
                self.warnings.push(message);
                fallback.clone_into(owner);
                true
            }
        }
    }

    /// Annotates every class, bus and free symbol with its owner.
    ///
    /// Symbols without an owner are resolved through the chain; class
    /// members inherit their class's owner. Existing owners are rewritten to
    /// the canonical plugin name, and an unknown owner is replaced by the
    /// default plugin (for members, by the class owner) with a warning. A
    /// second pass changes nothing. Returns the number of annotations made
    /// or rewritten.
    pub fn resolve(&mut self, data: &mut ReflectionData) -> usize {
        let default_plugin = self.plugins.default_plugin().to_string();
        let mut annotated = 0;

        for class in data.classes.values_mut() {
            if class.source_gem_name.is_empty() {
                class.source_gem_name =
                    self.resolve_symbol(Symbol::new(&class.name, &class.category));
                annotated += 1;
            } else if self.canonicalize_owner(
                &class.name,
                &mut class.source_gem_name,
                &default_plugin,
            ) {
                annotated += 1;
            }

            let owner = &class.source_gem_name;
            for member in class.methods.iter_mut().chain(class.constructors.iter_mut()) {
                if member.source_gem_name.is_empty() {
                    member.source_gem_name.clone_from(owner);
                    annotated += 1;
                } else if self.canonicalize_owner(&member.name, &mut member.source_gem_name, owner)
                {
                    annotated += 1;
                }
            }
            for property in &mut class.properties {
                if property.source_gem_name.is_empty() {
                    property.source_gem_name.clone_from(owner);
                    annotated += 1;
                } else if self.canonicalize_owner(
                    &property.name,
                    &mut property.source_gem_name,
                    owner,
                ) {
                    annotated += 1;
                }
            }
        }

        for ebus in data.ebuses.values_mut() {
            if ebus.source_gem_name.is_empty() {
                ebus.source_gem_name = self.resolve_symbol(Symbol::new(&ebus.name, &ebus.category));
                annotated += 1;
            } else if self.canonicalize_owner(&ebus.name, &mut ebus.source_gem_name, &default_plugin)
            {
                annotated += 1;
            }
        }

        for method in &mut data.global_methods {
            if method.source_gem_name.is_empty() {
                method.source_gem_name =
                    self.resolve_symbol(Symbol::new(&method.name, &method.category));
                annotated += 1;
            } else if self.canonicalize_owner(
                &method.name,
                &mut method.source_gem_name,
                &default_plugin,
            ) {
                annotated += 1;
            }
        }
        for property in &mut data.global_properties {
            if property.source_gem_name.is_empty() {
                property.source_gem_name =
                    self.resolve_symbol(Symbol::new(&property.name, &property.category));
                annotated += 1;
            } else if self.canonicalize_owner(
                &property.name,
                &mut property.source_gem_name,
                &default_plugin,
            ) {
                annotated += 1;
            }
        }

        debug!("Ownership resolution annotated {annotated} symbols");
        annotated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gembind_core::{
        PluginDescriptor, ReflectedClass, ReflectedEBus, ReflectedMethod, ReflectedProperty,
    };

    fn graph(names: &[&str]) -> PluginGraph {
        PluginGraph::from_descriptors(names.iter().map(|n| PluginDescriptor::new(*n)))
    }

    fn resolver(names: &[&str], mapping: &MappingConfig) -> OwnershipResolver {
        OwnershipResolver::new(&graph(names), mapping)
    }

    #[test]
    fn test_chain_order() {
        let r = resolver(&[], &MappingConfig::default());
        assert_eq!(
            r.strategy_names(),
            vec!["explicit", "category", "name-prefix", "default"]
        );

        let disabled = MappingConfig {
            use_category: false,
            use_name_prefixes: false,
            ..MappingConfig::default()
        };
        assert_eq!(resolver(&[], &disabled).strategy_names(), vec!["explicit", "default"]);
    }

    #[test]
    fn test_prefix_hint_matches_plugin_name() {
        let r = resolver(&["PhysX"], &MappingConfig::empty());
        assert_eq!(r.resolve_symbol(Symbol::new("PhysXRigidBody", "")), "PhysX");
    }

    #[test]
    fn test_category_hint_first_segment() {
        let r = resolver(&["Atom"], &MappingConfig::empty());
        assert_eq!(r.resolve_symbol(Symbol::new("MeshHandle", "Atom/Rendering")), "Atom");
    }

    #[test]
    fn test_category_hint_normalized() {
        let r = resolver(&["Atom_RPI"], &MappingConfig::empty());
        assert_eq!(r.resolve_symbol(Symbol::new("View", "atomrpi/Views")), "Atom_RPI");
        assert_eq!(r.resolve_symbol(Symbol::new("View", "Atom-RPI")), "Atom_RPI");
    }

    #[test]
    fn test_category_beats_name_prefix() {
        let r = resolver(&["Atom", "PhysX"], &MappingConfig::empty());
        assert_eq!(r.resolve_symbol(Symbol::new("PhysXMaterial", "Atom/Materials")), "Atom");
    }

    #[test]
    fn test_category_table() {
        let r = resolver(&["PhysX"], &MappingConfig::default());
        assert_eq!(r.resolve_symbol(Symbol::new("Collider", "Physics")), "PhysX");
    }

    #[test]
    fn test_namespace_prefix() {
        let r = resolver(&["ScriptCanvas"], &MappingConfig::empty());
        assert_eq!(r.resolve_symbol(Symbol::new("scriptcanvas::Graph", "")), "ScriptCanvas");
    }

    #[test]
    fn test_first_registered_prefix_wins() {
        let r = resolver(&["Atom", "Atom_RPI", "AtomLyIntegration"], &MappingConfig::empty());
        assert_eq!(r.resolve_symbol(Symbol::new("AtomLyIntegrationBridge", "")), "Atom");
        assert_eq!(r.resolve_symbol(Symbol::new("AtomImage", "")), "Atom");

        let r = resolver(&["AtomLyIntegration", "Atom"], &MappingConfig::empty());
        assert_eq!(
            r.resolve_symbol(Symbol::new("AtomLyIntegrationBridge", "")),
            "AtomLyIntegration"
        );
        assert_eq!(r.resolve_symbol(Symbol::new("AtomImage", "")), "Atom");
    }

    #[test]
    fn test_prefix_table_first_match() {
        let mut mapping = MappingConfig::empty();
        mapping.prefix_mappings = vec![
            PrefixMapping::new("Net", "Multiplayer"),
            PrefixMapping::new("Network", "Other"),
        ];
        let r = resolver(&["Multiplayer", "Other"], &mapping);
        assert_eq!(r.resolve_symbol(Symbol::new("NetworkEntity", "")), "Multiplayer");
    }

    #[test]
    fn test_table_targets_must_be_installed() {
        // Default table maps "Terrain" categories to the Terrain plugin.
        let r = resolver(&["PhysX"], &MappingConfig::default());
        assert_eq!(r.resolve_symbol(Symbol::new("Heightfield", "Terrain")), "O3DE.Core");
    }

    #[test]
    fn test_module_hints() {
        let plugin = PluginDescriptor::new("EMotionFX").with_module_names(["Motion"]);
        let graph = PluginGraph::from_descriptors([plugin]);

        let r = OwnershipResolver::new(&graph, &MappingConfig::empty());
        assert_eq!(r.resolve_symbol(Symbol::new("MotionSet", "")), "EMotionFX");

        let off = MappingConfig {
            use_module_hints: false,
            ..MappingConfig::empty()
        };
        let r = OwnershipResolver::new(&graph, &off);
        assert_eq!(r.resolve_symbol(Symbol::new("MotionSet", "")), "O3DE.Core");
    }

    #[test]
    fn test_explicit_mapping_overrides_prefix() {
        let mut mapping = MappingConfig::empty();
        mapping
            .symbol_mappings
            .insert("PhysXRigidBody".to_string(), "Vehicle".to_string());
        let r = resolver(&["PhysX", "Vehicle"], &mapping);
        assert_eq!(r.resolve_symbol(Symbol::new("PhysXRigidBody", "")), "Vehicle");
    }

    #[test]
    fn test_explicit_mapping_to_unknown_plugin_ignored() {
        let mut mapping = MappingConfig::empty();
        mapping
            .symbol_mappings
            .insert("PhysXRigidBody".to_string(), "Nowhere".to_string());
        let r = resolver(&["PhysX"], &mapping);

        assert_eq!(r.warnings().len(), 1);
        assert_eq!(r.resolve_symbol(Symbol::new("PhysXRigidBody", "")), "PhysX");
    }

    #[test]
    fn test_explicit_mapping_to_default_plugin() {
        let mut mapping = MappingConfig::empty();
        mapping
            .symbol_mappings
            .insert("PhysXRigidBody".to_string(), "O3DE.Core".to_string());
        let r = resolver(&["PhysX"], &mapping);
        assert_eq!(r.resolve_symbol(Symbol::new("PhysXRigidBody", "")), "O3DE.Core");
        assert!(r.warnings().is_empty());
    }

    #[test]
    fn test_default_fallback() {
        let r = resolver(&["PhysX"], &MappingConfig::empty());
        assert_eq!(r.resolve_symbol(Symbol::new("Widget", "Misc")), "O3DE.Core");
    }

    #[test]
    fn test_resolve_annotates_members_and_is_idempotent() {
        let mut class = ReflectedClass::new("PhysXRigidBody");
        class.methods.push(ReflectedMethod::new("GetMass"));
        let mut preset = ReflectedEBus::new("TickBus");
        preset.source_gem_name = "Atom".to_string();

        let mut data = ReflectionData::new();
        data.insert_class(class);
        data.insert_ebus(preset);
        data.global_methods.push(ReflectedMethod::new("PhysXStep"));

        let mut r = resolver(&["PhysX", "Atom"], &MappingConfig::empty());
        assert_eq!(r.resolve(&mut data), 3);

        let class = data.class("PhysXRigidBody").unwrap();
        assert_eq!(class.source_gem_name, "PhysX");
        assert_eq!(class.methods[0].source_gem_name, "PhysX");
        assert_eq!(data.ebus("TickBus").unwrap().source_gem_name, "Atom");
        assert_eq!(data.global_methods[0].source_gem_name, "PhysX");

        let snapshot = data.clone();
        assert_eq!(r.resolve(&mut data), 0);
        assert_eq!(data, snapshot);
    }

    #[test]
    fn test_custom_chain() {
        let r = OwnershipResolver::with_strategies(
            Vec::new(),
            KnownPlugins::from_names(["PhysX"], "Fallback"),
        );
        assert_eq!(r.resolve_symbol(Symbol::new("Anything", "")), "Fallback");
    }

    #[test]
    fn test_existing_owner_is_canonicalized() {
        let mut class = ReflectedClass::new("RigidThing");
        class.source_gem_name = "physx".to_string();
        let mut method = ReflectedMethod::new("Wake");
        method.source_gem_name = "PHYS-X".to_string();
        class.methods.push(method);

        let mut data = ReflectionData::new();
        data.insert_class(class);

        let mut r = resolver(&["PhysX"], &MappingConfig::empty());
        assert_eq!(r.resolve(&mut data), 2);
        let class = data.class("RigidThing").unwrap();
        assert_eq!(class.source_gem_name, "PhysX");
        assert_eq!(class.methods[0].source_gem_name, "PhysX");
        assert!(r.warnings().is_empty());

        assert_eq!(r.resolve(&mut data), 0);
    }

    #[test]
    fn test_unknown_existing_owner_falls_back() {
        let mut bus = ReflectedEBus::new("HoverBus");
        bus.source_gem_name = "Hovercraft".to_string();
        let mut class = ReflectedClass::new("PhysXJoint");
        class.properties.push(ReflectedProperty::new("Limit", "float"));
        class.properties[0].source_gem_name = "Nowhere".to_string();

        let mut data = ReflectionData::new();
        data.insert_ebus(bus);
        data.insert_class(class);

        let mut r = resolver(&["PhysX"], &MappingConfig::empty());
        r.resolve(&mut data);

        assert_eq!(data.ebus("HoverBus").unwrap().source_gem_name, "O3DE.Core");
        // Members fall back to their class's owner
        let class = data.class("PhysXJoint").unwrap();
        assert_eq!(class.properties[0].source_gem_name, "PhysX");
        assert_eq!(r.warnings().len(), 2);
        assert!(r.warnings().iter().any(|w| w.contains("'Hovercraft'")));
    }
}
