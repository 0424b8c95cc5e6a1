//! Plugin dependency graph.
//!
//! The graph is an arena of [`PluginDescriptor`]s indexed by name. Only the
//! declared dependency edges are stored; inverse edges (dependents) are
//! recomputed from them for every query, so registering or replacing a
//! descriptor never leaves derived state stale.
//!
//! Dependency names that match no registered plugin are dangling: they are
//! reported as leaves by traversal queries and ignored by the topological
//! sort.
//!
//! # Examples
//!
//! ```
//! use gembind_core::{PluginDescriptor, PluginGraph};
//!
//! let mut graph = PluginGraph::new();
//! graph.register(PluginDescriptor::new("Vehicle").with_dependencies(["Physics"]));
//! graph.register(PluginDescriptor::new("Physics"));
//!
//! let order = graph.topological_order();
//! assert_eq!(order.order, vec!["Physics", "Vehicle"]);
//! assert!(!order.has_cycles());
//! ```

use crate::plugin::{PluginDescriptor, plugin_name_key};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

/// Result of [`PluginGraph::topological_order`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologicalOrder {
    /// Every registered plugin, dependencies first.
    ///
    /// Plugins that could not be ordered because of a cycle are appended at
    /// the end in registration order.
    pub order: Vec<String>,
    /// Plugins appended after the sort stalled, in registration order.
    pub cyclic: Vec<String>,
}

impl TopologicalOrder {
    /// Returns `true` if the sort hit a cycle.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        !self.cyclic.is_empty()
    }

    /// Returns the position of `name` in the order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }

    /// Returns `true` if `name` was part of the unordered remainder.
    #[must_use]
    pub fn is_cyclic(&self, name: &str) -> bool {
        self.cyclic.iter().any(|n| n == name)
    }
}

/// Dependency graph over a set of plugins.
#[derive(Debug, Clone, Default)]
pub struct PluginGraph {
    plugins: Vec<PluginDescriptor>,
    by_name: HashMap<String, usize>,
    by_key: HashMap<String, usize>,
}

impl PluginGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from descriptors, in the given order.
    pub fn from_descriptors<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = PluginDescriptor>,
    {
        let mut graph = Self::new();
        for descriptor in descriptors {
            graph.register(descriptor);
        }
        graph
    }

    /// Inserts or replaces a descriptor by name.
    ///
    /// A replaced descriptor keeps its original registration position.
    /// Returns `true` if the name was not registered before.
    pub fn register(&mut self, descriptor: PluginDescriptor) -> bool {
        if let Some(&index) = self.by_name.get(&descriptor.name) {
            debug!("Replacing plugin descriptor '{}'", descriptor.name);
            self.plugins[index] = descriptor;
            return false;
        }

        let index = self.plugins.len();
        self.by_name.insert(descriptor.name.clone(), index);
        self.by_key
            .entry(plugin_name_key(&descriptor.name))
            .or_insert(index);
        self.plugins.push(descriptor);
        true
    }

    fn lookup(&self, name: &str) -> Option<usize> {
        self.by_name
            .get(name)
            .or_else(|| self.by_key.get(&plugin_name_key(name)))
            .copied()
    }

    /// Looks up a plugin by exact name, then by normalized name.
    ///
    /// # Examples
    ///
    /// ```
    /// use gembind_core::{PluginDescriptor, PluginGraph};
    ///
    /// let graph = PluginGraph::from_descriptors([PluginDescriptor::new("Atom_RPI")]);
    /// assert!(graph.get("Atom_RPI").is_some());
    /// assert_eq!(graph.get("atomrpi").unwrap().name, "Atom_RPI");
    /// assert!(graph.get("PhysX").is_none());
    /// ```
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PluginDescriptor> {
        self.lookup(name).map(|index| &self.plugins[index])
    }

    /// Returns `true` if a plugin with exactly this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Returns the canonical name for `name` (exact, then normalized).
    #[must_use]
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.get(name).map(|plugin| plugin.name.as_str())
    }

    /// Returns the canonical name matching `name` only by normalized form.
    #[must_use]
    pub fn normalized_match(&self, name: &str) -> Option<&str> {
        self.by_key
            .get(&plugin_name_key(name))
            .map(|&index| self.plugins[index].name.as_str())
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` if no plugin is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Iterates over descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.plugins.iter()
    }

    /// Names of all plugins in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name.as_str()).collect()
    }

    /// Names of active plugins in registration order.
    #[must_use]
    pub fn active_names(&self) -> Vec<String> {
        self.plugins
            .iter()
            .filter(|p| p.is_active)
            .map(|p| p.name.clone())
            .collect()
    }

    // Known dependency edges of each plugin, deduplicated, in declaration order.
    fn edges(&self) -> Vec<Vec<usize>> {
        self.plugins
            .iter()
            .map(|plugin| {
                let mut targets = Vec::new();
                for dependency in &plugin.dependencies {
                    if let Some(target) = self.lookup(dependency)
                        && !targets.contains(&target)
                    {
                        targets.push(target);
                    }
                }
                targets
            })
            .collect()
    }

    fn inverse_edges(&self) -> Vec<Vec<usize>> {
        let mut dependents = vec![Vec::new(); self.plugins.len()];
        for (source, targets) in self.edges().into_iter().enumerate() {
            for target in targets {
                dependents[target].push(source);
            }
        }
        dependents
    }

    /// Collects the dependency names of `name`.
    ///
    /// Direct edges are visited first; with `transitive`, each known
    /// dependency is expanded depth-first. Every name appears at most once,
    /// in first-discovered order. Dangling names are included but not
    /// expanded. `name` itself appears only when a cycle leads back to it.
    /// An unknown `name` yields an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use gembind_core::{PluginDescriptor, PluginGraph};
    ///
    /// let graph = PluginGraph::from_descriptors([
    ///     PluginDescriptor::new("Physics").with_dependencies(["Math"]),
    ///     PluginDescriptor::new("Vehicle").with_dependencies(["Physics", "Audio"]),
    /// ]);
    ///
    /// assert_eq!(graph.dependencies_of("Vehicle", false), vec!["Physics", "Audio"]);
    /// assert_eq!(graph.dependencies_of("Vehicle", true), vec!["Physics", "Math", "Audio"]);
    /// ```
    #[must_use]
    pub fn dependencies_of(&self, name: &str, transitive: bool) -> Vec<String> {
        let Some(start) = self.lookup(name) else {
            return Vec::new();
        };

        let mut visited = HashSet::new();
        let mut result = Vec::new();
        self.collect_dependencies(start, transitive, &mut visited, &mut result);
        result
    }

    fn collect_dependencies(
        &self,
        index: usize,
        transitive: bool,
        visited: &mut HashSet<String>,
        result: &mut Vec<String>,
    ) {
        for dependency in &self.plugins[index].dependencies {
            let target = self.lookup(dependency);
            let name = target.map_or_else(
                || dependency.clone(),
                |target| self.plugins[target].name.clone(),
            );
            if !visited.insert(name.clone()) {
                continue;
            }
            result.push(name);
            if transitive && let Some(target) = target {
                self.collect_dependencies(target, transitive, visited, result);
            }
        }
    }

    /// Collects the names of plugins depending on `name`.
    ///
    /// Symmetric to [`dependencies_of`](Self::dependencies_of) over inverse
    /// edges; dependents are listed in registration order at each level.
    #[must_use]
    pub fn dependents_of(&self, name: &str, transitive: bool) -> Vec<String> {
        let Some(start) = self.lookup(name) else {
            return Vec::new();
        };

        let inverse = self.inverse_edges();
        let mut visited = HashSet::new();
        let mut result = Vec::new();

        // Depth-first with an explicit stack; children are pushed in reverse
        // so they pop in registration order.
        let mut pending: Vec<usize> = inverse[start].iter().rev().copied().collect();
        while let Some(index) = pending.pop() {
            if !visited.insert(index) {
                continue;
            }
            result.push(self.plugins[index].name.clone());
            if transitive {
                pending.extend(inverse[index].iter().rev().copied());
            }
        }
        result
    }

    /// Returns `true` if `plugin` depends on `dependency`, directly or not.
    #[must_use]
    pub fn depends_on(&self, plugin: &str, dependency: &str) -> bool {
        let target = self
            .canonical_name(dependency)
            .unwrap_or(dependency)
            .to_string();
        self.dependencies_of(plugin, true).contains(&target)
    }

    /// Orders every plugin after its dependencies.
    ///
    /// Kahn's algorithm with a FIFO queue seeded in registration order, so
    /// the result depends only on the registered descriptors and their
    /// order. If a cycle stalls the queue, the remaining plugins are
    /// appended in registration order, reported in
    /// [`TopologicalOrder::cyclic`], and a warning is logged.
    ///
    /// # Examples
    ///
    /// ```
    /// use gembind_core::{PluginDescriptor, PluginGraph};
    ///
    /// let graph = PluginGraph::from_descriptors([
    ///     PluginDescriptor::new("A").with_dependencies(["B"]),
    ///     PluginDescriptor::new("B").with_dependencies(["C"]),
    ///     PluginDescriptor::new("C").with_dependencies(["A"]),
    /// ]);
    ///
    /// let order = graph.topological_order();
    /// assert_eq!(order.order, vec!["A", "B", "C"]);
    /// assert_eq!(order.cyclic, vec!["A", "B", "C"]);
    /// ```
    #[must_use]
    pub fn topological_order(&self) -> TopologicalOrder {
        let edges = self.edges();
        let mut dependents = vec![Vec::new(); self.plugins.len()];
        for (source, targets) in edges.iter().enumerate() {
            for &target in targets {
                dependents[target].push(source);
            }
        }

        let mut in_degree: Vec<usize> = edges.iter().map(Vec::len).collect();
        let mut queue: VecDeque<usize> = (0..self.plugins.len())
            .filter(|&index| in_degree[index] == 0)
            .collect();
        let mut placed = vec![false; self.plugins.len()];
        let mut order = Vec::with_capacity(self.plugins.len());

        while let Some(index) = queue.pop_front() {
            placed[index] = true;
            order.push(self.plugins[index].name.clone());
            for &dependent in &dependents[index] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        let cyclic: Vec<String> = self
            .plugins
            .iter()
            .zip(&placed)
            .filter(|(_, placed)| !**placed)
            .map(|(plugin, _)| plugin.name.clone())
            .collect();

        if !cyclic.is_empty() {
            warn!(
                "Dependency cycle detected; appending in registration order: {}",
                cyclic.join(", ")
            );
            order.extend(cyclic.iter().cloned());
        }

        TopologicalOrder { order, cyclic }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(name: &str, deps: &[&str]) -> PluginDescriptor {
        PluginDescriptor::new(name).with_dependencies(deps.iter().copied())
    }

    #[test]
    fn test_register_is_upsert() {
        let mut graph = PluginGraph::new();
        assert!(graph.register(plugin("A", &[])));
        assert!(graph.register(plugin("B", &[])));
        assert!(!graph.register(plugin("A", &["B"])));

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.names(), vec!["A", "B"]);
        assert_eq!(graph.get("A").unwrap().dependencies, vec!["B"]);
    }

    #[test]
    fn test_replacement_updates_order() {
        let mut graph = PluginGraph::from_descriptors([plugin("A", &[]), plugin("B", &[])]);
        assert_eq!(graph.topological_order().order, vec!["A", "B"]);

        graph.register(plugin("A", &["B"]));
        assert_eq!(graph.topological_order().order, vec!["B", "A"]);
        assert_eq!(graph.dependents_of("B", false), vec!["A"]);
    }

    #[test]
    fn test_normalized_lookup() {
        let graph = PluginGraph::from_descriptors([plugin("Script_Canvas", &[])]);
        assert!(graph.contains("Script_Canvas"));
        assert!(!graph.contains("scriptcanvas"));
        assert_eq!(graph.canonical_name("script-canvas"), Some("Script_Canvas"));
        assert_eq!(graph.normalized_match("SCRIPTCANVAS"), Some("Script_Canvas"));
    }

    #[test]
    fn test_dangling_dependency_is_leaf() {
        let graph = PluginGraph::from_descriptors([plugin("A", &["Missing", "B"]), plugin("B", &[])]);

        assert_eq!(graph.dependencies_of("A", true), vec!["Missing", "B"]);
        assert_eq!(graph.topological_order().order, vec!["B", "A"]);
    }

    #[test]
    fn test_dependencies_unknown_start() {
        let graph = PluginGraph::from_descriptors([plugin("A", &[])]);
        assert!(graph.dependencies_of("Nope", true).is_empty());
        assert!(graph.dependents_of("Nope", true).is_empty());
    }

    #[test]
    fn test_transitive_on_cycle_terminates() {
        let graph = PluginGraph::from_descriptors([
            plugin("A", &["B"]),
            plugin("B", &["C"]),
            plugin("C", &["A"]),
        ]);
        assert_eq!(graph.dependencies_of("A", true), vec!["B", "C", "A"]);
        assert_eq!(graph.dependents_of("A", true), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_dependents() {
        let graph = PluginGraph::from_descriptors([
            plugin("Math", &[]),
            plugin("Physics", &["Math"]),
            plugin("Vehicle", &["Physics"]),
            plugin("Audio", &["Math"]),
        ]);

        assert_eq!(graph.dependents_of("Math", false), vec!["Physics", "Audio"]);
        assert_eq!(
            graph.dependents_of("Math", true),
            vec!["Physics", "Vehicle", "Audio"]
        );
    }

    #[test]
    fn test_depends_on() {
        let graph = PluginGraph::from_descriptors([
            plugin("Math", &[]),
            plugin("Physics", &["Math"]),
            plugin("Vehicle", &["Physics"]),
        ]);
        assert!(graph.depends_on("Vehicle", "Math"));
        assert!(graph.depends_on("Vehicle", "math"));
        assert!(!graph.depends_on("Math", "Vehicle"));
    }

    #[test]
    fn test_duplicate_dependency_edges() {
        let graph = PluginGraph::from_descriptors([plugin("A", &[]), plugin("B", &["A", "A"])]);
        let order = graph.topological_order();
        assert_eq!(order.order, vec!["A", "B"]);
        assert!(!order.has_cycles());
    }

    #[test]
    fn test_downstream_of_cycle_is_appended() {
        let graph = PluginGraph::from_descriptors([
            plugin("Base", &[]),
            plugin("X", &["Y"]),
            plugin("Y", &["X"]),
            plugin("Leaf", &["X"]),
        ]);
        let order = graph.topological_order();
        assert_eq!(order.order, vec!["Base", "X", "Y", "Leaf"]);
        assert_eq!(order.cyclic, vec!["X", "Y", "Leaf"]);
        assert!(order.is_cyclic("Leaf"));
        assert!(!order.is_cyclic("Base"));
    }

    #[test]
    fn test_active_names() {
        let graph = PluginGraph::from_descriptors([
            plugin("A", &[]).active(true),
            plugin("B", &[]),
            PluginDescriptor::unloaded("C"),
        ]);
        assert_eq!(graph.active_names(), vec!["A", "C"]);
    }
}
