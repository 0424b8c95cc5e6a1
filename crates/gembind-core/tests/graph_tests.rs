//! Dependency graph behavior over realistic plugin sets.

use gembind_core::{PluginDescriptor, PluginGraph};

fn plugin(name: &str, deps: &[&str]) -> PluginDescriptor {
    PluginDescriptor::new(name)
        .with_dependencies(deps.iter().copied())
        .active(true)
        .loaded(true)
}

fn engine_graph() -> PluginGraph {
    PluginGraph::from_descriptors([
        plugin("Vehicle", &["PhysX", "Atom", "LmbrCentral"]),
        plugin("PhysX", &["LmbrCentral"]),
        plugin("Atom", &["Atom_RPI", "Atom_RHI"]),
        plugin("Atom_RPI", &["Atom_RHI"]),
        plugin("Atom_RHI", &[]),
        plugin("LmbrCentral", &[]),
        plugin("Terrain", &["Atom", "ExternalOnly"]),
    ])
}

#[test]
fn test_two_plugin_order() {
    let graph = PluginGraph::from_descriptors([plugin("Physics", &[]), plugin("Vehicle", &["Physics"])]);
    assert_eq!(graph.topological_order().order, vec!["Physics", "Vehicle"]);
}

#[test]
fn test_registration_order_does_not_break_dependencies() {
    let graph = PluginGraph::from_descriptors([plugin("Vehicle", &["Physics"]), plugin("Physics", &[])]);
    assert_eq!(graph.topological_order().order, vec!["Physics", "Vehicle"]);
}

#[test]
fn test_three_cycle_keeps_every_plugin() {
    let graph = PluginGraph::from_descriptors([
        plugin("A", &["B"]),
        plugin("B", &["C"]),
        plugin("C", &["A"]),
    ]);

    let order = graph.topological_order();
    assert_eq!(order.order, vec!["A", "B", "C"]);
    assert!(order.has_cycles());
    assert_eq!(order.cyclic.len(), 3);
}

#[test]
fn test_every_transitive_dependency_precedes_plugin() {
    let graph = engine_graph();
    let order = graph.topological_order();
    assert!(!order.has_cycles());
    assert_eq!(order.order.len(), graph.len());

    for name in graph.names() {
        let position = order.position(name).unwrap();
        for dependency in graph.dependencies_of(name, true) {
            // Dangling names are not part of the order
            if let Some(dependency_position) = order.position(&dependency) {
                assert!(
                    dependency_position < position,
                    "{dependency} must precede {name}"
                );
            } else {
                assert!(!graph.contains(&dependency));
            }
        }
    }
}

#[test]
fn test_order_is_deterministic() {
    let first = engine_graph().topological_order();
    for _ in 0..10 {
        assert_eq!(engine_graph().topological_order(), first);
    }
}

#[test]
fn test_fifo_seeding_follows_registration() {
    let order = engine_graph().topological_order();
    assert_eq!(
        order.order,
        vec!["Atom_RHI", "LmbrCentral", "Atom_RPI", "PhysX", "Atom", "Vehicle", "Terrain"]
    );
}

#[test]
fn test_transitive_dependencies() {
    let graph = engine_graph();
    assert_eq!(
        graph.dependencies_of("Vehicle", true),
        vec!["PhysX", "LmbrCentral", "Atom", "Atom_RPI", "Atom_RHI"]
    );
    assert_eq!(
        graph.dependencies_of("Terrain", true),
        vec!["Atom", "Atom_RPI", "Atom_RHI", "ExternalOnly"]
    );
}

#[test]
fn test_transitive_dependents() {
    let graph = engine_graph();
    assert_eq!(
        graph.dependents_of("Atom_RHI", true),
        vec!["Atom", "Vehicle", "Terrain", "Atom_RPI"]
    );
    assert_eq!(graph.dependents_of("Atom_RHI", false), vec!["Atom", "Atom_RPI"]);
}

#[test]
fn test_unloaded_plugin_participates() {
    let mut graph = engine_graph();
    graph.register(PluginDescriptor::unloaded("Missing"));

    let order = graph.topological_order();
    assert_eq!(order.order.len(), 8);
    // No dependencies: seeded right after the other roots
    assert_eq!(order.position("Missing"), Some(2));
    assert!(graph.active_names().contains(&"Missing".to_string()));
}

#[test]
fn test_cycle_leads_back_to_start() {
    let graph = PluginGraph::from_descriptors([
        plugin("A", &["B"]),
        plugin("B", &["C"]),
        plugin("C", &["A"]),
        plugin("D", &["A"]),
    ]);

    assert_eq!(graph.dependencies_of("A", true), vec!["B", "C", "A"]);
    assert_eq!(graph.dependencies_of("A", false), vec!["B"]);
    assert!(graph.depends_on("A", "A"));
    assert!(graph.depends_on("B", "B"));

    // D only reaches the cycle; it never comes back to itself
    assert_eq!(graph.dependencies_of("D", true), vec!["A", "B", "C"]);
    assert!(!graph.depends_on("D", "D"));
}
