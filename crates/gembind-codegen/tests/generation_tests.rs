//! End-to-end generation tests.
//!
//! Tests the complete workflow:
//! 1. Parse a reflection document (gembind-introspector)
//! 2. Resolve ownership and emit bindings (gembind-codegen)
//! 3. Write the files through the checksum gate (gembind-files)

use gembind_codegen::Orchestrator;
use gembind_codegen::emitter::project_guid;
use gembind_core::{GeneratorConfig, MappingConfig, PluginDescriptor, PluginGraph, ReflectionData};
use gembind_introspector::parse_reflection;
use std::fs;

const REFLECTION: &str = r#"{
    "classes": [
        {"name": "Vector3", "category": "Math"},
        {
            "name": "PhysXRigidBody",
            "base_classes": ["RigidBody"],
            "properties": [{"name": "Mass", "value_type": {"type_name": "float"}}],
            "methods": [{"name": "ApplyImpulse", "parameters": [{"name": "impulse", "type_name": "AZ::Vector3"}]}]
        },
        {"name": "MeshFeatureProcessor", "category": "Atom/Rendering"},
        {
            "name": "VehicleLegacy",
            "methods": [
                {"name": "OldDrive", "is_deprecated": true},
                {"name": "OldBrake", "is_deprecated": true, "deprecation_message": "Use Brake instead."}
            ]
        }
    ],
    "ebuses": [
        {"name": "VehicleNotificationBus", "events": [{"name": "OnGearChanged", "parameters": [{"name": "gear", "type_name": "int"}]}]}
    ]
}"#;

fn reflection() -> ReflectionData {
    parse_reflection(REFLECTION, "reflection.json").unwrap()
}

fn graph() -> PluginGraph {
    PluginGraph::from_descriptors([
        PluginDescriptor::new("PhysX").active(true).loaded(true),
        PluginDescriptor::new("Atom").active(true).loaded(true),
        PluginDescriptor::new("Vehicle")
            .with_dependencies(["PhysX"])
            .active(true)
            .loaded(true),
    ])
}

fn dry_config() -> GeneratorConfig {
    GeneratorConfig::builder().write_to_disk(false).build()
}

#[test]
fn test_prefix_hint_assigns_owner() {
    let orchestrator = Orchestrator::new(dry_config()).unwrap();
    let mut data = reflection();
    let generation = orchestrator.generate(&mut data, &graph()).unwrap();

    assert_eq!(data.class("PhysXRigidBody").unwrap().source_gem_name, "PhysX");
    let file = generation.code.file("PhysX/Core.cs").unwrap();
    assert!(file.content.contains("namespace O3DE.Generated.PhysX\n"));
    assert!(file.content.contains("public partial class PhysXRigidBody : RigidBody"));
    assert!(file.content.contains("public void ApplyImpulse(Vector3 impulse)"));
    assert!(file.content.contains("public float Mass"));
}

#[test]
fn test_category_hint_assigns_owner() {
    let orchestrator = Orchestrator::new(dry_config()).unwrap();
    let mut data = reflection();
    let generation = orchestrator.generate(&mut data, &graph()).unwrap();

    assert_eq!(data.class("MeshFeatureProcessor").unwrap().source_gem_name, "Atom");
    let file = generation.code.file("Atom/AtomRendering.cs").unwrap();
    assert!(file.content.contains("namespace O3DE.Generated.Atom.Atom.Rendering\n"));
    assert!(file.content.contains("class MeshFeatureProcessor"));
}

#[test]
fn test_explicit_mapping_overrides_prefix() {
    let mut mapping = MappingConfig::default();
    mapping
        .symbol_mappings
        .insert("PhysXRigidBody".to_string(), "Atom".to_string());
    let config = GeneratorConfig::builder()
        .write_to_disk(false)
        .mapping(mapping)
        .build();

    let orchestrator = Orchestrator::new(config).unwrap();
    let mut data = reflection();
    let generation = orchestrator.generate(&mut data, &graph()).unwrap();

    assert_eq!(data.class("PhysXRigidBody").unwrap().source_gem_name, "Atom");
    assert!(generation.code.file("PhysX/Core.cs").is_none());
    assert!(
        generation
            .code
            .file("Atom/Core.cs")
            .unwrap()
            .content
            .contains("class PhysXRigidBody")
    );
}

#[test]
fn test_obsolete_messages() {
    let orchestrator = Orchestrator::new(dry_config()).unwrap();
    let generation = orchestrator.generate(&mut reflection(), &graph()).unwrap();

    let vehicle = &generation.code.file("Vehicle/Core.cs").unwrap().content;
    assert!(vehicle.contains("[Obsolete(\"This method is deprecated.\")]"));
    assert!(vehicle.contains("[Obsolete(\"Use Brake instead.\")]"));
}

#[test]
fn test_cycle_still_emits_every_plugin() {
    let graph = PluginGraph::from_descriptors([
        PluginDescriptor::new("Alpha").with_dependencies(["Beta"]).active(true),
        PluginDescriptor::new("Beta").with_dependencies(["Gamma"]).active(true),
        PluginDescriptor::new("Gamma").with_dependencies(["Alpha"]).active(true),
    ]);
    let mut data = parse_reflection(
        r#"{"classes": [{"name": "AlphaWidget"}, {"name": "BetaWidget"}, {"name": "GammaWidget"}]}"#,
        "cycle.json",
    )
    .unwrap();

    let orchestrator = Orchestrator::new(dry_config()).unwrap();
    let generation = orchestrator.generate(&mut data, &graph).unwrap();

    assert_eq!(generation.stats.processed_plugins, vec!["Alpha", "Beta", "Gamma"]);
    for plugin in ["Alpha", "Beta", "Gamma"] {
        assert!(generation.code.file(&format!("{plugin}/Core.cs")).is_some());
    }
    assert!(generation.stats.warnings.iter().any(|w| w.contains("cycle")));
}

#[test]
fn test_generation_is_deterministic() {
    let config = GeneratorConfig::builder()
        .write_to_disk(false)
        .per_plugin_projects(true)
        .build();
    let orchestrator = Orchestrator::new(config).unwrap();

    let first = orchestrator.generate(&mut reflection(), &graph()).unwrap();
    let second = orchestrator.generate(&mut reflection(), &graph()).unwrap();

    assert_eq!(first.code.files, second.code.files);

    let sln = &first.code.file("O3DE.Generated.sln").unwrap().content;
    assert!(sln.contains(&project_guid("PhysX")));
    assert!(sln.contains(&project_guid("Vehicle")));
}

#[test]
fn test_single_plugin_pulls_dependencies() {
    let config = GeneratorConfig::builder()
        .write_to_disk(false)
        .include_plugins(vec!["Vehicle".to_string()])
        .build();
    let orchestrator = Orchestrator::new(config).unwrap();
    let generation = orchestrator.generate(&mut reflection(), &graph()).unwrap();

    assert_eq!(generation.stats.processed_plugins, vec!["PhysX", "Vehicle"]);
    assert!(generation.code.file("PhysX/Core.cs").is_some());
    assert!(generation.code.file("Atom/AtomRendering.cs").is_none());
    assert!(generation.code.file("Core/Math.cs").is_none());
}

#[test]
fn test_unchanged_files_are_not_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig::builder()
        .output_dir(dir.path())
        .overwrite(false)
        .build();
    let orchestrator = Orchestrator::new(config).unwrap();

    let first = orchestrator.run(&mut reflection(), &graph());
    assert!(first.success, "{}", first.message);
    assert_eq!(first.stats.files_written, first.stats.files_generated);

    let math = dir.path().join("Core").join("Math.cs");
    let modified = fs::metadata(&math).unwrap().modified().unwrap();

    let second = orchestrator.run(&mut reflection(), &graph());
    assert!(second.success, "{}", second.message);
    assert_eq!(second.stats.files_written, 0);
    assert_eq!(second.stats.files_skipped, second.stats.files_generated);
    assert_eq!(fs::metadata(&math).unwrap().modified().unwrap(), modified);
}

#[test]
fn test_run_writes_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig::builder().output_dir(dir.path()).build();
    let orchestrator = Orchestrator::new(config).unwrap();

    let report = orchestrator.run(&mut reflection(), &graph());
    assert!(report.success, "{}", report.message);
    for path in &report.files {
        assert!(dir.path().join(path).is_file(), "missing {path}");
    }
    assert!(dir.path().join("InternalCalls.cs").is_file());
}

#[test]
fn test_existing_owner_alias_is_canonicalized() {
    let mut data = parse_reflection(
        r#"{"classes": [
            {"name": "RigidThing", "source_gem_name": "physx"},
            {"name": "StrayThing", "source_gem_name": "Hovercraft"}
        ]}"#,
        "owners.json",
    )
    .unwrap();

    let orchestrator = Orchestrator::new(dry_config()).unwrap();
    let generation = orchestrator.generate(&mut data, &graph()).unwrap();

    assert_eq!(data.class("RigidThing").unwrap().source_gem_name, "PhysX");
    assert_eq!(generation.stats.plugin("PhysX").unwrap().classes_generated, 1);
    assert!(
        generation
            .code
            .file("PhysX/Core.cs")
            .unwrap()
            .content
            .contains("class RigidThing")
    );

    // Unknown owners land in the core bucket with a warning
    assert_eq!(data.class("StrayThing").unwrap().source_gem_name, "O3DE.Core");
    assert!(
        generation
            .code
            .file("Core/Core.cs")
            .unwrap()
            .content
            .contains("class StrayThing")
    );
    assert!(
        generation
            .stats
            .warnings
            .iter()
            .any(|w| w.contains("StrayThing") && w.contains("'Hovercraft'"))
    );
}

#[test]
fn test_globals_category_keeps_free_functions() {
    let mut data = parse_reflection(
        r#"{
            "classes": [{"name": "PhysXWheel", "category": "Globals"}],
            "global_methods": [{"name": "PhysXStep"}]
        }"#,
        "globals.json",
    )
    .unwrap();

    let orchestrator = Orchestrator::new(dry_config()).unwrap();
    let generation = orchestrator.generate(&mut data, &graph()).unwrap();

    let category = &generation.code.file("PhysX/Globals.cs").unwrap().content;
    assert!(category.contains("class PhysXWheel"));
    let globals = &generation.code.file("PhysX/Globals.Functions.cs").unwrap().content;
    assert!(globals.contains("public static class Globals"));
    assert!(globals.contains("PhysXStep("));
    assert!(
        !generation
            .stats
            .warnings
            .iter()
            .any(|w| w.contains("duplicate output path"))
    );
}

#[test]
fn test_first_registered_plugin_prefix_owns_class() {
    let graph = PluginGraph::from_descriptors([
        PluginDescriptor::new("Atom").active(true).loaded(true),
        PluginDescriptor::new("AtomLyIntegration").active(true).loaded(true),
    ]);
    let mut data = parse_reflection(
        r#"{"classes": [{"name": "AtomLyIntegrationFoo"}]}"#,
        "prefix.json",
    )
    .unwrap();

    let orchestrator = Orchestrator::new(dry_config()).unwrap();
    let generation = orchestrator.generate(&mut data, &graph).unwrap();

    assert_eq!(data.class("AtomLyIntegrationFoo").unwrap().source_gem_name, "Atom");
    assert!(generation.code.file("Atom/Core.cs").is_some());
    assert!(generation.code.file("AtomLyIntegration/Core.cs").is_none());
}
