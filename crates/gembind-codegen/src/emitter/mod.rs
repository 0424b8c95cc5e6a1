//! Emission engine.
//!
//! Renders annotated reflection data into in-memory [`GeneratedFile`]
//! records. Nothing here touches the filesystem.
//!
//! A *scope* is either the core bucket or one plugin. Within a scope,
//! classes and buses are grouped by category (the empty category folds into
//! `Core`) and each non-empty group becomes one file, with symbols sorted by
//! name. Free functions and properties go to `Globals.Functions.cs`.

mod native;
mod projects;
mod symbols;
mod writer;

pub use native::{BindingKey, NativeBinding, NativeBindingPlan};
pub use projects::{SolutionProject, project_guid};
pub(crate) use projects::project_file_name;
pub use symbols::MemberCounts;

use crate::common::csharp::{
    category_bucket, category_file_stem, category_namespace, plugin_namespace, safe_filename,
};
use crate::common::types::GeneratedFile;
use crate::template_engine::TemplateEngine;
use gembind_core::{
    GeneratorConfig, ReflectedClass, ReflectedEBus, ReflectedMethod, ReflectedProperty,
    ReflectionData, Result,
};
use std::collections::BTreeMap;
use symbols::SymbolRenderer;
use tracing::debug;
use writer::SourceWriter;

const DEFAULT_HEADER: &str = "\
//------------------------------------------------------------------------------
// <auto-generated>
//     This code was generated by the gembind binding generator.
//
//     Changes to this file may be overwritten when regenerated.
// </auto-generated>
//------------------------------------------------------------------------------";

// Dotted, so no category file stem can produce it.
const GLOBALS_FILE: &str = "Globals.Functions.cs";

/// Where and under which namespace a scope's files are emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLayout {
    /// Plugin name, or `None` for the core bucket
    pub plugin: Option<String>,
    /// Base namespace of the scope
    pub namespace: String,
    /// Output subdirectory, possibly empty
    pub directory: String,
    /// Prefix applied to every file name
    pub file_prefix: String,
}

impl ScopeLayout {
    /// Layout of the core bucket.
    #[must_use]
    pub fn core(config: &GeneratorConfig) -> Self {
        Self {
            plugin: None,
            namespace: config.core_namespace.clone(),
            directory: config.core_output_dir.clone(),
            file_prefix: String::new(),
        }
    }

    /// Layout of a plugin scope.
    ///
    /// # Examples
    ///
    /// ```
    /// use gembind_codegen::emitter::ScopeLayout;
    /// use gembind_core::GeneratorConfig;
    ///
    /// let mut config = GeneratorConfig::default();
    /// let layout = ScopeLayout::plugin(&config, "Atom_RPI");
    /// assert_eq!(layout.namespace, "O3DE.Generated.Atom.RPI");
    /// assert_eq!(layout.path("Rendering.cs"), "Atom_RPI/Rendering.cs");
    ///
    /// config.separate_plugin_dirs = false;
    /// let flat = ScopeLayout::plugin(&config, "Atom_RPI");
    /// assert_eq!(flat.path("Rendering.cs"), "Atom_RPI.Rendering.cs");
    /// ```
    #[must_use]
    pub fn plugin(config: &GeneratorConfig, name: &str) -> Self {
        let safe = safe_filename(name);
        let (directory, file_prefix) = if config.separate_plugin_dirs {
            (safe, String::new())
        } else {
            (String::new(), format!("{safe}."))
        };
        Self {
            plugin: Some(name.to_string()),
            namespace: plugin_namespace(&config.root_namespace, name),
            directory,
            file_prefix,
        }
    }

    /// Relative path of a scope file.
    #[must_use]
    pub fn path(&self, file_name: &str) -> String {
        join(&self.directory, &format!("{}{file_name}", self.file_prefix))
    }

    /// Relative path of a project file, which never takes the file prefix.
    #[must_use]
    pub fn project_path(&self, file_name: &str) -> String {
        join(&self.directory, file_name)
    }

    /// Path from this scope's project to another scope's project file.
    #[must_use]
    pub fn reference_to(&self, other: &Self, file_name: &str) -> String {
        let target = other.project_path(file_name);
        if self.directory.is_empty() {
            target
        } else {
            format!("../{target}")
        }
    }

    fn category_namespace(&self, bucket: &str) -> String {
        category_namespace(bucket).map_or_else(
            || self.namespace.clone(),
            |sub| format!("{}.{sub}", self.namespace),
        )
    }
}

fn join(directory: &str, file: &str) -> String {
    let directory = directory.trim_end_matches('/');
    if directory.is_empty() {
        file.to_string()
    } else {
        format!("{directory}/{file}")
    }
}

/// Symbols assigned to one scope.
///
/// Free symbols carry their index in the reflection lists, which keys
/// their native bindings.
#[derive(Debug, Clone, Default)]
pub struct ScopeSymbols<'d> {
    /// Classes
    pub classes: Vec<&'d ReflectedClass>,
    /// Event buses
    pub ebuses: Vec<&'d ReflectedEBus>,
    /// Free functions
    pub methods: Vec<(usize, &'d ReflectedMethod)>,
    /// Free properties
    pub properties: Vec<(usize, &'d ReflectedProperty)>,
}

impl ScopeSymbols<'_> {
    /// Returns `true` if the scope has nothing to emit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.ebuses.is_empty()
            && self.methods.is_empty()
            && self.properties.is_empty()
    }
}

/// Files and counters produced for one scope.
#[derive(Debug, Clone, Default)]
pub struct ScopeOutput {
    /// Generated files, in emission order
    pub files: Vec<GeneratedFile>,
    /// Classes emitted
    pub classes: u32,
    /// Buses emitted
    pub ebuses: u32,
    /// Members emitted
    pub members: MemberCounts,
}

/// Renders scopes, native bindings and build artifacts for one run.
#[derive(Debug)]
pub struct BindingEmitter<'a> {
    config: &'a GeneratorConfig,
    templates: &'a TemplateEngine<'static>,
    plan: NativeBindingPlan,
}

impl<'a> BindingEmitter<'a> {
    /// Creates an emitter, planning native bindings over all of `data`.
    #[must_use]
    pub fn new(
        config: &'a GeneratorConfig,
        templates: &'a TemplateEngine<'static>,
        data: &ReflectionData,
    ) -> Self {
        Self {
            config,
            templates,
            plan: NativeBindingPlan::new(data),
        }
    }

    /// Native binding plan of this run.
    #[must_use]
    pub const fn plan(&self) -> &NativeBindingPlan {
        &self.plan
    }

    /// Provenance header placed at the top of every C# file.
    #[must_use]
    pub fn header(&self) -> &str {
        self.config.file_header.as_deref().unwrap_or(DEFAULT_HEADER)
    }

    fn begin_file(&self) -> SourceWriter {
        let mut writer = SourceWriter::new();
        writer.block(self.header());
        writer.blank();
        writer.line("using System;");
        writer.line("using System.Runtime.CompilerServices;");
        writer.line("using System.Runtime.InteropServices;");
        writer.line(format!("using {};", self.config.core_namespace));
        writer.line(format!("using {}.Internal;", self.config.root_namespace));
        writer.blank();
        writer
    }

    /// Renders every file of a scope.
    ///
    /// # Errors
    ///
    /// Returns an error if a symbol has no planned native binding, which
    /// means `symbols` did not come from the data this emitter was built on.
    pub fn emit_scope(
        &self,
        layout: &ScopeLayout,
        symbols: &ScopeSymbols<'_>,
    ) -> Result<ScopeOutput> {
        let renderer = SymbolRenderer::new(self.config, &self.plan);
        let mut output = ScopeOutput::default();

        let class_groups = group_by_category(
            &symbols.classes,
            |c| c.category.as_str(),
            |c| c.name.as_str(),
        );
        for (bucket, classes) in class_groups {
            let mut writer = self.begin_file();
            writer.open(format!("namespace {}", layout.category_namespace(bucket)));
            for (i, class) in classes.iter().enumerate() {
                if i > 0 {
                    writer.blank();
                }
                output.members.add(renderer.class(&mut writer, class)?);
                output.classes += 1;
            }
            writer.close();

            let path = layout.path(&format!("{}.cs", category_file_stem(bucket)));
            debug!("Rendered {path} ({} classes)", classes.len());
            output.files.push(GeneratedFile::new(path, writer.finish()));
        }

        if self.config.generate_ebus_wrappers {
            let ebus_groups = group_by_category(
                &symbols.ebuses,
                |e| e.category.as_str(),
                |e| e.name.as_str(),
            );
            for (bucket, ebuses) in ebus_groups {
                let mut writer = self.begin_file();
                writer.open(format!("namespace {}.EBus", layout.category_namespace(bucket)));
                for (i, ebus) in ebuses.iter().enumerate() {
                    if i > 0 {
                        writer.blank();
                    }
                    output.members.add(renderer.ebus(&mut writer, ebus)?);
                    output.ebuses += 1;
                }
                writer.close();

                let path = layout.path(&format!("{}.EBus.cs", category_file_stem(bucket)));
                debug!("Rendered {path} ({} buses)", ebuses.len());
                output.files.push(GeneratedFile::new(path, writer.finish()));
            }
        }

        if !symbols.methods.is_empty() || !symbols.properties.is_empty() {
            let mut methods = symbols.methods.clone();
            methods.sort_by(|a, b| a.1.name.cmp(&b.1.name).then(a.0.cmp(&b.0)));
            let mut properties = symbols.properties.clone();
            properties.sort_by(|a, b| a.1.name.cmp(&b.1.name).then(a.0.cmp(&b.0)));

            let mut writer = self.begin_file();
            writer.open(format!("namespace {}", layout.namespace));
            output
                .members
                .add(renderer.globals(&mut writer, &methods, &properties)?);
            writer.close();
            output
                .files
                .push(GeneratedFile::new(layout.path(GLOBALS_FILE), writer.finish()));
        }

        Ok(output)
    }

    /// Renders `InternalCalls.cs`, declaring every planned native binding.
    #[must_use]
    pub fn internal_calls(&self) -> GeneratedFile {
        let mut writer = self.begin_file();
        writer.open(format!("namespace {}.Internal", self.config.root_namespace));
        self.plan.write_declarations(&mut writer);
        writer.close();
        GeneratedFile::new("InternalCalls.cs", writer.finish())
    }
}

/// Groups symbols into category buckets, sorted by bucket then by name.
fn group_by_category<'s, T>(
    items: &[&'s T],
    category: impl Fn(&T) -> &str,
    name: impl Fn(&T) -> &str,
) -> BTreeMap<&'s str, Vec<&'s T>> {
    let mut groups: BTreeMap<&'s str, Vec<&'s T>> = BTreeMap::new();
    for &item in items {
        groups.entry(category_bucket(category(item))).or_default().push(item);
    }
    for members in groups.values_mut() {
        members.sort_by(|a, b| name(a).cmp(name(b)));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use gembind_core::ReflectedEBusEvent;

    fn data() -> ReflectionData {
        let mut data = ReflectionData::new();
        data.insert_class(ReflectedClass::new("Zeta").with_category("Physics"));
        data.insert_class(ReflectedClass::new("Alpha").with_category("Physics"));
        data.insert_class(ReflectedClass::new("Loose"));
        let mut bus = ReflectedEBus::new("CollisionBus");
        bus.category = "Physics".to_string();
        bus.events.push(ReflectedEBusEvent::new("OnCollision"));
        data.insert_ebus(bus);
        data.global_methods.push(ReflectedMethod::new("Simulate"));
        data
    }

    fn symbols(data: &ReflectionData) -> ScopeSymbols<'_> {
        ScopeSymbols {
            classes: data.classes.values().collect(),
            ebuses: data.ebuses.values().collect(),
            methods: data.global_methods.iter().enumerate().collect(),
            properties: Vec::new(),
        }
    }

    #[test]
    fn test_scope_files() {
        let config = GeneratorConfig::default();
        let templates = TemplateEngine::new().unwrap();
        let data = data();
        let emitter = BindingEmitter::new(&config, &templates, &data);

        let layout = ScopeLayout::plugin(&config, "PhysX");
        let output = emitter.emit_scope(&layout, &symbols(&data)).unwrap();

        let paths: Vec<&str> = output.files.iter().map(GeneratedFile::path).collect();
        assert_eq!(
            paths,
            vec![
                "PhysX/Core.cs",
                "PhysX/Physics.cs",
                "PhysX/Physics.EBus.cs",
                "PhysX/Globals.Functions.cs"
            ]
        );
        assert_eq!(output.classes, 3);
        assert_eq!(output.ebuses, 1);
        assert_eq!(output.members.events, 1);
        assert_eq!(output.members.methods, 1);

        let physics = &output.files[1].content;
        assert!(physics.contains("namespace O3DE.Generated.PhysX.Physics\n"));
        assert!(physics.find("class Alpha").unwrap() < physics.find("class Zeta").unwrap());
        assert!(output.files[0].content.contains("namespace O3DE.Generated.PhysX\n"));
        assert!(output.files[2].content.contains("namespace O3DE.Generated.PhysX.Physics.EBus\n"));
    }

    #[test]
    fn test_bus_wrappers_disabled() {
        let config = GeneratorConfig {
            generate_ebus_wrappers: false,
            ..GeneratorConfig::default()
        };
        let templates = TemplateEngine::new().unwrap();
        let data = data();
        let emitter = BindingEmitter::new(&config, &templates, &data);
        let output = emitter
            .emit_scope(&ScopeLayout::core(&config), &symbols(&data))
            .unwrap();

        assert!(output.files.iter().all(|f| !f.path.ends_with(".EBus.cs")));
        assert_eq!(output.ebuses, 0);
        assert!(output.files[0].path.starts_with("Core/"));
    }

    #[test]
    fn test_header_and_usings() {
        let config = GeneratorConfig::default();
        let templates = TemplateEngine::new().unwrap();
        let data = data();
        let emitter = BindingEmitter::new(&config, &templates, &data);
        let file = emitter.internal_calls();

        assert_eq!(file.path, "InternalCalls.cs");
        assert!(file.content.starts_with("//---"));
        assert!(file.content.contains("<auto-generated>"));
        assert!(file.content.contains("using O3DE.Generated.Internal;"));
        assert!(file.content.contains("namespace O3DE.Generated.Internal\n"));
        assert!(file.content.contains("internal static class NativeMethods"));
        assert!(file.content.contains("extern void CollisionBus_OnCollision();"));
    }

    #[test]
    fn test_custom_header() {
        let config = GeneratorConfig::builder().file_header("// custom\n// header").build();
        let templates = TemplateEngine::new().unwrap();
        let data = ReflectionData::new();
        let emitter = BindingEmitter::new(&config, &templates, &data);
        assert!(emitter.internal_calls().content.starts_with("// custom\n// header\n\nusing System;"));
    }

    #[test]
    fn test_empty_scope_has_no_files() {
        let config = GeneratorConfig::default();
        let templates = TemplateEngine::new().unwrap();
        let data = ReflectionData::new();
        let emitter = BindingEmitter::new(&config, &templates, &data);
        let output = emitter
            .emit_scope(&ScopeLayout::core(&config), &ScopeSymbols::default())
            .unwrap();
        assert!(output.files.is_empty());
    }

    #[test]
    fn test_reference_paths() {
        let mut config = GeneratorConfig::default();
        let physx = ScopeLayout::plugin(&config, "PhysX");
        let vehicle = ScopeLayout::plugin(&config, "Vehicle");
        assert_eq!(vehicle.reference_to(&physx, "PhysX.csproj"), "../PhysX/PhysX.csproj");

        config.separate_plugin_dirs = false;
        let physx = ScopeLayout::plugin(&config, "PhysX");
        let vehicle = ScopeLayout::plugin(&config, "Vehicle");
        assert_eq!(vehicle.reference_to(&physx, "PhysX.csproj"), "PhysX.csproj");
    }
}
