//! Generation orchestration.
//!
//! Coordinates ownership resolution, plugin selection, emission and the
//! optional write step to produce one complete binding set.
//!
//! Phases:
//! 1. Annotate every symbol with its owning plugin
//! 2. Emit the core bucket
//! 3. Emit each selected plugin in dependency order
//! 4. Emit `InternalCalls.cs` and, if enabled, the solution
//! 5. Write changed files to disk unless running dry

use crate::common::types::{GeneratedCode, GeneratedFile};
use crate::emitter::{
    BindingEmitter, ScopeLayout, ScopeOutput, ScopeSymbols, SolutionProject, project_file_name,
};
use crate::ownership::OwnershipResolver;
use crate::template_engine::TemplateEngine;
use gembind_core::{
    Error, GenerationStats, GeneratorConfig, PluginGraph, ReflectionData, Result,
    TopologicalOrder,
};
use gembind_files::{ExportOptions, OutputWriter, WriteReport, expand_tilde};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// In-memory result of [`Orchestrator::generate`].
#[derive(Debug, Clone, Default)]
pub struct Generation {
    /// Generated files, in emission order
    pub code: GeneratedCode,
    /// Counters of the run
    pub stats: GenerationStats,
}

/// Outcome of [`Orchestrator::run`].
///
/// Always produced, even when generation fails; `success` and `message`
/// describe what happened.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    /// Whether the run completed
    pub success: bool,
    /// Summary or error message
    pub message: String,
    /// Counters reached by the run
    pub stats: GenerationStats,
    /// Relative paths of the generated files
    pub files: Vec<String>,
}

impl GenerationReport {
    fn failure(error: &Error, stats: GenerationStats) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            stats,
            files: Vec::new(),
        }
    }
}

/// Drives a complete generation run.
///
/// # Examples
///
/// ```
/// use gembind_codegen::Orchestrator;
/// use gembind_core::{
///     GeneratorConfig, PluginDescriptor, PluginGraph, ReflectedClass, ReflectionData,
/// };
///
/// let config = GeneratorConfig::builder().write_to_disk(false).build();
/// let orchestrator = Orchestrator::new(config)?;
///
/// let graph = PluginGraph::from_descriptors([PluginDescriptor::new("PhysX").active(true)]);
/// let mut data = ReflectionData::new();
/// data.insert_class(ReflectedClass::new("PhysXRigidBody"));
///
/// let generation = orchestrator.generate(&mut data, &graph)?;
/// assert!(generation.code.file("PhysX/Core.cs").is_some());
/// assert_eq!(generation.stats.processed_plugins, vec!["PhysX"]);
/// # Ok::<(), gembind_core::Error>(())
/// ```
#[derive(Debug)]
pub struct Orchestrator {
    config: GeneratorConfig,
    templates: TemplateEngine<'static>,
}

impl Orchestrator {
    /// Creates an orchestrator for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid, or
    /// [`Error::TemplateError`] if a built-in template fails to register.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            templates: TemplateEngine::new()?,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates every file in memory.
    ///
    /// Annotates `data` with owning plugins as a side effect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PluginNotFound`] if single-plugin mode names a
    /// plugin that is not in `graph`, or a template error if a build
    /// artifact fails to render.
    pub fn generate(
        &self,
        data: &mut ReflectionData,
        graph: &PluginGraph,
    ) -> Result<Generation> {
        let mut stats = GenerationStats::new();

        let mut resolver = OwnershipResolver::new(graph, &self.config.mapping);
        let annotated = resolver.resolve(data);
        debug!("Annotated {annotated} symbols with owning plugins");
        for warning in resolver.warnings() {
            stats.warn(warning.clone());
        }

        let order = graph.topological_order();
        if order.has_cycles() {
            let message = format!(
                "dependency cycle among plugins: {}",
                order.cyclic.join(", ")
            );
            warn!("{message}");
            stats.warn(message);
        }

        let data: &ReflectionData = data;
        let single = self.config.is_single_plugin();
        let plugins = if single {
            self.single_plugin_selection(graph, &order)?
        } else if self.config.generate_plugins {
            self.plugin_selection(graph, &order, &mut stats)
        } else {
            Vec::new()
        };
        info!(
            "Generating bindings for {} plugins{}",
            plugins.len(),
            if single { " (single-plugin mode)" } else { "" }
        );

        let (core, by_plugin) = self.partition(data);
        let emitter = BindingEmitter::new(&self.config, &self.templates, data);
        let mut run = Run {
            code: GeneratedCode::new(),
            stats,
        };
        let mut projects: Vec<(SolutionProject, ScopeLayout)> = Vec::new();

        if self.config.generate_core && !single {
            let layout = ScopeLayout::core(&self.config);
            let output = emitter.emit_scope(&layout, &core)?;
            run.count(&output);
            for file in output.files {
                run.add(file, None);
            }

            if self.config.per_plugin_projects || self.config.combined_assembly {
                let name = self.config.core_namespace.as_str();
                let project = emitter.project_file(&layout, name, &[])?;
                projects.push((SolutionProject::new(name, project.path.clone()), layout));
                run.add(project, None);
            }
        }

        let empty = ScopeSymbols::default();
        for plugin in &plugins {
            let symbols = by_plugin.get(plugin.as_str()).unwrap_or(&empty);
            let layout = ScopeLayout::plugin(&self.config, plugin);
            run.stats.processed_plugins.push(plugin.clone());
            run.stats.plugin_mut(plugin);

            if symbols.is_empty() {
                debug!("Plugin {plugin} owns no symbols");
                continue;
            }

            let output = emitter.emit_scope(&layout, symbols)?;
            run.count(&output);
            {
                let plugin_stats = run.stats.plugin_mut(plugin);
                plugin_stats.classes_generated += output.classes;
                plugin_stats.ebuses_generated += output.ebuses;
            }
            for file in output.files {
                run.add(file, Some(plugin.as_str()));
            }

            if self.config.per_plugin_projects {
                let references: Vec<String> = graph
                    .dependencies_of(plugin, false)
                    .iter()
                    .filter_map(|dependency| {
                        let dependency = graph.canonical_name(dependency).unwrap_or(dependency);
                        projects
                            .iter()
                            .find(|(project, _)| project.name == dependency)
                    })
                    .map(|(project, other)| {
                        layout.reference_to(other, &project_file_name(&project.name))
                    })
                    .collect();

                let project = emitter.project_file(&layout, plugin, &references)?;
                projects.push((
                    SolutionProject::new(plugin.as_str(), project.path.clone()),
                    layout.clone(),
                ));
                run.add(project, Some(plugin.as_str()));

                let descriptor = graph.get(plugin);
                let info = emitter.assembly_info(&layout, descriptor, plugin)?;
                run.add(info, Some(plugin.as_str()));
            }
            debug!("Emitted plugin {plugin}");
        }

        run.add(emitter.internal_calls(), None);

        if self.config.generate_solution {
            let listed: Vec<SolutionProject> =
                projects.into_iter().map(|(project, _)| project).collect();
            let solution = emitter.solution_file(&listed)?;
            run.add(solution, None);
        }

        info!(
            "Generated {} classes, {} buses, {} files",
            run.stats.classes_generated, run.stats.ebuses_generated, run.stats.files_generated
        );

        Ok(Generation {
            code: run.code,
            stats: run.stats,
        })
    }

    /// Writes generated files under the configured output directory.
    ///
    /// Unless overwriting is enabled, files whose content on disk already
    /// matches are skipped. Updates the written and skipped counters.
    ///
    /// # Errors
    ///
    /// Returns an error on the first file that cannot be written.
    pub fn write(&self, code: &GeneratedCode, stats: &mut GenerationStats) -> Result<WriteReport> {
        let root = expand_tilde(&self.config.output_dir);
        let writer = OutputWriter::new(
            root,
            ExportOptions::new().with_overwrite(self.config.overwrite),
        );
        let report = writer.write_all(code.files().map(|file| (&file.path, &file.content)))?;
        stats.files_written = saturating_u32(report.written.len());
        stats.files_skipped = saturating_u32(report.skipped.len());
        Ok(report)
    }

    /// Generates and, unless running dry, writes the bindings.
    ///
    /// Never panics on bad input; failures are reported in the returned
    /// [`GenerationReport`].
    pub fn run(&self, data: &mut ReflectionData, graph: &PluginGraph) -> GenerationReport {
        let Generation { code, mut stats } = match self.generate(data, graph) {
            Ok(generation) => generation,
            Err(e) => {
                warn!("Generation failed: {e}");
                return GenerationReport::failure(&e, GenerationStats::new());
            }
        };

        let message = if self.config.write_to_disk {
            if let Err(e) = self.write(&code, &mut stats) {
                warn!("Writing bindings failed: {e}");
                return GenerationReport::failure(&e, stats);
            }
            format!(
                "Generated {} files ({} written, {} unchanged)",
                stats.files_generated, stats.files_written, stats.files_skipped
            )
        } else {
            format!("Generated {} files (dry run)", stats.files_generated)
        };

        GenerationReport {
            success: true,
            message,
            files: code.paths(),
            stats,
        }
    }

    fn is_core(&self, owner: &str, name: &str, category: &str) -> bool {
        self.config.is_core_category(category)
            || self.config.has_core_prefix(name)
            || owner.is_empty()
            || owner == self.config.mapping.default_plugin
    }

    /// Splits symbols into the core bucket and per-plugin buckets.
    fn partition<'d>(
        &self,
        data: &'d ReflectionData,
    ) -> (ScopeSymbols<'d>, BTreeMap<&'d str, ScopeSymbols<'d>>) {
        let mut core = ScopeSymbols::default();
        let mut plugins: BTreeMap<&'d str, ScopeSymbols<'d>> = BTreeMap::new();

        for class in data.classes.values() {
            let owner = class.source_gem_name.as_str();
            if self.is_core(owner, &class.name, &class.category) {
                core.classes.push(class);
            } else {
                plugins.entry(owner).or_default().classes.push(class);
            }
        }
        for ebus in data.ebuses.values() {
            let owner = ebus.source_gem_name.as_str();
            if self.is_core(owner, &ebus.name, &ebus.category) {
                core.ebuses.push(ebus);
            } else {
                plugins.entry(owner).or_default().ebuses.push(ebus);
            }
        }
        for (index, method) in data.global_methods.iter().enumerate() {
            let owner = method.source_gem_name.as_str();
            if self.is_core(owner, &method.name, &method.category) {
                core.methods.push((index, method));
            } else {
                plugins.entry(owner).or_default().methods.push((index, method));
            }
        }
        for (index, property) in data.global_properties.iter().enumerate() {
            let owner = property.source_gem_name.as_str();
            if self.is_core(owner, &property.name, &property.category) {
                core.properties.push((index, property));
            } else {
                plugins
                    .entry(owner)
                    .or_default()
                    .properties
                    .push((index, property));
            }
        }

        (core, plugins)
    }

    /// The requested plugin plus its transitive dependencies.
    fn single_plugin_selection(
        &self,
        graph: &PluginGraph,
        order: &TopologicalOrder,
    ) -> Result<Vec<String>> {
        let requested = &self.config.include_plugins[0];
        let name = graph
            .canonical_name(requested)
            .ok_or_else(|| Error::PluginNotFound {
                name: requested.clone(),
            })?
            .to_string();

        let mut selected = vec![name.clone()];
        for dependency in graph.dependencies_of(&name, true) {
            match graph.canonical_name(&dependency) {
                Some(known) if !selected.iter().any(|s| s == known) => {
                    selected.push(known.to_string());
                }
                Some(_) => {}
                None => debug!("Skipping unknown dependency {dependency} of {name}"),
            }
        }
        sort_by_order(&mut selected, order);
        Ok(selected)
    }

    /// Plugins to emit in multi-plugin mode, in dependency order.
    fn plugin_selection(
        &self,
        graph: &PluginGraph,
        order: &TopologicalOrder,
        stats: &mut GenerationStats,
    ) -> Vec<String> {
        let requested = if self.config.include_plugins.is_empty() {
            graph.active_names()
        } else {
            self.config.include_plugins.clone()
        };

        let mut selected: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for name in requested {
            let Some(canonical) = graph.canonical_name(&name).map(str::to_string) else {
                let message = format!("plugin '{name}' is not installed; skipping");
                warn!("{message}");
                stats.warn(message);
                continue;
            };
            if self.config.include_dependencies {
                for dependency in graph.dependencies_of(&canonical, true) {
                    if let Some(known) = graph.canonical_name(&dependency)
                        && seen.insert(known.to_string())
                    {
                        selected.push(known.to_string());
                    }
                }
            }
            if seen.insert(canonical.clone()) {
                selected.push(canonical);
            }
        }

        let excluded: HashSet<&str> = self
            .config
            .exclude_plugins
            .iter()
            .map(|name| graph.canonical_name(name).unwrap_or(name))
            .collect();
        selected.retain(|name| !excluded.contains(name.as_str()));

        sort_by_order(&mut selected, order);
        selected
    }
}

/// Output accumulated during one run.
struct Run {
    code: GeneratedCode,
    stats: GenerationStats,
}

impl Run {
    fn add(&mut self, file: GeneratedFile, plugin: Option<&str>) {
        let path = file.path.clone();
        if !self.code.add_file(file) {
            let message = format!("duplicate output path '{path}'; keeping the first file");
            warn!("{message}");
            self.stats.warn(message);
            return;
        }
        debug!("Generated {path}");
        if let Some(plugin) = plugin {
            self.stats.plugin_mut(plugin).record_file(path.clone());
        }
        self.stats.record_file(path);
    }

    const fn count(&mut self, output: &ScopeOutput) {
        self.stats.classes_generated += output.classes;
        self.stats.ebuses_generated += output.ebuses;
        self.stats.methods_generated += output.members.methods;
        self.stats.properties_generated += output.members.properties;
        self.stats.events_generated += output.members.events;
    }
}

/// Stable sort by topological position; names outside the order go last.
fn sort_by_order(names: &mut [String], order: &TopologicalOrder) {
    names.sort_by_key(|name| order.position(name).unwrap_or(usize::MAX));
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
