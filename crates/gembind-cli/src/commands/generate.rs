//! Generate command implementation.
//!
//! This command:
//! 1. Loads the reflection document exported by the engine
//! 2. Discovers the plugins of a project or engine
//! 3. Builds the generator configuration from the config file and flags
//! 4. Generates the bindings and writes changed files

use super::common::{discover, graph_of};
use crate::formatters::format_output;
use anyhow::{Context, Result};
use clap::Args;
use gembind_codegen::{GenerationReport, Orchestrator};
use gembind_core::GeneratorConfig;
use gembind_core::cli::{ExitCode, OutputFormat};
use gembind_files::expand_tilde;
use gembind_introspector::load_reflection;
use std::path::PathBuf;
use tracing::{info, warn};

/// Arguments of `gembind generate`.
#[derive(Args, Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerateArgs {
    /// Reflection document exported by the engine
    #[arg(short, long = "reflection-data", value_name = "FILE")]
    pub reflection_data: PathBuf,

    /// Project directory whose plugins are discovered
    #[arg(short, long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Engine root; used alone, every engine plugin is generated
    #[arg(short, long, value_name = "DIR", env = "O3DE_ENGINE_PATH")]
    pub engine: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Root namespace of the generated code
    #[arg(long)]
    pub namespace: Option<String>,

    /// Plugins to generate; a single name selects single-plugin mode
    #[arg(long, num_args = 1.., value_name = "NAME")]
    pub gems: Vec<String>,

    /// Plugins to skip
    #[arg(long = "exclude-gems", num_args = 1.., value_name = "NAME")]
    pub exclude_gems: Vec<String>,

    /// Generate only the core bindings
    #[arg(long, conflicts_with = "gems_only")]
    pub core_only: bool,

    /// Generate only plugin bindings
    #[arg(long)]
    pub gems_only: bool,

    /// Emit one project file per plugin
    #[arg(long)]
    pub per_gem_projects: bool,

    /// Target framework of the project files
    #[arg(long, value_name = "TFM")]
    pub target_framework: Option<String>,

    /// Generator configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Leave files whose content is unchanged untouched
    #[arg(long)]
    pub no_overwrite: bool,

    /// Generate in memory only
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    /// Builds the generator configuration.
    ///
    /// Starts from the config file when one is given, then applies every
    /// flag that was set.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded.
    pub fn to_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let path = expand_tilde(path);
                GeneratorConfig::from_file(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?
            }
            None => GeneratorConfig::default(),
        };

        if let Some(output) = &self.output {
            config.output_dir = expand_tilde(output);
        }
        if let Some(namespace) = &self.namespace {
            config.root_namespace.clone_from(namespace);
        }
        if !self.gems.is_empty() {
            config.include_plugins.clone_from(&self.gems);
        }
        if !self.exclude_gems.is_empty() {
            config.exclude_plugins.clone_from(&self.exclude_gems);
        }
        if self.core_only {
            config.generate_plugins = false;
        }
        if self.gems_only {
            config.generate_core = false;
        }
        if self.per_gem_projects {
            config.per_plugin_projects = true;
        }
        if let Some(framework) = &self.target_framework {
            config.target_framework.clone_from(framework);
        }
        if self.no_overwrite {
            config.overwrite = false;
        }
        if self.dry_run {
            config.write_to_disk = false;
        }
        Ok(config)
    }
}

/// Runs the generate command.
///
/// Returns the report together with the exit code it maps to.
///
/// # Errors
///
/// Returns an error if the reflection document, plugin discovery or the
/// configuration fails to load. Generation failures are reported through
/// the returned report and [`ExitCode::ERROR`].
pub fn execute(args: &GenerateArgs) -> Result<(GenerationReport, ExitCode)> {
    let config = args.to_config()?;
    let orchestrator = Orchestrator::new(config).context("invalid generator configuration")?;

    let reflection = expand_tilde(&args.reflection_data);
    let mut data = load_reflection(&reflection)
        .with_context(|| format!("failed to load reflection data {}", reflection.display()))?;
    info!(
        "Loaded {} classes and {} buses",
        data.class_count(),
        data.ebus_count()
    );

    let discovery = discover(args.project.as_deref(), args.engine.as_deref())?;
    if discovery.is_none() {
        warn!("No project or engine given; only core bindings can be generated");
    }
    let graph = graph_of(discovery.as_ref());

    let mut report = orchestrator.run(&mut data, &graph);
    if let Some(discovery) = &discovery {
        for failure in &discovery.failed {
            report.stats.warn(format!(
                "plugin '{}' not loaded: {}",
                failure.plugin, failure.reason
            ));
        }
    }

    let code = ExitCode::from_success(report.success);
    Ok((report, code))
}

/// Runs the generate command and prints its summary.
///
/// # Errors
///
/// Returns an error if loading fails or the summary cannot be formatted.
pub fn run(args: &GenerateArgs, output_format: OutputFormat) -> Result<ExitCode> {
    let (report, code) = execute(args)?;
    println!("{}", format_output(&report, output_format)?);
    Ok(code)
}
