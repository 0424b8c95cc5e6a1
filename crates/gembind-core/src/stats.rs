//! Generation statistics.
//!
//! Counters collected while emitting bindings, aggregated per run and per
//! plugin. All types serialize to JSON for the CLI's `--format json` output.
//!
//! # Examples
//!
//! ```rust
//! use gembind_core::GenerationStats;
//!
//! let mut stats = GenerationStats::default();
//! stats.classes_generated += 2;
//! stats.plugin_mut("PhysX").classes_generated += 2;
//! stats.record_file("PhysX/Physics.cs");
//!
//! assert_eq!(stats.files_generated, 1);
//! assert_eq!(stats.plugin("PhysX").unwrap().classes_generated, 2);
//! ```

use serde::{Deserialize, Serialize};

/// Per-plugin generation counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginStats {
    /// Plugin name
    pub plugin: String,
    /// Classes emitted for the plugin
    pub classes_generated: u32,
    /// Event buses emitted for the plugin
    pub ebuses_generated: u32,
    /// Files produced for the plugin
    pub files_generated: u32,
    /// Relative paths of those files
    pub generated_files: Vec<String>,
}

impl PluginStats {
    /// Creates empty statistics for a plugin.
    #[must_use]
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            ..Self::default()
        }
    }

    /// Records a file produced for this plugin.
    pub fn record_file(&mut self, path: impl Into<String>) {
        self.files_generated += 1;
        self.generated_files.push(path.into());
    }
}

/// Aggregate statistics of one generation run.
///
/// Filled in as far as the run got: a failed run still reports the
/// counters reached before the failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Classes emitted
    pub classes_generated: u32,
    /// Event buses emitted
    pub ebuses_generated: u32,
    /// Methods emitted, including constructors and free functions
    pub methods_generated: u32,
    /// Properties emitted, including free properties
    pub properties_generated: u32,
    /// Bus events emitted
    pub events_generated: u32,
    /// Files produced in memory
    pub files_generated: u32,
    /// Files written to disk
    pub files_written: u32,
    /// Files left untouched because their content was unchanged
    pub files_skipped: u32,
    /// Plugins processed, in processing order
    pub processed_plugins: Vec<String>,
    /// Per-plugin counters, in processing order
    pub per_plugin: Vec<PluginStats>,
    /// Relative paths of every produced file
    pub generated_files: Vec<String>,
    /// Non-fatal diagnostics (cycles, ignored mappings, missing descriptors)
    pub warnings: Vec<String>,
}

impl GenerationStats {
    /// Creates empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a produced file.
    pub fn record_file(&mut self, path: impl Into<String>) {
        self.files_generated += 1;
        self.generated_files.push(path.into());
    }

    /// Records a non-fatal diagnostic.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Returns the counters of `plugin`, if it was processed.
    #[must_use]
    pub fn plugin(&self, plugin: &str) -> Option<&PluginStats> {
        self.per_plugin.iter().find(|p| p.plugin == plugin)
    }

    /// Returns the counters of `plugin`, creating them on first use.
    pub fn plugin_mut(&mut self, plugin: &str) -> &mut PluginStats {
        let index = match self.per_plugin.iter().position(|p| p.plugin == plugin) {
            Some(index) => index,
            None => {
                self.per_plugin.push(PluginStats::new(plugin));
                self.per_plugin.len() - 1
            }
        };
        &mut self.per_plugin[index]
    }

    /// Total number of emitted symbols of every kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gembind_core::GenerationStats;
    ///
    /// let stats = GenerationStats {
    ///     classes_generated: 3,
    ///     ebuses_generated: 1,
    ///     methods_generated: 10,
    ///     ..Default::default()
    /// };
    /// assert_eq!(stats.total_symbols(), 14);
    /// ```
    #[must_use]
    pub const fn total_symbols(&self) -> u32 {
        self.classes_generated
            + self.ebuses_generated
            + self.methods_generated
            + self.properties_generated
            + self.events_generated
    }
}
