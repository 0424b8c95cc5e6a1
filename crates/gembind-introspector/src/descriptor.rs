//! Plugin descriptor (`gem.json`) and project manifest (`project.json`) parsing.

use gembind_core::{Error, PluginDescriptor, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of a plugin descriptor.
pub const DESCRIPTOR_FILE: &str = "gem.json";

/// File name of a project manifest.
pub const PROJECT_FILE: &str = "project.json";

/// A reference that is written either as a bare name or as `{ "name": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NameEntry {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
    },
    Other(Value),
}

impl NameEntry {
    fn into_name(self) -> Option<String> {
        match self {
            Self::Name(name) | Self::Object { name: Some(name) } if !name.is_empty() => Some(name),
            _ => None,
        }
    }
}

fn names(entries: Vec<NameEntry>) -> Vec<String> {
    entries.into_iter().filter_map(NameEntry::into_name).collect()
}

fn strings(values: Vec<Value>) -> impl Iterator<Item = String> {
    values
        .into_iter()
        .filter_map(|value| value.as_str().map(str::to_string))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DescriptorDocument {
    gem_name: Option<String>,
    name: Option<String>,
    display_name: Option<String>,
    version: Option<String>,
    summary: Option<String>,
    dependencies: Vec<NameEntry>,
    module_names: Vec<NameEntry>,
    user_tags: Vec<Value>,
    canonical_tags: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProjectDocument {
    project_name: Option<String>,
    gem_names: Vec<NameEntry>,
}

/// Plugins requested by a consuming project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
    /// Project name; falls back to the project directory name
    pub name: String,
    /// Active plugin names, in manifest order
    pub plugins: Vec<String>,
}

/// Parses a plugin descriptor from text.
///
/// `path` is the descriptor file; its parent directory is recorded on the
/// descriptor and supplies the name when neither `gem_name` nor `name` is
/// present. The result is marked loaded but not active.
///
/// # Errors
///
/// Returns [`Error::DescriptorError`] if the text is not a JSON object of
/// the expected shape.
///
/// # Examples
///
/// ```
/// use gembind_introspector::parse_descriptor;
///
/// let plugin = parse_descriptor(r#"{
///     "gem_name": "Vehicle",
///     "dependencies": ["PhysX", {"name": "Atom"}, {"version": "1.0"}]
/// }"#, "Gems/Vehicle/gem.json").unwrap();
///
/// assert_eq!(plugin.name, "Vehicle");
/// assert_eq!(plugin.version, "1.0.0");
/// assert_eq!(plugin.dependencies, vec!["PhysX", "Atom"]);
/// assert!(plugin.is_loaded);
/// ```
pub fn parse_descriptor(text: &str, path: impl AsRef<Path>) -> Result<PluginDescriptor> {
    let path = path.as_ref();
    let document: DescriptorDocument =
        serde_json::from_str(text).map_err(|e| Error::DescriptorError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let name = document
        .gem_name
        .or(document.name)
        .filter(|name| !name.is_empty())
        .or_else(|| directory_name(&directory))
        .ok_or_else(|| Error::DescriptorError {
            path: path.to_path_buf(),
            message: "descriptor has no name".to_string(),
        })?;

    let mut descriptor = PluginDescriptor::new(name).with_path(directory).loaded(true);
    if let Some(display_name) = document.display_name.filter(|n| !n.is_empty()) {
        descriptor.display_name = display_name;
    }
    if let Some(version) = document.version.filter(|v| !v.is_empty()) {
        descriptor.version = version;
    }
    descriptor.summary = document.summary.unwrap_or_default();
    descriptor.dependencies = names(document.dependencies);
    descriptor.module_names = names(document.module_names);
    descriptor.tags = strings(document.user_tags)
        .chain(strings(document.canonical_tags))
        .collect();

    debug!(
        "Parsed plugin descriptor '{}' ({} dependencies)",
        descriptor.name,
        descriptor.dependencies.len()
    );
    Ok(descriptor)
}

/// Reads and parses a plugin descriptor file.
///
/// # Errors
///
/// Returns [`Error::IoError`] if the file cannot be read, or
/// [`Error::DescriptorError`] if it cannot be parsed.
pub fn load_descriptor(path: impl AsRef<Path>) -> Result<PluginDescriptor> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_descriptor(&text, path)
}

/// Reads the `gem_name` (or `name`) field of a descriptor without building it.
pub(crate) fn peek_descriptor_name(path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    let document: DescriptorDocument = serde_json::from_str(&text).ok()?;
    document.gem_name.or(document.name)
}

/// Reads `project.json` from a project directory.
///
/// # Errors
///
/// Returns [`Error::IoError`] if the manifest is missing or unreadable and
/// [`Error::InvalidDocument`] if it cannot be parsed.
pub fn load_project_manifest(project_dir: impl AsRef<Path>) -> Result<ProjectManifest> {
    let project_dir = project_dir.as_ref();
    let path = project_dir.join(PROJECT_FILE);
    let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;

    let document: ProjectDocument =
        serde_json::from_str(&text).map_err(|e| Error::InvalidDocument {
            path: path.clone(),
            message: format!("failed to parse {PROJECT_FILE}: {e}"),
            source: Some(e),
        })?;

    Ok(ProjectManifest {
        name: document
            .project_name
            .filter(|name| !name.is_empty())
            .or_else(|| directory_name(project_dir))
            .unwrap_or_default(),
        plugins: names(document.gem_names),
    })
}

fn directory_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// Descriptor path for a plugin directory.
#[must_use]
pub fn descriptor_path(plugin_dir: &Path) -> PathBuf {
    plugin_dir.join(DESCRIPTOR_FILE)
}
