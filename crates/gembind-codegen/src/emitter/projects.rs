//! Build artifacts: project descriptors, assembly metadata and the solution.

use super::{BindingEmitter, ScopeLayout};
use crate::common::csharp::{escape_string_literal, safe_filename};
use crate::common::types::GeneratedFile;
use gembind_core::checksum::name_digest;
use gembind_core::{PluginDescriptor, Result};
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize)]
struct ProjectContext<'c> {
    target_framework: &'c str,
    assembly_name: &'c str,
    root_namespace: &'c str,
    references: &'c [String],
}

#[derive(Serialize)]
struct AssemblyInfoContext<'c> {
    header: &'c str,
    title: String,
    description: String,
    version: String,
}

#[derive(Serialize)]
struct SolutionContext<'c> {
    projects: &'c [SolutionProject],
}

/// One project listed in the generated solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionProject {
    /// Project name
    pub name: String,
    /// Project file path relative to the solution
    pub path: String,
    /// Braced project identifier
    pub guid: String,
}

impl SolutionProject {
    /// Creates an entry whose identifier is derived from `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            guid: project_guid(&name),
            path: path.into(),
            name,
        }
    }
}

/// Derives the solution identifier of a project from its name.
///
/// The same name always yields the same identifier, so successive
/// solutions diff cleanly.
///
/// # Examples
///
/// ```
/// use gembind_codegen::emitter::project_guid;
///
/// let guid = project_guid("PhysX");
/// assert_eq!(guid, project_guid("PhysX"));
/// assert_ne!(guid, project_guid("Atom"));
/// assert!(guid.starts_with('{') && guid.ends_with('}'));
/// assert_eq!(guid.len(), 38);
/// assert_eq!(guid, guid.to_uppercase());
/// ```
#[must_use]
pub fn project_guid(name: &str) -> String {
    let id = Uuid::from_bytes(name_digest(name));
    format!("{{{}}}", id.hyphenated()).to_uppercase()
}

impl BindingEmitter<'_> {
    /// Renders the project descriptor of a scope.
    ///
    /// The project's root namespace is the scope namespace; `references`
    /// are project file paths relative to this project.
    ///
    /// # Errors
    ///
    /// Returns [`gembind_core::Error::TemplateError`] if rendering fails.
    pub fn project_file(
        &self,
        layout: &ScopeLayout,
        project_name: &str,
        references: &[String],
    ) -> Result<GeneratedFile> {
        let context = ProjectContext {
            target_framework: &self.config.target_framework,
            assembly_name: project_name,
            root_namespace: &layout.namespace,
            references,
        };
        let content = self.templates.render("project/csproj", &context)?;
        Ok(GeneratedFile::new(
            layout.project_path(&project_file_name(project_name)),
            content,
        ))
    }

    /// Renders `AssemblyInfo.cs` for a plugin project.
    ///
    /// Title, description and version come from the descriptor when one is
    /// registered; otherwise the plugin name and version `1.0.0` are used.
    ///
    /// # Errors
    ///
    /// Returns [`gembind_core::Error::TemplateError`] if rendering fails.
    pub fn assembly_info(
        &self,
        layout: &ScopeLayout,
        plugin: Option<&PluginDescriptor>,
        name: &str,
    ) -> Result<GeneratedFile> {
        let context = AssemblyInfoContext {
            header: self.header(),
            title: escape_string_literal(plugin.map_or(name, |p| p.display_name.as_str())),
            description: escape_string_literal(plugin.map_or("", |p| p.summary.as_str())),
            version: escape_string_literal(plugin.map_or("1.0.0", |p| p.version.as_str())),
        };
        let content = self.templates.render("project/assembly_info", &context)?;
        Ok(GeneratedFile::new(layout.path("AssemblyInfo.cs"), content))
    }

    /// Renders the solution listing `projects` in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`gembind_core::Error::TemplateError`] if rendering fails.
    pub fn solution_file(&self, projects: &[SolutionProject]) -> Result<GeneratedFile> {
        let content = self
            .templates
            .render("solution/sln", &SolutionContext { projects })?;
        Ok(GeneratedFile::new(
            format!("{}.sln", safe_filename(&self.config.solution_name)),
            content,
        ))
    }
}

/// File name of a project descriptor.
pub(crate) fn project_file_name(project_name: &str) -> String {
    format!("{}.csproj", safe_filename(project_name))
}
