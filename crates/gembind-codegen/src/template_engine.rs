//! Template engine for project and solution files using Handlebars.
//!
//! C# sources are assembled line by line; the XML project descriptors,
//! `AssemblyInfo.cs` and the solution file come from built-in templates.
//!
//! # Examples
//!
//! ```
//! use gembind_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let engine = TemplateEngine::new().unwrap();
//! let sln = engine.render("solution/sln", &json!({"projects": []})).unwrap();
//! assert!(sln.contains("Format Version 12.00"));
//! ```

use gembind_core::{Error, Result};
use handlebars::Handlebars;
use serde::Serialize;

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("project/csproj", include_str!("../templates/csproj.hbs")),
    ("project/assembly_info", include_str!("../templates/assembly_info.hbs")),
    ("solution/sln", include_str!("../templates/sln.hbs")),
];

/// Template engine for auxiliary build artifacts.
///
/// Strict mode is enabled, so a template referring to a missing field
/// fails to render instead of producing an empty string. Output is not
/// HTML-escaped; callers escape XML and string literals themselves.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Creates a new template engine with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if a built-in template fails to parse.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        let mut engine = Self { handlebars };
        for (name, source) in BUILTIN_TEMPLATES {
            engine.register_template_string(name, source)?;
        }
        Ok(engine)
    }

    /// Renders a template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the template is not registered,
    /// the context cannot be serialized, or rendering fails.
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| template_error(template_name, e.to_string()))
    }

    /// Registers a custom template, replacing any template with that name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateError`] if the template string is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use gembind_codegen::template_engine::TemplateEngine;
    ///
    /// let mut engine = TemplateEngine::new().unwrap();
    /// engine.register_template_string("custom", "// {{name}}").unwrap();
    /// let out = engine.render("custom", &serde_json::json!({"name": "x"})).unwrap();
    /// assert_eq!(out, "// x");
    /// ```
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| template_error(name, format!("failed to parse: {e}")))
    }

    /// Returns `true` if a template with this name is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}

fn template_error(template: &str, message: String) -> Error {
    Error::TemplateError {
        template: template.to_string(),
        message,
    }
}
