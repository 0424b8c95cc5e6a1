//! Reflection document loader.
//!
//! The document has four top-level lists: `classes`, `ebuses`,
//! `global_methods` and `global_properties`. Any of them may be absent, and
//! every optional field inside falls back to its model default.

use gembind_core::{
    Error, ReflectedClass, ReflectedEBus, ReflectedMethod, ReflectedProperty, ReflectionData,
    Result,
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReflectionDocument {
    classes: Vec<ReflectedClass>,
    ebuses: Vec<ReflectedEBus>,
    global_methods: Vec<ReflectedMethod>,
    global_properties: Vec<ReflectedProperty>,
}

/// Loads a reflection document from disk.
///
/// # Errors
///
/// Returns [`Error::IoError`] if the file cannot be read and
/// [`Error::InvalidDocument`] if it is not a valid reflection document.
pub fn load_reflection(path: impl AsRef<Path>) -> Result<ReflectionData> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let data = parse_reflection(&text, path)?;

    info!(
        "Loaded reflection data: {} classes, {} EBuses, {} global methods, {} global properties",
        data.class_count(),
        data.ebus_count(),
        data.global_methods.len(),
        data.global_properties.len()
    );
    Ok(data)
}

/// Parses reflection document text.
///
/// `origin` only labels errors and diagnostics. Entries without a name are
/// skipped; a repeated class or bus name replaces the earlier entry.
///
/// # Errors
///
/// Returns [`Error::InvalidDocument`] if the text is not JSON or a present
/// field has the wrong shape.
///
/// # Examples
///
/// ```
/// use gembind_introspector::parse_reflection;
///
/// let data = parse_reflection(r#"{
///     "classes": [{
///         "name": "PhysXRigidBody",
///         "base_classes": ["RigidBody", "Component"],
///         "methods": [{"name": "GetMass", "return_type": {"type_name": "float"}}]
///     }],
///     "ebuses": [{"name": "TickBus", "events": [{"name": "OnTick"}]}]
/// }"#, "reflection.json").unwrap();
///
/// let class = data.class("PhysXRigidBody").unwrap();
/// assert_eq!(class.base_class.as_deref(), Some("RigidBody"));
/// assert_eq!(class.methods[0].return_type.type_name, "float");
/// assert_eq!(data.ebus("TickBus").unwrap().events[0].bus_name, "TickBus");
///
/// assert!(parse_reflection("not json", "bad.json").unwrap_err().is_invalid_document());
/// ```
pub fn parse_reflection(text: &str, origin: impl AsRef<Path>) -> Result<ReflectionData> {
    let origin = origin.as_ref();
    let document: ReflectionDocument =
        serde_json::from_str(text).map_err(|e| Error::InvalidDocument {
            path: origin.to_path_buf(),
            message: format!("failed to parse reflection data: {e}"),
            source: Some(e),
        })?;

    let mut data = ReflectionData::new();

    for class in document.classes {
        if class.name.is_empty() {
            warn!("Skipping unnamed class in {}", origin.display());
            continue;
        }
        let name = class.name.clone();
        if data.insert_class(class).is_some() {
            warn!("Duplicate class '{name}' in {}; keeping the last entry", origin.display());
        }
    }

    for ebus in document.ebuses {
        if ebus.name.is_empty() {
            warn!("Skipping unnamed EBus in {}", origin.display());
            continue;
        }
        let name = ebus.name.clone();
        if data.insert_ebus(ebus).is_some() {
            warn!("Duplicate EBus '{name}' in {}; keeping the last entry", origin.display());
        }
    }

    data.global_methods = document
        .global_methods
        .into_iter()
        .filter(|method| !method.name.is_empty())
        .collect();
    data.global_properties = document
        .global_properties
        .into_iter()
        .filter(|property| !property.name.is_empty())
        .collect();

    debug!("Parsed reflection document {}", origin.display());
    Ok(data)
}
