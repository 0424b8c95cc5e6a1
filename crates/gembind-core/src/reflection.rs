//! In-memory reflection model.
//!
//! Mirrors the structured reflection document exported by the native
//! engine: classes, event buses, free functions and free properties.
//! Every type deserializes with defaults for absent optional fields, so a
//! sparse document never fails to load. Return and value types default to
//! the `void` / `object` sentinels and are never left undefined.
//!
//! The model is read-only after loading except for the `source_gem_name`
//! annotations written by the ownership pass.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Sentinel type name for "no return value".
pub const VOID_TYPE: &str = "void";

/// Sentinel type name for an untyped value.
pub const OBJECT_TYPE: &str = "object";

/// A typed slot: method parameter, return type, property value or bus address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectedParameter {
    /// Parameter name (empty for return and value types)
    pub name: String,
    /// Symbolic source type, e.g. `AZ::Vector3`
    pub type_name: String,
    /// Native type identifier, if exported
    pub type_id: String,
    /// Passed by pointer
    pub is_pointer: bool,
    /// Passed by reference
    pub is_reference: bool,
    /// Const-qualified
    pub is_const: bool,
    /// Marshalling category reported by the exporter
    pub marshal_type: String,
}

impl ReflectedParameter {
    /// Creates a parameter with the given name and type and no flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use gembind_core::ReflectedParameter;
    ///
    /// let p = ReflectedParameter::new("speed", "float");
    /// assert_eq!(p.type_name, "float");
    /// assert!(!p.is_pointer);
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// The `void` sentinel used as a default return type.
    #[must_use]
    pub fn void() -> Self {
        Self::new("", VOID_TYPE)
    }

    /// The `object` sentinel used as a default value type.
    #[must_use]
    pub fn object() -> Self {
        Self::new("", OBJECT_TYPE)
    }

    /// Returns `true` if this slot carries no value.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.type_name == VOID_TYPE
    }
}

impl Default for ReflectedParameter {
    fn default() -> Self {
        Self {
            name: String::new(),
            type_name: OBJECT_TYPE.to_string(),
            type_id: String::new(),
            is_pointer: false,
            is_reference: false,
            is_const: false,
            marshal_type: "Unknown".to_string(),
        }
    }
}

/// A reflected method, constructor or free function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectedMethod {
    /// Method name
    pub name: String,
    /// Owning class name; empty for free functions
    pub class_name: String,
    /// Static (no instance handle)
    pub is_static: bool,
    /// Const member function
    pub is_const: bool,
    /// Return type; `void` when absent
    pub return_type: ReflectedParameter,
    /// Ordered parameter list
    pub parameters: Vec<ReflectedParameter>,
    /// Documentation text
    pub description: String,
    /// Category path, e.g. `Atom/Rendering`
    pub category: String,
    /// Deprecated in the native API
    pub is_deprecated: bool,
    /// Deprecation message; empty means "use the generic message"
    pub deprecation_message: String,
    /// Owning plugin, filled by the ownership pass
    pub source_gem_name: String,
}

impl ReflectedMethod {
    /// Creates a method with a `void` return type and no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for ReflectedMethod {
    fn default() -> Self {
        Self {
            name: String::new(),
            class_name: String::new(),
            is_static: false,
            is_const: false,
            return_type: ReflectedParameter::void(),
            parameters: Vec::new(),
            description: String::new(),
            category: String::new(),
            is_deprecated: false,
            deprecation_message: String::new(),
            source_gem_name: String::new(),
        }
    }
}

/// A reflected property or free property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectedProperty {
    /// Property name
    pub name: String,
    /// Owning class name; empty for free properties
    pub class_name: String,
    /// Value type; `object` when absent
    pub value_type: ReflectedParameter,
    /// Readable
    pub has_getter: bool,
    /// Writable
    pub has_setter: bool,
    /// Static property
    pub is_static: bool,
    /// Documentation text
    pub description: String,
    /// Category path
    pub category: String,
    /// Deprecated in the native API
    pub is_deprecated: bool,
    /// Deprecation message; empty means "use the generic message"
    pub deprecation_message: String,
    /// Owning plugin, filled by the ownership pass
    pub source_gem_name: String,
}

impl ReflectedProperty {
    /// Creates a read/write property of the given type.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: ReflectedParameter::new("", type_name),
            ..Self::default()
        }
    }
}

impl Default for ReflectedProperty {
    fn default() -> Self {
        Self {
            name: String::new(),
            class_name: String::new(),
            value_type: ReflectedParameter::object(),
            has_getter: true,
            has_setter: true,
            is_static: false,
            description: String::new(),
            category: String::new(),
            is_deprecated: false,
            deprecation_message: String::new(),
            source_gem_name: String::new(),
        }
    }
}

/// A callable event on an event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectedEBusEvent {
    /// Event name
    pub name: String,
    /// Owning bus name, filled at load time
    pub bus_name: String,
    /// Return type; `void` when absent
    pub return_type: ReflectedParameter,
    /// Ordered parameter list
    pub parameters: Vec<ReflectedParameter>,
    /// Broadcast (no address) event
    pub is_broadcast: bool,
    /// Documentation text
    pub description: String,
    /// Category path
    pub category: String,
    /// Deprecated in the native API
    pub is_deprecated: bool,
    /// Deprecation message; empty means "use the generic message"
    pub deprecation_message: String,
}

impl ReflectedEBusEvent {
    /// Creates a broadcast event with a `void` return type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for ReflectedEBusEvent {
    fn default() -> Self {
        Self {
            name: String::new(),
            bus_name: String::new(),
            return_type: ReflectedParameter::void(),
            parameters: Vec::new(),
            is_broadcast: true,
            description: String::new(),
            category: String::new(),
            is_deprecated: false,
            deprecation_message: String::new(),
        }
    }
}

/// A reflected event bus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectedEBus {
    /// Bus name (unique key)
    pub name: String,
    /// Native type identifier
    pub type_id: String,
    /// Address type; `Some` only for addressed buses
    pub address_type: Option<ReflectedParameter>,
    /// Events exposed by the bus
    pub events: Vec<ReflectedEBusEvent>,
    /// Documentation text
    pub description: String,
    /// Category path
    pub category: String,
    /// Owning plugin, filled by the ownership pass
    pub source_gem_name: String,
}

impl ReflectedEBus {
    /// Creates an empty broadcast bus.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if the bus requires a target address.
    #[must_use]
    pub const fn is_addressed(&self) -> bool {
        self.address_type.is_some()
    }
}

/// A reflected class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectedClass {
    /// Class name (unique key)
    pub name: String,
    /// Native type identifier
    pub type_id: String,
    /// Base class; only the first declared base is kept
    #[serde(
        rename = "base_classes",
        deserialize_with = "first_base_class",
        serialize_with = "base_class_list"
    )]
    pub base_class: Option<String>,
    /// Instance and static methods
    pub methods: Vec<ReflectedMethod>,
    /// Properties
    pub properties: Vec<ReflectedProperty>,
    /// Constructors
    pub constructors: Vec<ReflectedMethod>,
    /// Documentation text
    pub description: String,
    /// Category path
    pub category: String,
    /// Deprecated in the native API
    pub is_deprecated: bool,
    /// Owning plugin, filled by the ownership pass
    pub source_gem_name: String,
}

impl ReflectedClass {
    /// Creates an empty class.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the category (builder style).
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

// Multiple inheritance is not modelled: the first declared base wins, and
// an empty first entry means no base.
fn first_base_class<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let bases = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    if bases.len() > 1 {
        tracing::debug!(
            "Dropping {} additional base classes after '{}'",
            bases.len() - 1,
            bases[0]
        );
    }
    Ok(bases.into_iter().next().filter(|base| !base.is_empty()))
}

fn base_class_list<S>(base: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let list: Vec<&String> = base.iter().collect();
    list.serialize(serializer)
}

/// All reflected symbols of one generation run.
///
/// Classes and buses are keyed by name; iteration is in name order, which
/// keeps every downstream pass deterministic.
///
/// # Examples
///
/// ```
/// use gembind_core::{ReflectedClass, ReflectedMethod, ReflectionData};
///
/// let mut data = ReflectionData::new();
/// let mut class = ReflectedClass::new("PhysXRigidBody");
/// class.methods.push(ReflectedMethod::new("GetMass"));
/// data.insert_class(class);
///
/// assert_eq!(data.class_count(), 1);
/// assert_eq!(data.class("PhysXRigidBody").unwrap().methods[0].class_name, "PhysXRigidBody");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionData {
    /// Classes keyed by name
    pub classes: BTreeMap<String, ReflectedClass>,
    /// Event buses keyed by name
    pub ebuses: BTreeMap<String, ReflectedEBus>,
    /// Free functions
    pub global_methods: Vec<ReflectedMethod>,
    /// Free properties
    pub global_properties: Vec<ReflectedProperty>,
}

impl ReflectionData {
    /// Creates an empty reflection set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a class, filling member back-references.
    ///
    /// Returns the previous class with the same name, if any.
    pub fn insert_class(&mut self, mut class: ReflectedClass) -> Option<ReflectedClass> {
        for member in class.methods.iter_mut().chain(class.constructors.iter_mut()) {
            if member.class_name.is_empty() {
                member.class_name.clone_from(&class.name);
            }
        }
        for property in &mut class.properties {
            if property.class_name.is_empty() {
                property.class_name.clone_from(&class.name);
            }
        }
        self.classes.insert(class.name.clone(), class)
    }

    /// Inserts a bus, filling event back-references.
    ///
    /// Returns the previous bus with the same name, if any.
    pub fn insert_ebus(&mut self, mut ebus: ReflectedEBus) -> Option<ReflectedEBus> {
        for event in &mut ebus.events {
            if event.bus_name.is_empty() {
                event.bus_name.clone_from(&ebus.name);
            }
        }
        self.ebuses.insert(ebus.name.clone(), ebus)
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&ReflectedClass> {
        self.classes.get(name)
    }

    /// Looks up a bus by name.
    #[must_use]
    pub fn ebus(&self, name: &str) -> Option<&ReflectedEBus> {
        self.ebuses.get(name)
    }

    /// Number of classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of event buses.
    #[must_use]
    pub fn ebus_count(&self) -> usize {
        self.ebuses.len()
    }

    /// Returns `true` if the set holds no symbols at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.ebuses.is_empty()
            && self.global_methods.is_empty()
            && self.global_properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parameter_defaults_to_object() {
        let p: ReflectedParameter = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(p.type_name, OBJECT_TYPE);
        assert_eq!(p.marshal_type, "Unknown");
    }

    #[test]
    fn test_method_defaults_to_void() {
        let m: ReflectedMethod = serde_json::from_value(json!({"name": "Tick"})).unwrap();
        assert!(m.return_type.is_void());
        assert!(m.parameters.is_empty());
        assert!(!m.is_static);
    }

    #[test]
    fn test_property_defaults() {
        let p: ReflectedProperty = serde_json::from_value(json!({"name": "Mass"})).unwrap();
        assert_eq!(p.value_type.type_name, OBJECT_TYPE);
        assert!(p.has_getter);
        assert!(p.has_setter);
    }

    #[test]
    fn test_event_defaults_to_broadcast() {
        let e: ReflectedEBusEvent = serde_json::from_value(json!({"name": "OnTick"})).unwrap();
        assert!(e.is_broadcast);
        assert!(e.return_type.is_void());
    }

    #[test]
    fn test_first_base_class_wins() {
        let c: ReflectedClass = serde_json::from_value(json!({
            "name": "Derived",
            "base_classes": ["First", "Second"]
        }))
        .unwrap();
        assert_eq!(c.base_class.as_deref(), Some("First"));
    }

    #[test]
    fn test_empty_first_base_means_no_base() {
        let c: ReflectedClass = serde_json::from_value(json!({
            "name": "Derived",
            "base_classes": ["", "Second"]
        }))
        .unwrap();
        assert!(c.base_class.is_none());
    }

    #[test]
    fn test_missing_base_classes() {
        let c: ReflectedClass = serde_json::from_value(json!({"name": "Plain"})).unwrap();
        assert!(c.base_class.is_none());

        let c: ReflectedClass =
            serde_json::from_value(json!({"name": "Plain", "base_classes": []})).unwrap();
        assert!(c.base_class.is_none());
    }

    #[test]
    fn test_base_class_serializes_as_list() {
        let mut c = ReflectedClass::new("Derived");
        c.base_class = Some("Base".to_string());
        let value = serde_json::to_value(&c).unwrap();
        assert_eq!(value["base_classes"], json!(["Base"]));
    }

    #[test]
    fn test_insert_ebus_fills_bus_name() {
        let mut data = ReflectionData::new();
        let mut bus = ReflectedEBus::new("TickBus");
        bus.events.push(ReflectedEBusEvent::new("OnTick"));
        data.insert_ebus(bus);
        assert_eq!(data.ebus("TickBus").unwrap().events[0].bus_name, "TickBus");
    }

    #[test]
    fn test_insert_class_replaces_duplicate() {
        let mut data = ReflectionData::new();
        assert!(data.insert_class(ReflectedClass::new("A")).is_none());
        let previous = data.insert_class(ReflectedClass::new("A").with_category("Math"));
        assert!(previous.is_some());
        assert_eq!(data.class_count(), 1);
        assert_eq!(data.class("A").unwrap().category, "Math");
    }

    #[test]
    fn test_addressed_bus() {
        let mut bus = ReflectedEBus::new("TransformBus");
        assert!(!bus.is_addressed());
        bus.address_type = Some(ReflectedParameter::new("", "EntityId"));
        assert!(bus.is_addressed());
    }
}
