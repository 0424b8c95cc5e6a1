//! Native-call binding names and the consolidated `InternalCalls.cs`.
//!
//! Every wrapper member forwards to a `NativeMethods.{Owner}_{Member}`
//! declaration. Names are planned once over the whole reflection set so
//! that overloads and sanitized collisions receive distinct names
//! (`Foo_Bar`, `Foo_Bar_2`, ...).

use super::writer::SourceWriter;
use crate::common::csharp::{map_type, parameter_name, sanitize_identifier};
use gembind_core::{Error, ReflectedParameter, ReflectionData, Result};
use std::collections::{BTreeMap, HashSet};

/// Identifies the wrapper member a native binding belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingKey {
    /// `index`-th constructor of a class
    Constructor {
        /// Class name
        class: String,
        /// Constructor index
        index: usize,
    },
    /// Property getter
    Getter {
        /// Class name
        class: String,
        /// Property index
        index: usize,
    },
    /// Property setter
    Setter {
        /// Class name
        class: String,
        /// Property index
        index: usize,
    },
    /// `index`-th method of a class
    Method {
        /// Class name
        class: String,
        /// Method index
        index: usize,
    },
    /// `index`-th event of a bus
    Event {
        /// Bus name
        bus: String,
        /// Event index
        index: usize,
    },
    /// Free function
    GlobalMethod {
        /// Index into the free function list
        index: usize,
    },
    /// Free property getter
    GlobalGetter {
        /// Index into the free property list
        index: usize,
    },
    /// Free property setter
    GlobalSetter {
        /// Index into the free property list
        index: usize,
    },
}

/// One `[MethodImpl(MethodImplOptions.InternalCall)]` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeBinding {
    /// Unique binding name
    pub name: String,
    /// C# return type
    pub return_type: String,
    /// C# parameters, already formatted as `Type name`
    pub parameters: Vec<String>,
}

impl NativeBinding {
    /// Renders the extern declaration.
    #[must_use]
    pub fn declaration(&self) -> String {
        format!(
            "[MethodImpl(MethodImplOptions.InternalCall)] internal static extern {} {}({});",
            self.return_type,
            self.name,
            self.parameters.join(", ")
        )
    }
}

/// Formats reflected parameters as `Type name` pairs.
pub(crate) fn typed_parameters(parameters: &[ReflectedParameter]) -> Vec<String> {
    parameters
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} {}", map_type(&p.type_name), parameter_name(&p.name, i)))
        .collect()
}

/// Call arguments for reflected parameters.
pub(crate) fn argument_names(parameters: &[ReflectedParameter]) -> Vec<String> {
    parameters
        .iter()
        .enumerate()
        .map(|(i, p)| parameter_name(&p.name, i))
        .collect()
}

/// Globally unique binding names for a reflection set.
#[derive(Debug, Clone, Default)]
pub struct NativeBindingPlan {
    bindings: Vec<NativeBinding>,
    index: BTreeMap<BindingKey, usize>,
    used: HashSet<String>,
}

impl NativeBindingPlan {
    /// Plans bindings for classes (sorted by name), then buses (sorted by
    /// name), then free functions and free properties.
    #[must_use]
    pub fn new(data: &ReflectionData) -> Self {
        let mut plan = Self::default();
        let instance = || vec!["IntPtr instance".to_string()];

        for class in data.classes.values() {
            for (index, ctor) in class.constructors.iter().enumerate() {
                plan.add(
                    BindingKey::Constructor {
                        class: class.name.clone(),
                        index,
                    },
                    &format!("{}_Create", class.name),
                    "IntPtr".to_string(),
                    typed_parameters(&ctor.parameters),
                );
            }

            for (index, property) in class.properties.iter().enumerate() {
                let value_type = map_type(&property.value_type.type_name);
                let receiver = if property.is_static { Vec::new() } else { instance() };
                if property.has_getter {
                    plan.add(
                        BindingKey::Getter {
                            class: class.name.clone(),
                            index,
                        },
                        &format!("{}_Get{}", class.name, property.name),
                        value_type.clone(),
                        receiver.clone(),
                    );
                }
                if property.has_setter {
                    let mut parameters = receiver;
                    parameters.push(format!("{value_type} value"));
                    plan.add(
                        BindingKey::Setter {
                            class: class.name.clone(),
                            index,
                        },
                        &format!("{}_Set{}", class.name, property.name),
                        "void".to_string(),
                        parameters,
                    );
                }
            }

            for (index, method) in class.methods.iter().enumerate() {
                let mut parameters = if method.is_static { Vec::new() } else { instance() };
                parameters.extend(typed_parameters(&method.parameters));
                plan.add(
                    BindingKey::Method {
                        class: class.name.clone(),
                        index,
                    },
                    &format!("{}_{}", class.name, method.name),
                    map_type(&method.return_type.type_name),
                    parameters,
                );
            }
        }

        for ebus in data.ebuses.values() {
            for (index, event) in ebus.events.iter().enumerate() {
                let mut parameters = Vec::new();
                if let Some(address) = ebus.address_type.as_ref().filter(|_| !event.is_broadcast) {
                    parameters.push(format!("{} address", map_type(&address.type_name)));
                }
                parameters.extend(typed_parameters(&event.parameters));
                plan.add(
                    BindingKey::Event {
                        bus: ebus.name.clone(),
                        index,
                    },
                    &format!("{}_{}", ebus.name, event.name),
                    map_type(&event.return_type.type_name),
                    parameters,
                );
            }
        }

        for (index, method) in data.global_methods.iter().enumerate() {
            plan.add(
                BindingKey::GlobalMethod { index },
                &format!("Global_{}", method.name),
                map_type(&method.return_type.type_name),
                typed_parameters(&method.parameters),
            );
        }

        for (index, property) in data.global_properties.iter().enumerate() {
            let value_type = map_type(&property.value_type.type_name);
            if property.has_getter {
                plan.add(
                    BindingKey::GlobalGetter { index },
                    &format!("Global_Get{}", property.name),
                    value_type.clone(),
                    Vec::new(),
                );
            }
            if property.has_setter {
                plan.add(
                    BindingKey::GlobalSetter { index },
                    &format!("Global_Set{}", property.name),
                    "void".to_string(),
                    vec![format!("{value_type} value")],
                );
            }
        }

        plan
    }

    fn add(&mut self, key: BindingKey, base: &str, return_type: String, parameters: Vec<String>) {
        let base = sanitize_identifier(base);
        let mut name = base.clone();
        let mut suffix = 2;
        while self.used.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.used.insert(name.clone());
        self.index.insert(key, self.bindings.len());
        self.bindings.push(NativeBinding {
            name,
            return_type,
            parameters,
        });
    }

    /// Binding name planned for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if no binding was planned for
    /// `key`, which means the plan was built from a different reflection set.
    pub fn name(&self, key: &BindingKey) -> Result<&str> {
        self.index
            .get(key)
            .map(|&i| self.bindings[i].name.as_str())
            .ok_or_else(|| Error::InvalidArgument(format!("no native binding planned for {key:?}")))
    }

    /// All bindings, in declaration order.
    #[must_use]
    pub fn bindings(&self) -> &[NativeBinding] {
        &self.bindings
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if nothing needs a native binding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Renders the `NativeMethods` class body into `writer`.
    pub(crate) fn write_declarations(&self, writer: &mut SourceWriter) {
        writer.line("/// <summary>");
        writer.line("/// Internal calls to native engine methods.");
        writer.line("/// These are registered by the native scripting module at startup.");
        writer.line("/// </summary>");
        writer.open("internal static class NativeMethods");
        for binding in &self.bindings {
            writer.line(binding.declaration());
        }
        writer.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gembind_core::{
        ReflectedClass, ReflectedEBus, ReflectedEBusEvent, ReflectedMethod, ReflectedProperty,
    };

    fn sample() -> ReflectionData {
        let mut body = ReflectedClass::new("RigidBody");
        body.constructors.push(ReflectedMethod::new(""));
        body.properties.push(ReflectedProperty::new("Mass", "float"));
        let mut apply = ReflectedMethod::new("ApplyImpulse");
        apply.parameters.push(ReflectedParameter::new("impulse", "AZ::Vector3"));
        body.methods.push(apply.clone());
        body.methods.push(apply);
        let mut create = ReflectedMethod::new("Create");
        create.is_static = true;
        body.methods.push(create);

        let mut transform = ReflectedEBus::new("TransformBus");
        transform.address_type = Some(ReflectedParameter::new("", "AZ::EntityId"));
        let mut get = ReflectedEBusEvent::new("GetWorldTM");
        get.is_broadcast = false;
        get.return_type = ReflectedParameter::new("", "AZ::Transform");
        transform.events.push(get);

        let mut data = ReflectionData::new();
        data.insert_class(body);
        data.insert_ebus(transform);
        data.global_methods.push(ReflectedMethod::new("Get Time"));
        data
    }

    #[test]
    fn test_overloads_get_suffixes() {
        let plan = NativeBindingPlan::new(&sample());
        let key = |index| BindingKey::Method {
            class: "RigidBody".to_string(),
            index,
        };
        assert_eq!(plan.name(&key(0)).unwrap(), "RigidBody_ApplyImpulse");
        assert_eq!(plan.name(&key(1)).unwrap(), "RigidBody_ApplyImpulse_2");
    }

    #[test]
    fn test_constructor_collides_with_static_create() {
        let plan = NativeBindingPlan::new(&sample());
        let ctor = BindingKey::Constructor {
            class: "RigidBody".to_string(),
            index: 0,
        };
        let create = BindingKey::Method {
            class: "RigidBody".to_string(),
            index: 2,
        };
        assert_eq!(plan.name(&ctor).unwrap(), "RigidBody_Create");
        assert_eq!(plan.name(&create).unwrap(), "RigidBody_Create_2");
    }

    #[test]
    fn test_names_are_sanitized() {
        let plan = NativeBindingPlan::new(&sample());
        assert_eq!(
            plan.name(&BindingKey::GlobalMethod { index: 0 }).unwrap(),
            "Global_Get_Time"
        );
    }

    #[test]
    fn test_declarations() {
        let plan = NativeBindingPlan::new(&sample());
        let declarations: Vec<String> = plan.bindings().iter().map(NativeBinding::declaration).collect();

        assert!(declarations.contains(
            &"[MethodImpl(MethodImplOptions.InternalCall)] internal static extern IntPtr RigidBody_Create();"
                .to_string()
        ));
        assert!(declarations.contains(
            &"[MethodImpl(MethodImplOptions.InternalCall)] internal static extern void RigidBody_SetMass(IntPtr instance, float value);"
                .to_string()
        ));
        assert!(declarations.contains(
            &"[MethodImpl(MethodImplOptions.InternalCall)] internal static extern void RigidBody_ApplyImpulse(IntPtr instance, Vector3 impulse);"
                .to_string()
        ));
        assert!(declarations.contains(
            &"[MethodImpl(MethodImplOptions.InternalCall)] internal static extern Transform TransformBus_GetWorldTM(EntityId address);"
                .to_string()
        ));
    }

    #[test]
    fn test_unknown_key() {
        let plan = NativeBindingPlan::new(&ReflectionData::new());
        assert!(plan.is_empty());
        assert!(plan.name(&BindingKey::GlobalMethod { index: 0 }).is_err());
    }

    #[test]
    fn test_plan_is_deterministic() {
        let a = NativeBindingPlan::new(&sample());
        let b = NativeBindingPlan::new(&sample());
        assert_eq!(a.bindings(), b.bindings());
        assert_eq!(a.len(), 8);
    }
}
