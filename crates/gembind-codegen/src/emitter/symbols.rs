//! Per-symbol C# rendering: classes, bus wrappers and free symbols.

use super::native::{BindingKey, NativeBindingPlan, argument_names, typed_parameters};
use super::writer::SourceWriter;
use crate::common::csharp::{
    escape_keyword, escape_string_literal, escape_xml, map_type, parameter_name, to_pascal_case,
};
use gembind_core::{
    GeneratorConfig, ReflectedClass, ReflectedEBus, ReflectedMethod, ReflectedProperty, Result,
};

const CLASS_DEPRECATED: &str = "This class is deprecated.";
const METHOD_DEPRECATED: &str = "This method is deprecated.";
const PROPERTY_DEPRECATED: &str = "This property is deprecated.";
const EVENT_DEPRECATED: &str = "This event is deprecated.";

/// Counts of rendered members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberCounts {
    /// Methods, constructors and free functions
    pub methods: u32,
    /// Properties and free properties
    pub properties: u32,
    /// Bus events
    pub events: u32,
}

impl MemberCounts {
    /// Adds `other` to these counts.
    pub const fn add(&mut self, other: Self) {
        self.methods += other.methods;
        self.properties += other.properties;
        self.events += other.events;
    }
}

/// Renders symbols with the options of one generation run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SymbolRenderer<'a> {
    config: &'a GeneratorConfig,
    plan: &'a NativeBindingPlan,
}

impl<'a> SymbolRenderer<'a> {
    pub(crate) const fn new(config: &'a GeneratorConfig, plan: &'a NativeBindingPlan) -> Self {
        Self { config, plan }
    }

    fn summary(&self, writer: &mut SourceWriter, text: &str) {
        if self.config.generate_docs && !text.is_empty() {
            writer.line("/// <summary>");
            writer.line(format!("/// {}", escape_xml(text)));
            writer.line("/// </summary>");
        }
    }

    fn obsolete(&self, writer: &mut SourceWriter, deprecated: bool, message: &str, fallback: &str) {
        if self.config.mark_obsolete && deprecated {
            let message = if message.is_empty() { fallback } else { message };
            writer.line(format!("[Obsolete(\"{}\")]", escape_string_literal(message)));
        }
    }

    /// Renders a class wrapper.
    pub(crate) fn class(&self, writer: &mut SourceWriter, class: &ReflectedClass) -> Result<MemberCounts> {
        let mut counts = MemberCounts::default();

        self.summary(writer, &class.description);
        self.obsolete(writer, class.is_deprecated, "", CLASS_DEPRECATED);

        let partial = if self.config.partial_classes { "partial " } else { "" };
        let base = class
            .base_class
            .as_deref()
            .map(|base| format!(" : {}", map_type(base)))
            .unwrap_or_default();
        let class_name = escape_keyword(&class.name);
        writer.open(format!("public {partial}class {class_name}{base}"));
        writer.line("private IntPtr _nativeHandle;");
        writer.blank();

        for (index, ctor) in class.constructors.iter().enumerate() {
            let binding = self.plan.name(&BindingKey::Constructor {
                class: class.name.clone(),
                index,
            })?;
            let parameters = typed_parameters(&ctor.parameters).join(", ");
            writer.open(format!("public {class_name}({parameters})"));
            writer.line(format!(
                "_nativeHandle = NativeMethods.{binding}({});",
                argument_names(&ctor.parameters).join(", ")
            ));
            writer.close();
            writer.blank();
            counts.methods += 1;
        }

        for (index, property) in class.properties.iter().enumerate() {
            if self.property(writer, class, index, property)? {
                writer.blank();
                counts.properties += 1;
            }
        }

        for (index, method) in class.methods.iter().enumerate() {
            let binding = self.plan.name(&BindingKey::Method {
                class: class.name.clone(),
                index,
            })?;
            self.method(writer, method, binding, !method.is_static);
            writer.blank();
            counts.methods += 1;
        }

        writer.trim_trailing_blank();
        writer.close();
        Ok(counts)
    }

    fn property(
        &self,
        writer: &mut SourceWriter,
        class: &ReflectedClass,
        index: usize,
        property: &ReflectedProperty,
    ) -> Result<bool> {
        if !property.has_getter && !property.has_setter {
            return Ok(false);
        }

        self.summary(writer, &property.description);
        self.obsolete(
            writer,
            property.is_deprecated,
            &property.deprecation_message,
            PROPERTY_DEPRECATED,
        );

        let modifier = if property.is_static { "static " } else { "" };
        let handle = if property.is_static { "" } else { "_nativeHandle" };
        writer.open(format!(
            "public {modifier}{} {}",
            map_type(&property.value_type.type_name),
            to_pascal_case(&property.name)
        ));
        if property.has_getter {
            let getter = self.plan.name(&BindingKey::Getter {
                class: class.name.clone(),
                index,
            })?;
            writer.line(format!("get => NativeMethods.{getter}({handle});"));
        }
        if property.has_setter {
            let setter = self.plan.name(&BindingKey::Setter {
                class: class.name.clone(),
                index,
            })?;
            let arguments = if handle.is_empty() {
                "value".to_string()
            } else {
                format!("{handle}, value")
            };
            writer.line(format!("set => NativeMethods.{setter}({arguments});"));
        }
        writer.close();
        Ok(true)
    }

    fn method(&self, writer: &mut SourceWriter, method: &ReflectedMethod, binding: &str, instance: bool) {
        if self.config.generate_docs {
            let description = if method.description.is_empty() {
                format!("{} method", method.name)
            } else {
                method.description.clone()
            };
            writer.line("/// <summary>");
            writer.line(format!("/// {}", escape_xml(&description)));
            writer.line("/// </summary>");
            for (i, parameter) in method.parameters.iter().enumerate() {
                writer.line(format!(
                    "/// <param name=\"{}\">Parameter of type {}</param>",
                    parameter_name(&parameter.name, i).trim_start_matches('@'),
                    escape_xml(&parameter.type_name)
                ));
            }
            if !method.return_type.is_void() {
                writer.line(format!(
                    "/// <returns>{}</returns>",
                    escape_xml(&method.return_type.type_name)
                ));
            }
        }
        self.obsolete(
            writer,
            method.is_deprecated,
            &method.deprecation_message,
            METHOD_DEPRECATED,
        );

        let modifier = if method.is_static || !instance { "static " } else { "" };
        let return_type = map_type(&method.return_type.type_name);
        writer.open(format!(
            "public {modifier}{return_type} {}({})",
            to_pascal_case(&method.name),
            typed_parameters(&method.parameters).join(", ")
        ));

        let mut arguments = Vec::new();
        if instance {
            arguments.push("_nativeHandle".to_string());
        }
        arguments.extend(argument_names(&method.parameters));
        writer.line(call_statement(&return_type, binding, &arguments));
        writer.close();
    }

    /// Renders a static bus wrapper class.
    pub(crate) fn ebus(&self, writer: &mut SourceWriter, ebus: &ReflectedEBus) -> Result<MemberCounts> {
        let mut counts = MemberCounts::default();

        self.summary(writer, &ebus.description);
        writer.open(format!("public static class {}", escape_keyword(&ebus.name)));

        for (index, event) in ebus.events.iter().enumerate() {
            let binding = self.plan.name(&BindingKey::Event {
                bus: ebus.name.clone(),
                index,
            })?;
            let address = ebus.address_type.as_ref().filter(|_| !event.is_broadcast);

            self.summary(writer, &event.description);
            self.obsolete(
                writer,
                event.is_deprecated,
                &event.deprecation_message,
                EVENT_DEPRECATED,
            );

            let mut parameters = Vec::new();
            let mut arguments = Vec::new();
            if let Some(address) = address {
                parameters.push(format!("{} address", map_type(&address.type_name)));
                arguments.push("address".to_string());
            }
            parameters.extend(typed_parameters(&event.parameters));
            arguments.extend(argument_names(&event.parameters));

            let prefix = if address.is_some() { "Event" } else { "Broadcast" };
            let return_type = map_type(&event.return_type.type_name);
            writer.open(format!(
                "public static {return_type} {prefix}{}({})",
                to_pascal_case(&event.name),
                parameters.join(", ")
            ));
            writer.line(call_statement(&return_type, binding, &arguments));
            writer.close();
            writer.blank();
            counts.events += 1;
        }

        writer.trim_trailing_blank();
        writer.close();
        Ok(counts)
    }

    /// Renders the `Globals` static class for free functions and properties.
    ///
    /// Items are `(index into the reflection list, symbol)` pairs.
    pub(crate) fn globals(
        &self,
        writer: &mut SourceWriter,
        methods: &[(usize, &ReflectedMethod)],
        properties: &[(usize, &ReflectedProperty)],
    ) -> Result<MemberCounts> {
        let mut counts = MemberCounts::default();

        writer.open("public static class Globals");

        for &(index, property) in properties {
            if !property.has_getter && !property.has_setter {
                continue;
            }
            self.summary(writer, &property.description);
            self.obsolete(
                writer,
                property.is_deprecated,
                &property.deprecation_message,
                PROPERTY_DEPRECATED,
            );
            writer.open(format!(
                "public static {} {}",
                map_type(&property.value_type.type_name),
                to_pascal_case(&property.name)
            ));
            if property.has_getter {
                let getter = self.plan.name(&BindingKey::GlobalGetter { index })?;
                writer.line(format!("get => NativeMethods.{getter}();"));
            }
            if property.has_setter {
                let setter = self.plan.name(&BindingKey::GlobalSetter { index })?;
                writer.line(format!("set => NativeMethods.{setter}(value);"));
            }
            writer.close();
            writer.blank();
            counts.properties += 1;
        }

        for &(index, method) in methods {
            let binding = self.plan.name(&BindingKey::GlobalMethod { index })?;
            self.method(writer, method, binding, false);
            writer.blank();
            counts.methods += 1;
        }

        writer.trim_trailing_blank();
        writer.close();
        Ok(counts)
    }
}

fn call_statement(return_type: &str, binding: &str, arguments: &[String]) -> String {
    let call = format!("NativeMethods.{binding}({});", arguments.join(", "));
    if return_type == "void" {
        call
    } else {
        format!("return {call}")
    }
}
