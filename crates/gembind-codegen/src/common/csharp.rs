//! C# naming, type mapping and escaping utilities.
//!
//! # Examples
//!
//! ```
//! use gembind_codegen::common::csharp;
//!
//! assert_eq!(csharp::map_type("AZ::Vector3&"), "Vector3");
//! assert_eq!(csharp::map_type("AZ::u32"), "uint");
//! assert_eq!(csharp::to_pascal_case("get_world_tm"), "GetWorldTm");
//! assert_eq!(csharp::to_camel_case("EntityId"), "entityId");
//! assert_eq!(csharp::escape_keyword("event"), "@event");
//! ```

/// Reserved C# keywords. Identifiers equal to one of these are prefixed with `@`.
pub const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

const FILENAME_INVALID: &[char] = &[':', '<', '>', '|', '?', '*', '/', '\\', '"'];

fn lookup_type(type_name: &str) -> Option<&'static str> {
    let mapped = match type_name {
        "Vector3" | "AZ::Vector3" => "Vector3",
        "Quaternion" | "AZ::Quaternion" => "Quaternion",
        "Transform" | "AZ::Transform" => "Transform",
        "EntityId" | "AZ::EntityId" => "EntityId",
        "AZStd::string" | "string" => "string",
        "bool" => "bool",
        "int" | "int32" | "AZ::s32" => "int",
        "float" => "float",
        "double" => "double",
        "int8" | "AZ::s8" => "sbyte",
        "int16" | "AZ::s16" => "short",
        "int64" | "AZ::s64" => "long",
        "uint8" | "AZ::u8" => "byte",
        "uint16" | "AZ::u16" => "ushort",
        "uint32" | "AZ::u32" => "uint",
        "uint64" | "AZ::u64" => "ulong",
        "void" => "void",
        "object" => "object",
        _ => return None,
    };
    Some(mapped)
}

/// Translates a reflected type name into a C# type name.
///
/// Tries the name as given, then without pointer/reference markers and a
/// leading `const`, then without an `AZ::` or `AZStd::` prefix. Unmapped
/// names pass through with keywords escaped; an empty name maps to `object`.
///
/// # Examples
///
/// ```
/// use gembind_codegen::common::csharp::map_type;
///
/// assert_eq!(map_type("const AZ::EntityId&"), "EntityId");
/// assert_eq!(map_type("AZStd::string"), "string");
/// assert_eq!(map_type("AZ::Aabb"), "Aabb");
/// assert_eq!(map_type("RigidBody*"), "RigidBody");
/// ```
#[must_use]
pub fn map_type(type_name: &str) -> String {
    if let Some(mapped) = lookup_type(type_name) {
        return mapped.to_string();
    }

    let cleaned = type_name.replace(['*', '&'], "");
    let cleaned = cleaned.trim();
    let cleaned = cleaned.strip_prefix("const ").unwrap_or(cleaned).trim();
    if let Some(mapped) = lookup_type(cleaned) {
        return mapped.to_string();
    }

    let unqualified = cleaned
        .strip_prefix("AZ::")
        .or_else(|| cleaned.strip_prefix("AZStd::"))
        .unwrap_or(cleaned);
    if let Some(mapped) = lookup_type(unqualified) {
        return mapped.to_string();
    }
    if unqualified.is_empty() {
        return "object".to_string();
    }

    escape_keyword(unqualified)
}

/// Prefixes `name` with `@` when it is a reserved keyword.
#[must_use]
pub fn escape_keyword(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("@{name}")
    } else {
        name.to_string()
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect()
    })
}

/// Converts a name to PascalCase.
///
/// Names containing `_` are split and each non-empty segment is
/// capitalized; other names only get their first character uppercased.
///
/// # Examples
///
/// ```
/// use gembind_codegen::common::csharp::to_pascal_case;
///
/// assert_eq!(to_pascal_case("set_linear_velocity"), "SetLinearVelocity");
/// assert_eq!(to_pascal_case("getMass"), "GetMass");
/// assert_eq!(to_pascal_case("__private"), "Private");
/// assert_eq!(to_pascal_case(""), "");
/// ```
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    if name.contains('_') {
        return name.split('_').filter(|s| !s.is_empty()).map(capitalize).collect();
    }
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Converts a name to camelCase.
#[must_use]
pub fn to_camel_case(name: &str) -> String {
    let pascal = to_pascal_case(name);
    let mut chars = pascal.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

/// C# parameter name for a reflected parameter.
///
/// Unnamed parameters become `arg{index}`.
///
/// # Examples
///
/// ```
/// use gembind_codegen::common::csharp::parameter_name;
///
/// assert_eq!(parameter_name("EntityId", 0), "entityId");
/// assert_eq!(parameter_name("Object", 1), "@object");
/// assert_eq!(parameter_name("", 2), "arg2");
/// ```
#[must_use]
pub fn parameter_name(name: &str, index: usize) -> String {
    let camel = to_camel_case(name);
    if camel.is_empty() {
        format!("arg{index}")
    } else {
        escape_keyword(&camel)
    }
}

/// Escapes text for XML documentation and project files.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escapes text for a C# string literal.
///
/// # Examples
///
/// ```
/// use gembind_codegen::common::csharp::escape_string_literal;
///
/// assert_eq!(escape_string_literal(r#"Use "Foo" instead"#), r#"Use \"Foo\" instead"#);
/// ```
#[must_use]
pub fn escape_string_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
}

/// Replaces characters that are invalid in file names with `_`.
#[must_use]
pub fn safe_filename(name: &str) -> String {
    name.replace(FILENAME_INVALID, "_")
}

/// Replaces every character that cannot appear in an identifier with `_`.
#[must_use]
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Namespace of a plugin's bindings.
///
/// # Examples
///
/// ```
/// use gembind_codegen::common::csharp::plugin_namespace;
///
/// assert_eq!(plugin_namespace("O3DE.Generated", "Atom_RPI"), "O3DE.Generated.Atom.RPI");
/// assert_eq!(plugin_namespace("O3DE.Generated", "Foo-_Bar"), "O3DE.Generated.Foo.Bar");
/// ```
#[must_use]
pub fn plugin_namespace(root: &str, plugin: &str) -> String {
    let mut clean = plugin.replace(['_', '-'], ".");
    while clean.contains("..") {
        clean = clean.replace("..", ".");
    }
    let clean = clean.trim_matches('.');
    if clean.is_empty() {
        root.to_string()
    } else {
        format!("{root}.{clean}")
    }
}

/// Bucket name of a category; the empty category folds into `Core`.
#[must_use]
pub fn category_bucket(category: &str) -> &str {
    if category.is_empty() { "Core" } else { category }
}

/// File stem of a category bucket.
///
/// A stem never contains `.`, so it cannot produce the dotted names of the
/// bus and free-function files in the same directory.
///
/// # Examples
///
/// ```
/// use gembind_codegen::common::csharp::category_file_stem;
///
/// assert_eq!(category_file_stem(""), "Core");
/// assert_eq!(category_file_stem("Atom/Rendering"), "AtomRendering");
/// assert_eq!(category_file_stem("physics"), "Physics");
/// assert_eq!(category_file_stem("Vehicle.EBus"), "VehicleEbus");
/// ```
#[must_use]
pub fn category_file_stem(category: &str) -> String {
    to_pascal_case(&safe_filename(category_bucket(category)).replace('.', "_"))
}

/// Sub-namespace of a category, or `None` for the core bucket.
///
/// Each `/` segment becomes one namespace level.
///
/// # Examples
///
/// ```
/// use gembind_codegen::common::csharp::category_namespace;
///
/// assert_eq!(category_namespace("Atom/Rendering").as_deref(), Some("Atom.Rendering"));
/// assert_eq!(category_namespace("Rigid Body").as_deref(), Some("RigidBody"));
/// assert_eq!(category_namespace("Core"), None);
/// assert_eq!(category_namespace(""), None);
/// ```
#[must_use]
pub fn category_namespace(category: &str) -> Option<String> {
    if category_bucket(category) == "Core" {
        return None;
    }
    let segments: Vec<String> = category
        .split('/')
        .map(|segment| to_pascal_case(&sanitize_identifier(segment.trim())))
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if segment.starts_with(|c: char| c.is_ascii_digit()) {
                format!("_{segment}")
            } else {
                segment
            }
        })
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("."))
    }
}
