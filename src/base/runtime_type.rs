//! The value types a template expression can evaluate to.

use std::fmt;

use smol_str::SmolStr;

/// The runtime type a value is assumed to have.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RuntimeType {
    /// Nothing is known (`*`).
    #[default]
    Unknown,
    String,
    Number,
    Boolean,
    Date,
    Array,
    Object,
    Null,
    /// Host-specific type (`entry`, `asset`, ...).
    Named(SmolStr),
}

impl RuntimeType {
    /// Parse a type name as written in modifier and tag definitions.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "*" | "mixed" | "any" => RuntimeType::Unknown,
            "string" | "str" | "text" => RuntimeType::String,
            "number" | "int" | "integer" | "float" => RuntimeType::Number,
            "bool" | "boolean" => RuntimeType::Boolean,
            "date" | "datetime" | "carbon" => RuntimeType::Date,
            "array" | "list" | "collection" => RuntimeType::Array,
            "object" | "map" => RuntimeType::Object,
            "null" | "void" => RuntimeType::Null,
            other => RuntimeType::Named(SmolStr::from(other)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RuntimeType::Unknown => "*",
            RuntimeType::String => "string",
            RuntimeType::Number => "number",
            RuntimeType::Boolean => "boolean",
            RuntimeType::Date => "date",
            RuntimeType::Array => "array",
            RuntimeType::Object => "object",
            RuntimeType::Null => "null",
            RuntimeType::Named(name) => name,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, RuntimeType::Unknown)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, RuntimeType::Array)
    }

    /// Runtime type of a fieldtype handle.
    pub fn for_field_type(field_type: &str) -> Self {
        match field_type {
            "text" | "textarea" | "markdown" | "code" | "slug" | "template" | "color"
            | "video" | "link" | "html" | "select" | "radio" | "button_group" | "icon" => {
                RuntimeType::String
            }
            "integer" | "float" | "range" => RuntimeType::Number,
            "toggle" => RuntimeType::Boolean,
            "date" | "time" => RuntimeType::Date,
            "replicator" | "bard" | "grid" | "entries" | "terms" | "assets" | "users"
            | "collections" | "taxonomies" | "checkboxes" | "list" | "table" | "structures" => {
                RuntimeType::Array
            }
            "group" | "yaml" | "array" => RuntimeType::Object,
            _ => RuntimeType::Unknown,
        }
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
