//! # Type Kinds
//!
//! The discriminant of a [`TypeSpec`](crate::TypeSpec). Built-in kinds have
//! fixed lowercase names; any other name is a host-registered custom kind.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of value a leaf accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeKind {
    Int,
    Float,
    String,
    Bool,
    Date,
    /// Untyped substructure: any value, no further checks.
    Array,
    /// Host object satisfying the `instanceof` option.
    Object,
    /// Named string filter.
    Filter,
    /// External resource handle, optionally of one resource type.
    Resource,
    /// No constraint at all; accepts null.
    Any,
    /// Host-registered kind.
    Custom(String),
}

impl TypeKind {
    /// Every built-in kind.
    pub const BUILTIN: [TypeKind; 10] = [
        TypeKind::Int,
        TypeKind::Float,
        TypeKind::String,
        TypeKind::Bool,
        TypeKind::Date,
        TypeKind::Array,
        TypeKind::Object,
        TypeKind::Filter,
        TypeKind::Resource,
        TypeKind::Any,
    ];

    /// Look up a built-in kind by name.
    pub fn builtin(name: &str) -> Option<TypeKind> {
        let kind = match name {
            "int" => TypeKind::Int,
            "float" => TypeKind::Float,
            "string" => TypeKind::String,
            "bool" => TypeKind::Bool,
            "date" => TypeKind::Date,
            "array" => TypeKind::Array,
            "object" => TypeKind::Object,
            "filter" => TypeKind::Filter,
            "resource" => TypeKind::Resource,
            "any" => TypeKind::Any,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(&self) -> &str {
        match self {
            TypeKind::Int => "int",
            TypeKind::Float => "float",
            TypeKind::String => "string",
            TypeKind::Bool => "bool",
            TypeKind::Date => "date",
            TypeKind::Array => "array",
            TypeKind::Object => "object",
            TypeKind::Filter => "filter",
            TypeKind::Resource => "resource",
            TypeKind::Any => "any",
            TypeKind::Custom(name) => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, TypeKind::Custom(_))
    }
}

impl From<String> for TypeKind {
    fn from(name: String) -> Self {
        TypeKind::builtin(&name).unwrap_or(TypeKind::Custom(name))
    }
}

impl From<&str> for TypeKind {
    fn from(name: &str) -> Self {
        TypeKind::builtin(name).unwrap_or_else(|| TypeKind::Custom(name.to_string()))
    }
}

impl From<TypeKind> for String {
    fn from(kind: TypeKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_round_trip() {
        for kind in TypeKind::BUILTIN {
            assert_eq!(TypeKind::builtin(kind.name()), Some(kind.clone()));
            assert!(!kind.is_custom());
        }
    }

    #[test]
    fn test_unknown_name_is_custom() {
        assert_eq!(TypeKind::from("money"), TypeKind::Custom("money".to_string()));
        assert_eq!(TypeKind::builtin("FLOAT"), None);
    }

    #[test]
    fn test_serde_as_name() {
        let json = serde_json::to_string(&TypeKind::Float).unwrap();
        assert_eq!(json, r#""float""#);
        let kind: TypeKind = serde_json::from_str(r#""money""#).unwrap();
        assert_eq!(kind, TypeKind::Custom("money".to_string()));
    }
}
