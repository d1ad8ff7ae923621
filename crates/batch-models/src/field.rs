//! Field metadata for wire models.
//!
//! Each model declares a static table mapping its Rust field names to wire
//! keys, a type descriptor and a required flag. The table is the single
//! source of truth for which keys may appear on the wire.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Wire type descriptor for a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// JSON string
    Str,
    /// JSON integer
    Int,
    /// JSON boolean
    Bool,
    /// ISO-8601 duration carried as a string
    Duration,
    /// Enumeration carried as a string; payload is the model type name
    Enum(&'static str),
    /// Nested object; payload is the model type name
    Model(&'static str),
    /// Array of nested objects; payload is the element type name
    List(&'static str),
    /// Free-form JSON object
    Object,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Str => write!(f, "str"),
            FieldType::Int => write!(f, "int"),
            FieldType::Bool => write!(f, "bool"),
            FieldType::Duration => write!(f, "duration"),
            FieldType::Enum(name) | FieldType::Model(name) => write!(f, "{}", name),
            FieldType::List(name) => write!(f, "[{}]", name),
            FieldType::Object => write!(f, "object"),
        }
    }
}

/// One entry in a model's field map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Rust field name (snake_case)
    pub name: &'static str,
    /// JSON member key (camelCase)
    pub key: &'static str,
    /// Wire type
    pub ty: FieldType,
    /// Whether the member must be present
    pub required: bool,
}

impl FieldSpec {
    /// Optional field.
    pub const fn optional(name: &'static str, key: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            key,
            ty,
            required: false,
        }
    }

    /// Required field.
    pub const fn required(name: &'static str, key: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            key,
            ty,
            required: true,
        }
    }
}

/// A model with a declared wire field map.
pub trait WireModel: Serialize + DeserializeOwned {
    /// Model type name used in error messages.
    const MODEL_NAME: &'static str;

    /// Field map in declaration order.
    fn field_map() -> &'static [FieldSpec];

    /// Look up a field by its Rust name.
    fn field(name: &str) -> Option<&'static FieldSpec> {
        Self::field_map().iter().find(|spec| spec.name == name)
    }

    /// Look up a field by its wire key.
    fn field_by_key(key: &str) -> Option<&'static FieldSpec> {
        Self::field_map().iter().find(|spec| spec.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_display() {
        assert_eq!(FieldType::Str.to_string(), "str");
        assert_eq!(FieldType::Model("PoolInformation").to_string(), "PoolInformation");
        assert_eq!(FieldType::List("MetadataItem").to_string(), "[MetadataItem]");
    }

    #[test]
    fn test_const_constructors() {
        const ID: FieldSpec = FieldSpec::required("id", "id", FieldType::Str);
        assert!(ID.required);
        let name = FieldSpec::optional("display_name", "displayName", FieldType::Str);
        assert!(!name.required);
        assert_eq!(name.key, "displayName");
    }
}
