//! Type mapper: member type descriptors → Swagger schema fragments.
//!
//! A descriptor is the textual type of a member as written in the API
//! definition (`int64`, `[]*User`, `map[string]string`, `interface{}`). It is
//! classified once into a [`TypeDescriptor`], and every renderer works from
//! that classification.

use crate::swagger::Schema;

// ---------------------------------------------------------------------------
// Primitive kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Every integer narrower than 64 bits.
    Int,
    Int64,
    Bool,
    String,
    Float32,
    Float64,
}

impl PrimitiveKind {
    /// Resolve a scalar type name. Returns `None` if the name isn't a known
    /// primitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" | "int8" | "int16" | "int32" | "uint" | "uint8" | "uint16" | "uint32"
            | "byte" | "rune" => Some(Self::Int),
            "int64" | "uint64" => Some(Self::Int64),
            "bool" => Some(Self::Bool),
            "string" => Some(Self::String),
            "float32" => Some(Self::Float32),
            "float64" => Some(Self::Float64),
            _ => None,
        }
    }

    /// Swagger `(type, format)` pair. Strings carry no format.
    pub fn type_and_format(self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::Int => ("integer", Some("int32")),
            Self::Int64 => ("integer", Some("int64")),
            Self::Bool => ("boolean", Some("boolean")),
            Self::String => ("string", None),
            Self::Float32 => ("number", Some("float")),
            Self::Float64 => ("number", Some("double")),
        }
    }

    pub fn schema(self) -> Schema {
        let (kind, format) = self.type_and_format();
        Schema::primitive(kind, format)
    }
}

// ---------------------------------------------------------------------------
// Descriptor classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    /// `[]X`
    Slice(Box<TypeDescriptor>),
    /// `map[string]string`
    StringMap,
    /// Any other `map[K]V`. Rendered as an opaque object.
    UnsupportedMap(String),
    /// A declared message type, referenced by name.
    Named(String),
    /// `interface{}` / `any`
    Opaque,
    /// Anything else (`chan int`, `func()`, `[4]byte`, ...).
    Unknown(String),
}

impl TypeDescriptor {
    pub fn parse(raw: &str) -> Self {
        let descriptor = raw.trim().trim_start_matches('*').trim_start();

        if let Some(elem) = descriptor.strip_prefix("[]") {
            return Self::Slice(Box::new(Self::parse(elem)));
        }

        let compact: String = descriptor.split_whitespace().collect();
        if compact == "interface{}" || compact == "any" {
            return Self::Opaque;
        }
        if compact.starts_with("map[") {
            return if compact == "map[string]string" {
                Self::StringMap
            } else {
                Self::UnsupportedMap(compact)
            };
        }

        if let Some(kind) = PrimitiveKind::from_name(descriptor) {
            return Self::Primitive(kind);
        }
        if is_type_name(descriptor) {
            return Self::Named(descriptor.to_string());
        }
        Self::Unknown(descriptor.to_string())
    }

    pub fn schema(&self) -> Schema {
        match self {
            Self::Primitive(kind) => kind.schema(),
            Self::Slice(elem) => Schema::array(elem.schema()),
            Self::StringMap | Self::UnsupportedMap(_) | Self::Opaque => Schema::object(),
            Self::Named(name) => Schema::reference(name),
            Self::Unknown(raw) => Schema::unknown(raw),
        }
    }

    /// The innermost element type, looking through any number of slices.
    pub fn element(&self) -> &TypeDescriptor {
        match self {
            Self::Slice(elem) => elem.element(),
            other => other,
        }
    }

    /// The part of this descriptor the mapper had to degrade, if any.
    pub fn degraded(&self) -> Option<&TypeDescriptor> {
        match self.element() {
            d @ (Self::UnsupportedMap(_) | Self::Unknown(_)) => Some(d),
            _ => None,
        }
    }
}

/// A plain or package-qualified identifier: `User`, `time.Time`.
fn is_type_name(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema_json(descriptor: &str) -> serde_json::Value {
        serde_json::to_value(TypeDescriptor::parse(descriptor).schema()).unwrap()
    }

    #[test]
    fn test_primitive_schemas() {
        assert_eq!(schema_json("int"), json!({"type": "integer", "format": "int32"}));
        assert_eq!(schema_json("int64"), json!({"type": "integer", "format": "int64"}));
        assert_eq!(schema_json("bool"), json!({"type": "boolean", "format": "boolean"}));
        assert_eq!(schema_json("string"), json!({"type": "string"}));
        assert_eq!(schema_json("float32"), json!({"type": "number", "format": "float"}));
        assert_eq!(schema_json("float64"), json!({"type": "number", "format": "double"}));
        assert_eq!(schema_json("uint8"), json!({"type": "integer", "format": "int32"}));
    }

    #[test]
    fn test_slice_of_primitive() {
        assert_eq!(
            schema_json("[]int64"),
            json!({"type": "array", "items": {"type": "integer", "format": "int64"}})
        );
    }

    #[test]
    fn test_slice_of_struct_pointer() {
        assert_eq!(
            TypeDescriptor::parse("[]*User"),
            TypeDescriptor::Slice(Box::new(TypeDescriptor::Named("User".into())))
        );
        assert_eq!(
            schema_json("[]*User"),
            json!({"type": "array", "items": {"$ref": "#/definitions/User"}})
        );
    }

    #[test]
    fn test_named_and_pointer_reference() {
        assert_eq!(schema_json("Bar"), json!({"$ref": "#/definitions/Bar"}));
        assert_eq!(schema_json("*Bar"), json!({"$ref": "#/definitions/Bar"}));
    }

    #[test]
    fn test_opaque_types() {
        assert_eq!(TypeDescriptor::parse("interface{}"), TypeDescriptor::Opaque);
        assert_eq!(TypeDescriptor::parse("interface {}"), TypeDescriptor::Opaque);
        assert_eq!(TypeDescriptor::parse("map[string]string"), TypeDescriptor::StringMap);
        assert_eq!(schema_json("interface{}"), json!({"type": "object"}));
        assert_eq!(schema_json("map[string]string"), json!({"type": "object"}));
    }

    #[test]
    fn test_unsupported_map_degrades_to_object() {
        let d = TypeDescriptor::parse("map[string]int64");
        assert_eq!(d, TypeDescriptor::UnsupportedMap("map[string]int64".into()));
        assert!(d.degraded().is_some());
        assert_eq!(schema_json("map[string]int64"), json!({"type": "object"}));
    }

    #[test]
    fn test_unknown_descriptor_placeholder() {
        let d = TypeDescriptor::parse("chan int");
        assert_eq!(d, TypeDescriptor::Unknown("chan int".into()));
        assert_eq!(
            schema_json("chan int"),
            json!({"type": "chan int", "format": "UNKNOWN"})
        );
        assert_eq!(
            schema_json("[][4]byte"),
            json!({"type": "array", "items": {"type": "[4]byte", "format": "UNKNOWN"}})
        );
    }

    #[test]
    fn test_package_qualified_name() {
        assert_eq!(
            TypeDescriptor::parse("time.Time"),
            TypeDescriptor::Named("time.Time".into())
        );
    }
}
