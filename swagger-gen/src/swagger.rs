//! Swagger 2.0 object model.
//!
//! Only the subset of the OpenAPI 2.0 document the generator emits. Struct field
//! order is the serialized key order, and every map is an [`IndexMap`] so that
//! two runs over the same model produce byte-identical JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Path template → path item.
pub type Paths = IndexMap<String, PathItem>;

/// Type name → schema. Acts as the symbol table every `$ref` points into.
pub type Definitions = IndexMap<String, Schema>;

/// Name of the single security scheme injected into every document.
pub const SECURITY_SCHEME_NAME: &str = "apiKey";

/// Prefix of every reference into [`Definitions`].
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Format marker for descriptors the type mapper could not classify.
pub const UNKNOWN_FORMAT: &str = "UNKNOWN";

/// Build the `$ref` string for a named definition.
pub fn definition_ref(name: &str) -> String {
    format!("{DEFINITIONS_PREFIX}{name}")
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub swagger: String,
    pub info: Info,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    pub schemes: Vec<String>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub paths: Paths,
    pub definitions: Definitions,
    pub security_definitions: IndexMap<String, SecurityScheme>,
    pub security: Vec<IndexMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
}

impl SecurityScheme {
    /// The JWT bearer token scheme: an `Authorization` header API key.
    pub fn bearer() -> Self {
        Self {
            kind: "apiKey".into(),
            description: "Enter JWT Bearer token **_only_**".into(),
            name: "Authorization".into(),
            location: "header".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// HTTP methods a path item has a slot for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Case-insensitive lookup. Returns `None` for methods without a slot
    /// (`HEAD`, `OPTIONS`, typos).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
}

impl PathItem {
    /// Place `operation` in the slot for `method`, replacing any previous one.
    pub fn set(&mut self, method: HttpMethod, operation: Operation) {
        let slot = match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Delete => &mut self.delete,
        };
        *slot = Some(operation);
    }

    pub fn get(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub tags: Vec<String>,
    pub operation_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    pub responses: IndexMap<String, Response>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    pub schema: Schema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Body,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl Parameter {
    /// A `{name}` placeholder in a path template: always a required string.
    pub fn path(name: &str) -> Self {
        Self {
            name: name.to_string(),
            location: ParameterLocation::Path,
            description: None,
            required: true,
            kind: Some("string".into()),
            format: None,
            items: None,
            schema: None,
        }
    }

    /// The single body parameter of a non-GET route.
    pub fn body(type_name: &str) -> Self {
        Self {
            name: "body".into(),
            location: ParameterLocation::Body,
            description: None,
            required: true,
            kind: None,
            format: None,
            items: None,
            schema: Some(Schema::reference(type_name)),
        }
    }

    /// The `$ref` carried by this parameter's schema, if any.
    pub fn reference(&self) -> Option<&str> {
        self.schema.as_ref().and_then(|s| s.reference.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// A schema fragment: a `$ref`, a primitive, an array, or an object.
///
/// An all-`None` schema serializes as `{}`, which is what operations without a
/// response type carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
}

impl Schema {
    pub fn reference(type_name: &str) -> Self {
        Self {
            reference: Some(definition_ref(type_name)),
            ..Self::default()
        }
    }

    pub fn primitive(kind: &str, format: Option<&str>) -> Self {
        Self {
            kind: Some(kind.to_string()),
            format: format.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn array(items: Schema) -> Self {
        Self {
            kind: Some("array".into()),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// `{type: object}` with no properties: an opaque payload.
    pub fn object() -> Self {
        Self {
            kind: Some("object".into()),
            ..Self::default()
        }
    }

    /// Placeholder for a descriptor that could not be classified.
    pub fn unknown(raw: &str) -> Self {
        Self::primitive(raw, Some(UNKNOWN_FORMAT))
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_schema_serializes_as_empty_object() {
        let schema = Schema::default();
        assert!(schema.is_empty());
        assert_eq!(serde_json::to_value(&schema).unwrap(), json!({}));
    }

    #[test]
    fn test_reference_format() {
        assert_eq!(definition_ref("User"), "#/definitions/User");
        assert_eq!(
            serde_json::to_value(Schema::reference("User")).unwrap(),
            json!({"$ref": "#/definitions/User"})
        );
    }

    #[test]
    fn test_string_primitive_has_no_format() {
        assert_eq!(
            serde_json::to_value(Schema::primitive("string", None)).unwrap(),
            json!({"type": "string"})
        );
    }

    #[test]
    fn test_method_lookup_is_case_insensitive() {
        assert_eq!(HttpMethod::from_name("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_name("Patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::from_name("HEAD"), None);
    }

    #[test]
    fn test_path_item_slots() {
        let op = Operation {
            tags: vec!["demo".into()],
            operation_id: "Ping".into(),
            parameters: vec![],
            responses: IndexMap::new(),
        };
        let mut item = PathItem::default();
        item.set(HttpMethod::Delete, op);
        assert!(item.get(HttpMethod::Delete).is_some());
        assert!(item.get(HttpMethod::Get).is_none());

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["delete"]["operationId"], "Ping");
        assert!(value["delete"].get("parameters").is_none());
    }

    #[test]
    fn test_body_parameter() {
        let param = Parameter::body("CreateUserReq");
        assert_eq!(param.reference(), Some("#/definitions/CreateUserReq"));
        insta::assert_json_snapshot!(param, @r##"
        {
          "name": "body",
          "in": "body",
          "required": true,
          "schema": {
            "$ref": "#/definitions/CreateUserReq"
          }
        }
        "##);
    }

    #[test]
    fn test_bearer_security_scheme() {
        assert_eq!(
            serde_json::to_value(SecurityScheme::bearer()).unwrap(),
            json!({
                "type": "apiKey",
                "description": "Enter JWT Bearer token **_only_**",
                "name": "Authorization",
                "in": "header"
            })
        );
    }
}
