//! Parsed API model consumed by the generator.
//!
//! The host code generator parses `.api` source files and hands its plugins a
//! JSON payload containing the resulting model. These types mirror that
//! payload; nothing here looks at raw API source text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GenerateError, Result};

/// The JSON envelope a plugin receives on stdin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInput {
    pub api: ApiSpec,
    #[serde(default)]
    pub api_file_path: String,
    #[serde(default)]
    pub style: String,
    /// Output directory requested by the host.
    #[serde(default)]
    pub dir: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiSpec {
    #[serde(default)]
    pub info: ApiInfo,
    pub service: Service,
    #[serde(default)]
    pub types: Vec<TypeDef>,
}

/// The `info(...)` block. Values are source literals and may still be quoted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl Group {
    /// Value of `key` inside the annotation called `name` (e.g. `server.prefix`).
    /// Empty values count as absent.
    pub fn annotation_value(&self, name: &str, key: &str) -> Option<&str> {
        self.annotations
            .iter()
            .filter(|a| a.name == name)
            .find_map(|a| a.properties.get(key))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    #[serde(default)]
    pub properties: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub handler: String,
    #[serde(default)]
    pub request_type: Option<String>,
    #[serde(default)]
    pub response_type: Option<String>,
}

impl Route {
    pub fn request_type(&self) -> Option<&str> {
        non_empty(self.request_type.as_deref())
    }

    pub fn response_type(&self) -> Option<&str> {
        non_empty(self.response_type.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    /// Type descriptor as written in the source: `int64`, `[]*User`, ...
    #[serde(rename = "type")]
    pub type_name: String,
    /// Raw struct tag, e.g. `form:"page,optional"`.
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub comment: String,
}

impl Member {
    /// Parameter name carried by the tag: `name` for `form:"name,optional"`,
    /// the trimmed tag itself when it isn't in `key:"value"` form.
    ///
    /// A `form` binding wins over other keys when a tag has several.
    pub fn tag_name(&self) -> Option<&str> {
        let pairs = tag_pairs(&self.tag);
        if pairs.is_empty() {
            return non_empty(Some(self.tag.trim()));
        }
        let value = pairs
            .iter()
            .find(|(key, _)| *key == "form")
            .map_or(pairs[0].1, |(_, value)| *value);
        value.split(',').next().and_then(|n| non_empty(Some(n.trim())))
    }

    /// Bound to a URL placeholder rather than the query string or body.
    pub fn is_path_bound(&self) -> bool {
        let pairs = tag_pairs(&self.tag);
        if pairs.is_empty() {
            self.tag.trim() == "path"
        } else {
            pairs.iter().any(|(key, _)| *key == "path")
        }
    }

    pub fn is_optional(&self) -> bool {
        self.optional
            || tag_pairs(&self.tag)
                .iter()
                .any(|(_, value)| value.split(',').skip(1).any(|o| o.trim() == "optional"))
    }

    /// The comment with its `//` markers stripped.
    pub fn description(&self) -> Option<String> {
        let text = self.comment.trim().trim_start_matches('/').trim();
        non_empty(Some(text)).map(str::to_string)
    }
}

/// Parse the plugin payload. A bare API model without the envelope is also
/// accepted.
pub fn parse_plugin_input(source: &str) -> Result<PluginInput> {
    let value: Value = serde_json::from_str(source).map_err(GenerateError::InvalidModel)?;
    let is_envelope = value.get("api").is_some_and(Value::is_object);
    if is_envelope {
        serde_json::from_value(value).map_err(GenerateError::InvalidModel)
    } else {
        let api = serde_json::from_value(value).map_err(GenerateError::InvalidModel)?;
        Ok(PluginInput {
            api,
            ..PluginInput::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Split a Go struct tag into `(key, value)` pairs: `json:"id" path:"id"`.
fn tag_pairs(tag: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    let mut rest = tag.trim();
    while let Some(colon) = rest.find(":\"") {
        let key = rest[..colon].trim();
        let after = &rest[colon + 2..];
        let Some(end) = after.find('"') else {
            break;
        };
        pairs.push((key, &after[..end]));
        rest = after[end + 1..].trim_start();
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(tag: &str) -> Member {
        Member {
            name: "Page".into(),
            type_name: "int".into(),
            tag: tag.into(),
            ..Member::default()
        }
    }

    #[test]
    fn test_tag_pairs() {
        assert_eq!(
            tag_pairs(r#"json:"id" path:"id""#),
            vec![("json", "id"), ("path", "id")]
        );
        assert!(tag_pairs("page").is_empty());
        assert!(tag_pairs(r#"json:"broken"#).is_empty());
    }

    #[test]
    fn test_tag_name() {
        assert_eq!(member(r#"form:"page,optional""#).tag_name(), Some("page"));
        assert_eq!(member(r#"json:"a" form:"b""#).tag_name(), Some("b"));
        assert_eq!(member("page").tag_name(), Some("page"));
        assert_eq!(member("").tag_name(), None);
        assert_eq!(member("  ").tag_name(), None);
    }

    #[test]
    fn test_optional_from_flag_or_tag() {
        assert!(member(r#"form:"page,optional""#).is_optional());
        assert!(!member(r#"form:"page""#).is_optional());
        let mut m = member("");
        m.optional = true;
        assert!(m.is_optional());
    }

    #[test]
    fn test_path_bound() {
        assert!(member(r#"path:"id""#).is_path_bound());
        assert!(member("path").is_path_bound());
        assert!(!member(r#"json:"path_id""#).is_path_bound());
    }

    #[test]
    fn test_description_strips_comment_markers() {
        let mut m = member("");
        m.comment = "// page number ".into();
        assert_eq!(m.description(), Some("page number".into()));
        m.comment = "//".into();
        assert_eq!(m.description(), None);
    }

    #[test]
    fn test_annotation_value() {
        let group = Group {
            annotations: vec![Annotation {
                name: "server".into(),
                properties: IndexMap::from([
                    ("prefix".to_string(), "v1".to_string()),
                    ("group".to_string(), " ".to_string()),
                ]),
            }],
            routes: vec![],
        };
        assert_eq!(group.annotation_value("server", "prefix"), Some("v1"));
        assert_eq!(group.annotation_value("server", "group"), None);
        assert_eq!(group.annotation_value("other", "prefix"), None);
    }

    #[test]
    fn test_parse_envelope_and_bare_model() {
        let envelope = r#"{"api": {"service": {"name": "demo"}}, "dir": "out"}"#;
        let input = parse_plugin_input(envelope).unwrap();
        assert_eq!(input.api.service.name, "demo");
        assert_eq!(input.dir, "out");

        let bare = r#"{"service": {"name": "demo", "groups": []}, "types": []}"#;
        let input = parse_plugin_input(bare).unwrap();
        assert_eq!(input.api.service.name, "demo");
        assert!(input.dir.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_model() {
        let err = parse_plugin_input(r#"{"api": {"types": []}}"#).unwrap_err();
        assert!(
            matches!(err, GenerateError::InvalidModel(_)),
            "expected InvalidModel, got: {err}"
        );
        assert!(parse_plugin_input("not json").is_err());
    }
}
