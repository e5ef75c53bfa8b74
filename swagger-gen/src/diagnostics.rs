//! Non-fatal anomalies recorded while rendering.
//!
//! Generation never aborts on a model it can't fully express. Instead the
//! renderers degrade to a placeholder and record a [`Diagnostic`] here, which
//! is also logged as it happens.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An untagged, required member of a GET request type: it has no query
    /// parameter name and was left out of the operation.
    DroppedQueryMember { route: String, member: String },
    /// A GET route names a request type that isn't declared.
    UnresolvedRequestType { route: String, type_name: String },
    /// Two declared types share a name; the later one replaced the earlier.
    DuplicateDefinition { type_name: String },
    /// A `map[K]V` other than `map[string]string`, rendered as `{type: object}`.
    UnsupportedMap {
        type_name: String,
        member: String,
        descriptor: String,
    },
    /// A descriptor that couldn't be classified, rendered with format `UNKNOWN`.
    UnknownType {
        type_name: String,
        member: String,
        descriptor: String,
    },
    /// A route method with no path-item slot; the route was skipped.
    UnsupportedMethod { route: String, method: String },
}

impl Diagnostic {
    /// Whether this points at a likely mistake in the model, as opposed to a
    /// documented limitation.
    pub fn is_warning(&self) -> bool {
        !matches!(
            self,
            Self::UnsupportedMap { .. } | Self::UnsupportedMethod { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DroppedQueryMember { route, member } => write!(
                f,
                "{route}: required member '{member}' has no tag and was dropped from the query parameters"
            ),
            Self::UnresolvedRequestType { route, type_name } => {
                write!(f, "{route}: request type '{type_name}' is not declared")
            }
            Self::DuplicateDefinition { type_name } => {
                write!(f, "type '{type_name}' is declared more than once; last declaration wins")
            }
            Self::UnsupportedMap {
                type_name,
                member,
                descriptor,
            } => write!(
                f,
                "{type_name}.{member}: map type '{descriptor}' is not supported, emitted as object"
            ),
            Self::UnknownType {
                type_name,
                member,
                descriptor,
            } => write!(
                f,
                "{type_name}.{member}: unrecognised type '{descriptor}', emitted with format UNKNOWN"
            ),
            Self::UnsupportedMethod { route, method } => {
                write!(f, "{route}: method '{method}' is not supported, route skipped")
            }
        }
    }
}

/// Ordered collection of everything recorded during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_warning() {
            warn!(%diagnostic, "swagger generation degraded");
        } else {
            info!(%diagnostic, "swagger generation note");
        }
        self.0.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_warning())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_diagnostics_are_not_warnings() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::UnsupportedMethod {
            route: "head /ping".into(),
            method: "head".into(),
        });
        diagnostics.push(Diagnostic::DuplicateDefinition {
            type_name: "User".into(),
        });
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn test_unsupported_map_is_informational() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::UnsupportedMap {
            type_name: "Bag".into(),
            member: "Counts".into(),
            descriptor: "map[string]int".into(),
        });
        diagnostics.push(Diagnostic::UnknownType {
            type_name: "Bag".into(),
            member: "Ch".into(),
            descriptor: "chan int".into(),
        });
        let warnings: Vec<_> = diagnostics.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], Diagnostic::UnknownType { .. }));
    }

    #[test]
    fn test_display_names_member() {
        let d = Diagnostic::DroppedQueryMember {
            route: "GET /users".into(),
            member: "Page".into(),
        };
        let msg = d.to_string();
        assert!(msg.contains("Page"), "message should name the member: {msg}");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let d = Diagnostic::UnknownType {
            type_name: "User".into(),
            member: "Ch".into(),
            descriptor: "chan int".into(),
        };
        insta::assert_json_snapshot!(d, @r#"
        {
          "kind": "unknown_type",
          "type_name": "User",
          "member": "Ch",
          "descriptor": "chan int"
        }
        "#);
    }
}
