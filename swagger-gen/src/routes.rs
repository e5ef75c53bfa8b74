//! Route renderer: service groups and routes → `paths`.
//!
//! Every route becomes one operation in the path item keyed by its URL
//! template (`/users/:id` → `/users/{id}`). Parameters come from the template
//! placeholders plus the request type: query parameters for GET, a single
//! body reference otherwise.

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use crate::api::{ApiSpec, Group, Member, Route, TypeDef};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::swagger::{
    HttpMethod, Operation, Parameter, ParameterLocation, Paths, Response, Schema, UNKNOWN_FORMAT,
};
use crate::types::{PrimitiveKind, TypeDescriptor};

/// Every `$ref` used by an operation parameter, in first-use order.
pub type ReferenceSet = IndexSet<String>;

pub const SUCCESS_DESCRIPTION: &str = "A successful response.";

/// Render every route of every group into `paths`.
pub fn render_routes(
    api: &ApiSpec,
    paths: &mut Paths,
    refs: &mut ReferenceSet,
    diagnostics: &mut Diagnostics,
) {
    let types: IndexMap<&str, &TypeDef> = api
        .types
        .iter()
        .map(|t| (t.name.as_str(), t))
        .collect();

    for group in &api.service.groups {
        for route in &group.routes {
            let path = effective_path(group, route);
            let label = format!("{} {}", route.method.to_ascii_uppercase(), path);

            let Some(method) = HttpMethod::from_name(&route.method) else {
                diagnostics.push(Diagnostic::UnsupportedMethod {
                    route: label,
                    method: route.method.clone(),
                });
                continue;
            };

            let (template, mut parameters) = path_template(&path);

            if let Some(request_type) = route.request_type() {
                if method == HttpMethod::Get {
                    match types.get(request_type) {
                        Some(ty) => {
                            let query = query_parameters(&label, ty, &parameters, diagnostics);
                            parameters.extend(query);
                        }
                        None => diagnostics.push(Diagnostic::UnresolvedRequestType {
                            route: label.clone(),
                            type_name: request_type.to_string(),
                        }),
                    }
                } else {
                    parameters.push(Parameter::body(request_type));
                }
            }

            for reference in parameters.iter().filter_map(Parameter::reference) {
                refs.insert(reference.to_string());
            }

            let response_schema = route
                .response_type()
                .map(Schema::reference)
                .unwrap_or_default();

            let operation = Operation {
                tags: vec![operation_tag(&api.service.name, group)],
                operation_id: route.handler.clone(),
                parameters,
                responses: IndexMap::from([(
                    "200".to_string(),
                    Response {
                        description: SUCCESS_DESCRIPTION.into(),
                        schema: response_schema,
                    },
                )]),
            };

            let item = paths.entry(template).or_default();
            if item.get(method).is_some() {
                warn!(route = %label, "route redeclared, replacing earlier operation");
            }
            debug!(route = %label, "rendered route");
            item.set(method, operation);
        }
    }
}

/// The route path with the group's `server.prefix` prepended.
pub fn effective_path(group: &Group, route: &Route) -> String {
    match group.annotation_value("server", "prefix") {
        Some(prefix) => format!("/{}{}", prefix.trim_start_matches('/'), route.path),
        None => route.path.clone(),
    }
}

/// Rewrite `:name` segments to `{name}`, returning the template and one
/// required string path parameter per placeholder, in segment order.
pub fn path_template(path: &str) -> (String, Vec<Parameter>) {
    let mut parameters = Vec::new();
    let template = path
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) if !name.is_empty() => {
                parameters.push(Parameter::path(name));
                format!("{{{name}}}")
            }
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/");
    (template, parameters)
}

/// Tag precedence: `server.swtags`, then `server.group`, then the service name.
pub fn operation_tag(service_name: &str, group: &Group) -> String {
    group
        .annotation_value("server", "swtags")
        .or_else(|| group.annotation_value("server", "group"))
        .unwrap_or(service_name)
        .to_string()
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

fn query_parameters(
    route: &str,
    request: &TypeDef,
    path_parameters: &[Parameter],
    diagnostics: &mut Diagnostics,
) -> Vec<Parameter> {
    let mut parameters = Vec::new();

    for member in &request.members {
        if member.is_path_bound() {
            continue;
        }

        let name = match member.tag_name() {
            Some(tag) => tag,
            None if member.is_optional() => member.name.as_str(),
            None => {
                diagnostics.push(Diagnostic::DroppedQueryMember {
                    route: route.to_string(),
                    member: member.name.clone(),
                });
                continue;
            }
        };

        // A placeholder is always represented by its path parameter.
        if path_parameters.iter().any(|p| p.name == name) {
            debug!(route, member = %member.name, "query member shadows path parameter, skipped");
            continue;
        }

        parameters.push(query_parameter(name, member));
    }

    parameters
}

fn query_parameter(name: &str, member: &Member) -> Parameter {
    let descriptor = TypeDescriptor::parse(&member.type_name);
    let (kind, format, items) = match &descriptor {
        TypeDescriptor::Primitive(kind) => primitive_fields(*kind, None),
        TypeDescriptor::Slice(elem) => match elem.as_ref() {
            TypeDescriptor::Primitive(kind) => primitive_fields(*kind, Some(kind.schema())),
            _ => unknown_fields(&member.type_name),
        },
        _ => unknown_fields(&member.type_name),
    };

    Parameter {
        name: name.to_string(),
        location: ParameterLocation::Query,
        description: member.description(),
        required: !member.is_optional(),
        kind: Some(kind),
        format,
        items,
        schema: None,
    }
}

/// `items` present means the parameter is an array of that primitive.
fn primitive_fields(
    kind: PrimitiveKind,
    items: Option<Schema>,
) -> (String, Option<String>, Option<Schema>) {
    match items {
        Some(items) => ("array".into(), None, Some(items)),
        None => {
            let (kind, format) = kind.type_and_format();
            (kind.into(), format.map(str::to_string), None)
        }
    }
}

fn unknown_fields(raw: &str) -> (String, Option<String>, Option<Schema>) {
    (raw.trim().to_string(), Some(UNKNOWN_FORMAT.into()), None)
}
