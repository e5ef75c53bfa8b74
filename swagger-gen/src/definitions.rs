//! Definition renderer: declared types → `definitions`.

use indexmap::IndexMap;
use tracing::debug;

use crate::api::TypeDef;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::swagger::{Definitions, Schema};
use crate::types::TypeDescriptor;

/// Render every declared type as an object schema keyed by its name.
///
/// Nested types are emitted as `$ref`s, so self-referential and mutually
/// recursive types need no special handling. A repeated name replaces the
/// earlier schema in place and is reported.
pub fn render_definitions(
    types: &[TypeDef],
    definitions: &mut Definitions,
    diagnostics: &mut Diagnostics,
) {
    for ty in types {
        let schema = definition_schema(ty, diagnostics);
        if definitions.insert(ty.name.clone(), schema).is_some() {
            diagnostics.push(Diagnostic::DuplicateDefinition {
                type_name: ty.name.clone(),
            });
        }
        debug!(type_name = %ty.name, members = ty.members.len(), "rendered definition");
    }
}

fn definition_schema(ty: &TypeDef, diagnostics: &mut Diagnostics) -> Schema {
    let mut properties = IndexMap::new();

    for member in &ty.members {
        let descriptor = TypeDescriptor::parse(&member.type_name);
        match descriptor.degraded() {
            Some(TypeDescriptor::UnsupportedMap(raw)) => {
                diagnostics.push(Diagnostic::UnsupportedMap {
                    type_name: ty.name.clone(),
                    member: member.name.clone(),
                    descriptor: raw.clone(),
                })
            }
            Some(TypeDescriptor::Unknown(raw)) => diagnostics.push(Diagnostic::UnknownType {
                type_name: ty.name.clone(),
                member: member.name.clone(),
                descriptor: raw.clone(),
            }),
            _ => {}
        }
        properties.insert(
            member.name.clone(),
            descriptor.schema().with_description(member.description()),
        );
    }

    Schema {
        title: Some(ty.name.clone()),
        properties: (!properties.is_empty()).then_some(properties),
        ..Schema::object()
    }
}
