pub mod api;
pub mod config;
pub mod definitions;
pub mod diagnostics;
pub mod error;
pub mod routes;
pub mod schema;
pub mod swagger;
pub mod types;

use std::path::Path;

use crate::api::parse_plugin_input;
use crate::config::GenerateConfig;
use crate::error::{GenerateError, Result};
use crate::schema::generate_swagger;
use crate::swagger::Document;

pub use crate::api::{ApiSpec, PluginInput};
pub use crate::schema::{Generated, generate_swagger as generate};

/// High-level API: parse a plugin payload (or bare API model) and produce the
/// Swagger document.
///
/// `source`: the JSON payload handed over by the host generator
/// `config`: host/basePath overrides
pub fn generate_from_json(source: &str, config: &GenerateConfig) -> Result<Generated> {
    let input = parse_plugin_input(source)?;
    Ok(generate_swagger(&input.api, config))
}

/// Pretty-printed JSON for `document`, keys in emission order.
pub fn to_json(document: &Document) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(GenerateError::Serialize)
}

/// Write `document` to `path` as pretty-printed JSON.
pub fn write_document(document: &Document, path: &Path) -> Result<()> {
    let json = to_json(document)?;
    std::fs::write(path, json).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })
}
