//! Swagger 2.0 document assembly.
//!
//! Builds the fixed envelope (version, schemes, media types, security), then
//! fills `paths` and `definitions` from the route and definition renderers.

use indexmap::IndexMap;
use tracing::info;

use crate::api::{ApiInfo, ApiSpec};
use crate::config::GenerateConfig;
use crate::definitions::render_definitions;
use crate::diagnostics::Diagnostics;
use crate::routes::{ReferenceSet, render_routes};
use crate::swagger::*;

pub const SWAGGER_VERSION: &str = "2.0";
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Everything one generation run produces.
#[derive(Debug, Clone)]
pub struct Generated {
    pub document: Document,
    pub diagnostics: Diagnostics,
    /// `$ref`s used by operation parameters. Informational only: every
    /// declared type is emitted whether or not it appears here.
    pub referenced: ReferenceSet,
}

/// Generate the complete document for `api`.
pub fn generate_swagger(api: &ApiSpec, config: &GenerateConfig) -> Generated {
    let mut document = scaffold(&api.info, config);
    let mut diagnostics = Diagnostics::new();
    let mut referenced = ReferenceSet::new();

    render_routes(api, &mut document.paths, &mut referenced, &mut diagnostics);
    render_definitions(&api.types, &mut document.definitions, &mut diagnostics);

    info!(
        service = %api.service.name,
        paths = document.paths.len(),
        definitions = document.definitions.len(),
        diagnostics = diagnostics.len(),
        "generated swagger document"
    );

    Generated {
        document,
        diagnostics,
        referenced,
    }
}

/// The document envelope with empty `paths` and `definitions`.
pub fn scaffold(info: &ApiInfo, config: &GenerateConfig) -> Document {
    Document {
        swagger: SWAGGER_VERSION.into(),
        info: Info {
            title: unquote(&info.title),
            description: unquote(&info.desc),
            version: unquote(&info.version),
        },
        host: config.host().map(str::to_string),
        base_path: config.base_path().map(str::to_string),
        schemes: vec!["http".into(), "https".into()],
        consumes: vec![JSON_MEDIA_TYPE.into()],
        produces: vec![JSON_MEDIA_TYPE.into()],
        paths: Paths::new(),
        definitions: Definitions::new(),
        security_definitions: IndexMap::from([(
            SECURITY_SCHEME_NAME.to_string(),
            SecurityScheme::bearer(),
        )]),
        security: vec![IndexMap::from([(SECURITY_SCHEME_NAME.to_string(), Vec::new())])],
    }
}

/// Unquote an info literal as written in the API source.
///
/// Double-quoted literals have their escapes resolved (the Go escape set,
/// including `\xHH`, octal `\ooo` and `\u`/`\U`), back-quoted literals are
/// taken verbatim, anything else is returned trimmed. A double-quoted literal
/// with a malformed escape keeps its inner text as written.
pub fn unquote(literal: &str) -> String {
    let s = literal.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        let inner = &s[1..s.len() - 1];
        return unescape(inner).unwrap_or_else(|| inner.to_string());
    }
    if s.len() >= 2 && s.starts_with('`') && s.ends_with('`') {
        return s[1..s.len() - 1].to_string();
    }
    s.to_string()
}

fn unescape(inner: &str) -> Option<String> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            c @ ('\\' | '\'' | '"') => c,
            'x' => char::from(u8::from_str_radix(&take(&mut chars, 2)?, 16).ok()?),
            'u' => char::from_u32(u32::from_str_radix(&take(&mut chars, 4)?, 16).ok()?)?,
            'U' => char::from_u32(u32::from_str_radix(&take(&mut chars, 8)?, 16).ok()?)?,
            d @ '0'..='7' => {
                let digits = format!("{d}{}", take(&mut chars, 2)?);
                char::from(u8::from_str_radix(&digits, 8).ok()?)
            }
            _ => return None,
        };
        out.push(escaped);
    }
    Some(out)
}

/// The next `n` characters, or `None` if the literal ends first.
fn take(chars: &mut std::str::Chars<'_>, n: usize) -> Option<String> {
    let taken: String = chars.by_ref().take(n).collect();
    (taken.chars().count() == n).then_some(taken)
}
