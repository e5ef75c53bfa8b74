//! Caller-supplied generation options.

use serde::Deserialize;

/// File name used when the caller doesn't pick one.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "rest.swagger.json";

/// Options recognised by the generator. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateConfig {
    /// Overrides the document's `host`.
    pub host: String,
    /// Overrides the document's `basePath`.
    pub base_path: String,
    pub output_file_name: String,
}

impl GenerateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_output_file_name(mut self, name: impl Into<String>) -> Self {
        self.output_file_name = name.into();
        self
    }

    pub fn host(&self) -> Option<&str> {
        non_blank(&self.host)
    }

    pub fn base_path(&self) -> Option<&str> {
        non_blank(&self.base_path)
    }

    pub fn output_file_name(&self) -> &str {
        non_blank(&self.output_file_name).unwrap_or(DEFAULT_OUTPUT_FILE_NAME)
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
