#![deny(missing_docs)]

//! # Document Loading
//!
//! Reads an OpenAPI document from disk and deserializes it into the
//! `openapiv3` object model. YAML is the default syntax; `.json` files are
//! parsed with `serde_json` so syntax errors point at JSON positions.

use crate::error::{AppError, AppResult};
use crate::text::inline_value;
use openapiv3::OpenAPI;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Concrete syntax of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    /// YAML (also accepts plain JSON, which is a YAML subset).
    Yaml,
    /// Strict JSON.
    Json,
}

impl SpecFormat {
    /// Infers the format from a file extension. Anything other than `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SpecFormat::Json,
            _ => SpecFormat::Yaml,
        }
    }
}

/// Top-level version keys, read before the full object model.
#[derive(Debug, Default, Deserialize)]
struct VersionKeys {
    #[serde(default)]
    openapi: Option<Value>,
    #[serde(default)]
    swagger: Option<Value>,
}

/// Parses document text and gates on the OpenAPI 3.x version line.
///
/// Swagger 2.0 documents (`swagger` key, no `openapi` key) are rejected as
/// unsupported before the 3.x model is attempted.
pub fn parse_spec(content: &str, format: SpecFormat) -> AppResult<OpenAPI> {
    let keys: VersionKeys = match format {
        SpecFormat::Yaml => serde_yaml::from_str(content)?,
        SpecFormat::Json => serde_json::from_str(content)?,
    };
    if let (None, Some(swagger)) = (&keys.openapi, &keys.swagger) {
        return Err(AppError::UnsupportedVersion(inline_value(swagger)));
    }

    let doc: OpenAPI = match format {
        SpecFormat::Yaml => serde_yaml::from_str(content)?,
        SpecFormat::Json => serde_json::from_str(content)?,
    };

    if !doc.openapi.trim().starts_with("3.") {
        return Err(AppError::UnsupportedVersion(doc.openapi));
    }

    info!(
        title = %doc.info.title,
        version = %doc.info.version,
        paths = doc.paths.paths.len(),
        "Parsed OpenAPI document"
    );

    Ok(doc)
}

/// Loads a document from `path`.
///
/// When `format` is `None` the syntax is inferred with [`SpecFormat::from_path`].
pub fn load_spec(path: &Path, format: Option<SpecFormat>) -> AppResult<OpenAPI> {
    if !path.exists() {
        return Err(AppError::NotFound(path.to_path_buf()));
    }

    let format = format.unwrap_or_else(|| SpecFormat::from_path(path));
    debug!(path = %path.display(), ?format, "Loading OpenAPI document");

    let raw = fs::read_to_string(path)?;
    parse_spec(&raw, format)
}
