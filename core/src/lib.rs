#![deny(missing_docs)]

//! # oas2md Core
//!
//! Turns an OpenAPI 3.x document into a Markdown reference page.
//!
//! The pipeline is linear: [`loader`] parses the document, [`normalize`]
//! resolves references and defaults into the [`model`] IR, and [`render`]
//! lays that IR out as Markdown.

/// Shared error types.
pub mod error;

/// Document loading (YAML/JSON).
pub mod loader;

/// Render model (IR).
pub mod model;

/// Document-to-model normalization.
pub mod normalize;

/// Rendering options.
pub mod options;

/// `$ref` resolution.
pub mod refs;

/// Markdown rendering.
pub mod render;

/// String helpers.
pub mod text;

pub use error::{AppError, AppResult};
pub use loader::{load_spec, parse_spec, SpecFormat};
pub use model::ApiReference;
pub use normalize::normalize;
pub use options::RenderOptions;
pub use render::render_markdown;

use openapiv3::OpenAPI;
use std::path::Path;

/// Renders an already parsed document.
pub fn build_markdown(doc: &OpenAPI, options: &RenderOptions) -> String {
    render_markdown(&normalize(doc, options))
}

/// Parses document text and renders it.
pub fn convert_str(content: &str, format: SpecFormat, options: &RenderOptions) -> AppResult<String> {
    let doc = parse_spec(content, format)?;
    Ok(build_markdown(&doc, options))
}

/// Loads a document from disk and renders it.
///
/// `format` overrides extension-based detection.
pub fn convert_file(
    path: &Path,
    format: Option<SpecFormat>,
    options: &RenderOptions,
) -> AppResult<String> {
    let doc = load_spec(path, format)?;
    Ok(build_markdown(&doc, options))
}
