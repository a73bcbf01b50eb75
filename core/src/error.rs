//! # Error Handling
//!
//! Provides the `AppError` enum returned by loading and conversion.

use derive_more::{Display, From};
use std::path::PathBuf;

/// The Global Error Enum.
///
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// The input document does not exist.
    #[from(ignore)]
    #[display("Spec not found: {}", _0.display())]
    NotFound(PathBuf),

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The document is not valid YAML or does not match the OpenAPI object model.
    #[display("Failed to parse OpenAPI YAML: {_0}")]
    Yaml(serde_yaml::Error),

    /// The document is not valid JSON or does not match the OpenAPI object model.
    #[display("Failed to parse OpenAPI JSON: {_0}")]
    Json(serde_json::Error),

    /// The `openapi` version field is outside the 3.x line.
    #[from(ignore)]
    #[display("Unsupported OpenAPI version: {_0}. Only 3.x is supported.")]
    UnsupportedVersion(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
