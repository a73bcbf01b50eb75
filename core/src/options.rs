//! # Render Options
//!
//! Knobs that change what the generated page contains. Loaded from a YAML
//! config file by the CLI and overridden by command-line flags.

use serde::{Deserialize, Serialize};

/// Options controlling normalization and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RenderOptions {
    /// Replaces `info.title` in the page heading.
    pub title: Option<String>,
    /// Builds example payloads from schemas when the document provides none.
    pub synthesize_examples: bool,
    /// Appends a section documenting every `components.schemas` entry.
    pub include_schemas: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: None,
            synthesize_examples: false,
            include_schemas: true,
        }
    }
}
