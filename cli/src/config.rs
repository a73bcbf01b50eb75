#![deny(missing_docs)]

//! # Options File
//!
//! Loads [`RenderOptions`] from a YAML file, e.g.:
//!
//! ```yaml
//! title: Payments API
//! synthesize-examples: true
//! include-schemas: false
//! ```

use crate::error::{CliError, CliResult};
use oas2md_core::RenderOptions;
use std::fs;
use std::path::Path;
use tracing::info;

/// Reads and parses an options file.
pub fn load_options(path: &Path) -> CliResult<RenderOptions> {
    let raw = fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
    let options: RenderOptions = serde_yaml::from_str(&raw)
        .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;

    info!(path = %path.display(), "Loaded render options");
    Ok(options)
}
