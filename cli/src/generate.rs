#![deny(missing_docs)]

//! # Generate Command
//!
//! Loads the OpenAPI document, renders the Markdown reference and writes it
//! to a file or stdout.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use oas2md_core::{convert_file, RenderOptions, SpecFormat};
use tracing::debug;

use crate::config::load_options;
use crate::error::CliResult;

/// Input syntax selection.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Decide by file extension (`.json` is JSON, anything else YAML).
    Auto,
    /// Force YAML.
    Yaml,
    /// Force JSON.
    Json,
}

impl InputFormat {
    fn spec_format(self) -> Option<SpecFormat> {
        match self {
            InputFormat::Auto => None,
            InputFormat::Yaml => Some(SpecFormat::Yaml),
            InputFormat::Json => Some(SpecFormat::Json),
        }
    }
}

/// Arguments for generating a reference page.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to OpenAPI spec (.yaml/.yml/.json).
    pub input: PathBuf,

    /// Output markdown file path. If omitted, prints to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Input syntax.
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub format: InputFormat,

    /// Page title, replacing `info.title`.
    #[arg(long)]
    pub title: Option<String>,

    /// Build example payloads from schemas when the spec has none.
    #[arg(long)]
    pub synthesize_examples: bool,

    /// Omit the component schemas section.
    #[arg(long)]
    pub no_schemas: bool,

    /// YAML file with render options. Flags override its values.
    #[arg(long, env = "OAS2MD_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Merges the options file (if any) with command-line overrides.
pub fn resolve_options(args: &GenerateArgs) -> CliResult<RenderOptions> {
    let mut options = match &args.config {
        Some(path) => load_options(path)?,
        None => RenderOptions::default(),
    };

    if let Some(title) = &args.title {
        options.title = Some(title.clone());
    }
    if args.synthesize_examples {
        options.synthesize_examples = true;
    }
    if args.no_schemas {
        options.include_schemas = false;
    }

    debug!(?options, "Resolved render options");
    Ok(options)
}

/// Renders the reference page for `args.input`.
pub fn render(args: &GenerateArgs) -> CliResult<String> {
    let options = resolve_options(args)?;
    Ok(convert_file(&args.input, args.format.spec_format(), &options)?)
}

/// Executes the command.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let markdown = render(args)?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &markdown)?;
            println!("Wrote: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(markdown.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    const SPEC: &str = r#"
openapi: 3.0.0
info: {title: Health, version: 1.0.0}
paths:
  /health:
    get:
      summary: Liveness probe
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema:
                type: object
                properties:
                  status: {type: string, enum: [up, down]}
components:
  schemas:
    Status: {type: string}
"#;

    fn args(input: &Path) -> GenerateArgs {
        GenerateArgs {
            input: input.to_path_buf(),
            output: None,
            format: InputFormat::Auto,
            title: None,
            synthesize_examples: false,
            no_schemas: false,
            config: None,
        }
    }

    #[test]
    fn test_execute_writes_output_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("openapi.yaml");
        fs::write(&input, SPEC).unwrap();
        let output = dir.path().join("docs/nested/api.md");

        let mut a = args(&input);
        a.output = Some(output.clone());
        execute(&a).unwrap();

        let contents = fs::read_to_string(output).unwrap();
        assert!(contents.starts_with("# Health — reference\n"));
        assert!(contents.contains("| GET | `/health` | Liveness probe |"));
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("openapi.yaml");
        fs::write(&input, SPEC).unwrap();
        let config = dir.path().join("oas2md.yaml");
        fs::write(&config, "title: From Config\ninclude-schemas: true\n").unwrap();

        let mut a = args(&input);
        a.config = Some(config);
        a.title = Some("From Flag".into());
        a.no_schemas = true;
        a.synthesize_examples = true;

        let options = resolve_options(&a).unwrap();
        assert_eq!(options.title.as_deref(), Some("From Flag"));
        assert!(!options.include_schemas);

        let md = render(&a).unwrap();
        assert!(md.starts_with("# From Flag — reference\n"));
        assert!(!md.contains("## Schemas"));
        assert!(md.contains("\"status\": \"up\""));
    }

    #[test]
    fn test_forced_json_format_on_yaml_input_fails() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("openapi.yaml");
        fs::write(&input, SPEC).unwrap();

        let mut a = args(&input);
        a.format = InputFormat::Json;
        let err = render(&a).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse OpenAPI JSON"));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let err = execute(&args(&dir.path().join("missing.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Spec not found"));
    }
}
