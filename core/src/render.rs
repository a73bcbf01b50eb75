#![deny(missing_docs)]

//! # Markdown Rendering
//!
//! Lays out an [`ApiReference`] as a Markdown page. Output is assembled from
//! blocks separated by exactly one blank line and ends with one newline.

use crate::model::{ApiReference, Endpoint, FieldRow, RequestBodyDoc, ResponseDoc, SchemaDoc};
use crate::normalize::operations::is_json;
use crate::text::{escape_cell, inline_value};
use serde_json::Value;

const INTRO: &str = "This page is a human-readable reference generated from an OpenAPI spec.";

/// Column alignment in a table separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `---`
    Left,
    /// `---:`
    Right,
    /// `:---:`
    Center,
}

impl Align {
    fn marker(self) -> &'static str {
        match self {
            Align::Left => "---",
            Align::Right => "---:",
            Align::Center => ":---:",
        }
    }
}

/// Block-oriented Markdown builder.
#[derive(Debug, Default)]
pub struct MarkdownDoc {
    blocks: Vec<String>,
}

impl MarkdownDoc {
    /// `#`-style heading.
    pub fn heading(&mut self, level: usize, text: &str) {
        self.blocks.push(format!("{} {}", "#".repeat(level), text));
    }

    /// A paragraph of text, trimmed. Empty text is skipped.
    pub fn paragraph(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref().trim();
        if !text.is_empty() {
            self.blocks.push(text.to_string());
        }
    }

    /// A bullet list.
    pub fn bullets<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<String> = items
            .into_iter()
            .map(|item| format!("- {}", item.as_ref()))
            .collect();
        if !lines.is_empty() {
            self.blocks.push(lines.join("\n"));
        }
    }

    /// A pipe table. Cells must already be escaped.
    pub fn table(&mut self, columns: &[(&str, Align)], rows: &[Vec<String>]) {
        let header: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        let separator: Vec<&str> = columns.iter().map(|(_, align)| align.marker()).collect();

        let mut lines = vec![
            format!("| {} |", header.join(" | ")),
            format!("|{}|", separator.join("|")),
        ];
        lines.extend(rows.iter().map(|row| format!("| {} |", row.join(" | "))));
        self.blocks.push(lines.join("\n"));
    }

    /// A fenced code block.
    pub fn code(&mut self, language: &str, body: &str) {
        self.blocks
            .push(format!("```{}\n{}\n```", language, body.trim_end()));
    }

    /// Joins all blocks into the final page.
    pub fn finish(self) -> String {
        let mut out = self.blocks.join("\n\n");
        out.push('\n');
        out
    }
}

/// Renders the whole reference page.
pub fn render_markdown(api: &ApiReference) -> String {
    let mut doc = MarkdownDoc::default();

    doc.heading(1, &format!("{} — reference", api.title));
    doc.paragraph(INTRO);
    if let Some(version) = &api.version {
        doc.paragraph(format!("**Version:** `{}`", version));
    }
    if let Some(description) = &api.description {
        doc.paragraph(description);
    }
    if let Some(url) = &api.base_url {
        doc.paragraph(format!("**Base URL:** `{}`", url));
    }

    render_summary(&mut doc, &api.endpoints);
    render_auth(&mut doc, api);
    for endpoint in &api.endpoints {
        render_endpoint(&mut doc, endpoint);
    }
    if !api.schemas.is_empty() {
        render_schemas(&mut doc, &api.schemas);
    }

    doc.finish()
}

fn render_summary(doc: &mut MarkdownDoc, endpoints: &[Endpoint]) {
    if endpoints.is_empty() {
        doc.paragraph("No operations found in `paths`.");
        return;
    }

    doc.heading(2, "Endpoint summary");
    let rows: Vec<Vec<String>> = endpoints
        .iter()
        .map(|ep| {
            vec![
                ep.method.clone(),
                format!("`{}`", escape_cell(&ep.path)),
                escape_cell(&ep.purpose),
            ]
        })
        .collect();
    doc.table(
        &[
            ("Method", Align::Right),
            ("Path", Align::Left),
            ("Purpose", Align::Left),
        ],
        &rows,
    );
}

fn render_auth(doc: &mut MarkdownDoc, api: &ApiReference) {
    doc.heading(2, "Authentication");

    if api.auth.is_empty() {
        doc.paragraph("Authentication is not defined in this OpenAPI spec.");
        return;
    }

    if api.has_bearer() {
        doc.paragraph("All requests require a bearer token:");
        doc.paragraph("`Authorization: Bearer <token>`");
    } else {
        doc.paragraph("Requests authenticate with the security schemes below.");
    }

    doc.bullets(api.auth.iter().map(|scheme| {
        let mut line = format!("`{}`: {}.", scheme.name, scheme.kind.describe());
        if let Some(description) = &scheme.description {
            line.push(' ');
            line.push_str(&escape_cell(description));
        }
        line
    }));
}

fn yes_no(flag: bool) -> String {
    let word = if flag { "yes" } else { "no" };
    word.to_string()
}

fn field_table(doc: &mut MarkdownDoc, fields: &[FieldRow]) {
    let rows: Vec<Vec<String>> = fields
        .iter()
        .map(|f| {
            vec![
                format!("`{}`", f.name),
                format!("`{}`", escape_cell(&f.ty)),
                yes_no(f.required),
                escape_cell(&f.notes),
            ]
        })
        .collect();
    doc.table(
        &[
            ("Field", Align::Left),
            ("Type", Align::Left),
            ("Required", Align::Center),
            ("Notes", Align::Left),
        ],
        &rows,
    );
}

fn example_block(doc: &mut MarkdownDoc, media_type: &str, example: &Value) {
    if is_json(media_type) {
        let pretty = serde_json::to_string_pretty(example).unwrap_or_else(|_| example.to_string());
        doc.code("json", &pretty);
    } else {
        doc.code("", &inline_value(example));
    }
}

fn render_endpoint(doc: &mut MarkdownDoc, ep: &Endpoint) {
    doc.heading(2, &format!("{} {}", ep.method, ep.path));
    if ep.deprecated {
        doc.paragraph("> **Deprecated.**");
    }
    if let Some(description) = &ep.description {
        doc.paragraph(description);
    }

    if !ep.parameters.is_empty() {
        doc.heading(3, "Parameters");
        let rows: Vec<Vec<String>> = ep
            .parameters
            .iter()
            .map(|p| {
                vec![
                    format!("`{}`", p.name),
                    p.location.to_string(),
                    format!("`{}`", escape_cell(&p.ty)),
                    yes_no(p.required),
                    escape_cell(&p.notes),
                ]
            })
            .collect();
        doc.table(
            &[
                ("Name", Align::Left),
                ("In", Align::Left),
                ("Type", Align::Left),
                ("Required", Align::Center),
                ("Notes", Align::Left),
            ],
            &rows,
        );
    }

    doc.heading(3, "Required headers");
    if ep.headers.is_empty() {
        doc.paragraph("None.");
    } else {
        doc.bullets(ep.headers.iter().map(|h| format!("`{}`", h)));
    }

    doc.heading(3, "Request body fields");
    render_request_body(doc, &ep.request_body);

    doc.heading(3, "Responses");
    if ep.responses.is_empty() {
        doc.paragraph("No responses defined.");
    }
    for response in &ep.responses {
        render_response(doc, response);
    }
}

fn render_request_body(doc: &mut MarkdownDoc, body: &RequestBodyDoc) {
    match body {
        RequestBodyDoc::None => doc.paragraph("This endpoint does not define a request body."),
        RequestBodyDoc::Fields {
            media_type,
            description,
            fields,
            example,
        } => {
            if let Some(description) = description {
                doc.paragraph(description);
            }
            field_table(doc, fields);
            if let Some(example) = example {
                doc.paragraph("Example request:");
                example_block(doc, media_type, example);
            }
        }
        RequestBodyDoc::Opaque {
            media_type,
            description,
            schema,
            example,
        } => {
            match schema {
                Some(schema) => doc.paragraph(format!(
                    "Request body is `{}` with schema `{}`.",
                    media_type, schema
                )),
                None => doc.paragraph(format!("Request body is `{}`.", media_type)),
            }
            if let Some(description) = description {
                doc.paragraph(description);
            }
            if let Some(example) = example {
                doc.paragraph("Example request:");
                example_block(doc, media_type, example);
            }
        }
    }
}

fn render_response(doc: &mut MarkdownDoc, response: &ResponseDoc) {
    if response.description.is_empty() {
        doc.paragraph(format!("**{}**", response.code));
    } else {
        doc.paragraph(format!("**{}** — {}", response.code, response.description));
    }

    if let Some(media_type) = &response.media_type {
        match &response.schema {
            Some(schema) => doc.paragraph(format!("Content: `{}` (schema `{}`)", media_type, schema)),
            None => doc.paragraph(format!("Content: `{}`", media_type)),
        }
        if let Some(example) = &response.example {
            example_block(doc, media_type, example);
        }
    }
}

fn render_schemas(doc: &mut MarkdownDoc, schemas: &[SchemaDoc]) {
    doc.heading(2, "Schemas");
    for schema in schemas {
        doc.heading(3, &schema.name);
        if let Some(description) = &schema.description {
            doc.paragraph(description);
        }
        if schema.fields.is_empty() {
            doc.paragraph(format!("Type: `{}`", schema.ty));
        } else {
            field_table(doc, &schema.fields);
        }
        if !schema.enum_values.is_empty() {
            let values: Vec<String> = schema
                .enum_values
                .iter()
                .map(|v| format!("`{}`", v))
                .collect();
            doc.paragraph(format!("Allowed values: {}", values.join(", ")));
        }
    }
}
