//! # Text Helpers
//!
//! Small string utilities shared by normalization and rendering.

use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

fn whitespace_re() -> &'static Regex {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex"))
}

fn template_var_re() -> &'static Regex {
    static TEMPLATE_VAR_RE: OnceLock<Regex> = OnceLock::new();
    TEMPLATE_VAR_RE.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("Invalid regex"))
}

/// Collapses every whitespace run (newlines included) to one space and trims.
pub fn collapse(text: &str) -> String {
    whitespace_re().replace_all(text.trim(), " ").into_owned()
}

/// Makes text safe for a single Markdown table cell.
pub fn escape_cell(text: &str) -> String {
    collapse(text).replace('|', "\\|")
}

/// Renders a JSON value inline: strings verbatim, everything else as compact JSON.
pub fn inline_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Replaces `{name}` placeholders using `vars`; unknown names are left as written.
pub fn substitute_vars(template: &str, vars: &HashMap<&str, &str>) -> String {
    template_var_re()
        .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => (*value).to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Returns `None` for empty or whitespace-only text, otherwise the trimmed text.
pub fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
