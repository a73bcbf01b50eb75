#![deny(missing_docs)]

//! # Normalization
//!
//! Maps a parsed OpenAPI document onto the [`ApiReference`] render model.
//!
//! - **types**: type labels, property views and table rows for schemas.
//! - **examples**: example selection and synthesis.
//! - **security**: security schemes and per-operation auth headers.
//! - **operations**: endpoints, parameters, request bodies and responses.
//! - **schemas**: component schema documentation.

pub mod examples;
pub mod operations;
pub mod schemas;
pub mod security;
pub mod types;

use crate::model::ApiReference;
use crate::options::RenderOptions;
use crate::refs::Resolver;
use crate::text::{non_empty, substitute_vars};
use openapiv3::OpenAPI;
use std::collections::HashMap;
use tracing::info;

use operations::{build_endpoint, collect_operations, OperationContext};

/// Title used when `info.title` is empty and no override is given.
pub const DEFAULT_TITLE: &str = "API reference";

/// Normalizes a document into the render model.
///
/// Never fails: unresolved references and unsupported constructs are logged
/// and rendered conservatively.
pub fn normalize(doc: &OpenAPI, options: &RenderOptions) -> ApiReference {
    let resolver = Resolver::new(doc.components.as_ref());
    let auth = security::auth_schemes(doc, &resolver);

    let ctx = OperationContext {
        resolver,
        schemes: &auth,
        doc_security: doc.security.as_deref(),
        options,
    };
    let endpoints: Vec<_> = collect_operations(doc)
        .into_iter()
        .map(|(method, path, item, op)| build_endpoint(&ctx, method, path, item, op))
        .collect();

    let schemas = if options.include_schemas {
        schemas::schema_docs(doc, &resolver)
    } else {
        Vec::new()
    };

    info!(
        endpoints = endpoints.len(),
        schemes = auth.len(),
        schemas = schemas.len(),
        "Normalized OpenAPI document"
    );

    ApiReference {
        title: title(doc, options),
        version: non_empty(Some(doc.info.version.as_str())),
        description: non_empty(doc.info.description.as_deref()),
        base_url: base_url(doc),
        auth,
        endpoints,
        schemas,
    }
}

fn title(doc: &OpenAPI, options: &RenderOptions) -> String {
    non_empty(options.title.as_deref())
        .or_else(|| non_empty(Some(doc.info.title.as_str())))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// First server URL with `{variable}` placeholders replaced by their defaults.
fn base_url(doc: &OpenAPI) -> Option<String> {
    let server = doc.servers.first()?;
    let vars: HashMap<&str, &str> = server
        .variables
        .iter()
        .flatten()
        .map(|(name, var)| (name.as_str(), var.default.as_str()))
        .collect();
    non_empty(Some(substitute_vars(&server.url, &vars).as_str()))
}
