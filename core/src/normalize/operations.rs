#![deny(missing_docs)]

//! # Operation Normalization
//!
//! Turns `paths` into sorted [`Endpoint`] values: parameters merged with
//! their path item, request bodies and responses resolved, headers derived.

use crate::model::{AuthScheme, Endpoint, ParamRow, RequestBodyDoc, ResponseDoc};
use crate::normalize::examples::select_example;
use crate::normalize::security::auth_headers;
use crate::normalize::types::{field_rows, object_view, schema_notes, type_label};
use crate::options::RenderOptions;
use crate::refs::{ref_display_name, Resolver};
use crate::text::{collapse, non_empty};
use indexmap::IndexMap;
use openapiv3::{
    MediaType, OpenAPI, Operation, Parameter, ParameterData, ParameterSchemaOrContent, PathItem,
    ReferenceOr, Response, StatusCode,
};
use tracing::{debug, warn};

/// Shared state for normalizing every operation of one document.
pub struct OperationContext<'a> {
    /// Reference resolver over the document's components.
    pub resolver: Resolver<'a>,
    /// Declared security schemes.
    pub schemes: &'a [AuthScheme],
    /// Document-level `security`.
    pub doc_security: Option<&'a [openapiv3::SecurityRequirement]>,
    /// Rendering options.
    pub options: &'a RenderOptions,
}

/// Collects `(METHOD, path, operation)` triples sorted by path, then method.
pub fn collect_operations(doc: &OpenAPI) -> Vec<(&'static str, &str, &PathItem, &Operation)> {
    let mut ops = Vec::new();

    for (path, item) in &doc.paths.paths {
        let item = match item {
            ReferenceOr::Item(item) => item,
            ReferenceOr::Reference { reference } => {
                warn!(path = %path, reference = %reference, "Skipping path item given as $ref");
                continue;
            }
        };

        let methods = [
            ("GET", &item.get),
            ("POST", &item.post),
            ("PUT", &item.put),
            ("PATCH", &item.patch),
            ("DELETE", &item.delete),
            ("HEAD", &item.head),
            ("OPTIONS", &item.options),
        ];
        for (method, op) in methods {
            if let Some(op) = op {
                ops.push((method, path.as_str(), item, op));
            }
        }
    }

    ops.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
    ops
}

/// Normalizes one operation.
pub fn build_endpoint<'a>(
    ctx: &OperationContext<'a>,
    method: &str,
    path: &str,
    item: &'a PathItem,
    op: &'a Operation,
) -> Endpoint {
    debug!(method, path, "Normalizing operation");

    let summary = non_empty(op.summary.as_deref());
    let description = non_empty(op.description.as_deref());
    let purpose = summary
        .as_deref()
        .or(description.as_deref())
        .map(collapse)
        .unwrap_or_default();
    let prose = description.or(summary).map(|text| collapse(&text));

    let params = merged_parameters(&ctx.resolver, item, op);
    let parameters: Vec<ParamRow> = params
        .iter()
        .map(|(location, data)| param_row(&ctx.resolver, *location, data))
        .collect();

    let request_body = request_body_doc(ctx, op);

    let mut headers = auth_headers(ctx.schemes, ctx.doc_security, op.security.as_deref());
    for (location, data) in &params {
        if *location == "header" && data.required {
            headers.push(format!("{}: <value>", data.name));
        }
    }
    if let Some(media_type) = request_body.media_type() {
        headers.push(format!("Content-Type: {}", media_type));
    }
    let mut seen = Vec::new();
    headers.retain(|h| {
        let fresh = !seen.contains(h);
        if fresh {
            seen.push(h.clone());
        }
        fresh
    });

    Endpoint {
        method: method.to_string(),
        path: path.to_string(),
        purpose,
        description: prose,
        deprecated: op.deprecated,
        parameters,
        headers,
        request_body,
        responses: responses(ctx, op),
    }
}

const LOCATION_ORDER: [&str; 4] = ["path", "query", "header", "cookie"];

fn split_parameter(param: &Parameter) -> (&'static str, &ParameterData) {
    match param {
        Parameter::Path { parameter_data, .. } => ("path", parameter_data),
        Parameter::Query { parameter_data, .. } => ("query", parameter_data),
        Parameter::Header { parameter_data, .. } => ("header", parameter_data),
        Parameter::Cookie { parameter_data, .. } => ("cookie", parameter_data),
    }
}

/// Path-item parameters overlaid with operation parameters, ordered by location.
fn merged_parameters<'a>(
    resolver: &Resolver<'a>,
    item: &'a PathItem,
    op: &'a Operation,
) -> Vec<(&'static str, &'a ParameterData)> {
    let mut merged: Vec<(&'static str, &'a ParameterData)> = Vec::new();

    for param in item.parameters.iter().chain(op.parameters.iter()) {
        let Some(param) = resolver.parameter(param) else {
            continue;
        };
        let (location, data) = split_parameter(param);
        match merged
            .iter_mut()
            .find(|(loc, existing)| *loc == location && existing.name == data.name)
        {
            Some(slot) => slot.1 = data,
            None => merged.push((location, data)),
        }
    }

    merged.sort_by_key(|(location, _)| LOCATION_ORDER.iter().position(|l| l == location));
    merged
}

fn param_row<'a>(
    resolver: &Resolver<'a>,
    location: &'static str,
    data: &'a ParameterData,
) -> ParamRow {
    let (ty, schema) = match &data.format {
        ParameterSchemaOrContent::Schema(schema) => {
            let resolved = resolver.schema(schema.into()).map(|r| r.schema);
            (type_label(schema.into()), resolved)
        }
        ParameterSchemaOrContent::Content(content) => {
            let ty = content
                .first()
                .and_then(|(_, media)| media.schema.as_ref())
                .map_or_else(|| "object".to_string(), |schema| type_label(schema.into()));
            (ty, None)
        }
    };

    let mut notes = Vec::new();
    if let Some(desc) = non_empty(data.description.as_deref()) {
        notes.push(collapse(&desc));
    }
    if data.deprecated == Some(true) {
        notes.push("Deprecated.".to_string());
    }
    let schema_part = schema_notes(schema, data.example.as_ref());
    if !schema_part.is_empty() {
        notes.push(schema_part);
    }

    ParamRow {
        name: data.name.clone(),
        location,
        ty,
        required: data.required || location == "path",
        notes: notes.join(" "),
    }
}

/// True for `application/json` and structured-syntax `+json` media types.
pub fn is_json(media_type: &str) -> bool {
    let essence = media_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/json") || essence.ends_with("+json")
}

/// Picks `application/json`, else any JSON flavor, else the first declared media type.
pub fn select_media(content: &IndexMap<String, MediaType>) -> Option<(&str, &MediaType)> {
    content
        .get_key_value("application/json")
        .or_else(|| content.iter().find(|(key, _)| is_json(key)))
        .or_else(|| content.first())
        .map(|(key, media)| (key.as_str(), media))
}

fn request_body_doc<'a>(ctx: &OperationContext<'a>, op: &'a Operation) -> RequestBodyDoc {
    let Some(body) = op.request_body.as_ref() else {
        return RequestBodyDoc::None;
    };
    let Some(body) = ctx.resolver.request_body(body) else {
        return RequestBodyDoc::None;
    };
    let Some((media_type, media)) = select_media(&body.content) else {
        debug!("Request body declares no content");
        return RequestBodyDoc::None;
    };

    let media_type = media_type.to_string();
    let description = non_empty(body.description.as_deref());
    let example = select_example(&ctx.resolver, media, ctx.options.synthesize_examples);

    let Some(schema) = media.schema.as_ref() else {
        return RequestBodyDoc::Opaque {
            media_type,
            description,
            schema: None,
            example,
        };
    };

    let view = ctx
        .resolver
        .schema(schema.into())
        .and_then(|resolved| object_view(&ctx.resolver, resolved.schema));
    match view {
        Some(view) => RequestBodyDoc::Fields {
            media_type,
            description,
            fields: field_rows(&ctx.resolver, &view),
            example,
        },
        None => RequestBodyDoc::Opaque {
            media_type,
            description,
            schema: Some(type_label(schema.into())),
            example,
        },
    }
}

fn status_key(code: &str) -> (u8, u16, String) {
    match code.parse::<u16>() {
        Ok(numeric) => (0, numeric, String::new()),
        Err(_) => (1, 0, code.to_string()),
    }
}

fn responses<'a>(ctx: &OperationContext<'a>, op: &'a Operation) -> Vec<ResponseDoc> {
    let mut entries: Vec<(String, &'a ReferenceOr<Response>)> = op
        .responses
        .responses
        .iter()
        .map(|(status, response)| {
            let code = match status {
                StatusCode::Code(code) => code.to_string(),
                StatusCode::Range(range) => format!("{}XX", range),
            };
            (code, response)
        })
        .collect();
    if let Some(default) = &op.responses.default {
        entries.push(("default".to_string(), default));
    }
    entries.sort_by_cached_key(|(code, _)| status_key(code));

    entries
        .into_iter()
        .map(|(code, response)| response_doc(ctx, code, response))
        .collect()
}

fn response_doc<'a>(
    ctx: &OperationContext<'a>,
    code: String,
    response: &'a ReferenceOr<Response>,
) -> ResponseDoc {
    let Some(resolved) = ctx.resolver.response(response) else {
        let description = match response {
            ReferenceOr::Reference { reference } => format!("See `{}`.", ref_display_name(reference)),
            ReferenceOr::Item(_) => String::new(),
        };
        return ResponseDoc {
            code,
            description,
            media_type: None,
            schema: None,
            example: None,
        };
    };

    let selected = select_media(&resolved.content);
    let schema = selected
        .and_then(|(_, media)| media.schema.as_ref())
        .map(|schema| type_label(schema.into()));
    let example = selected
        .filter(|(media_type, _)| is_json(media_type))
        .and_then(|(_, media)| select_example(&ctx.resolver, media, ctx.options.synthesize_examples));

    ResponseDoc {
        code,
        description: collapse(&resolved.description),
        media_type: selected.map(|(media_type, _)| media_type.to_string()),
        schema,
        example,
    }
}
