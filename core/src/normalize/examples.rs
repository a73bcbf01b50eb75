//! # Example Selection
//!
//! Picks a representative payload for a media type: the explicit `example`,
//! then the first named `examples` entry, then (when enabled) one
//! synthesized from the schema.

use crate::normalize::types::{format_name, object_view};
use crate::refs::{Resolver, SchemaLink};
use openapiv3::{MediaType, Schema, SchemaKind, Type};
use serde_json::{json, Map, Value};

/// Nesting cap for synthesized payloads.
const MAX_EXAMPLE_DEPTH: usize = 8;

/// Example declared on the media type itself.
pub fn declared_example<'a>(resolver: &Resolver<'a>, media: &'a MediaType) -> Option<Value> {
    if let Some(example) = &media.example {
        return Some(example.clone());
    }

    let (_, first) = media.examples.first()?;
    resolver.example(first)?.value.clone()
}

/// Declared example, falling back to synthesis from the media schema if `synthesize` is set.
pub fn select_example<'a>(
    resolver: &Resolver<'a>,
    media: &'a MediaType,
    synthesize: bool,
) -> Option<Value> {
    declared_example(resolver, media).or_else(|| {
        let schema = media.schema.as_ref().filter(|_| synthesize)?;
        Some(synthesize_example(resolver, schema.into()))
    })
}

/// Builds a payload that conforms to `link` as closely as the schema allows.
pub fn synthesize_example<'a>(resolver: &Resolver<'a>, link: SchemaLink<'a>) -> Value {
    let mut visiting = Vec::new();
    build(resolver, link, 0, &mut visiting)
}

fn build<'a>(
    resolver: &Resolver<'a>,
    link: SchemaLink<'a>,
    depth: usize,
    visiting: &mut Vec<&'a str>,
) -> Value {
    if depth > MAX_EXAMPLE_DEPTH {
        return Value::Null;
    }
    let Some(resolved) = resolver.schema(link) else {
        return Value::Null;
    };

    match resolved.component {
        Some(name) if visiting.contains(&name) => Value::Null,
        Some(name) => {
            visiting.push(name);
            let value = from_schema(resolver, resolved.schema, depth, visiting);
            visiting.pop();
            value
        }
        None => from_schema(resolver, resolved.schema, depth, visiting),
    }
}

fn from_schema<'a>(
    resolver: &Resolver<'a>,
    schema: &'a Schema,
    depth: usize,
    visiting: &mut Vec<&'a str>,
) -> Value {
    let data = &schema.schema_data;
    if let Some(example) = &data.example {
        return example.clone();
    }
    if let Some(default) = &data.default {
        return default.clone();
    }
    if let Some(first) = first_enum_value(schema) {
        return first;
    }

    match &schema.schema_kind {
        SchemaKind::Type(Type::String(s)) => string_sample(format_name(&s.format).as_deref()),
        SchemaKind::Type(Type::Integer(_)) => json!(0),
        SchemaKind::Type(Type::Number(_)) => json!(0.0),
        SchemaKind::Type(Type::Boolean { .. }) => Value::Bool(true),
        SchemaKind::Type(Type::Array(a)) => match &a.items {
            Some(items) => Value::Array(vec![build(resolver, items.into(), depth + 1, visiting)]),
            None => Value::Array(Vec::new()),
        },
        SchemaKind::Type(Type::Object(_)) | SchemaKind::AllOf { .. } => {
            object_sample(resolver, schema, depth, visiting)
        }
        SchemaKind::OneOf { one_of: branches } | SchemaKind::AnyOf { any_of: branches } => {
            match branches.first() {
                Some(first) => build(resolver, first.into(), depth + 1, visiting),
                None => Value::Null,
            }
        }
        SchemaKind::Not { .. } => Value::Null,
        SchemaKind::Any(any) => match (any.typ.as_deref(), &any.items) {
            (Some("string"), _) => string_sample(any.format.as_deref()),
            (Some("integer"), _) => json!(0),
            (Some("number"), _) => json!(0.0),
            (Some("boolean"), _) => Value::Bool(true),
            (Some("array") | None, Some(items)) => {
                Value::Array(vec![build(resolver, items.into(), depth + 1, visiting)])
            }
            (Some("array"), None) => Value::Array(Vec::new()),
            (Some("object") | None, _) => object_sample(resolver, schema, depth, visiting),
            (Some(_), _) => Value::Null,
        },
    }
}

fn object_sample<'a>(
    resolver: &Resolver<'a>,
    schema: &'a Schema,
    depth: usize,
    visiting: &mut Vec<&'a str>,
) -> Value {
    let mut map = Map::new();
    if let Some(view) = object_view(resolver, schema) {
        for (name, link) in view.properties {
            map.insert(name.to_string(), build(resolver, link, depth + 1, visiting));
        }
    }
    Value::Object(map)
}

fn first_enum_value(schema: &Schema) -> Option<Value> {
    match &schema.schema_kind {
        SchemaKind::Type(Type::String(s)) => s.enumeration.first().map(|v| json!(v)),
        SchemaKind::Type(Type::Integer(i)) => i.enumeration.first().map(|v| json!(v)),
        SchemaKind::Type(Type::Number(n)) => n.enumeration.first().map(|v| json!(v)),
        SchemaKind::Any(any) => any.enumeration.first().cloned(),
        _ => None,
    }
}

fn string_sample(format: Option<&str>) -> Value {
    let sample = match format {
        Some("date") => "2024-01-01",
        Some("date-time") => "2024-01-01T00:00:00Z",
        Some("uuid") => "00000000-0000-0000-0000-000000000000",
        Some("email") => "user@example.com",
        Some("uri") | Some("url") => "https://example.com",
        Some("byte") => "U3dhZ2dlcg==",
        Some("binary") => "<binary>",
        Some("password") => "********",
        _ => "string",
    };
    Value::String(sample.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use openapiv3::OpenAPI;

    const DOC: &str = r#"
openapi: 3.0.0
info: {title: T, version: 1.0.0}
paths: {}
components:
  examples:
    Alice:
      value: {id: 7, name: alice}
  schemas:
    Node:
      type: object
      properties:
        id: {type: integer, format: int64}
        created: {type: string, format: date-time}
        kind: {type: string, enum: [leaf, branch]}
        children:
          type: array
          items: {$ref: '#/components/schemas/Node'}
    Tagged:
      type: object
      properties:
        label: {type: string, example: hello}
        active: {type: boolean, default: false}
"#;

    fn doc() -> OpenAPI {
        serde_yaml::from_str(DOC).unwrap()
    }

    #[test]
    fn test_synthesize_recursive_schema_terminates() {
        let doc = doc();
        let resolver = Resolver::new(doc.components.as_ref());
        let value = synthesize_example(&resolver, SchemaLink::Ref("#/components/schemas/Node"));
        assert_eq!(
            value,
            json!({
                "id": 0,
                "created": "2024-01-01T00:00:00Z",
                "kind": "leaf",
                "children": [null]
            })
        );
    }

    #[test]
    fn test_synthesize_prefers_example_and_default() {
        let doc = doc();
        let resolver = Resolver::new(doc.components.as_ref());
        let value = synthesize_example(&resolver, SchemaLink::Ref("#/components/schemas/Tagged"));
        assert_eq!(value, json!({"label": "hello", "active": false}));
    }

    #[test]
    fn test_synthesize_format_aware_strings() {
        let resolver = Resolver::new(None);
        let contact: Schema = serde_yaml::from_str(
            r#"
type: object
properties:
  id: {type: string, format: uuid}
  email: {type: string, format: email}
  homepage: {type: string, format: uri}
  born: {type: string, format: date}
"#,
        )
        .unwrap();
        assert_eq!(
            synthesize_example(&resolver, SchemaLink::Inline(&contact)),
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "email": "user@example.com",
                "homepage": "https://example.com",
                "born": "2024-01-01"
            })
        );
    }

    #[test]
    fn test_declared_example_from_named_ref() {
        let doc = doc();
        let resolver = Resolver::new(doc.components.as_ref());
        let media: MediaType = serde_yaml::from_str(
            r#"
examples:
  first: {$ref: '#/components/examples/Alice'}
"#,
        )
        .unwrap();
        assert_eq!(
            declared_example(&resolver, &media),
            Some(json!({"id": 7, "name": "alice"}))
        );
    }

    #[test]
    fn test_select_example_respects_synthesis_flag() {
        let doc = doc();
        let resolver = Resolver::new(doc.components.as_ref());
        let media: MediaType =
            serde_yaml::from_str("schema: {$ref: '#/components/schemas/Tagged'}").unwrap();

        assert!(select_example(&resolver, &media, false).is_none());
        assert!(select_example(&resolver, &media, true).is_some());
    }

    #[test]
    fn test_inline_example_wins() {
        let resolver = Resolver::new(None);
        let media: MediaType = serde_yaml::from_str(
            r#"
example: {ok: true}
examples:
  other: {value: {ok: false}}
"#,
        )
        .unwrap();
        assert_eq!(declared_example(&resolver, &media), Some(json!({"ok": true})));
    }
}
