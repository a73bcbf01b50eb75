#![deny(missing_docs)]

//! # Schema Inspection
//!
//! Type labels, object property views (with `allOf` merging), enum values and
//! table-row construction for schemas.

use crate::model::FieldRow;
use crate::refs::{ref_display_name, Resolver, SchemaLink, MAX_REF_DEPTH};
use crate::text::{collapse, inline_value};
use openapiv3::{AdditionalProperties, ReferenceOr, Schema, SchemaKind, Type};
use serde::Serialize;
use serde_json::Value;

/// Human type label for a schema position.
pub fn type_label(link: SchemaLink<'_>) -> String {
    match link {
        SchemaLink::Ref(reference) => ref_display_name(reference),
        SchemaLink::Inline(schema) => schema_label(schema),
    }
}

/// Human type label for an inline schema body.
pub fn schema_label(schema: &Schema) -> String {
    let nullable = schema.schema_data.nullable;
    match &schema.schema_kind {
        SchemaKind::Type(Type::String(s)) => qualified("string", format_name(&s.format), nullable),
        SchemaKind::Type(Type::Integer(i)) => {
            qualified("integer", format_name(&i.format), nullable)
        }
        SchemaKind::Type(Type::Number(n)) => qualified("number", format_name(&n.format), nullable),
        SchemaKind::Type(Type::Boolean { .. }) => qualified("boolean", None, nullable),
        SchemaKind::Type(Type::Array(a)) => {
            let base = match &a.items {
                Some(items) => format!("array<{}>", type_label(items.into())),
                None => "array".to_string(),
            };
            qualified(&base, None, nullable)
        }
        SchemaKind::Type(Type::Object(o)) => {
            let base = match &o.additional_properties {
                Some(AdditionalProperties::Schema(value)) if o.properties.is_empty() => {
                    format!("map<{}>", type_label(SchemaLink::from(&**value)))
                }
                _ => "object".to_string(),
            };
            qualified(&base, None, nullable)
        }
        SchemaKind::OneOf { one_of } => composite("oneOf", one_of),
        SchemaKind::AnyOf { any_of } => composite("anyOf", any_of),
        SchemaKind::AllOf { all_of } => composite("allOf", all_of),
        SchemaKind::Not { .. } => "any".to_string(),
        SchemaKind::Any(any) => {
            let base = match (&any.typ, &any.items) {
                (Some(typ), Some(items)) if typ == "array" => {
                    format!("array<{}>", type_label(items.into()))
                }
                (Some(typ), _) => typ.clone(),
                (None, Some(items)) => format!("array<{}>", type_label(items.into())),
                (None, None) if !any.properties.is_empty() => "object".to_string(),
                (None, None) => "any".to_string(),
            };
            qualified(&base, any.format.clone(), nullable)
        }
    }
}

fn composite(keyword: &str, parts: &[ReferenceOr<Schema>]) -> String {
    let labels: Vec<String> = parts.iter().map(|part| type_label(part.into())).collect();
    format!("{}<{}>", keyword, labels.join(", "))
}

fn qualified(base: &str, format: Option<String>, nullable: bool) -> String {
    let mut qualifiers = Vec::new();
    if let Some(format) = format {
        qualifiers.push(format);
    }
    if nullable {
        qualifiers.push("nullable".to_string());
    }

    if qualifiers.is_empty() {
        base.to_string()
    } else {
        format!("{} ({})", base, qualifiers.join(", "))
    }
}

/// Name of a `format` value as written in the document (`date-time`, `int64`, ...).
///
/// Works for any `VariantOrUnknownOrEmpty` by going through its serde form;
/// an empty format serializes to `null` and yields `None`.
pub fn format_name<T: Serialize>(format: &T) -> Option<String> {
    match serde_json::to_value(format).ok()? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Allowed values of an enumerated schema, rendered inline.
pub fn enum_values(schema: &Schema) -> Vec<String> {
    fn render<T: ToString>(values: &[Option<T>]) -> Vec<String> {
        values
            .iter()
            .map(|v| v.as_ref().map_or_else(|| "null".to_string(), T::to_string))
            .collect()
    }

    match &schema.schema_kind {
        SchemaKind::Type(Type::String(s)) => render(&s.enumeration),
        SchemaKind::Type(Type::Integer(i)) => render(&i.enumeration),
        SchemaKind::Type(Type::Number(n)) => render(&n.enumeration),
        SchemaKind::Any(any) => any.enumeration.iter().map(inline_value).collect(),
        _ => Vec::new(),
    }
}

/// The merged property set of an object-like schema.
#[derive(Debug, Default)]
pub struct ObjectView<'a> {
    /// Properties in declaration order; later `allOf` parts override earlier ones.
    pub properties: Vec<(&'a str, SchemaLink<'a>)>,
    /// Required property names.
    pub required: Vec<&'a str>,
}

impl ObjectView<'_> {
    fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| *r == name)
    }
}

/// Collects the properties of `schema`, descending into `allOf` parts.
///
/// Returns `None` when the schema declares no properties at all.
pub fn object_view<'a>(resolver: &Resolver<'a>, schema: &'a Schema) -> Option<ObjectView<'a>> {
    let mut view = ObjectView::default();
    collect_properties(resolver, schema, 0, &mut view);
    if view.properties.is_empty() {
        None
    } else {
        Some(view)
    }
}

fn collect_properties<'a>(
    resolver: &Resolver<'a>,
    schema: &'a Schema,
    depth: usize,
    view: &mut ObjectView<'a>,
) {
    if depth > MAX_REF_DEPTH {
        return;
    }

    let (properties, required) = match &schema.schema_kind {
        SchemaKind::Type(Type::Object(o)) => (&o.properties, &o.required),
        SchemaKind::Any(any) => (&any.properties, &any.required),
        SchemaKind::AllOf { all_of } => {
            for part in all_of {
                if let Some(resolved) = resolver.schema(part.into()) {
                    collect_properties(resolver, resolved.schema, depth + 1, view);
                }
            }
            return;
        }
        _ => return,
    };

    for (name, prop) in properties {
        let link = SchemaLink::from(prop);
        match view.properties.iter_mut().find(|(n, _)| *n == name.as_str()) {
            Some(existing) => existing.1 = link,
            None => view.properties.push((name.as_str(), link)),
        }
    }
    for name in required {
        if !view.is_required(name) {
            view.required.push(name.as_str());
        }
    }
}

/// Notes column text for a schema: description, deprecation, enum, default, example.
pub fn schema_notes(schema: Option<&Schema>, example: Option<&Value>) -> String {
    let mut parts = Vec::new();

    if let Some(schema) = schema {
        let data = &schema.schema_data;
        if let Some(desc) = data.description.as_deref().map(collapse) {
            if !desc.is_empty() {
                parts.push(desc);
            }
        }
        if data.deprecated {
            parts.push("Deprecated.".to_string());
        }
        let values = enum_values(schema);
        if !values.is_empty() {
            let quoted: Vec<String> = values.iter().map(|v| format!("`{}`", v)).collect();
            parts.push(format!("One of: {}.", quoted.join(", ")));
        }
        if let Some(default) = &data.default {
            parts.push(format!("Default: `{}`.", inline_value(default)));
        }
    }

    let example = example.or_else(|| schema.and_then(|s| s.schema_data.example.as_ref()));
    if let Some(example) = example {
        parts.push(format!("Example: `{}`", inline_value(example)));
    }

    parts.join(" ")
}

/// Builds table rows for an object view: required first, then alphabetical.
pub fn field_rows(resolver: &Resolver<'_>, view: &ObjectView<'_>) -> Vec<FieldRow> {
    let mut rows: Vec<FieldRow> = view
        .properties
        .iter()
        .map(|(name, link)| {
            let resolved = resolver.schema(*link).map(|r| r.schema);
            FieldRow {
                name: name.to_string(),
                ty: type_label(*link),
                required: view.is_required(name),
                notes: schema_notes(resolved, None),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.required.cmp(&a.required).then_with(|| a.name.cmp(&b.name)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use openapiv3::OpenAPI;

    fn schema(yaml: &str) -> Schema {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_primitive_labels() {
        assert_eq!(schema_label(&schema("type: string")), "string");
        assert_eq!(
            schema_label(&schema("{type: string, format: date-time}")),
            "string (date-time)"
        );
        assert_eq!(
            schema_label(&schema("{type: integer, format: int64}")),
            "integer (int64)"
        );
        assert_eq!(
            schema_label(&schema("{type: string, format: uuid, nullable: true}")),
            "string (uuid, nullable)"
        );
        assert_eq!(schema_label(&schema("type: boolean")), "boolean");
    }

    #[test]
    fn test_container_labels() {
        let arr = schema("{type: array, items: {$ref: '#/components/schemas/Pet'}}");
        assert_eq!(schema_label(&arr), "array<Pet>");

        let map = schema("{type: object, additionalProperties: {type: integer}}");
        assert_eq!(schema_label(&map), "map<integer>");

        let one_of = schema(
            "oneOf: [{$ref: '#/components/schemas/Cat'}, {$ref: '#/components/schemas/Dog'}]",
        );
        assert_eq!(schema_label(&one_of), "oneOf<Cat, Dog>");
    }

    #[test]
    fn test_enum_values() {
        let s = schema("{type: string, enum: [available, sold]}");
        assert_eq!(enum_values(&s), vec!["available", "sold"]);
    }

    #[test]
    fn test_object_view_merges_all_of() {
        let doc: OpenAPI = serde_yaml::from_str(
            r#"
openapi: 3.0.0
info: {title: T, version: 1.0.0}
paths: {}
components:
  schemas:
    Base:
      type: object
      required: [id]
      properties:
        id: {type: integer}
    Pet:
      allOf:
        - $ref: '#/components/schemas/Base'
        - type: object
          required: [name]
          properties:
            name: {type: string}
"#,
        )
        .unwrap();
        let resolver = Resolver::new(doc.components.as_ref());
        let pet = resolver
            .schema(SchemaLink::Ref("#/components/schemas/Pet"))
            .unwrap();

        let view = object_view(&resolver, pet.schema).unwrap();
        let names: Vec<&str> = view.properties.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["id", "name"]);
        assert_eq!(view.required, vec!["id", "name"]);
    }

    #[test]
    fn test_field_rows_sorting_and_notes() {
        let body = schema(
            r#"
type: object
required: [name]
properties:
  tag:
    type: string
    description: "Free-form\nlabel"
    example: friendly
  age: {type: integer, default: 1}
  name: {type: string}
"#,
        );
        let resolver = Resolver::new(None);
        let view = object_view(&resolver, &body).unwrap();
        let rows = field_rows(&resolver, &view);

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "tag"]);
        assert!(rows[0].required);
        assert_eq!(rows[1].notes, "Default: `1`.");
        assert_eq!(rows[2].notes, "Free-form label Example: `friendly`");
    }

    #[test]
    fn test_non_object_has_no_view() {
        let resolver = Resolver::new(None);
        assert!(object_view(&resolver, &schema("type: string")).is_none());
    }
}
