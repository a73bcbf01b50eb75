//! # Component Schemas
//!
//! Documents every `components.schemas` entry in declaration order.

use crate::model::SchemaDoc;
use crate::normalize::types::{enum_values, field_rows, object_view, type_label};
use crate::refs::{Resolver, SchemaLink};
use crate::text::non_empty;
use openapiv3::OpenAPI;

/// Builds a [`SchemaDoc`] for each component schema.
pub fn schema_docs<'a>(doc: &'a OpenAPI, resolver: &Resolver<'a>) -> Vec<SchemaDoc> {
    let Some(components) = doc.components.as_ref() else {
        return Vec::new();
    };

    components
        .schemas
        .iter()
        .map(|(name, item)| {
            let link = SchemaLink::from(item);
            let resolved = resolver.schema(link).map(|r| r.schema);

            let fields = resolved
                .and_then(|schema| object_view(resolver, schema))
                .map(|view| field_rows(resolver, &view))
                .unwrap_or_default();

            SchemaDoc {
                name: name.clone(),
                description: resolved
                    .and_then(|schema| non_empty(schema.schema_data.description.as_deref())),
                ty: type_label(link),
                fields,
                enum_values: resolved.map(enum_values).unwrap_or_default(),
            }
        })
        .collect()
}
