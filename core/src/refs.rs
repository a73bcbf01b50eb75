#![deny(missing_docs)]

//! # Reference Resolution
//!
//! Follows local `$ref` pointers (`#/components/{section}/{name}`) into the
//! document's `components` object.
//!
//! External documents are never fetched: a reference whose document part is
//! not empty is reported as unresolved and callers fall back to rendering
//! the component name alone.

use indexmap::IndexMap;
use openapiv3::{
    Components, Example, Parameter, ReferenceOr, RequestBody, Response, Schema, SecurityScheme,
};
use percent_encoding::percent_decode_str;
use tracing::warn;

/// Upper bound on chained `$ref` hops before a reference is treated as circular.
pub const MAX_REF_DEPTH: usize = 16;

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent-encoding).
pub fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Extracts a component name from a `$ref` if it points to `#/components/{section}/{name}`.
///
/// Returns `None` for external references and pointers into other sections.
pub fn component_name(ref_str: &str, section: &str) -> Option<String> {
    let pointer = ref_str.strip_prefix("#/")?;
    let segments: Vec<&str> = pointer.split('/').collect();

    if segments.len() != 3 || segments[0] != "components" || segments[1] != section {
        return None;
    }

    let name = decode_pointer_segment(segments[2]);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Display name for a reference: the decoded last pointer segment, or the raw string.
pub fn ref_display_name(ref_str: &str) -> String {
    match ref_str.rsplit_once('/') {
        Some((_, last)) if !last.is_empty() => decode_pointer_segment(last),
        _ => ref_str.to_string(),
    }
}

/// A schema position that is either a reference or an inline schema.
///
/// `openapiv3` uses both `ReferenceOr<Schema>` and `ReferenceOr<Box<Schema>>`;
/// this borrows either shape.
#[derive(Debug, Clone, Copy)]
pub enum SchemaLink<'a> {
    /// A `$ref` string.
    Ref(&'a str),
    /// An inline schema.
    Inline(&'a Schema),
}

impl<'a> From<&'a ReferenceOr<Schema>> for SchemaLink<'a> {
    fn from(value: &'a ReferenceOr<Schema>) -> Self {
        match value {
            ReferenceOr::Reference { reference } => SchemaLink::Ref(reference),
            ReferenceOr::Item(schema) => SchemaLink::Inline(schema),
        }
    }
}

impl<'a> From<&'a ReferenceOr<Box<Schema>>> for SchemaLink<'a> {
    fn from(value: &'a ReferenceOr<Box<Schema>>) -> Self {
        match value {
            ReferenceOr::Reference { reference } => SchemaLink::Ref(reference),
            ReferenceOr::Item(schema) => SchemaLink::Inline(schema),
        }
    }
}

/// A schema after reference resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSchema<'a> {
    /// Name of the last component traversed, if the link was a reference.
    pub component: Option<&'a str>,
    /// The schema body.
    pub schema: &'a Schema,
}

/// Resolves `$ref` pointers against a document's components.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    components: Option<&'a Components>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over the given components object.
    pub fn new(components: Option<&'a Components>) -> Self {
        Self { components }
    }

    /// Follows a schema link through `components.schemas`.
    pub fn schema(&self, link: SchemaLink<'a>) -> Option<ResolvedSchema<'a>> {
        let mut reference = match link {
            SchemaLink::Inline(schema) => {
                return Some(ResolvedSchema {
                    component: None,
                    schema,
                })
            }
            SchemaLink::Ref(reference) => reference,
        };

        for _ in 0..MAX_REF_DEPTH {
            let (name, entry) = self.lookup(reference, "schemas", |c| &c.schemas)?;
            match entry {
                ReferenceOr::Item(schema) => {
                    return Some(ResolvedSchema {
                        component: Some(name),
                        schema,
                    })
                }
                ReferenceOr::Reference { reference: next } => reference = next.as_str(),
            }
        }

        warn!(reference, "Schema reference chain too deep; treating as circular");
        None
    }

    /// Resolves a response, following `components.responses`.
    pub fn response(&self, item: &'a ReferenceOr<Response>) -> Option<&'a Response> {
        self.follow(item, "responses", |c| &c.responses)
    }

    /// Resolves a request body, following `components.requestBodies`.
    pub fn request_body(&self, item: &'a ReferenceOr<RequestBody>) -> Option<&'a RequestBody> {
        self.follow(item, "requestBodies", |c| &c.request_bodies)
    }

    /// Resolves a parameter, following `components.parameters`.
    pub fn parameter(&self, item: &'a ReferenceOr<Parameter>) -> Option<&'a Parameter> {
        self.follow(item, "parameters", |c| &c.parameters)
    }

    /// Resolves a named example, following `components.examples`.
    pub fn example(&self, item: &'a ReferenceOr<Example>) -> Option<&'a Example> {
        self.follow(item, "examples", |c| &c.examples)
    }

    /// Resolves a security scheme, following `components.securitySchemes`.
    pub fn security_scheme(
        &self,
        item: &'a ReferenceOr<SecurityScheme>,
    ) -> Option<&'a SecurityScheme> {
        self.follow(item, "securitySchemes", |c| &c.security_schemes)
    }

    fn follow<T>(
        &self,
        mut item: &'a ReferenceOr<T>,
        section: &str,
        table: fn(&'a Components) -> &'a IndexMap<String, ReferenceOr<T>>,
    ) -> Option<&'a T> {
        for _ in 0..MAX_REF_DEPTH {
            match item {
                ReferenceOr::Item(value) => return Some(value),
                ReferenceOr::Reference { reference } => {
                    item = self.lookup(reference, section, table)?.1;
                }
            }
        }

        warn!(section, "Reference chain too deep; treating as circular");
        None
    }

    fn lookup<T>(
        &self,
        reference: &str,
        section: &str,
        table: fn(&'a Components) -> &'a IndexMap<String, ReferenceOr<T>>,
    ) -> Option<(&'a str, &'a ReferenceOr<T>)> {
        let Some(name) = component_name(reference, section) else {
            warn!(reference, section, "Unsupported or external reference left unresolved");
            return None;
        };

        let found = self
            .components
            .and_then(|components| table(components).get_key_value(name.as_str()));
        if found.is_none() {
            warn!(reference, "Reference target not found in components");
        }
        found.map(|(key, value)| (key.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openapiv3::OpenAPI;

    fn doc(yaml: &str) -> OpenAPI {
        serde_yaml::from_str(yaml).unwrap()
    }

    const COMPONENTS: &str = r#"
openapi: 3.0.0
info: {title: T, version: 1.0.0}
paths: {}
components:
  schemas:
    User:
      type: object
      properties:
        id: {type: integer}
    Alias:
      $ref: '#/components/schemas/User'
    Loop:
      $ref: '#/components/schemas/Loop'
  responses:
    NotFound:
      description: Missing
  parameters:
    Limit:
      name: limit
      in: query
      schema: {type: integer}
"#;

    #[test]
    fn test_component_name_local() {
        assert_eq!(
            component_name("#/components/schemas/User", "schemas").as_deref(),
            Some("User")
        );
    }

    #[test]
    fn test_component_name_rejects_other_sections_and_external() {
        assert!(component_name("#/components/responses/User", "schemas").is_none());
        assert!(component_name("other.yaml#/components/schemas/User", "schemas").is_none());
        assert!(component_name("#/components/schemas/", "schemas").is_none());
        assert!(component_name("#/components/schemas/User/properties/id", "schemas").is_none());
    }

    #[test]
    fn test_decode_pointer_segment_percent_encoding() {
        let decoded = decode_pointer_segment("User%20Profile~1details");
        assert_eq!(decoded, "User Profile/details");
    }

    #[test]
    fn test_ref_display_name() {
        assert_eq!(ref_display_name("#/components/schemas/Pet"), "Pet");
        assert_eq!(ref_display_name("Pet.yaml"), "Pet.yaml");
    }

    #[test]
    fn test_resolve_schema_through_alias() {
        let doc = doc(COMPONENTS);
        let resolver = Resolver::new(doc.components.as_ref());
        let resolved = resolver
            .schema(SchemaLink::Ref("#/components/schemas/Alias"))
            .unwrap();
        assert_eq!(resolved.component, Some("User"));
    }

    #[test]
    fn test_self_referencing_alias_terminates() {
        let doc = doc(COMPONENTS);
        let resolver = Resolver::new(doc.components.as_ref());
        assert!(resolver
            .schema(SchemaLink::Ref("#/components/schemas/Loop"))
            .is_none());
    }

    #[test]
    fn test_missing_schema_is_none() {
        let doc = doc(COMPONENTS);
        let resolver = Resolver::new(doc.components.as_ref());
        assert!(resolver
            .schema(SchemaLink::Ref("#/components/schemas/Nope"))
            .is_none());
    }

    #[test]
    fn test_resolve_response_and_parameter() {
        let doc = doc(COMPONENTS);
        let resolver = Resolver::new(doc.components.as_ref());

        let response_ref = ReferenceOr::<Response>::Reference {
            reference: "#/components/responses/NotFound".into(),
        };
        assert_eq!(resolver.response(&response_ref).unwrap().description, "Missing");

        let param_ref = ReferenceOr::<Parameter>::Reference {
            reference: "#/components/parameters/Limit".into(),
        };
        assert!(matches!(
            resolver.parameter(&param_ref),
            Some(Parameter::Query { .. })
        ));
    }

    #[test]
    fn test_no_components_resolves_nothing() {
        let resolver = Resolver::new(None);
        assert!(resolver
            .schema(SchemaLink::Ref("#/components/schemas/User"))
            .is_none());
    }
}
