//! # Security Normalization
//!
//! Maps `components.securitySchemes` to [`AuthScheme`] values and works out
//! which authentication headers an operation needs.

use crate::model::{AuthKind, AuthScheme, KeyLocation};
use crate::refs::Resolver;
use crate::text::non_empty;
use openapiv3::{APIKeyLocation, OpenAPI, SecurityRequirement, SecurityScheme};
use tracing::warn;

/// Collects every declared security scheme in document order.
pub fn auth_schemes(doc: &OpenAPI, resolver: &Resolver<'_>) -> Vec<AuthScheme> {
    let Some(components) = doc.components.as_ref() else {
        return Vec::new();
    };

    components
        .security_schemes
        .iter()
        .filter_map(|(name, item)| {
            let scheme = resolver.security_scheme(item)?;
            Some(to_auth_scheme(name, scheme))
        })
        .collect()
}

fn to_auth_scheme(name: &str, scheme: &SecurityScheme) -> AuthScheme {
    let (kind, description) = match scheme {
        SecurityScheme::HTTP {
            scheme,
            bearer_format,
            description,
            ..
        } => {
            let kind = if scheme.eq_ignore_ascii_case("bearer") {
                AuthKind::Bearer {
                    format: non_empty(bearer_format.as_deref()),
                }
            } else if scheme.eq_ignore_ascii_case("basic") {
                AuthKind::Basic
            } else {
                AuthKind::Http {
                    scheme: scheme.clone(),
                }
            };
            (kind, description)
        }
        SecurityScheme::APIKey {
            location,
            name,
            description,
            ..
        } => {
            let location = match location {
                APIKeyLocation::Header => KeyLocation::Header,
                APIKeyLocation::Query => KeyLocation::Query,
                APIKeyLocation::Cookie => KeyLocation::Cookie,
            };
            let kind = AuthKind::ApiKey {
                location,
                name: name.clone(),
            };
            (kind, description)
        }
        SecurityScheme::OAuth2 {
            flows, description, ..
        } => {
            let declared = [
                ("implicit", flows.implicit.is_some()),
                ("password", flows.password.is_some()),
                ("clientCredentials", flows.client_credentials.is_some()),
                ("authorizationCode", flows.authorization_code.is_some()),
            ];
            let flows = declared
                .iter()
                .filter(|(_, present)| *present)
                .map(|(flow, _)| flow.to_string())
                .collect();
            (AuthKind::OAuth2 { flows }, description)
        }
        SecurityScheme::OpenIDConnect {
            open_id_connect_url,
            description,
            ..
        } => {
            let kind = AuthKind::OpenIdConnect {
                url: open_id_connect_url.clone(),
            };
            (kind, description)
        }
    };

    AuthScheme {
        name: name.to_string(),
        kind,
        description: non_empty(description.as_deref()),
    }
}

/// Headers required by an operation's effective security.
///
/// The operation's `security` wins over the document's. Only the first
/// requirement alternative is used; an empty list means no authentication.
/// When neither level declares `security`, any bearer scheme applies.
pub fn auth_headers(
    schemes: &[AuthScheme],
    doc_security: Option<&[SecurityRequirement]>,
    op_security: Option<&[SecurityRequirement]>,
) -> Vec<String> {
    let Some(requirements) = op_security.or(doc_security) else {
        return schemes
            .iter()
            .find(|scheme| matches!(scheme.kind, AuthKind::Bearer { .. }))
            .and_then(|scheme| scheme.kind.header())
            .into_iter()
            .collect();
    };

    let Some(first) = requirements.first() else {
        return Vec::new();
    };

    let mut headers = Vec::new();
    for name in first.keys() {
        match schemes.iter().find(|scheme| &scheme.name == name) {
            Some(scheme) => {
                if let Some(header) = scheme.kind.header() {
                    if !headers.contains(&header) {
                        headers.push(header);
                    }
                }
            }
            None => warn!(scheme = %name, "Security requirement names an undeclared scheme"),
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
openapi: 3.0.0
info: {title: T, version: 1.0.0}
paths: {}
components:
  securitySchemes:
    bearerAuth:
      type: http
      scheme: Bearer
      bearerFormat: JWT
    basicAuth:
      type: http
      scheme: basic
    apiKey:
      type: apiKey
      in: header
      name: X-API-Key
      description: Issued per tenant.
    oauth:
      type: oauth2
      flows:
        clientCredentials:
          tokenUrl: https://auth.example.com/token
          scopes: {}
"#;

    fn schemes() -> Vec<AuthScheme> {
        let doc: OpenAPI = serde_yaml::from_str(DOC).unwrap();
        let resolver = Resolver::new(doc.components.as_ref());
        auth_schemes(&doc, &resolver)
    }

    fn requirement(names: &[&str]) -> SecurityRequirement {
        names.iter().map(|n| (n.to_string(), Vec::new())).collect()
    }

    #[test]
    fn test_scheme_classification() {
        let schemes = schemes();
        assert_eq!(schemes.len(), 4);
        assert_eq!(
            schemes[0].kind,
            AuthKind::Bearer {
                format: Some("JWT".into())
            }
        );
        assert_eq!(schemes[1].kind, AuthKind::Basic);
        assert_eq!(
            schemes[2].kind,
            AuthKind::ApiKey {
                location: KeyLocation::Header,
                name: "X-API-Key".into()
            }
        );
        assert_eq!(schemes[2].description.as_deref(), Some("Issued per tenant."));
        assert_eq!(
            schemes[3].kind,
            AuthKind::OAuth2 {
                flows: vec!["clientCredentials".into()]
            }
        );
    }

    #[test]
    fn test_fallback_to_bearer_without_security_blocks() {
        let headers = auth_headers(&schemes(), None, None);
        assert_eq!(headers, vec!["Authorization: Bearer <token>"]);
    }

    #[test]
    fn test_operation_security_overrides_document() {
        let doc_level = vec![requirement(&["bearerAuth"])];
        let op_level = vec![requirement(&["apiKey"])];
        let headers = auth_headers(&schemes(), Some(doc_level.as_slice()), Some(op_level.as_slice()));
        assert_eq!(headers, vec!["X-API-Key: <api-key>"]);
    }

    #[test]
    fn test_empty_security_means_public() {
        let doc_level = vec![requirement(&["bearerAuth"])];
        let op_level: Vec<SecurityRequirement> = Vec::new();
        assert!(auth_headers(&schemes(), Some(doc_level.as_slice()), Some(op_level.as_slice())).is_empty());
    }

    #[test]
    fn test_combined_requirement_dedupes_headers() {
        let doc_level = vec![requirement(&["bearerAuth", "oauth", "apiKey"])];
        let headers = auth_headers(&schemes(), Some(doc_level.as_slice()), None);
        assert_eq!(
            headers,
            vec!["Authorization: Bearer <token>", "X-API-Key: <api-key>"]
        );
    }
}
