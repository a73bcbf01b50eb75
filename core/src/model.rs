#![deny(missing_docs)]

//! # Reference Page Model
//!
//! Intermediate Representation (IR) produced by normalization and consumed
//! by the Markdown renderer. Every optional OpenAPI field has already been
//! defaulted, every `$ref` resolved, and every list sorted.

use serde_json::Value;
use std::fmt;

/// The whole reference page.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReference {
    /// Page title (without the "reference" suffix).
    pub title: String,
    /// `info.version`, when non-empty.
    pub version: Option<String>,
    /// `info.description`, trimmed.
    pub description: Option<String>,
    /// First server URL with variables substituted.
    pub base_url: Option<String>,
    /// Declared security schemes, in document order.
    pub auth: Vec<AuthScheme>,
    /// Endpoints sorted by path, then method.
    pub endpoints: Vec<Endpoint>,
    /// Component schemas (empty when schema output is disabled).
    pub schemas: Vec<SchemaDoc>,
}

impl ApiReference {
    /// True if any declared scheme is an HTTP bearer scheme.
    pub fn has_bearer(&self) -> bool {
        self.auth
            .iter()
            .any(|scheme| matches!(scheme.kind, AuthKind::Bearer { .. }))
    }
}

/// A named security scheme from `components.securitySchemes`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthScheme {
    /// Map key of the scheme.
    pub name: String,
    /// Scheme classification.
    pub kind: AuthKind,
    /// Free-text description.
    pub description: Option<String>,
}

/// Where an API key is transported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLocation {
    /// Request header.
    Header,
    /// Query string parameter.
    Query,
    /// Cookie.
    Cookie,
}

impl fmt::Display for KeyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyLocation::Header => write!(f, "header"),
            KeyLocation::Query => write!(f, "query parameter"),
            KeyLocation::Cookie => write!(f, "cookie"),
        }
    }
}

/// Classification of a security scheme.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthKind {
    /// `type: http, scheme: bearer`.
    Bearer {
        /// Optional `bearerFormat` hint (e.g. `JWT`).
        format: Option<String>,
    },
    /// `type: http, scheme: basic`.
    Basic,
    /// Any other HTTP authentication scheme.
    Http {
        /// The `scheme` value as written.
        scheme: String,
    },
    /// `type: apiKey`.
    ApiKey {
        /// Transport location.
        location: KeyLocation,
        /// Header, query or cookie name.
        name: String,
    },
    /// `type: oauth2`.
    OAuth2 {
        /// Names of the declared flows.
        flows: Vec<String>,
    },
    /// `type: openIdConnect`.
    OpenIdConnect {
        /// Discovery URL.
        url: String,
    },
}

impl AuthKind {
    /// The header a client must send for this scheme, if it is header-borne.
    pub fn header(&self) -> Option<String> {
        match self {
            AuthKind::Bearer { .. } | AuthKind::OAuth2 { .. } | AuthKind::OpenIdConnect { .. } => {
                Some("Authorization: Bearer <token>".to_string())
            }
            AuthKind::Basic => Some("Authorization: Basic <credentials>".to_string()),
            AuthKind::Http { scheme } => Some(format!("Authorization: {} <credentials>", scheme)),
            AuthKind::ApiKey {
                location: KeyLocation::Header,
                name,
            } => Some(format!("{}: <api-key>", name)),
            AuthKind::ApiKey { .. } => None,
        }
    }

    /// One-line human description.
    pub fn describe(&self) -> String {
        match self {
            AuthKind::Bearer { format: Some(f) } => format!("HTTP bearer token ({})", f),
            AuthKind::Bearer { format: None } => "HTTP bearer token".to_string(),
            AuthKind::Basic => "HTTP basic authentication".to_string(),
            AuthKind::Http { scheme } => format!("HTTP `{}` authentication", scheme),
            AuthKind::ApiKey { location, name } => {
                format!("API key in {} `{}`", location, name)
            }
            AuthKind::OAuth2 { flows } if flows.is_empty() => "OAuth 2.0".to_string(),
            AuthKind::OAuth2 { flows } => format!("OAuth 2.0 (flows: {})", flows.join(", ")),
            AuthKind::OpenIdConnect { url } => format!("OpenID Connect (`{}`)", url),
        }
    }
}

/// One (method, path) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    /// Upper-case HTTP method.
    pub method: String,
    /// Path template.
    pub path: String,
    /// Text for the summary table.
    pub purpose: String,
    /// Prose shown under the endpoint heading.
    pub description: Option<String>,
    /// Whether the operation is deprecated.
    pub deprecated: bool,
    /// Path, query, header and cookie parameters.
    pub parameters: Vec<ParamRow>,
    /// Headers a client must send.
    pub headers: Vec<String>,
    /// Request body documentation.
    pub request_body: RequestBodyDoc,
    /// Responses sorted by status code.
    pub responses: Vec<ResponseDoc>,
}

/// A parameter table row.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamRow {
    /// Parameter name.
    pub name: String,
    /// `path`, `query`, `header` or `cookie`.
    pub location: &'static str,
    /// Type label.
    pub ty: String,
    /// Whether the parameter is required.
    pub required: bool,
    /// Notes column.
    pub notes: String,
}

/// A property table row (request bodies and component schemas).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    /// Property name.
    pub name: String,
    /// Type label.
    pub ty: String,
    /// Whether the property is listed in `required`.
    pub required: bool,
    /// Notes column.
    pub notes: String,
}

/// How a request body is documented.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBodyDoc {
    /// The operation declares no body.
    None,
    /// An object body whose properties are listed as fields.
    Fields {
        /// Selected media type.
        media_type: String,
        /// Body description.
        description: Option<String>,
        /// Property rows, required first.
        fields: Vec<FieldRow>,
        /// Representative payload.
        example: Option<Value>,
    },
    /// A body that is not a property-bearing object.
    Opaque {
        /// Selected media type.
        media_type: String,
        /// Body description.
        description: Option<String>,
        /// Schema type label, if a schema is declared.
        schema: Option<String>,
        /// Representative payload.
        example: Option<Value>,
    },
}

impl RequestBodyDoc {
    /// Media type for the `Content-Type` header.
    pub fn media_type(&self) -> Option<&str> {
        match self {
            RequestBodyDoc::None => None,
            RequestBodyDoc::Fields { media_type, .. } | RequestBodyDoc::Opaque { media_type, .. } => {
                Some(media_type.as_str())
            }
        }
    }
}

/// One documented response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDoc {
    /// Status code or range key (`200`, `4XX`, `default`).
    pub code: String,
    /// Collapsed description.
    pub description: String,
    /// Selected media type.
    pub media_type: Option<String>,
    /// Schema type label for the selected media type.
    pub schema: Option<String>,
    /// JSON example payload.
    pub example: Option<Value>,
}

/// A documented component schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDoc {
    /// Component name.
    pub name: String,
    /// Schema description.
    pub description: Option<String>,
    /// Type label of the schema body.
    pub ty: String,
    /// Property rows for object schemas.
    pub fields: Vec<FieldRow>,
    /// Allowed values for enumerations.
    pub enum_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_headers() {
        assert_eq!(
            AuthKind::Bearer { format: None }.header().as_deref(),
            Some("Authorization: Bearer <token>")
        );
        assert_eq!(
            AuthKind::Basic.header().as_deref(),
            Some("Authorization: Basic <credentials>")
        );
        let key = AuthKind::ApiKey {
            location: KeyLocation::Header,
            name: "X-API-Key".into(),
        };
        assert_eq!(key.header().as_deref(), Some("X-API-Key: <api-key>"));
        let query_key = AuthKind::ApiKey {
            location: KeyLocation::Query,
            name: "key".into(),
        };
        assert!(query_key.header().is_none());
    }

    #[test]
    fn test_describe_oauth_flows() {
        let kind = AuthKind::OAuth2 {
            flows: vec!["authorizationCode".into(), "clientCredentials".into()],
        };
        assert_eq!(
            kind.describe(),
            "OAuth 2.0 (flows: authorizationCode, clientCredentials)"
        );
    }

    #[test]
    fn test_request_body_media_type() {
        assert!(RequestBodyDoc::None.media_type().is_none());
        let body = RequestBodyDoc::Opaque {
            media_type: "text/plain".into(),
            description: None,
            schema: None,
            example: None,
        };
        assert_eq!(body.media_type(), Some("text/plain"));
    }
}
