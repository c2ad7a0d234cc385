//! HTTP bindings.

use ::http::Method;

use crate::error::SpecError;
use crate::validate::{Validate, ValidationContext};
use crate::{Extensions, Record, Schema};

const REQUEST: &str = "request";
const RESPONSE: &str = "response";

/// Methods accepted for a `request` operation. Matching is case-sensitive.
fn is_standard_method(method: &str) -> bool {
    [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::HEAD,
        Method::OPTIONS,
        Method::CONNECT,
        Method::TRACE,
    ]
    .iter()
    .any(|m| m.as_str() == method)
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct HttpServer {
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for HttpServer {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), SpecError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct HttpChannel {
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for HttpChannel {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), SpecError> {
        Ok(())
    }
}

/// HTTP operation binding.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct HttpOperation {
    /// `request` or `response`.
    pub r#type: String,
    /// Required for `request` operations.
    pub method: String,
    /// Object schema describing the query parameters.
    pub query: Option<Schema>,
    pub binding_version: String,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for HttpOperation {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        match self.r#type.as_str() {
            REQUEST if !is_standard_method(&self.method) => {
                return Err(SpecError::wrong_field(format!(
                    "request operation needs a standard HTTP method, got {:?}",
                    self.method
                )));
            }
            REQUEST | RESPONSE => {}
            other => {
                return Err(SpecError::wrong_field(format!(
                    "type must be request or response, got {other:?}"
                )));
            }
        }

        if let Some(query) = &self.query {
            query.validate_object("query", ctx)?;
        }
        Ok(())
    }
}

/// HTTP message binding.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct HttpMessage {
    /// Object schema describing the HTTP headers.
    pub headers: Option<Schema>,
    pub binding_version: String,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for HttpMessage {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        if let Some(headers) = &self.headers {
            headers.validate_object("headers", ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> ValidationContext {
        ValidationContext::default()
    }

    fn operation(kind: &str, method: &str) -> HttpOperation {
        HttpOperation {
            r#type: kind.to_string(),
            method: method.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn request_with_standard_method_passes() {
        for method in ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS", "CONNECT", "TRACE"] {
            assert!(operation("request", method).validate(&ctx()).is_ok(), "{method}");
        }
    }

    #[test]
    fn request_with_unknown_method_fails() {
        for method in ["FETCH", "", "get"] {
            assert!(
                matches!(
                    operation("request", method).validate(&ctx()),
                    Err(SpecError::WrongField(_))
                ),
                "{method}"
            );
        }
    }

    #[test]
    fn response_ignores_method() {
        assert!(operation("response", "FETCH").validate(&ctx()).is_ok());
        assert!(operation("response", "").validate(&ctx()).is_ok());
    }

    #[test]
    fn missing_or_unknown_type_fails() {
        assert!(matches!(
            operation("", "GET").validate(&ctx()),
            Err(SpecError::WrongField(_))
        ));
        assert!(matches!(
            operation("publish", "GET").validate(&ctx()),
            Err(SpecError::WrongField(_))
        ));
    }

    #[test]
    fn query_must_be_object_with_properties() {
        let mut op = operation("request", "GET");
        op.query = Some(Schema(json!({"type": "string"})));
        assert!(matches!(op.validate(&ctx()), Err(SpecError::WrongField(_))));

        op.query = Some(Schema(json!({
            "type": "object",
            "properties": {"companyId": {"type": "number", "minimum": 1}}
        })));
        assert!(op.validate(&ctx()).is_ok());
    }

    #[test]
    fn decodes_type_key() {
        let op: HttpOperation = serde_json::from_value(json!({
            "type": "request",
            "method": "GET",
            "bindingVersion": "0.1.0",
            "x-extra": 1
        }))
        .unwrap();
        assert_eq!(op.r#type, "request");
        assert_eq!(op.binding_version, "0.1.0");
        assert_eq!(op.extensions.len(), 1);
    }

    #[test]
    fn message_headers_rule() {
        let message = HttpMessage {
            headers: Some(Schema(json!({"type": "object"}))),
            ..Default::default()
        };
        assert!(matches!(message.validate(&ctx()), Err(SpecError::WrongField(_))));

        let message = HttpMessage {
            headers: Some(Schema(json!({
                "type": "object",
                "properties": {"Content-Type": {"type": "string", "enum": ["application/json"]}}
            }))),
            ..Default::default()
        };
        assert!(message.validate(&ctx()).is_ok());
    }
}
