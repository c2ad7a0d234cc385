//! WebSocket bindings.

use ::http::Method;

use crate::error::SpecError;
use crate::validate::{Validate, ValidationContext};
use crate::{Extensions, Record, Schema};

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct WsServer {
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for WsServer {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), SpecError> {
        Ok(())
    }
}

/// WebSocket channel binding, describing the handshake request.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct WsChannel {
    /// `GET` or `POST`.
    pub method: String,
    pub query: Option<Schema>,
    pub headers: Option<Schema>,
    pub binding_version: String,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for WsChannel {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        if self.method != Method::GET.as_str() && self.method != Method::POST.as_str() {
            return Err(SpecError::wrong_field(format!(
                "method must be GET or POST, got {:?}",
                self.method
            )));
        }
        if let Some(query) = &self.query {
            query.validate_object("query", ctx)?;
        }
        if let Some(headers) = &self.headers {
            headers.validate_object("headers", ctx)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct WsOperation {
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for WsOperation {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), SpecError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct WsMessage {
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for WsMessage {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), SpecError> {
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

    fn channel(method: &str) -> WsChannel {
        WsChannel {
            method: method.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn method_must_be_get_or_post() {
        assert!(channel("GET").validate(&ctx()).is_ok());
        assert!(channel("POST").validate(&ctx()).is_ok());
        for method in ["", "PUT", "get"] {
            assert!(
                matches!(channel(method).validate(&ctx()), Err(SpecError::WrongField(_))),
                "{method}"
            );
        }
    }

    #[test]
    fn query_and_headers_must_declare_properties() {
        let mut ws = channel("GET");
        ws.headers = Some(Schema(json!({"type": "object"})));
        assert!(matches!(ws.validate(&ctx()), Err(SpecError::WrongField(ref m)) if m.contains("headers")));

        ws.headers = None;
        ws.query = Some(Schema(json!({"type": "array", "properties": {"a": {}}})));
        assert!(matches!(ws.validate(&ctx()), Err(SpecError::WrongField(ref m)) if m.contains("query")));

        ws.query = Some(Schema(json!({"type": "object", "properties": {"token": {"type": "string"}}})));
        assert!(ws.validate(&ctx()).is_ok());
    }

    #[test]
    fn headers_use_their_own_key() {
        let ws = WsChannel {
            method: "GET".to_string(),
            headers: Some(Schema(json!({"type": "object", "properties": {"Auth": {}}}))),
            ..Default::default()
        };
        let encoded = serde_json::to_value(&ws).unwrap();
        assert!(encoded.get("headers").is_some());
        assert!(encoded.get("type").is_none());

        let back: WsChannel = serde_json::from_value(encoded).unwrap();
        assert_eq!(back, ws);
    }

    #[test]
    fn empty_bindings_keep_unknown_keys() {
        let op: WsOperation = serde_json::from_value(json!({"bindingVersion": "0.1.0"})).unwrap();
        assert_eq!(op.extensions["bindingVersion"], json!("0.1.0"));
        assert!(op.validate(&ctx()).is_ok());
    }
}
