//! The document root.

use std::collections::BTreeMap;

use crate::error::SpecError;
use crate::info::{ExternalDocs, Info, Tag};
use crate::resolver::{ResolveRefs, Resolver};
use crate::server::Servers;
use crate::validate::{Validate, ValidationContext};
use crate::{Channel, Components, Extensions, Record};

/// The format version this model implements.
pub const ASYNCAPI_VERSION: &str = "2.0.0";

/// An AsyncAPI 2.0 document.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct AsyncApi {
    #[record(always)]
    pub asyncapi: String,
    pub id: String,
    pub info: Option<Info>,
    #[record(always)]
    pub default_content_type: String,
    pub servers: Servers,
    pub channels: BTreeMap<String, Channel>,
    pub components: Option<Components>,
    pub tags: Vec<Tag>,
    pub external_docs: Option<ExternalDocs>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl AsyncApi {
    /// Resolve every local `$ref` in the document against the document
    /// itself.
    pub fn resolve_refs(&mut self) -> Result<(), SpecError> {
        let root = serde_json::to_value(&*self)?;
        let mut resolver = Resolver::new(root);
        self.resolve_refs_with(&mut resolver)
    }
}

impl Validate for AsyncApi {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        if self.asyncapi != ASYNCAPI_VERSION {
            return Err(SpecError::wrong_field(format!(
                "field asyncapi is required and must equal {ASYNCAPI_VERSION:?}"
            )));
        }
        match &self.info {
            Some(info) => info.validate(ctx)?,
            None => return Err(SpecError::required("info")),
        }
        self.servers.validate(ctx)?;
        self.channels.validate(ctx)?;
        self.components.validate(ctx)?;
        self.tags.validate(ctx)?;
        self.external_docs.validate(ctx)
    }
}
