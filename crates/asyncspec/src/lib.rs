//! AsyncAPI 2.0 document model and validator.
//!
//! Every record in the document tree round-trips losslessly: declared fields
//! are decoded into typed Rust fields and every other key is kept in the
//! record's extension bag (see [`codec`]). Nested objects that the format lets
//! authors write either inline or as a `$ref` pointer are held in [`Ref`]
//! cells, and `message` slots that accept a list of alternatives use
//! [`OneOf`]. Protocol-specific settings live in the four binding tables of
//! [`bindings`], and [`Servers::match_url`] maps a concrete URL back to the
//! declared server whose template it matches.
//!
//! Loading is plain serde:
//!
//! ```ignore
//! let mut doc: asyncspec::AsyncApi = serde_yaml::from_str(&yaml)?;
//! doc.resolve_refs()?;
//! doc.validate(&asyncspec::ValidationContext::default())?;
//! ```

extern crate self as asyncspec;

pub mod bindings;
pub mod channel;
pub mod codec;
pub mod components;
pub mod correlation_id;
pub mod document;
pub mod error;
pub mod info;
pub mod message;
pub mod one_of;
pub mod operation;
pub mod parameter;
pub mod reference;
pub mod resolver;
pub mod schema;
pub mod security;
pub mod server;
pub mod validate;

pub use asyncspec_macros::Record;
pub use bindings::{ChannelBindings, MessageBindings, Opaque, OperationBindings, ServerBindings};
pub use channel::Channel;
pub use codec::{Extensions, Omit};
pub use components::Components;
pub use correlation_id::CorrelationId;
pub use document::AsyncApi;
pub use error::SpecError;
pub use info::{Contact, ExternalDocs, Info, License, Tag};
pub use message::{Message, MessagePayload, MessageTrait, SchemaFormat};
pub use one_of::{MessageOneOf, OneOf};
pub use operation::{Operation, OperationTrait};
pub use parameter::Parameter;
pub use reference::*;
pub use resolver::{ResolveRefs, Resolver};
pub use schema::Schema;
pub use security::{OAuthFlow, OAuthFlows, SecurityScheme};
pub use server::{SecurityRequirement, Server, ServerMatch, ServerVariable, Servers};
pub use validate::{
    ChannelKafkaPolicy, OAuthFlowPolicy, Validate, ValidationContext, ValidationOptions,
};
