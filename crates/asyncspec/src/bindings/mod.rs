//! Protocol binding tables.
//!
//! Servers, channels, operations and messages each carry a bindings object:
//! one optional slot per protocol name. `http`, `ws` and `kafka` slots are
//! typed and validated when present. The remaining protocols are defined by
//! later binding releases and are passed through untouched as
//! [`Opaque`] values.

pub mod http;
pub mod kafka;
pub mod ws;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SpecError;
use crate::validate::{ChannelKafkaPolicy, Validate, ValidationContext};
use crate::{Extensions, Record};

pub use self::http::{HttpChannel, HttpMessage, HttpOperation, HttpServer};
pub use self::kafka::{KafkaChannel, KafkaMessage, KafkaOperation, KafkaServer};
pub use self::ws::{WsChannel, WsMessage, WsOperation, WsServer};

/// An untyped binding kept verbatim for re-emission. Never validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Opaque(pub Value);

impl Opaque {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct ServerBindings {
    pub http: Option<HttpServer>,
    pub ws: Option<WsServer>,
    pub kafka: Option<KafkaServer>,
    pub amqp: Option<Opaque>,
    pub amqp1: Option<Opaque>,
    pub mqtt: Option<Opaque>,
    pub mqtt5: Option<Opaque>,
    pub nats: Option<Opaque>,
    pub jms: Option<Opaque>,
    pub sns: Option<Opaque>,
    pub sqs: Option<Opaque>,
    pub stomp: Option<Opaque>,
    pub redis: Option<Opaque>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for ServerBindings {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.http.validate(ctx)?;
        self.ws.validate(ctx)?;
        self.kafka.validate(ctx)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct ChannelBindings {
    pub http: Option<HttpChannel>,
    pub ws: Option<WsChannel>,
    pub kafka: Option<KafkaChannel>,
    pub amqp: Option<Opaque>,
    pub amqp1: Option<Opaque>,
    pub mqtt: Option<Opaque>,
    pub mqtt5: Option<Opaque>,
    pub nats: Option<Opaque>,
    pub jms: Option<Opaque>,
    pub sns: Option<Opaque>,
    pub sqs: Option<Opaque>,
    pub stomp: Option<Opaque>,
    pub redis: Option<Opaque>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for ChannelBindings {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.http.validate(ctx)?;
        self.ws.validate(ctx)?;

        if let Some(kafka) = &self.kafka {
            match ctx.options().channel_kafka {
                ChannelKafkaPolicy::Validate => kafka.validate(ctx)?,
                ChannelKafkaPolicy::Skip => {
                    tracing::debug!("skipping validation of channel kafka binding");
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct OperationBindings {
    pub http: Option<HttpOperation>,
    pub ws: Option<WsOperation>,
    pub kafka: Option<KafkaOperation>,
    pub amqp: Option<Opaque>,
    pub amqp1: Option<Opaque>,
    pub mqtt: Option<Opaque>,
    pub mqtt5: Option<Opaque>,
    pub nats: Option<Opaque>,
    pub jms: Option<Opaque>,
    pub sns: Option<Opaque>,
    pub sqs: Option<Opaque>,
    pub stomp: Option<Opaque>,
    pub redis: Option<Opaque>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for OperationBindings {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.http.validate(ctx)?;
        self.ws.validate(ctx)?;
        self.kafka.validate(ctx)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct MessageBindings {
    pub http: Option<HttpMessage>,
    pub ws: Option<WsMessage>,
    pub kafka: Option<KafkaMessage>,
    pub amqp: Option<Opaque>,
    pub amqp1: Option<Opaque>,
    pub mqtt: Option<Opaque>,
    pub mqtt5: Option<Opaque>,
    pub nats: Option<Opaque>,
    pub jms: Option<Opaque>,
    pub sns: Option<Opaque>,
    pub sqs: Option<Opaque>,
    pub stomp: Option<Opaque>,
    pub redis: Option<Opaque>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for MessageBindings {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.http.validate(ctx)?;
        self.ws.validate(ctx)?;
        self.kafka.validate(ctx)
    }
}
