//! Kafka bindings.

use crate::error::SpecError;
use crate::validate::{Validate, ValidationContext};
use crate::{Extensions, Record, Schema};

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct KafkaServer {
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for KafkaServer {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), SpecError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct KafkaChannel {
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for KafkaChannel {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), SpecError> {
        Ok(())
    }
}

/// Kafka operation binding.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct KafkaOperation {
    /// Consumer group id schema.
    pub group_id: Option<Schema>,
    /// Consumer client id schema.
    pub client_id: Option<Schema>,
    pub binding_version: String,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for KafkaOperation {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.group_id.validate(ctx)?;
        self.client_id.validate(ctx)
    }
}

/// Kafka message binding.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct KafkaMessage {
    /// Message key schema.
    pub key: Option<Schema>,
    pub binding_version: String,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for KafkaMessage {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.key.validate(ctx)
    }
}
