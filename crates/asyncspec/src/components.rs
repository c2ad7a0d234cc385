use std::collections::BTreeMap;

use crate::error::SpecError;
use crate::reference::{
    ChannelBindingsRef, CorrelationIdRef, MessageBindingsRef, MessageRef, MessageTraitRef,
    OperationBindingsRef, OperationTraitRef, ParameterRef, SchemaRef, ServerBindingsRef,
};
use crate::security::SecurityScheme;
use crate::validate::{KeyPattern, Validate, ValidationContext};
use crate::{Extensions, Record};

static COMPONENT_KEY: KeyPattern = KeyPattern::new("^[a-zA-Z0-9._-]+$");

/// Reusable objects referenced from elsewhere in the document.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct Components {
    pub schemas: BTreeMap<String, SchemaRef>,
    pub messages: BTreeMap<String, MessageRef>,
    pub security_schemes: BTreeMap<String, SecurityScheme>,
    pub parameters: BTreeMap<String, ParameterRef>,
    pub correlation_ids: BTreeMap<String, CorrelationIdRef>,
    pub operation_traits: BTreeMap<String, OperationTraitRef>,
    pub message_traits: BTreeMap<String, MessageTraitRef>,
    pub server_bindings: BTreeMap<String, ServerBindingsRef>,
    pub channel_bindings: BTreeMap<String, ChannelBindingsRef>,
    pub operation_bindings: BTreeMap<String, OperationBindingsRef>,
    pub message_bindings: BTreeMap<String, MessageBindingsRef>,
    #[record(extensions)]
    pub extensions: Extensions,
}

fn validate_entries<T: Validate>(
    entries: &BTreeMap<String, T>,
    ctx: &ValidationContext,
) -> Result<(), SpecError> {
    for (key, entry) in entries {
        COMPONENT_KEY.check(key)?;
        entry.validate(ctx)?;
    }
    Ok(())
}

impl Validate for Components {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        validate_entries(&self.schemas, ctx)?;
        validate_entries(&self.messages, ctx)?;
        validate_entries(&self.security_schemes, ctx)?;
        validate_entries(&self.parameters, ctx)?;
        validate_entries(&self.correlation_ids, ctx)?;
        validate_entries(&self.operation_traits, ctx)?;
        validate_entries(&self.message_traits, ctx)?;
        validate_entries(&self.server_bindings, ctx)?;
        validate_entries(&self.channel_bindings, ctx)?;
        validate_entries(&self.operation_bindings, ctx)?;
        validate_entries(&self.message_bindings, ctx)
    }
}
