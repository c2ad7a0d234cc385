use std::collections::BTreeMap;

use crate::error::SpecError;
use crate::reference::{ChannelBindingsRef, OperationRef, ParameterRef};
use crate::validate::{Validate, ValidationContext};
use crate::{Extensions, Record};

/// A channel the application publishes to or subscribes from.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct Channel {
    pub description: String,
    pub subscribe: Option<OperationRef>,
    pub publish: Option<OperationRef>,
    pub parameters: BTreeMap<String, ParameterRef>,
    pub bindings: Option<ChannelBindingsRef>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for Channel {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.subscribe.validate(ctx)?;
        self.publish.validate(ctx)?;
        self.parameters.validate(ctx)?;
        self.bindings.validate(ctx)
    }
}
