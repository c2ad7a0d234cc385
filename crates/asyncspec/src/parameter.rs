use crate::error::SpecError;
use crate::reference::SchemaRef;
use crate::validate::{Validate, ValidationContext};
use crate::{Extensions, Record};

/// A channel name parameter.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct Parameter {
    pub description: String,
    pub schema: Option<SchemaRef>,
    pub location: String,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for Parameter {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.schema.validate(ctx)
    }
}
