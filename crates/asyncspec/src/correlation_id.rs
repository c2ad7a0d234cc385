use crate::error::SpecError;
use crate::validate::{Validate, ValidationContext};
use crate::{Extensions, Record};

/// Where in a message the correlation identifier lives.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct CorrelationId {
    pub description: String,
    /// Runtime expression, e.g. `$message.header#/correlationId`.
    #[record(always)]
    pub location: String,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for CorrelationId {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), SpecError> {
        if self.location.is_empty() {
            return Err(SpecError::required("location"));
        }
        Ok(())
    }
}
