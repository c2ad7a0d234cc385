use crate::error::SpecError;
use crate::info::{ExternalDocs, Tag};
use crate::one_of::MessageOneOf;
use crate::reference::{OperationBindingsRef, OperationTraitRef};
use crate::validate::{Validate, ValidationContext};
use crate::{Extensions, Record};

/// Fields shared by an operation and the traits applied to it.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct OperationTrait {
    pub operation_id: String,
    pub summary: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub external_docs: Option<ExternalDocs>,
    pub bindings: Option<OperationBindingsRef>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for OperationTrait {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.bindings.validate(ctx)
    }
}

/// A publish or subscribe operation on a channel.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct Operation {
    #[record(flatten)]
    pub common: OperationTrait,
    pub traits: Vec<OperationTraitRef>,
    pub message: Option<MessageOneOf>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for Operation {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.traits.validate(ctx)?;
        self.message.validate(ctx)?;
        self.common.validate(ctx)
    }
}
