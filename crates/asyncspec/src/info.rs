//! Descriptive metadata records.

use crate::error::SpecError;
use crate::validate::{Validate, ValidationContext};
use crate::{Extensions, Record};

/// Metadata about the API.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct Info {
    #[record(always)]
    pub title: String,
    #[record(always)]
    pub version: String,
    pub description: String,
    pub terms_of_service: String,
    pub contact: Option<Contact>,
    pub license: Option<License>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for Info {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        if self.title.is_empty() {
            return Err(SpecError::required("title"));
        }
        if self.version.is_empty() {
            return Err(SpecError::required("version"));
        }
        self.license.validate(ctx)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct Contact {
    pub name: String,
    pub url: String,
    pub email: String,
    #[record(extensions)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct License {
    #[record(always)]
    pub name: String,
    pub url: String,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for License {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), SpecError> {
        if self.name.is_empty() {
            return Err(SpecError::required("name"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct Tag {
    #[record(always)]
    pub name: String,
    pub description: String,
    pub external_docs: Option<ExternalDocs>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for Tag {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        if self.name.is_empty() {
            return Err(SpecError::required("name"));
        }
        self.external_docs.validate(ctx)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct ExternalDocs {
    pub description: String,
    #[record(always)]
    pub url: String,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for ExternalDocs {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), SpecError> {
        if self.url.is_empty() {
            return Err(SpecError::required("url"));
        }
        Ok(())
    }
}
