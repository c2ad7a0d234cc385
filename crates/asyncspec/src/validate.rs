//! Validation trait and policy options.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::error::SpecError;

/// Structural validation of a document node and everything it owns.
///
/// Implementations return the first error they find; parents propagate it
/// unchanged with `?`.
pub trait Validate {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError>;
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        match self {
            Some(value) => value.validate(ctx),
            None => Ok(()),
        }
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.iter().try_for_each(|item| item.validate(ctx))
    }
}

impl<T: Validate> Validate for BTreeMap<String, T> {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        self.values().try_for_each(|item| item.validate(ctx))
    }
}

/// Whether a `kafka` entry in channel bindings is validated.
///
/// The binding format defines the kafka channel binding without any rules
/// and channel-level validation has historically never dispatched to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelKafkaPolicy {
    /// Never validate the channel-level kafka binding.
    #[default]
    Skip,
    /// Validate it like the server, operation and message kafka bindings.
    Validate,
}

impl ChannelKafkaPolicy {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "skip" => Some(Self::Skip),
            "validate" => Some(Self::Validate),
            _ => None,
        }
    }
}

/// How the flows of an `oauth2` security scheme are validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OAuthFlowPolicy {
    /// Only require `flows` to be present.
    #[default]
    Skip,
    /// Check every present flow against the implicit flow's rules.
    ImplicitOnly,
    /// Check every present flow against the rules of its own kind.
    PerFlow,
}

impl OAuthFlowPolicy {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "skip" => Some(Self::Skip),
            "implicitonly" => Some(Self::ImplicitOnly),
            "perflow" => Some(Self::PerFlow),
            _ => None,
        }
    }
}

/// Knobs for behavior where the format leaves room for interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Channel-level kafka binding handling.
    pub channel_kafka: ChannelKafkaPolicy,

    /// OAuth flow handling for `oauth2` security schemes.
    pub oauth_flows: OAuthFlowPolicy,
}

impl ValidationOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the channel kafka policy.
    pub fn with_channel_kafka(mut self, policy: ChannelKafkaPolicy) -> Self {
        self.channel_kafka = policy;
        self
    }

    /// Set the OAuth flow policy.
    pub fn with_oauth_flows(mut self, policy: OAuthFlowPolicy) -> Self {
        self.oauth_flows = policy;
        self
    }
}

/// State threaded through a validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    options: ValidationOptions,
}

impl ValidationContext {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }
}

/// A lazily compiled pattern that map keys of a collection must match.
pub(crate) struct KeyPattern {
    source: &'static str,
    regex: OnceLock<Regex>,
}

impl KeyPattern {
    pub(crate) const fn new(source: &'static str) -> Self {
        Self {
            source,
            regex: OnceLock::new(),
        }
    }

    pub(crate) fn check(&self, key: &str) -> Result<(), SpecError> {
        let regex = self
            .regex
            .get_or_init(|| Regex::new(self.source).expect("key pattern is a valid regex"));
        if regex.is_match(key) {
            Ok(())
        } else {
            Err(SpecError::InvalidIdentifier {
                identifier: key.to_string(),
                pattern: self.source.to_string(),
            })
        }
    }
}
