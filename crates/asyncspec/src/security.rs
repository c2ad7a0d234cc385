//! Security schemes and OAuth flows.

use std::collections::BTreeMap;

use crate::error::SpecError;
use crate::validate::{OAuthFlowPolicy, Validate, ValidationContext};
use crate::{Extensions, Record};

/// A security mechanism a server accepts.
///
/// Validation dispatches on `type`. An `openIdConnect` scheme must carry
/// `openIdConnectUrl`; the check is one of presence, where some earlier
/// validators inverted it and rejected schemes that set the URL.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct SecurityScheme {
    #[record(always)]
    pub r#type: String,
    pub description: String,
    pub name: String,
    pub r#in: String,
    pub scheme: String,
    pub bearer_format: String,
    pub flows: Option<OAuthFlows>,
    pub open_id_connect_url: String,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for SecurityScheme {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        match self.r#type.as_str() {
            "" => Err(SpecError::required("type")),
            "userPassword" | "X509" | "symmetricEncryption" | "asymmetricEncryption" | "plain"
            | "scramSha256" | "scramSha512" | "gssapi" => Ok(()),
            "httpApiKey" => {
                require("name", &self.name)?;
                require("in", &self.r#in)
            }
            "apiKey" => require("in", &self.r#in),
            "http" => {
                require("scheme", &self.scheme)?;
                require("bearerFormat", &self.bearer_format)
            }
            "oauth2" => match &self.flows {
                Some(flows) => flows.validate(ctx),
                None => Err(SpecError::required("flows")),
            },
            "openIdConnect" => require("openIdConnectUrl", &self.open_id_connect_url),
            other => Err(SpecError::wrong_field(format!(
                "security scheme type {other:?} is not expected"
            ))),
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), SpecError> {
    if value.is_empty() {
        return Err(SpecError::required(field));
    }
    Ok(())
}

/// The OAuth flows an `oauth2` scheme supports.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct OAuthFlows {
    pub implicit: Option<OAuthFlow>,
    pub password: Option<OAuthFlow>,
    pub client_credentials: Option<OAuthFlow>,
    pub authorization_code: Option<OAuthFlow>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl OAuthFlows {
    fn any_present(&self) -> bool {
        self.implicit.is_some()
            || self.password.is_some()
            || self.client_credentials.is_some()
            || self.authorization_code.is_some()
    }
}

impl Validate for OAuthFlows {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        match ctx.options().oauth_flows {
            OAuthFlowPolicy::Skip => {
                tracing::debug!("skipping validation of oauth flows");
                Ok(())
            }
            OAuthFlowPolicy::ImplicitOnly => {
                if !self.any_present() {
                    return Ok(());
                }
                match &self.implicit {
                    Some(flow) => flow.validate_complete(),
                    None => Err(SpecError::required("implicit")),
                }
            }
            OAuthFlowPolicy::PerFlow => {
                if let Some(flow) = &self.implicit {
                    flow.validate_for(FlowKind::Implicit)?;
                }
                if let Some(flow) = &self.password {
                    flow.validate_for(FlowKind::Password)?;
                }
                if let Some(flow) = &self.client_credentials {
                    flow.validate_for(FlowKind::ClientCredentials)?;
                }
                if let Some(flow) = &self.authorization_code {
                    flow.validate_for(FlowKind::AuthorizationCode)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowKind {
    Implicit,
    Password,
    ClientCredentials,
    AuthorizationCode,
}

impl FlowKind {
    fn needs_authorization_url(self) -> bool {
        matches!(self, Self::Implicit | Self::AuthorizationCode)
    }

    fn needs_token_url(self) -> bool {
        !matches!(self, Self::Implicit)
    }
}

/// Configuration of a single OAuth flow.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct OAuthFlow {
    pub authorization_url: String,
    pub token_url: String,
    pub refresh_url: String,
    /// Scope name to description. `None` when the key is absent.
    pub scopes: Option<BTreeMap<String, String>>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl OAuthFlow {
    /// Require every URL the flow object can carry, plus scopes.
    fn validate_complete(&self) -> Result<(), SpecError> {
        require("authorizationUrl", &self.authorization_url)?;
        require("tokenUrl", &self.token_url)?;
        self.require_scopes()
    }

    fn validate_for(&self, kind: FlowKind) -> Result<(), SpecError> {
        if kind.needs_authorization_url() {
            require("authorizationUrl", &self.authorization_url)?;
        }
        if kind.needs_token_url() {
            require("tokenUrl", &self.token_url)?;
        }
        self.require_scopes()
    }

    fn require_scopes(&self) -> Result<(), SpecError> {
        if self.scopes.is_none() {
            return Err(SpecError::required("scopes"));
        }
        Ok(())
    }
}
