//! Servers and server URL matching.

use std::collections::BTreeMap;

use asyncspec_router::{match_template, parameter_names, strip_query, TemplateMatch};
use serde::{Deserialize, Serialize};

use crate::codec::Omit;
use crate::error::SpecError;
use crate::reference::ServerBindingsRef;
use crate::validate::{KeyPattern, Validate, ValidationContext};
use crate::{Extensions, Record};

static SERVER_KEY: KeyPattern = KeyPattern::new("^[A-Za-z0-9_-]+$");

/// Security scheme name to required scopes.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// A message broker or endpoint the application connects to.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct Server {
    /// URL template; `{name}` placeholders are declared in `variables`.
    #[record(always)]
    pub url: String,
    #[record(always)]
    pub protocol: String,
    pub protocol_version: String,
    pub description: String,
    pub security: Vec<SecurityRequirement>,
    pub bindings: Option<ServerBindingsRef>,
    pub variables: BTreeMap<String, ServerVariable>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Server {
    /// Placeholder names in `url`, in order.
    pub fn parameter_names(&self) -> Result<Vec<&str>, SpecError> {
        Ok(parameter_names(&self.url)?)
    }

    /// Match a URL (without query string) against this server's template.
    pub fn match_raw_url<'a>(&self, url: &'a str) -> Option<TemplateMatch<'a>> {
        match_template(&self.url, url)
    }
}

impl Validate for Server {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        if self.url.is_empty() {
            return Err(SpecError::required("url"));
        }

        let opening = self.url.matches('{').count();
        let closing = self.url.matches('}').count();
        if opening != closing {
            return Err(SpecError::MalformedTemplate(self.url.clone()));
        }

        let names = self.parameter_names()?;
        let declared = names.len() == self.variables.len()
            && names.iter().all(|name| self.variables.contains_key(*name));
        if !declared {
            return Err(SpecError::wrong_field("server has undeclared variables"));
        }

        self.variables.validate(ctx)?;
        self.bindings.validate(ctx)
    }
}

/// A value substituted into a server URL template.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct ServerVariable {
    pub r#enum: Vec<String>,
    pub default: String,
    pub description: String,
    pub examples: Vec<String>,
    #[record(extensions)]
    pub extensions: Extensions,
}

impl Validate for ServerVariable {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), SpecError> {
        if self.default.is_empty() {
            return Err(SpecError::required("default"));
        }
        Ok(())
    }
}

/// Servers keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Servers(pub BTreeMap<String, Server>);

/// A server whose URL template matched a concrete URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerMatch<'s, 'u> {
    pub name: &'s str,
    pub server: &'s Server,
    /// Captured placeholder values, in template order.
    pub values: Vec<&'u str>,
    /// The rest of the URL after the server prefix, starting with `/`.
    pub remaining: &'u str,
}

impl Servers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Server> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, server: Server) -> Option<Server> {
        self.0.insert(name.into(), server)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Server)> {
        self.0.iter()
    }

    /// Find the first server whose template matches `url`.
    ///
    /// The query string is dropped before matching. When several templates
    /// match the same URL, which one wins is unspecified.
    pub fn match_url<'s, 'u>(&'s self, url: &'u str) -> Option<ServerMatch<'s, 'u>> {
        let path = strip_query(url);
        self.0.iter().find_map(|(name, server)| {
            let matched = server.match_raw_url(path)?;
            tracing::trace!(server = %name, url, remaining = matched.remaining, "server matched");
            Some(ServerMatch {
                name,
                server,
                values: matched.values,
                remaining: matched.remaining,
            })
        })
    }
}

impl FromIterator<(String, Server)> for Servers {
    fn from_iter<I: IntoIterator<Item = (String, Server)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Omit for Servers {
    fn is_omitted(&self) -> bool {
        self.0.is_empty()
    }
}

impl Validate for Servers {
    fn validate(&self, ctx: &ValidationContext) -> Result<(), SpecError> {
        for (name, server) in &self.0 {
            SERVER_KEY.check(name)?;
            server.validate(ctx)?;
        }
        Ok(())
    }
}
