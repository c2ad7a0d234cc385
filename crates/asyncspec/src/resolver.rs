//! Local `$ref` resolution.
//!
//! A [`Resolver`] holds the encoded form of a whole document and attaches
//! the target of every local pointer (`#/...`) to the [`Ref`] cell that
//! names it. Targets are decoded into the cell's own type, so a pointer from
//! a `MessageRef` must land on something that decodes as a message.
//! Pointers to other documents are left alone and show up later as
//! `UnresolvedReference` when the tree is validated.

use std::collections::BTreeMap;

use crate::bindings::{ChannelBindings, MessageBindings, OperationBindings, ServerBindings};
use crate::error::SpecError;
use crate::message::MessagePayload;
use crate::one_of::OneOf;
use crate::reference::{Ref, Target};
use crate::server::{Server, Servers};
use crate::{
    AsyncApi, Channel, Components, CorrelationId, Message, MessageTrait, Operation,
    OperationTrait, Parameter, Schema,
};
use serde_json::Value;

/// Resolves local JSON pointers against a root document.
#[derive(Debug)]
pub struct Resolver {
    root: Value,
    visiting: Vec<String>,
}

impl Resolver {
    pub fn new(root: Value) -> Self {
        Self {
            root,
            visiting: Vec::new(),
        }
    }

    /// Look up a pointer in the root document.
    ///
    /// Returns `Ok(None)` for pointers that do not start with `#`.
    pub fn lookup(&self, pointer: &str) -> Result<Option<&Value>, SpecError> {
        let Some(path) = pointer.strip_prefix('#') else {
            return Ok(None);
        };
        self.root
            .pointer(path)
            .map(Some)
            .ok_or_else(|| SpecError::UnresolvedReference(pointer.to_string()))
    }

    /// Attach the target of `cell` and resolve everything inside it.
    ///
    /// A cell that already holds a value keeps it; only its children are
    /// visited.
    pub fn resolve<T>(&mut self, cell: &mut Ref<T>) -> Result<(), SpecError>
    where
        T: Target + ResolveRefs,
    {
        if let Some(value) = cell.value.as_mut() {
            return value.resolve_refs_with(self);
        }
        if cell.pointer.is_empty() {
            return Ok(());
        }

        let pointer = cell.pointer.clone();
        let Some(target) = self.lookup(&pointer)? else {
            tracing::debug!(pointer = %pointer, "leaving non-local reference unresolved");
            return Ok(());
        };
        if self.visiting.contains(&pointer) {
            return Err(SpecError::CircularReference(pointer));
        }

        let mut target: Ref<T> = Ref::from_value(target.clone())?;
        self.visiting.push(pointer.clone());
        let result = self.resolve(&mut target);
        self.visiting.pop();
        result?;

        if let Some(value) = target.value {
            tracing::debug!(pointer = %pointer, "resolved reference");
            cell.attach(value);
        }
        Ok(())
    }
}

/// Resolve every `$ref` cell a node owns.
pub trait ResolveRefs {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError>;
}

impl<T: Target + ResolveRefs> ResolveRefs for Ref<T> {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        resolver.resolve(self)
    }
}

impl<T: Target + ResolveRefs> ResolveRefs for OneOf<T> {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        self.single.resolve_refs_with(resolver)?;
        self.alternatives.resolve_refs_with(resolver)
    }
}

impl<T: ResolveRefs> ResolveRefs for Option<T> {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        match self {
            Some(inner) => inner.resolve_refs_with(resolver),
            None => Ok(()),
        }
    }
}

impl<T: ResolveRefs> ResolveRefs for Vec<T> {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        self.iter_mut()
            .try_for_each(|item| item.resolve_refs_with(resolver))
    }
}

impl<T: ResolveRefs> ResolveRefs for BTreeMap<String, T> {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        self.values_mut()
            .try_for_each(|item| item.resolve_refs_with(resolver))
    }
}

macro_rules! leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ResolveRefs for $ty {
                fn resolve_refs_with(&mut self, _resolver: &mut Resolver) -> Result<(), SpecError> {
                    Ok(())
                }
            }
        )*
    };
}

// Nested `$ref`s inside a schema stay raw JSON.
leaf!(
    Schema,
    CorrelationId,
    ServerBindings,
    ChannelBindings,
    OperationBindings,
    MessageBindings,
);

impl ResolveRefs for Parameter {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        self.schema.resolve_refs_with(resolver)
    }
}

impl ResolveRefs for Channel {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        self.subscribe.resolve_refs_with(resolver)?;
        self.publish.resolve_refs_with(resolver)?;
        self.parameters.resolve_refs_with(resolver)?;
        self.bindings.resolve_refs_with(resolver)
    }
}

impl ResolveRefs for OperationTrait {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        self.bindings.resolve_refs_with(resolver)
    }
}

impl ResolveRefs for Operation {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        self.common.resolve_refs_with(resolver)?;
        self.traits.resolve_refs_with(resolver)?;
        self.message.resolve_refs_with(resolver)
    }
}

impl ResolveRefs for MessageTrait {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        self.headers.resolve_refs_with(resolver)?;
        self.correlation_id.resolve_refs_with(resolver)?;
        self.bindings.resolve_refs_with(resolver)
    }
}

impl ResolveRefs for Message {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        self.common.resolve_refs_with(resolver)?;
        if let MessagePayload::Schema(schema) = &mut self.payload {
            schema.resolve_refs_with(resolver)?;
        }
        self.traits.resolve_refs_with(resolver)
    }
}

impl ResolveRefs for Server {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        self.bindings.resolve_refs_with(resolver)
    }
}

impl ResolveRefs for Servers {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        self.0.resolve_refs_with(resolver)
    }
}

impl ResolveRefs for Components {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        self.schemas.resolve_refs_with(resolver)?;
        self.messages.resolve_refs_with(resolver)?;
        self.parameters.resolve_refs_with(resolver)?;
        self.correlation_ids.resolve_refs_with(resolver)?;
        self.operation_traits.resolve_refs_with(resolver)?;
        self.message_traits.resolve_refs_with(resolver)?;
        self.server_bindings.resolve_refs_with(resolver)?;
        self.channel_bindings.resolve_refs_with(resolver)?;
        self.operation_bindings.resolve_refs_with(resolver)?;
        self.message_bindings.resolve_refs_with(resolver)
    }
}

impl ResolveRefs for AsyncApi {
    fn resolve_refs_with(&mut self, resolver: &mut Resolver) -> Result<(), SpecError> {
        self.servers.resolve_refs_with(resolver)?;
        self.channels.resolve_refs_with(resolver)?;
        self.components.resolve_refs_with(resolver)
    }
}
