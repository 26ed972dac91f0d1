// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Payload assembly and the public entry points.
//!
//! Every call owns its own [`Included`] registry; nothing is shared between
//! calls, so a [`Marshaler`] can be used from many threads at once.

use crate::config::{MarshalOptions, OptionsError, OptionsSource};
use crate::document::{ManyPayload, OnePayload, Payload};
use crate::error::{MarshalError, Result};
use crate::error_object::{ErrorObject, ErrorsPayload};
use crate::included::Included;
use crate::node::validate_links;
use crate::resource::{Linkable, Metable, Resource};
use crate::visit::Visitor;
use serde::Serialize;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, instrument};

/// Top-level marshal input.
pub enum Models<'a> {
    /// A single resource; `None` is a nil root and is rejected.
    One(Option<&'a dyn Resource>),
    /// A homogeneous collection of resources.
    Many(Collection<'a>),
}

impl<'a> Models<'a> {
    /// A single resource behind a trait object.
    pub fn one(model: &'a dyn Resource) -> Self {
        Self::One(Some(model))
    }
}

impl<'a, T: Resource> From<&'a T> for Models<'a> {
    fn from(model: &'a T) -> Self {
        Self::One(Some(model))
    }
}

impl<'a, T: Resource> From<Option<&'a T>> for Models<'a> {
    fn from(model: Option<&'a T>) -> Self {
        Self::One(model.map(|m| m as &dyn Resource))
    }
}

impl<'a> From<Collection<'a>> for Models<'a> {
    fn from(collection: Collection<'a>) -> Self {
        Self::Many(collection)
    }
}

/// A collection of resources of one type, plus the collection's own
/// top-level links and meta capabilities.
pub struct Collection<'a> {
    items: Vec<Option<&'a dyn Resource>>,
    links: Option<&'a dyn Linkable>,
    meta: Option<&'a dyn Metable>,
}

impl<'a> Collection<'a> {
    /// Collect the resources in order.
    pub fn new<T, I>(items: I) -> Self
    where
        T: Resource + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        Self {
            items: items
                .into_iter()
                .map(|m| Some(m as &dyn Resource))
                .collect(),
            links: None,
            meta: None,
        }
    }

    /// Collect possibly-nil resources. Marshalling rejects a nil entry.
    pub fn from_options<T, I>(items: I) -> Self
    where
        T: Resource + 'a,
        I: IntoIterator<Item = Option<&'a T>>,
    {
        Self {
            items: items
                .into_iter()
                .map(|m| m.map(|m| m as &dyn Resource))
                .collect(),
            links: None,
            meta: None,
        }
    }

    /// Attach a top-level links capability.
    pub fn with_links(mut self, links: &'a dyn Linkable) -> Self {
        self.links = Some(links);
        self
    }

    /// Attach a top-level meta capability.
    pub fn with_meta(mut self, meta: &'a dyn Metable) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Marshals resources with a fixed set of [`MarshalOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Marshaler {
    options: MarshalOptions,
}

impl Marshaler {
    /// Marshaler with the given options.
    pub fn new(options: MarshalOptions) -> Self {
        Self { options }
    }

    /// Marshaler configured from the named profile in `source`.
    pub fn from_source<S: OptionsSource + ?Sized>(
        source: &S,
        profile: &str,
    ) -> std::result::Result<Self, OptionsError> {
        MarshalOptions::load(source, profile).map(Self::new)
    }

    /// Options in effect.
    pub fn options(&self) -> &MarshalOptions {
        &self.options
    }

    /// Build the sideloaded document for `models`.
    #[instrument(level = "debug", skip_all)]
    pub fn marshal<'a>(&self, models: impl Into<Models<'a>>) -> Result<Payload> {
        let started = Instant::now();
        let payload = match models.into() {
            Models::One(model) => Payload::One(self.marshal_one(model)?),
            Models::Many(collection) => Payload::Many(self.marshal_many(collection)?),
        };
        let nodes = match &payload {
            Payload::One(_) => 1,
            Payload::Many(p) => p.data.len(),
        };
        debug!(
            nodes,
            included = payload.included().len(),
            elapsed = ?started.elapsed(),
            "marshal complete"
        );
        Ok(payload)
    }

    /// Marshal `models` and write the document to `writer`.
    pub fn marshal_payload<'a, W: Write>(
        &self,
        writer: W,
        models: impl Into<Models<'a>>,
    ) -> Result<()> {
        let payload = self.marshal(models)?;
        self.write(writer, &payload)
    }

    /// Marshal `models`, then drop `included` before writing. Relationship
    /// references are left as they are.
    pub fn marshal_payload_without_included<'a, W: Write>(
        &self,
        writer: W,
        models: impl Into<Models<'a>>,
    ) -> Result<()> {
        let mut payload = self.marshal(models)?;
        payload.clear_included();
        self.write(writer, &payload)
    }

    /// Build a self-contained document: related resources are nested in full
    /// at every relationship site and nothing is sideloaded.
    #[instrument(level = "debug", skip_all)]
    pub fn marshal_embedded(&self, model: &dyn Resource) -> Result<OnePayload> {
        let started = Instant::now();
        let data = Visitor::embedding(self.options.max_depth)
            .visit(Some(model))?
            .ok_or(MarshalError::InvalidInputShape)?;
        debug!(elapsed = ?started.elapsed(), "embedded marshal complete");
        Ok(OnePayload {
            data,
            included: Vec::new(),
            links: None,
            meta: None,
        })
    }

    /// Write the embedded document for `model` to `writer`.
    pub fn marshal_one_embedded<W: Write>(&self, writer: W, model: &dyn Resource) -> Result<()> {
        let payload = self.marshal_embedded(model)?;
        self.write(writer, &payload)
    }

    /// Write an error document to `writer`.
    pub fn marshal_errors<W: Write>(&self, writer: W, errors: &[ErrorObject]) -> Result<()> {
        let payload = ErrorsPayload::from(errors.to_vec());
        self.write(writer, &payload)
    }

    fn marshal_one(&self, model: Option<&dyn Resource>) -> Result<OnePayload> {
        let model = model.ok_or(MarshalError::InvalidInputShape)?;
        let mut included = Included::new();
        let data = Visitor::sideloading(&mut included, self.options.max_depth)
            .visit(Some(model))?
            .ok_or(MarshalError::InvalidInputShape)?;
        Ok(OnePayload {
            data,
            included: included.into_nodes(),
            links: None,
            meta: None,
        })
    }

    fn marshal_many(&self, collection: Collection<'_>) -> Result<ManyPayload> {
        let mut included = Included::new();
        let mut data = Vec::with_capacity(collection.len());
        {
            // One registry spans the whole collection.
            let mut visitor = Visitor::sideloading(&mut included, self.options.max_depth);
            for item in &collection.items {
                let model = item.ok_or(MarshalError::InvalidInputShape)?;
                let node = visitor
                    .visit(Some(model))?
                    .ok_or(MarshalError::InvalidInputShape)?;
                data.push(node);
            }
        }

        let links = match collection.links {
            Some(linkable) => {
                let links = linkable.jsonapi_links();
                validate_links(&links)?;
                Some(links)
            }
            None => None,
        };
        let meta = collection.meta.map(|m| m.jsonapi_meta());

        Ok(ManyPayload {
            data,
            included: included.into_nodes(),
            links,
            meta,
        })
    }

    fn write<W: Write, T: Serialize>(&self, mut writer: W, value: &T) -> Result<()> {
        if self.options.pretty {
            serde_json::to_writer_pretty(&mut writer, value)?;
        } else {
            serde_json::to_writer(&mut writer, value)?;
        }
        if self.options.trailing_newline {
            writer.write_all(b"\n").map_err(serde_json::Error::io)?;
        }
        Ok(())
    }
}

/// [`Marshaler::marshal`] with default options.
pub fn marshal<'a>(models: impl Into<Models<'a>>) -> Result<Payload> {
    Marshaler::default().marshal(models)
}

/// [`Marshaler::marshal_payload`] with default options.
pub fn marshal_payload<'a, W: Write>(writer: W, models: impl Into<Models<'a>>) -> Result<()> {
    Marshaler::default().marshal_payload(writer, models)
}

/// [`Marshaler::marshal_payload_without_included`] with default options.
pub fn marshal_payload_without_included<'a, W: Write>(
    writer: W,
    models: impl Into<Models<'a>>,
) -> Result<()> {
    Marshaler::default().marshal_payload_without_included(writer, models)
}

/// [`Marshaler::marshal_embedded`] with default options.
pub fn marshal_embedded(model: &dyn Resource) -> Result<OnePayload> {
    Marshaler::default().marshal_embedded(model)
}

/// [`Marshaler::marshal_one_embedded`] with default options.
pub fn marshal_one_embedded<W: Write>(writer: W, model: &dyn Resource) -> Result<()> {
    Marshaler::default().marshal_one_embedded(writer, model)
}

/// [`Marshaler::marshal_errors`] with default options.
pub fn marshal_errors<W: Write>(writer: W, errors: &[ErrorObject]) -> Result<()> {
    Marshaler::default().marshal_errors(writer, errors)
}
