// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Resource contract and optional capabilities.
//!
//! A type becomes marshallable by implementing [`Resource`] (usually via
//! `#[derive(Resource)]`). Links and meta are separate capabilities a type
//! may implement independently; the node builder discovers them through the
//! `as_*` accessors, which return `None` unless the type opts in.

use crate::field::Field;
use crate::node::{Links, Meta};
use std::rc::Rc;
use std::sync::Arc;

/// A domain object that can be rendered as a resource node.
pub trait Resource {
    /// Tagged fields in declaration order. Untagged fields are not listed.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Resource-level links capability.
    fn as_linkable(&self) -> Option<&dyn Linkable> {
        None
    }

    /// Resource-level meta capability.
    fn as_metable(&self) -> Option<&dyn Metable> {
        None
    }

    /// Per-relationship links capability.
    fn as_relationship_linkable(&self) -> Option<&dyn RelationshipLinkable> {
        None
    }

    /// Per-relationship meta capability.
    fn as_relationship_metable(&self) -> Option<&dyn RelationshipMetable> {
        None
    }
}

/// Supplies a `links` object for a resource or a top-level document.
pub trait Linkable {
    /// The links to attach. Validated before use.
    fn jsonapi_links(&self) -> Links;
}

/// Supplies a `meta` object for a resource or a top-level document.
pub trait Metable {
    /// The meta to attach.
    fn jsonapi_meta(&self) -> Meta;
}

/// Supplies `links` for individual relationships, keyed by relationship name.
///
/// Relationship links are checked the same way as resource links: a link that
/// is neither a string nor an `{"href", "meta"}` object fails the whole call
/// with `MarshalError::InvalidLinkData`. They are only consulted for a
/// relationship that has data (a to-many, or a to-one with a target).
pub trait RelationshipLinkable {
    /// Links for `relation`, if any.
    fn jsonapi_relationship_links(&self, relation: &str) -> Option<Links>;
}

/// Supplies `meta` for individual relationships, keyed by relationship name.
pub trait RelationshipMetable {
    /// Meta for `relation`, if any.
    fn jsonapi_relationship_meta(&self, relation: &str) -> Option<Meta>;
}

macro_rules! forward_resource {
    ($($ptr:ty),*) => {
        $(
            impl<T: Resource + ?Sized> Resource for $ptr {
                fn fields(&self) -> Vec<Field<'_>> {
                    (**self).fields()
                }

                fn as_linkable(&self) -> Option<&dyn Linkable> {
                    (**self).as_linkable()
                }

                fn as_metable(&self) -> Option<&dyn Metable> {
                    (**self).as_metable()
                }

                fn as_relationship_linkable(&self) -> Option<&dyn RelationshipLinkable> {
                    (**self).as_relationship_linkable()
                }

                fn as_relationship_metable(&self) -> Option<&dyn RelationshipMetable> {
                    (**self).as_relationship_metable()
                }
            }
        )*
    };
}

forward_resource!(&T, Box<T>, Rc<T>, Arc<T>);
