// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Marshal annotated domain objects into JSON:API documents.
//!
//! A type opts in by describing its tagged fields ([`Resource::fields`]),
//! normally through `#[derive(Resource)]`. Each tag has the form
//! `role[,name[,modifier...]]`:
//!
//! - `primary,<type>`: the resource id; the name is the resource type.
//! - `client-id`: client-supplied identifier, emitted when non-empty.
//! - `attr,<name>[,omitempty][,iso8601|,rfc3339]`: an attribute.
//! - `relation,<name>[,omitempty]`: a to-one (`Option<T>`) or to-many
//!   (`Vec<T>`) relationship.
//!
//! Timestamps render as Unix seconds unless `iso8601` or `rfc3339` is given.
//! A timestamp equal to [`zero_time`] (`0001-01-01T00:00:00Z`) is treated as
//! unset and left out; use `Option<DateTime<Utc>>` for a nullable time.
//!
//! [`marshal`] sideloads related resources into `included` and references
//! them by identifier; [`marshal_embedded`] nests them in full instead.
//!
//! ```
//! use jsonapi_core::{marshal, Resource};
//!
//! #[derive(Resource)]
//! struct Widget {
//!     #[jsonapi("primary,widgets")]
//!     id: i64,
//!     #[jsonapi("attr,name")]
//!     name: String,
//! }
//!
//! let widget = Widget { id: 42, name: "Foo".into() };
//! let payload = marshal(&widget).unwrap();
//! assert_eq!(
//!     serde_json::to_value(&payload).unwrap(),
//!     serde_json::json!({
//!         "data": {"type": "widgets", "id": "42", "attributes": {"name": "Foo"}}
//!     })
//! );
//! ```

pub mod attr;
pub mod config;
pub mod document;
pub mod error;
pub mod error_object;
pub mod field;
pub mod id;
pub mod included;
pub mod marshal;
pub mod node;
pub mod resource;
pub mod tag;
mod visit;

pub use config::{MarshalOptions, OptionsDir, OptionsError, OptionsSource};
pub use document::{ManyPayload, OnePayload, Payload};
pub use error::{MarshalError, Result};
pub use error_object::{ErrorObject, ErrorsPayload};
pub use field::{zero_time, Field, FieldValue, IntoFieldValue, IntoRelation};
pub use included::Included;
pub use marshal::{
    marshal, marshal_embedded, marshal_errors, marshal_one_embedded, marshal_payload,
    marshal_payload_without_included, Collection, Marshaler, Models,
};
pub use node::{Link, Linkage, Links, Meta, Node, Relationship, ResourceIdentifier};
pub use resource::{Linkable, Metable, RelationshipLinkable, RelationshipMetable, Resource};
pub use tag::{FieldTag, Modifiers, Role};

#[cfg(feature = "derive")]
pub use jsonapi_derive::Resource;
