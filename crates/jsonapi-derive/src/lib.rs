// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `#[derive(Resource)]` for `jsonapi-core`.
//!
//! Each field carrying `#[jsonapi("...")]` is listed, in declaration order,
//! in the generated `Resource::fields`. The tag string is passed through
//! untouched; `jsonapi-core` parses and validates it at marshal time. Tags
//! whose role is `relation` read the field through `IntoRelation`, all others
//! through `IntoFieldValue`.
//!
//! Container options, `#[jsonapi(...)]` on the struct:
//!
//! - `links`, `meta`: the type implements `Linkable` / `Metable`.
//! - `relationship_links`, `relationship_meta`: the type implements
//!   `RelationshipLinkable` / `RelationshipMetable`.
//! - `crate = "path"`: path to `jsonapi_core` when it is re-exported.

mod expand;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive `jsonapi_core::Resource` from `#[jsonapi("...")]` field tags.
#[proc_macro_derive(Resource, attributes(jsonapi))]
pub fn derive_resource(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand::derive(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
