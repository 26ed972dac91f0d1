// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Expansion for `#[derive(Resource)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Index, LitStr, Member, Path, Result};

const ATTR: &str = "jsonapi";
const RELATION_ROLE: &str = "relation";

/// Options from `#[jsonapi(...)]` on the struct itself.
#[derive(Default)]
struct ContainerAttrs {
    links: bool,
    meta: bool,
    relationship_links: bool,
    relationship_meta: bool,
    krate: Option<Path>,
}

impl ContainerAttrs {
    fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut out = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(ATTR) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("links") {
                    out.links = true;
                } else if meta.path.is_ident("meta") {
                    out.meta = true;
                } else if meta.path.is_ident("relationship_links") {
                    out.relationship_links = true;
                } else if meta.path.is_ident("relationship_meta") {
                    out.relationship_meta = true;
                } else if meta.path.is_ident("crate") {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.krate = Some(lit.parse()?);
                } else {
                    return Err(meta.error("unsupported jsonapi container option"));
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}

/// The tag on a field, if any. More than one tag is an error.
fn field_tag(attrs: &[Attribute]) -> Result<Option<LitStr>> {
    let mut tag: Option<LitStr> = None;
    for attr in attrs {
        if !attr.path().is_ident(ATTR) {
            continue;
        }
        if tag.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "a field takes a single #[jsonapi(\"...\")] tag",
            ));
        }
        tag = Some(attr.parse_args()?);
    }
    Ok(tag)
}

pub(crate) fn derive(input: &DeriveInput) -> Result<TokenStream> {
    let container = ContainerAttrs::from_attrs(&input.attrs)?;
    let krate = container
        .krate
        .clone()
        .unwrap_or_else(|| syn::parse_quote!(::jsonapi_core));

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Resource can only be derived for structs",
            ))
        }
    };

    let mut entries = Vec::new();
    let members: Vec<(Member, &syn::Field)> = match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .filter_map(|f| f.ident.clone().map(|ident| (Member::Named(ident), f)))
            .collect(),
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(i, f)| (Member::Unnamed(Index::from(i)), f))
            .collect(),
        Fields::Unit => Vec::new(),
    };
    for (member, field) in members {
        let Some(tag) = field_tag(&field.attrs)? else {
            continue;
        };
        let is_relation = tag.value().split(',').next() == Some(RELATION_ROLE);
        let value = if is_relation {
            quote! { #krate::IntoRelation::relation(&self.#member) }
        } else {
            quote! { #krate::IntoFieldValue::field_value(&self.#member) }
        };
        entries.push(quote! { #krate::Field::new(#tag, #value) });
    }

    let links = container.links.then(|| {
        quote! {
            fn as_linkable(&self) -> ::core::option::Option<&dyn #krate::Linkable> {
                ::core::option::Option::Some(self)
            }
        }
    });
    let meta = container.meta.then(|| {
        quote! {
            fn as_metable(&self) -> ::core::option::Option<&dyn #krate::Metable> {
                ::core::option::Option::Some(self)
            }
        }
    });
    let relationship_links = container.relationship_links.then(|| {
        quote! {
            fn as_relationship_linkable(
                &self,
            ) -> ::core::option::Option<&dyn #krate::RelationshipLinkable> {
                ::core::option::Option::Some(self)
            }
        }
    });
    let relationship_meta = container.relationship_meta.then(|| {
        quote! {
            fn as_relationship_metable(
                &self,
            ) -> ::core::option::Option<&dyn #krate::RelationshipMetable> {
                ::core::option::Option::Some(self)
            }
        }
    });

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics #krate::Resource for #name #ty_generics #where_clause {
            fn fields(&self) -> ::std::vec::Vec<#krate::Field<'_>> {
                ::std::vec![#(#entries),*]
            }

            #links
            #meta
            #relationship_links
            #relationship_meta
        }
    })
}
