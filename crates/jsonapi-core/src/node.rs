// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Resource objects, relationships, links and meta.
//!
//! These are the generic output shapes handed to `serde_json`. They are
//! built fresh by every marshal call and carry no identity beyond it.

use crate::error::{MarshalError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Free-form `meta` object.
pub type Meta = Map<String, Value>;

/// `links` object keyed by link name (`self`, `related`, ...).
pub type Links = BTreeMap<String, Link>;

/// A single link: a URL string or a link object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Link {
    /// Bare URL.
    Href(String),
    /// Link object with optional meta.
    Object {
        /// Target URL.
        href: String,
        /// Link meta.
        #[serde(skip_serializing_if = "Option::is_none")]
        meta: Option<Meta>,
    },
    /// Externally produced link value; checked structurally before use.
    Raw(Value),
}

impl Link {
    /// Link object with meta.
    pub fn with_meta(href: impl Into<String>, meta: Meta) -> Self {
        Self::Object {
            href: href.into(),
            meta: Some(meta),
        }
    }

    /// Whether the link has a usable shape: a non-empty URL string, or an
    /// object with a non-empty string `href` and an optional object `meta`.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Href(href) | Self::Object { href, .. } => !href.is_empty(),
            Self::Raw(Value::String(href)) => !href.is_empty(),
            Self::Raw(Value::Object(obj)) => {
                let href_ok = matches!(obj.get("href"), Some(Value::String(h)) if !h.is_empty());
                let meta_ok = matches!(obj.get("meta"), None | Some(Value::Object(_)));
                let no_extra = obj.keys().all(|k| k == "href" || k == "meta");
                href_ok && meta_ok && no_extra
            }
            Self::Raw(_) => false,
        }
    }
}

impl From<&str> for Link {
    fn from(href: &str) -> Self {
        Self::Href(href.to_owned())
    }
}

impl From<String> for Link {
    fn from(href: String) -> Self {
        Self::Href(href)
    }
}

/// Check every member of a links object; the first bad member fails.
pub fn validate_links(links: &Links) -> Result<()> {
    match links.iter().find(|(_, link)| !link.is_valid()) {
        Some((key, _)) => Err(MarshalError::InvalidLinkData { key: key.clone() }),
        None => Ok(()),
    }
}

/// Full resource object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Node {
    /// Resource type, from the `primary` tag.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Canonical string form of the primary key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Client-supplied identifier.
    #[serde(rename = "client-id", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Attributes by output name.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    /// Relationships by output name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,
    /// Resource-level links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Resource-level meta.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Node {
    /// Identity key used by the inclusion registry.
    pub fn key(&self) -> (String, String) {
        (self.resource_type.clone(), self.id.clone())
    }

    /// Identifier-only stand-in for this node.
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier {
            resource_type: self.resource_type.clone(),
            id: self.id.clone(),
            client_id: self.client_id.clone(),
        }
    }
}

/// Reference to a resource rendered elsewhere in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceIdentifier {
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Resource id.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Client-supplied identifier.
    #[serde(rename = "client-id", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Relationship data element: a full node (embedded) or a reference (sideloaded).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Linkage {
    /// Full resource object, nested inline.
    Node(Box<Node>),
    /// Identifier of a resource in `included`.
    Identifier(ResourceIdentifier),
}

impl Linkage {
    /// Identity of the linked resource.
    pub fn identifier(&self) -> ResourceIdentifier {
        match self {
            Self::Node(node) => node.identifier(),
            Self::Identifier(id) => id.clone(),
        }
    }
}

/// Relationship entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Relationship {
    /// To-one; `data` is `null` for a nil target.
    One {
        /// Linked resource.
        data: Option<Linkage>,
        /// Relationship links.
        #[serde(skip_serializing_if = "Option::is_none")]
        links: Option<Links>,
        /// Relationship meta.
        #[serde(skip_serializing_if = "Option::is_none")]
        meta: Option<Meta>,
    },
    /// To-many; `data` keeps collection order.
    Many {
        /// Linked resources.
        data: Vec<Linkage>,
        /// Relationship links.
        #[serde(skip_serializing_if = "Option::is_none")]
        links: Option<Links>,
        /// Relationship meta.
        #[serde(skip_serializing_if = "Option::is_none")]
        meta: Option<Meta>,
    },
}

impl Relationship {
    /// Linked resources, in order (empty for a null to-one).
    pub fn data(&self) -> Vec<&Linkage> {
        match self {
            Self::One { data, .. } => data.iter().collect(),
            Self::Many { data, .. } => data.iter().collect(),
        }
    }

    /// Relationship links.
    pub fn links(&self) -> Option<&Links> {
        match self {
            Self::One { links, .. } | Self::Many { links, .. } => links.as_ref(),
        }
    }

    /// Relationship meta.
    pub fn meta(&self) -> Option<&Meta> {
        match self {
            Self::One { meta, .. } | Self::Many { meta, .. } => meta.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn link_shapes() {
        assert!(Link::from("http://example.com/posts/1").is_valid());
        assert!(Link::with_meta("http://example.com", Meta::new()).is_valid());
        assert!(!Link::Href(String::new()).is_valid());
        assert!(Link::Raw(json!({"href": "http://x", "meta": {"count": 1}})).is_valid());
        assert!(!Link::Raw(json!({"href": 3})).is_valid());
        assert!(!Link::Raw(json!({"href": "http://x", "meta": 1})).is_valid());
        assert!(!Link::Raw(json!({"href": "http://x", "rel": "self"})).is_valid());
        assert!(!Link::Raw(json!(42)).is_valid());
    }

    #[test]
    fn validate_links_reports_offending_key() {
        let mut links = Links::new();
        links.insert("self".into(), Link::from("http://example.com/a"));
        links.insert("related".into(), Link::Raw(json!([1, 2])));
        match validate_links(&links) {
            Err(MarshalError::InvalidLinkData { key }) => assert_eq!(key, "related"),
            other => panic!("expected InvalidLinkData, got {other:?}"),
        }
    }

    #[test]
    fn null_to_one_serializes_explicit_null() {
        let rel = Relationship::One {
            data: None,
            links: None,
            meta: None,
        };
        assert_eq!(serde_json::to_value(&rel).unwrap(), json!({"data": null}));
    }

    #[test]
    fn node_skips_empty_members() {
        let node = Node {
            resource_type: "widgets".into(),
            id: "1".into(),
            ..Node::default()
        };
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"type": "widgets", "id": "1"})
        );
    }
}
