// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Top-level documents.

use crate::node::{Links, Meta, Node};
use serde::Serialize;

/// Document whose primary data is a single resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnePayload {
    /// The root resource.
    pub data: Node,
    /// Sideloaded related resources.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Node>,
    /// Top-level links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Top-level meta.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Document whose primary data is a collection of resources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManyPayload {
    /// The root resources, in input order.
    pub data: Vec<Node>,
    /// Sideloaded related resources.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Node>,
    /// Top-level links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Top-level meta.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Either document shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Single-resource document.
    One(OnePayload),
    /// Collection document.
    Many(ManyPayload),
}

impl Payload {
    /// Sideloaded resources.
    pub fn included(&self) -> &[Node] {
        match self {
            Self::One(p) => &p.included,
            Self::Many(p) => &p.included,
        }
    }

    /// Drop the sideloaded resources, leaving relationship references intact.
    pub fn clear_included(&mut self) {
        match self {
            Self::One(p) => p.included.clear(),
            Self::Many(p) => p.included.clear(),
        }
    }

    /// Top-level links.
    pub fn links(&self) -> Option<&Links> {
        match self {
            Self::One(p) => p.links.as_ref(),
            Self::Many(p) => p.links.as_ref(),
        }
    }

    /// Top-level meta.
    pub fn meta(&self) -> Option<&Meta> {
        match self {
            Self::One(p) => p.meta.as_ref(),
            Self::Many(p) => p.meta.as_ref(),
        }
    }

    /// The single-resource document, if this is one.
    pub fn as_one(&self) -> Option<&OnePayload> {
        match self {
            Self::One(p) => Some(p),
            Self::Many(_) => None,
        }
    }

    /// The collection document, if this is one.
    pub fn as_many(&self) -> Option<&ManyPayload> {
        match self {
            Self::One(_) => None,
            Self::Many(p) => Some(p),
        }
    }
}
