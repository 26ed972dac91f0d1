// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sideloaded resource registry for one marshal call.

use crate::node::Node;
use std::collections::BTreeMap;
use tracing::trace;

/// Resources destined for the document's `included` list, keyed by
/// `(type, id)`.
///
/// Registering a key twice keeps the later node. Iteration is sorted by type
/// then id, so output order is stable for a given input.
#[derive(Debug, Default)]
pub struct Included {
    nodes: BTreeMap<(String, String), Node>,
}

impl Included {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a full node, replacing any node with the same identity.
    pub fn insert(&mut self, node: Node) {
        let key = node.key();
        trace!(resource_type = %key.0, id = %key.1, "sideloading resource");
        self.nodes.insert(key, node);
    }

    /// Number of distinct resources.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a registered resource.
    pub fn get(&self, resource_type: &str, id: &str) -> Option<&Node> {
        self.nodes.get(&(resource_type.to_owned(), id.to_owned()))
    }

    /// Consume the registry into the `included` list.
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes.into_values().collect()
    }
}
