// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy for marshalling.
//!
//! Every variant is terminal for the marshal call that produced it: the
//! traversal stops at the first failure and no partial document is returned.

use thiserror::Error;

/// Errors produced while marshalling a resource graph.
#[derive(Debug, Error)]
pub enum MarshalError {
    /// A field tag violates the `role[,name[,modifier...]]` contract.
    #[error("bad jsonapi field tag `{tag}`: {reason}")]
    MalformedFieldMetadata {
        /// The offending tag, verbatim.
        tag: String,
        /// Which part of the contract was violated.
        reason: &'static str,
    },
    /// The primary-key field holds something other than an integer or a string.
    #[error(
        "id should be either string, int(8,16,32,64) or uint(8,16,32,64); field `{tag}` holds {found}"
    )]
    UnsupportedIdentifierType {
        /// Tag of the primary-key field.
        tag: String,
        /// Kind of value actually found.
        found: &'static str,
    },
    /// The top-level input is neither a resource nor a collection of resources.
    #[error("models should be a resource reference or a collection of resource references")]
    InvalidInputShape,
    /// A links capability returned a value that is not a string or link object.
    #[error("the `{key}` member of the links object was not a string or link object")]
    InvalidLinkData {
        /// Key of the offending link.
        key: String,
    },
    /// Relationship nesting went deeper than the configured bound.
    #[error("relationship nesting exceeded the maximum depth of {max_depth}")]
    DepthLimitExceeded {
        /// The configured bound.
        max_depth: usize,
    },
    /// The finished document could not be written.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl MarshalError {
    pub(crate) fn malformed(tag: &str, reason: &'static str) -> Self {
        Self::MalformedFieldMetadata {
            tag: tag.to_owned(),
            reason,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MarshalError>;
