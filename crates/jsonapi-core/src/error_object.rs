// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error documents (`{"errors": [...]}`).

use crate::node::Meta;
use serde::Serialize;
use std::fmt;

/// One entry of an error document.
///
/// All members are optional; empty ones are left out of the output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorObject {
    /// Unique identifier for this occurrence of the problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Short, human-readable summary that does not vary between occurrences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// HTTP status code, as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Application-specific error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Non-standard meta information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error: {} {}",
            self.title.as_deref().unwrap_or_default(),
            self.detail.as_deref().unwrap_or_default()
        )
    }
}

impl std::error::Error for ErrorObject {}

/// Top-level error document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorsPayload {
    /// The errors, in reporting order.
    pub errors: Vec<ErrorObject>,
}

impl From<Vec<ErrorObject>> for ErrorsPayload {
    fn from(errors: Vec<ErrorObject>) -> Self {
        Self { errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_members_are_skipped() {
        let payload = ErrorsPayload::from(vec![ErrorObject {
            title: Some("Not Found".into()),
            status: Some("404".into()),
            ..ErrorObject::default()
        }]);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"errors": [{"title": "Not Found", "status": "404"}]})
        );
    }

    #[test]
    fn display_joins_title_and_detail() {
        let err = ErrorObject {
            title: Some("Bad Request".into()),
            detail: Some("name is required".into()),
            ..ErrorObject::default()
        };
        assert_eq!(err.to_string(), "Error: Bad Request name is required");
    }
}
