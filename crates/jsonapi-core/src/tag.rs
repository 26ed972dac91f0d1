// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Field tag parsing: `role[,name[,modifier...]]`.

use crate::error::{MarshalError, Result};

/// Separator between tag parts.
pub const TAG_SEPARATOR: char = ',';

/// Role keyword for the primary identifier field.
pub const ROLE_PRIMARY: &str = "primary";
/// Role keyword for the client-supplied identifier field.
pub const ROLE_CLIENT_ID: &str = "client-id";
/// Role keyword for plain attributes.
pub const ROLE_ATTRIBUTE: &str = "attr";
/// Role keyword for relationships.
pub const ROLE_RELATION: &str = "relation";

/// Modifier keyword: omit the key when the value is empty.
pub const MOD_OMIT_EMPTY: &str = "omitempty";
/// Modifier keyword: render timestamps as ISO 8601.
pub const MOD_ISO8601: &str = "iso8601";
/// Modifier keyword: render timestamps as RFC 3339.
pub const MOD_RFC3339: &str = "rfc3339";

/// What a tagged field contributes to its resource node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Becomes the node `id`; the tag name is the resource `type`.
    Primary,
    /// Becomes the node `client-id` when non-empty.
    ClientId,
    /// Becomes an entry in `attributes`.
    Attribute,
    /// Becomes an entry in `relationships`.
    Relation,
}

/// Rendering modifiers collected from tag parts 2..n.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// `omitempty` was present.
    pub omit_empty: bool,
    /// `iso8601` was present.
    pub iso8601: bool,
    /// `rfc3339` was present.
    pub rfc3339: bool,
}

/// A parsed field tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTag<'a> {
    /// Field role.
    pub role: Role,
    /// Output name (resource type for `primary`; empty for `client-id`).
    pub name: &'a str,
    /// Rendering modifiers.
    pub modifiers: Modifiers,
}

impl<'a> FieldTag<'a> {
    /// Parse a raw tag.
    ///
    /// `client-id` takes no further parts; every other role needs at least a
    /// name. Unknown modifiers are ignored, unknown roles are rejected.
    pub fn parse(raw: &'a str) -> Result<Self> {
        let parts: Vec<&'a str> = raw.split(TAG_SEPARATOR).collect();
        let role = match parts[0] {
            ROLE_PRIMARY => Role::Primary,
            ROLE_CLIENT_ID => Role::ClientId,
            ROLE_ATTRIBUTE => Role::Attribute,
            ROLE_RELATION => Role::Relation,
            "" => return Err(MarshalError::malformed(raw, "empty role")),
            _ => return Err(MarshalError::malformed(raw, "unknown role")),
        };

        if role == Role::ClientId {
            if parts.len() != 1 {
                return Err(MarshalError::malformed(raw, "client-id takes no name"));
            }
            return Ok(Self {
                role,
                name: "",
                modifiers: Modifiers::default(),
            });
        }
        if parts.len() < 2 {
            return Err(MarshalError::malformed(raw, "missing output name"));
        }

        let mut modifiers = Modifiers::default();
        for part in &parts[2..] {
            match *part {
                MOD_OMIT_EMPTY => modifiers.omit_empty = true,
                MOD_ISO8601 => modifiers.iso8601 = true,
                MOD_RFC3339 => modifiers.rfc3339 = true,
                _ => {}
            }
        }

        Ok(Self {
            role,
            name: parts[1],
            modifiers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attribute_with_modifiers() {
        let tag = FieldTag::parse("attr,created,omitempty,iso8601,bogus").unwrap();
        assert_eq!(tag.role, Role::Attribute);
        assert_eq!(tag.name, "created");
        assert!(tag.modifiers.omit_empty);
        assert!(tag.modifiers.iso8601);
        assert!(!tag.modifiers.rfc3339);
    }

    #[test]
    fn primary_carries_type_name() {
        let tag = FieldTag::parse("primary,widgets").unwrap();
        assert_eq!(tag.role, Role::Primary);
        assert_eq!(tag.name, "widgets");
        assert_eq!(tag.modifiers, Modifiers::default());
    }

    #[test]
    fn client_id_must_stand_alone() {
        let tag = FieldTag::parse("client-id").unwrap();
        assert_eq!(tag.role, Role::ClientId);
        assert!(matches!(
            FieldTag::parse("client-id,cid"),
            Err(MarshalError::MalformedFieldMetadata { .. })
        ));
    }

    #[test]
    fn rejects_missing_name_and_unknown_role() {
        for raw in ["attr", "relation", "primary", "", "attribute,name"] {
            let err = FieldTag::parse(raw).unwrap_err();
            assert!(
                matches!(err, MarshalError::MalformedFieldMetadata { ref tag, .. } if tag == raw),
                "expected malformed tag for {raw:?}, got {err:?}"
            );
        }
    }
}
