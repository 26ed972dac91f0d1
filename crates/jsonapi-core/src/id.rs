// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Primary-key encoding.

use crate::error::{MarshalError, Result};
use crate::field::FieldValue;

/// Canonical string form of a primary-key value.
///
/// One level of optionality is peeled first; an absent optional id is a tag
/// error rather than a defaulted id. Integers keep their own signedness.
pub fn encode_id(tag: &str, value: &FieldValue<'_>) -> Result<String> {
    let value = match value {
        FieldValue::Null => {
            return Err(MarshalError::malformed(tag, "primary key is absent"));
        }
        FieldValue::Some(inner) => inner.as_ref(),
        other => other,
    };

    let id = match value {
        FieldValue::Str(s) => s.to_string(),
        FieldValue::I8(n) => n.to_string(),
        FieldValue::I16(n) => n.to_string(),
        FieldValue::I32(n) => n.to_string(),
        FieldValue::I64(n) => n.to_string(),
        FieldValue::Isize(n) => n.to_string(),
        FieldValue::U8(n) => n.to_string(),
        FieldValue::U16(n) => n.to_string(),
        FieldValue::U32(n) => n.to_string(),
        FieldValue::U64(n) => n.to_string(),
        FieldValue::Usize(n) => n.to_string(),
        other => {
            return Err(MarshalError::UnsupportedIdentifierType {
                tag: tag.to_owned(),
                found: other.kind(),
            })
        }
    };
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::IntoFieldValue;

    #[test]
    fn signed_and_unsigned_extremes() {
        assert_eq!(encode_id("primary,t", &(-1i8).field_value()).unwrap(), "-1");
        assert_eq!(encode_id("primary,t", &u8::MAX.field_value()).unwrap(), "255");
        assert_eq!(
            encode_id("primary,t", &i64::MIN.field_value()).unwrap(),
            "-9223372036854775808"
        );
        assert_eq!(
            encode_id("primary,t", &u64::MAX.field_value()).unwrap(),
            "18446744073709551615"
        );
    }

    #[test]
    fn optional_id_is_dereferenced_once() {
        assert_eq!(encode_id("primary,t", &Some(7u32).field_value()).unwrap(), "7");
        let absent: Option<u32> = None;
        assert!(matches!(
            encode_id("primary,t", &absent.field_value()),
            Err(MarshalError::MalformedFieldMetadata { .. })
        ));
        let nested = Some(Some(7u32));
        assert!(matches!(
            encode_id("primary,t", &nested.field_value()),
            Err(MarshalError::UnsupportedIdentifierType { found: "optional", .. })
        ));
    }

    #[test]
    fn strings_pass_through_and_floats_are_rejected() {
        assert_eq!(encode_id("primary,t", &"abc-1".field_value()).unwrap(), "abc-1");
        match encode_id("primary,t", &1.5f64.field_value()) {
            Err(MarshalError::UnsupportedIdentifierType { tag, found }) => {
                assert_eq!(tag, "primary,t");
                assert_eq!(found, "f64");
            }
            other => panic!("expected UnsupportedIdentifierType, got {other:?}"),
        }
    }
}
