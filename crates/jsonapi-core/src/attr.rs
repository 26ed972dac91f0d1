// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Attribute encoding.
//!
//! `encode_attribute` returns `Ok(None)` when the key must be left out of the
//! attributes map and `Ok(Some(Value::Null))` when an explicit null is
//! required; the two are never conflated.
//!
//! A timestamp equal to [`zero_time`](crate::field::zero_time)
//! (`0001-01-01T00:00:00Z`) counts as unset and is left out. The Unix epoch
//! is rendered like any other instant.

use crate::error::{MarshalError, Result};
use crate::field::{is_zero_time, FieldValue};
use crate::tag::Modifiers;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

/// strftime pattern for `iso8601` timestamps.
pub const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Encode one attribute value, or `None` to omit the key.
pub fn encode_attribute(
    tag: &str,
    value: &FieldValue<'_>,
    modifiers: Modifiers,
) -> Result<Option<Value>> {
    match value {
        FieldValue::Time(t) => {
            if is_zero_time(t) {
                return Ok(None);
            }
            Ok(Some(format_time(t, modifiers)))
        }
        FieldValue::OptionalTime(None) => {
            if modifiers.omit_empty {
                return Ok(None);
            }
            Ok(Some(Value::Null))
        }
        FieldValue::OptionalTime(Some(t)) => {
            if is_zero_time(t) && modifiers.omit_empty {
                return Ok(None);
            }
            Ok(Some(format_time(t, modifiers)))
        }
        other if other.is_relation() => Err(MarshalError::malformed(
            tag,
            "attribute holds a relationship value",
        )),
        other => {
            if modifiers.omit_empty && other.is_empty() {
                return Ok(None);
            }
            to_json(tag, other).map(Some)
        }
    }
}

fn format_time(t: &DateTime<Utc>, modifiers: Modifiers) -> Value {
    if modifiers.iso8601 {
        Value::String(t.format(ISO8601_FORMAT).to_string())
    } else if modifiers.rfc3339 {
        Value::String(t.to_rfc3339_opts(SecondsFormat::Secs, true))
    } else {
        Value::from(t.timestamp())
    }
}

/// Plain conversion into the JSON value shape, with no omission rules.
pub(crate) fn to_json(tag: &str, value: &FieldValue<'_>) -> Result<Value> {
    let json = match value {
        FieldValue::Null => Value::Null,
        FieldValue::Bool(b) => Value::Bool(*b),
        FieldValue::I8(n) => Value::from(*n),
        FieldValue::I16(n) => Value::from(*n),
        FieldValue::I32(n) => Value::from(*n),
        FieldValue::I64(n) => Value::from(*n),
        FieldValue::Isize(n) => Value::from(*n),
        FieldValue::U8(n) => Value::from(*n),
        FieldValue::U16(n) => Value::from(*n),
        FieldValue::U32(n) => Value::from(*n),
        FieldValue::U64(n) => Value::from(*n),
        FieldValue::Usize(n) => Value::from(*n),
        FieldValue::F32(n) => float(f64::from(*n)),
        FieldValue::F64(n) => float(*n),
        FieldValue::Str(s) => Value::String(s.to_string()),
        FieldValue::Time(t) | FieldValue::OptionalTime(Some(t)) => {
            Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
        FieldValue::OptionalTime(None) => Value::Null,
        FieldValue::Some(inner) => to_json(tag, inner)?,
        FieldValue::List(items) => Value::Array(
            items
                .iter()
                .map(|item| to_json(tag, item))
                .collect::<Result<Vec<_>>>()?,
        ),
        FieldValue::Map(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (key, item) in entries {
                map.insert(key.to_string(), to_json(tag, item)?);
            }
            Value::Object(map)
        }
        FieldValue::Json(v) => v.as_ref().clone(),
        FieldValue::ToOne(_) | FieldValue::ToMany(_) => {
            return Err(MarshalError::malformed(
                tag,
                "attribute holds a relationship value",
            ))
        }
    };
    Ok(json)
}

/// Non-finite floats have no JSON form and become null.
fn float(n: f64) -> Value {
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}
