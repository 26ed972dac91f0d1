// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Field description contract.
//!
//! A [`Resource`] describes itself as an ordered list of [`Field`]s: the raw
//! tag string plus a borrowed [`FieldValue`]. Values are produced by explicit
//! per-type conversions ([`IntoFieldValue`] for ids and attributes,
//! [`IntoRelation`] for relationships); `#[derive(Resource)]` picks the right
//! one from the tag's role.

use crate::resource::Resource;
use chrono::{DateTime, TimeZone, Utc};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// One tagged field of a resource.
#[derive(Debug)]
pub struct Field<'a> {
    /// Raw tag, e.g. `"attr,name,omitempty"`.
    pub tag: &'a str,
    /// The field's current value.
    pub value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    /// Pair a tag with a value.
    pub fn new(tag: &'a str, value: FieldValue<'a>) -> Self {
        Self { tag, value }
    }
}

/// Closed set of value kinds a tagged field can hold.
pub enum FieldValue<'a> {
    /// Absent optional value (`None`).
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed 8-bit integer.
    I8(i8),
    /// Signed 16-bit integer.
    I16(i16),
    /// Signed 32-bit integer.
    I32(i32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Pointer-width signed integer.
    Isize(isize),
    /// Unsigned 8-bit integer.
    U8(u8),
    /// Unsigned 16-bit integer.
    U16(u16),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// Pointer-width unsigned integer.
    Usize(usize),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// UTF-8 string.
    Str(Cow<'a, str>),
    /// Timestamp (already normalized to UTC).
    Time(DateTime<Utc>),
    /// Nullable timestamp.
    OptionalTime(Option<DateTime<Utc>>),
    /// Present optional value; one level of indirection.
    Some(Box<FieldValue<'a>>),
    /// Ordered sequence.
    List(Vec<FieldValue<'a>>),
    /// String-keyed map.
    Map(BTreeMap<Cow<'a, str>, FieldValue<'a>>),
    /// Pre-built JSON value.
    Json(Cow<'a, serde_json::Value>),
    /// To-one relationship target (`None` is a nil reference).
    ToOne(Option<&'a dyn Resource>),
    /// To-many relationship targets (`None` entries are nil references).
    ToMany(Vec<Option<&'a dyn Resource>>),
}

impl FieldValue<'_> {
    /// Human-readable kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::Isize(_) => "isize",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::Usize(_) => "usize",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Str(_) => "string",
            Self::Time(_) => "timestamp",
            Self::OptionalTime(_) => "optional timestamp",
            Self::Some(_) => "optional",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Json(_) => "json",
            Self::ToOne(_) => "to-one relation",
            Self::ToMany(_) => "to-many relation",
        }
    }

    /// Whether this is a relationship value.
    pub fn is_relation(&self) -> bool {
        matches!(self, Self::ToOne(_) | Self::ToMany(_))
    }

    /// Whether the value equals its type's default (what `omitempty` drops).
    ///
    /// A present optional is never empty, even when it wraps a default.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::I8(n) => *n == 0,
            Self::I16(n) => *n == 0,
            Self::I32(n) => *n == 0,
            Self::I64(n) => *n == 0,
            Self::Isize(n) => *n == 0,
            Self::U8(n) => *n == 0,
            Self::U16(n) => *n == 0,
            Self::U32(n) => *n == 0,
            Self::U64(n) => *n == 0,
            Self::Usize(n) => *n == 0,
            Self::F32(n) => *n == 0.0,
            Self::F64(n) => *n == 0.0,
            Self::Str(s) => s.is_empty(),
            Self::Time(t) => is_zero_time(t),
            Self::OptionalTime(t) => t.is_none(),
            Self::Some(_) => false,
            Self::List(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
            Self::Json(v) => v.is_null(),
            Self::ToOne(target) => target.is_none(),
            Self::ToMany(targets) => targets.is_empty(),
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::I8(v) => f.debug_tuple("I8").field(v).finish(),
            Self::I16(v) => f.debug_tuple("I16").field(v).finish(),
            Self::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Self::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Self::Isize(v) => f.debug_tuple("Isize").field(v).finish(),
            Self::U8(v) => f.debug_tuple("U8").field(v).finish(),
            Self::U16(v) => f.debug_tuple("U16").field(v).finish(),
            Self::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Self::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Self::Usize(v) => f.debug_tuple("Usize").field(v).finish(),
            Self::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Self::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Self::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Self::Time(v) => f.debug_tuple("Time").field(v).finish(),
            Self::OptionalTime(v) => f.debug_tuple("OptionalTime").field(v).finish(),
            Self::Some(v) => f.debug_tuple("Some").field(v).finish(),
            Self::List(v) => f.debug_tuple("List").field(v).finish(),
            Self::Map(v) => f.debug_tuple("Map").field(v).finish(),
            Self::Json(v) => f.debug_tuple("Json").field(v).finish(),
            Self::ToOne(v) => f
                .debug_tuple("ToOne")
                .field(&v.map(|_| "<resource>"))
                .finish(),
            Self::ToMany(v) => f.debug_tuple("ToMany").field(&v.len()).finish(),
        }
    }
}

/// Unix seconds of the zero timestamp, `0001-01-01T00:00:00Z`.
pub const ZERO_TIME_SECONDS: i64 = -62_135_596_800;

/// The zero timestamp: the unset-time sentinel that attribute encoding
/// leaves out. The Unix epoch is an ordinary timestamp and is rendered.
pub fn zero_time() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_TIME_SECONDS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Whether `t` is the zero timestamp.
pub fn is_zero_time(t: &DateTime<Utc>) -> bool {
    t.timestamp() == ZERO_TIME_SECONDS && t.timestamp_subsec_nanos() == 0
}

/// Conversion used for `primary`, `client-id` and `attr` fields.
pub trait IntoFieldValue {
    /// Borrow the value as a [`FieldValue`].
    fn field_value(&self) -> FieldValue<'_>;

    /// What an absent `Option<Self>` becomes.
    fn absent() -> FieldValue<'static>
    where
        Self: Sized,
    {
        FieldValue::Null
    }
}

macro_rules! scalar_field_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl IntoFieldValue for $ty {
                fn field_value(&self) -> FieldValue<'_> {
                    FieldValue::$variant(*self)
                }
            }
        )*
    };
}

scalar_field_value! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

impl IntoFieldValue for str {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(Cow::Borrowed(self))
    }
}

impl IntoFieldValue for String {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(Cow::Borrowed(self.as_str()))
    }
}

impl IntoFieldValue for Cow<'_, str> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(Cow::Borrowed(self.as_ref()))
    }
}

impl<Tz: TimeZone> IntoFieldValue for DateTime<Tz> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Time(self.with_timezone(&Utc))
    }

    fn absent() -> FieldValue<'static> {
        FieldValue::OptionalTime(None)
    }
}

impl IntoFieldValue for serde_json::Value {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Json(Cow::Borrowed(self))
    }
}

impl<T: IntoFieldValue> IntoFieldValue for Option<T> {
    fn field_value(&self) -> FieldValue<'_> {
        match self {
            None => T::absent(),
            Some(inner) => match inner.field_value() {
                FieldValue::Time(t) => FieldValue::OptionalTime(Some(t)),
                other => FieldValue::Some(Box::new(other)),
            },
        }
    }
}

impl<T: IntoFieldValue + ?Sized> IntoFieldValue for &T {
    fn field_value(&self) -> FieldValue<'_> {
        (**self).field_value()
    }
}

impl<T: IntoFieldValue + ?Sized> IntoFieldValue for Box<T> {
    fn field_value(&self) -> FieldValue<'_> {
        (**self).field_value()
    }
}

impl<T: IntoFieldValue> IntoFieldValue for [T] {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::List(self.iter().map(IntoFieldValue::field_value).collect())
    }
}

impl<T: IntoFieldValue> IntoFieldValue for Vec<T> {
    fn field_value(&self) -> FieldValue<'_> {
        self.as_slice().field_value()
    }
}

impl<T: IntoFieldValue> IntoFieldValue for BTreeMap<String, T> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Map(
            self.iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v.field_value()))
                .collect(),
        )
    }
}

impl<T: IntoFieldValue, S> IntoFieldValue for HashMap<String, T, S> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Map(
            self.iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), v.field_value()))
                .collect(),
        )
    }
}

/// Conversion used for `relation` fields.
///
/// `Option<T>` is a to-one relationship; `Vec<T>` and `[T]` are to-many, as
/// are `Vec<Option<T>>` and `[Option<T>]`, whose nil entries are skipped.
pub trait IntoRelation {
    /// Borrow the relationship target(s).
    fn relation(&self) -> FieldValue<'_>;
}

impl<T: Resource> IntoRelation for Option<T> {
    fn relation(&self) -> FieldValue<'_> {
        FieldValue::ToOne(self.as_ref().map(|r| r as &dyn Resource))
    }
}

impl<T: Resource> IntoRelation for [T] {
    fn relation(&self) -> FieldValue<'_> {
        FieldValue::ToMany(self.iter().map(|r| Some(r as &dyn Resource)).collect())
    }
}

impl<T: Resource> IntoRelation for Vec<T> {
    fn relation(&self) -> FieldValue<'_> {
        self.as_slice().relation()
    }
}

/// Nil entries are kept here and skipped when the relationship is rendered.
impl<T: Resource> IntoRelation for [Option<T>] {
    fn relation(&self) -> FieldValue<'_> {
        optional_targets(self)
    }
}

impl<T: Resource> IntoRelation for Vec<Option<T>> {
    fn relation(&self) -> FieldValue<'_> {
        optional_targets(self)
    }
}

fn optional_targets<T: Resource>(items: &[Option<T>]) -> FieldValue<'_> {
    FieldValue::ToMany(
        items
            .iter()
            .map(|r| r.as_ref().map(|r| r as &dyn Resource))
            .collect(),
    )
}

impl<T: IntoRelation + ?Sized> IntoRelation for &T {
    fn relation(&self) -> FieldValue<'_> {
        (**self).relation()
    }
}

impl<T: IntoRelation + ?Sized> IntoRelation for Rc<T> {
    fn relation(&self) -> FieldValue<'_> {
        (**self).relation()
    }
}

impl<T: IntoRelation + ?Sized> IntoRelation for Arc<T> {
    fn relation(&self) -> FieldValue<'_> {
        (**self).relation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_timestamp_keeps_its_kind_when_absent() {
        let none: Option<DateTime<Utc>> = None;
        assert!(matches!(none.field_value(), FieldValue::OptionalTime(None)));
        let some = Some(DateTime::<Utc>::from_timestamp(10, 0).unwrap());
        assert!(matches!(
            some.field_value(),
            FieldValue::OptionalTime(Some(t)) if t.timestamp() == 10
        ));
    }

    #[test]
    fn zero_time_is_year_one_not_the_epoch() {
        assert_eq!(zero_time().to_rfc3339(), "0001-01-01T00:00:00+00:00");
        assert!(is_zero_time(&zero_time()));
        assert!(!is_zero_time(&DateTime::<Utc>::UNIX_EPOCH));
        assert!(zero_time().field_value().is_empty());
        assert!(!DateTime::<Utc>::UNIX_EPOCH.field_value().is_empty());
    }

    struct Leaf(u8);

    impl Resource for Leaf {
        fn fields(&self) -> Vec<Field<'_>> {
            vec![Field::new("primary,leaves", self.0.field_value())]
        }
    }

    #[test]
    fn optional_to_many_keeps_nil_slots() {
        let leaves = vec![None, Some(Leaf(2)), None];
        match leaves.relation() {
            FieldValue::ToMany(targets) => {
                assert_eq!(targets.len(), 3);
                assert!(targets[0].is_none() && targets[2].is_none());
                assert!(targets[1].is_some());
            }
            other => panic!("expected to-many, got {other:?}"),
        }
    }

    #[test]
    fn present_optional_is_never_empty() {
        let zero: Option<i32> = Some(0);
        assert!(!zero.field_value().is_empty());
        let none: Option<i32> = None;
        assert!(none.field_value().is_empty());
    }

    #[test]
    fn default_values_are_empty() {
        assert!(0u8.field_value().is_empty());
        assert!(String::new().field_value().is_empty());
        assert!(false.field_value().is_empty());
        assert!(Vec::<i32>::new().field_value().is_empty());
        assert!(!"x".field_value().is_empty());
        assert!(!(-1i64).field_value().is_empty());
    }
}
