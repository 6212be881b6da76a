use crate::value::Value;

///
/// ValueTag
///
/// Stable value-kind tag used for cross-kind ordering.
///
/// IMPORTANT:
/// Tag order is part of deterministic scan behavior and must match the
/// physical key tag bands in `db::key`.
///
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ValueTag {
    Missing = 0,
    Null = 1,
    Bool = 2,
    Number = 3,
    String = 4,
    Array = 5,
    Object = 6,
}

#[must_use]
pub(super) const fn value_tag(value: &Value) -> ValueTag {
    match value {
        Value::Missing(_) => ValueTag::Missing,
        Value::Null => ValueTag::Null,
        Value::Bool(_) => ValueTag::Bool,
        Value::Number(_) => ValueTag::Number,
        Value::String(_) => ValueTag::String,
        Value::Array(_) => ValueTag::Array,
        Value::Object(_) => ValueTag::Object,
    }
}
