mod compare;
mod missing;
mod tag;
mod wire;


use derive_more::{Deref, DerefMut, From, IntoIterator};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

// re-exports
pub use missing::MissingValue;
pub use tag::ValueTag;

///
/// Value
/// Document value as seen by index scans.
///
/// Missing     → the field or index was absent; never persisted.
/// Null        → the field is present and explicitly null.
///

#[derive(Clone, Debug)]
pub enum Value {
    Missing(MissingValue),
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Self>),
    Object(BTreeMap<String, Self>),
}

impl Value {
    /// Missing value without a path annotation.
    #[must_use]
    pub const fn missing() -> Self {
        Self::Missing(MissingValue::new())
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    #[must_use]
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Stable kind tag used for cross-kind ordering.
    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        tag::value_tag(self)
    }

    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }

    /// Project this value onto its plain JSON representation.
    ///
    /// `Missing` projects to `null`. Non-finite numbers have no JSON
    /// representation and also project to `null`; the key codec rejects them
    /// before this projection is reached.
    #[must_use]
    pub fn actual(&self) -> JsonValue {
        match self {
            Self::Missing(_) | Self::Null => JsonValue::Null,
            Self::Bool(v) => JsonValue::Bool(*v),
            Self::Number(v) => {
                serde_json::Number::from_f64(*v).map_or(JsonValue::Null, JsonValue::Number)
            }
            Self::String(v) => JsonValue::String(v.clone()),
            Self::Array(items) => JsonValue::Array(items.iter().map(Self::actual).collect()),
            Self::Object(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.actual()))
                    .collect(),
            ),
        }
    }

    /// Build a value from its plain JSON representation.
    #[must_use]
    pub fn from_json(json: &JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(v) => Self::Bool(*v),
            JsonValue::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            JsonValue::String(v) => Self::String(v.clone()),
            JsonValue::Array(items) => Self::Array(items.iter().map(Self::from_json).collect()),
            JsonValue::Object(fields) => Self::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), Self::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Look up one object field; absent fields yield an annotated `Missing`.
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        match self {
            Self::Object(fields) => fields
                .get(name)
                .cloned()
                .unwrap_or_else(|| Self::Missing(MissingValue::field(name))),
            _ => Self::Missing(MissingValue::field(name)),
        }
    }

    /// Look up one array element; out-of-range positions yield an annotated `Missing`.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        match self {
            Self::Array(items) => items
                .get(index)
                .cloned()
                .unwrap_or_else(|| Self::Missing(MissingValue::index(index))),
            _ => Self::Missing(MissingValue::index(index)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        compare::value_eq(self, other)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(value: Vec<Self>) -> Self {
        Self::Array(value)
    }
}

///
/// CompositeValue
///
/// Ordered tuple of values forming one composite index key.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, From, IntoIterator, PartialEq)]
pub struct CompositeValue(#[into_iterator(owned, ref)] Vec<Value>);

impl CompositeValue {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }

    /// Collation order of two composite keys: componentwise, then by length.
    #[must_use]
    pub fn collate(&self, other: &Self) -> std::cmp::Ordering {
        compare::collate_slices(&self.0, &other.0)
    }
}

impl From<Value> for CompositeValue {
    fn from(value: Value) -> Self {
        Self(vec![value])
    }
}

impl<const N: usize> From<[Value; N]> for CompositeValue {
    fn from(values: [Value; N]) -> Self {
        Self(values.into())
    }
}

impl FromIterator<Value> for CompositeValue {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
