use crate::value::Value;
use std::{cmp::Ordering, collections::BTreeMap};

impl Value {
    /// Total collation order.
    ///
    /// Ordering rules:
    /// 1. Kind tag (missing < null < boolean < number < string < array < object)
    /// 2. Kind-specific comparison for same-kind values
    #[must_use]
    pub fn collate(&self, other: &Self) -> Ordering {
        let tag = self.tag().cmp(&other.tag());
        if tag != Ordering::Equal {
            return tag;
        }

        collate_same_kind(self, other)
    }

    /// Collation equality; `Missing` equals any other `Missing`.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self.collate(other) == Ordering::Equal
    }
}

pub(super) fn value_eq(left: &Value, right: &Value) -> bool {
    left.equals(right)
}

pub(super) fn collate_slices(left: &[Value], right: &[Value]) -> Ordering {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = left.collate(right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}

fn collate_same_kind(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => collate_numbers(*a, *b),
        // UTF-8 byte order is code point order.
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => collate_slices(a, b),
        (Value::Object(a), Value::Object(b)) => collate_objects(a, b),
        _ => Ordering::Equal,
    }
}

fn collate_numbers(left: f64, right: f64) -> Ordering {
    left.partial_cmp(&right).unwrap_or_else(|| left.total_cmp(&right))
}

// Objects order like their physical keys: field names first, then values.
fn collate_objects(left: &BTreeMap<String, Value>, right: &BTreeMap<String, Value>) -> Ordering {
    let names = left.keys().cmp(right.keys());
    if names != Ordering::Equal {
        return names;
    }

    for (left, right) in left.values().zip(right.values()) {
        let cmp = left.collate(right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}
