//! Module: db::distinct
//! Responsibility: deduplicate a value stream under collation equality.
//! Does not own: projection evaluation; callers pass the projected value.
//! Boundary: two values are duplicates exactly when `Value::collate` reports
//! them equal, at every nesting level.

use crate::value::Value;
use std::{cmp::Ordering, collections::BTreeMap};
use tokio::sync::mpsc;

/// Initial capacity of the distinct value set.
pub const DISTINCT_CAPACITY: usize = 1024;

///
/// CollationKey
///
/// Set key wrapper ordered by `Value::collate`, so `-0.0` meets `0.0` and a
/// nested `Missing` stays apart from `Null`.
///

#[derive(Clone, Debug)]
struct CollationKey(Value);

impl Ord for CollationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.collate(&other.0)
    }
}

impl PartialOrd for CollationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CollationKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CollationKey {}

///
/// ValueSet
///
/// Insertion-ordered set of values keyed by collation. The first item seen
/// for a key is the one kept.
///

#[derive(Clone, Debug, Default)]
pub struct ValueSet {
    slots: BTreeMap<CollationKey, usize>,
    items: Vec<Value>,
}

impl ValueSet {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: BTreeMap::new(),
            items: Vec::with_capacity(capacity),
        }
    }

    /// Insert `item` under the key of `projection`; returns whether the key
    /// was new.
    pub fn put(&mut self, projection: &Value, item: Value) -> bool {
        let key = CollationKey(projection.clone());
        if self.slots.contains_key(&key) {
            return false;
        }

        self.slots.insert(key, self.items.len());
        self.items.push(item);

        true
    }

    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.slots.contains_key(&CollationKey(value.clone()))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.items
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.items
    }
}

///
/// Distinct
///
/// Deduplicating operator. With `collect` set, the distinct values stay in
/// `set()` for the caller instead of being emitted by `after_items`.
///

#[derive(Debug)]
pub struct Distinct {
    set: ValueSet,
    collect: bool,
}

impl Distinct {
    #[must_use]
    pub fn new(collect: bool) -> Self {
        Self {
            set: ValueSet::with_capacity(DISTINCT_CAPACITY),
            collect,
        }
    }

    /// Add one item keyed by itself; returns whether it was new.
    pub fn process_item(&mut self, item: Value) -> bool {
        let projection = item.clone();

        self.set.put(&projection, item)
    }

    /// Add one item keyed by its projection; returns whether it was new.
    pub fn process_projected(&mut self, projection: &Value, item: Value) -> bool {
        self.set.put(projection, item)
    }

    /// Values to emit once input is exhausted: the distinct items in
    /// first-seen order, or nothing when collecting.
    pub fn after_items(&mut self) -> Vec<Value> {
        if self.collect {
            return Vec::new();
        }

        std::mem::take(&mut self.set).into_values()
    }

    #[must_use]
    pub const fn set(&self) -> &ValueSet {
        &self.set
    }

    /// Drain `input`, then emit the distinct values on `output`.
    ///
    /// Returns how many values were emitted; a closed `output` ends the run
    /// early.
    pub async fn run(
        &mut self,
        mut input: mpsc::Receiver<Value>,
        output: &mpsc::Sender<Value>,
    ) -> usize {
        while let Some(item) = input.recv().await {
            self.process_item(item);
        }

        let mut emitted = 0;
        for value in self.after_items() {
            if output.send(value).await.is_err() {
                tracing::debug!(emitted, "distinct consumer gone");
                break;
            }
            emitted += 1;
        }

        emitted
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse_in_first_seen_order() {
        let mut distinct = Distinct::new(false);
        for value in [
            Value::from(2),
            Value::text("a"),
            Value::from(2.0),
            Value::Null,
            Value::text("a"),
        ] {
            distinct.process_item(value);
        }

        assert_eq!(
            distinct.after_items(),
            vec![Value::from(2), Value::text("a"), Value::Null]
        );
    }

    #[test]
    fn object_field_order_does_not_matter() {
        let mut distinct = Distinct::new(false);
        let first = Value::object([("a", Value::from(1)), ("b", Value::from(2))]);
        let second = Value::object([("b", Value::from(2)), ("a", Value::from(1))]);

        assert!(distinct.process_item(first));
        assert!(!distinct.process_item(second));
        assert_eq!(distinct.set().len(), 1);
    }

    #[test]
    fn missing_and_null_stay_distinct() {
        let mut distinct = Distinct::new(false);

        assert!(distinct.process_item(Value::missing()));
        assert!(distinct.process_item(Value::Null));
        assert!(!distinct.process_item(Value::missing()));
    }

    #[test]
    fn collecting_keeps_values_in_the_set() {
        let mut distinct = Distinct::new(true);
        assert!(distinct.process_item(Value::from(1)));
        assert!(!distinct.process_item(Value::from(1)));

        assert!(distinct.after_items().is_empty());
        assert_eq!(distinct.set().values(), &[Value::from(1)]);
    }

    #[test]
    fn projection_keys_items() {
        let mut distinct = Distinct::new(false);
        let alice = Value::object([("name", Value::text("alice")), ("age", Value::from(30))]);
        let bob = Value::object([("name", Value::text("bob")), ("age", Value::from(30))]);

        assert!(distinct.process_projected(&alice.field("age"), alice.clone()));
        assert!(!distinct.process_projected(&bob.field("age"), bob));
        assert_eq!(distinct.after_items(), vec![alice]);
    }

    #[test]
    fn signed_zeros_are_one_value() {
        let mut distinct = Distinct::new(false);

        assert!(distinct.process_item(Value::Number(0.0)));
        assert!(!distinct.process_item(Value::Number(-0.0)));
        assert!(distinct.process_item(Value::Array(vec![Value::Number(-0.0)])));
        assert!(!distinct.process_item(Value::Array(vec![Value::Number(0.0)])));
        assert_eq!(distinct.after_items().len(), 2);
    }

    #[test]
    fn nested_missing_and_null_stay_distinct() {
        let mut distinct = Distinct::new(false);

        assert!(distinct.process_item(Value::Array(vec![Value::missing()])));
        assert!(distinct.process_item(Value::Array(vec![Value::Null])));
        assert!(distinct.process_item(Value::object([("a", Value::missing())])));
        assert!(distinct.process_item(Value::object([("a", Value::Null)])));
        assert!(!distinct.process_item(Value::Array(vec![Value::missing()])));
        assert_eq!(distinct.after_items().len(), 4);
    }

    #[test]
    fn non_finite_numbers_are_deduplicated() {
        let mut distinct = Distinct::new(false);

        assert!(distinct.process_item(Value::Number(f64::INFINITY)));
        assert!(!distinct.process_item(Value::Number(f64::INFINITY)));
        assert!(distinct.set().contains(&Value::Number(f64::INFINITY)));
    }

    #[tokio::test]
    async fn run_streams_distinct_values() {
        let (input_tx, input_rx) = mpsc::channel(8);
        let (output_tx, mut output_rx) = mpsc::channel(8);

        for value in [1, 2, 1, 3, 2] {
            input_tx.send(Value::from(value)).await.expect("send input");
        }
        drop(input_tx);

        let mut distinct = Distinct::new(false);
        let emitted = distinct.run(input_rx, &output_tx).await;
        drop(output_tx);

        let mut received = Vec::new();
        while let Some(value) = output_rx.recv().await {
            received.push(value);
        }

        assert_eq!(emitted, 3);
        assert_eq!(received, vec![Value::from(1), Value::from(2), Value::from(3)]);
    }
}
