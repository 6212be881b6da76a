use crate::{
    db::key::{
        KeyCodecError, decode_composite_key, decode_value, encode_composite_key, encode_value,
        upper_sentinel,
    },
    test_support::collate_json,
    value::{CompositeValue, Value},
};
use proptest::prelude::*;
use serde_json::json;
use std::{cmp::Ordering, collections::BTreeMap};

fn roundtrip(value: &Value) -> Value {
    let encoded = encode_value(value).expect("value should encode");

    decode_value(&encoded).expect("encoded value should decode")
}

fn assert_encoded_order(left: &Value, right: &Value, expected: Ordering) {
    let left_key = encode_value(left).expect("left should encode");
    let right_key = encode_value(right).expect("right should encode");

    assert_eq!(collate_json(&left_key, &right_key), expected);
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1.0e12f64..1.0e12).prop_map(Value::Number),
        any::<i32>().prop_map(Value::from),
        "\\PC{0,12}".prop_map(Value::String),
    ]
}

// Arrays of scalars and objects of scalars; deeper nesting is exercised by
// the bijection strategy below.
fn shallow_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => scalar(),
        1 => prop::collection::vec(scalar(), 0..4).prop_map(Value::Array),
        1 => prop::collection::btree_map("[a-d]{1,3}", scalar(), 0..4).prop_map(Value::Object),
    ]
}

fn nested_value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("\\PC{1,6}", inner, 0..4).prop_map(Value::Object),
        ]
    })
}

proptest! {
    #[test]
    fn encode_decode_is_a_bijection(value in nested_value()) {
        prop_assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn composite_keys_roundtrip(values in prop::collection::vec(nested_value(), 0..4)) {
        let encoded = encode_composite_key(&values).expect("composite should encode");
        let decoded = decode_composite_key(&encoded).expect("composite should decode");

        prop_assert_eq!(decoded, CompositeValue::new(values));
    }

    #[test]
    fn physical_collation_matches_value_collation(
        left in shallow_value(),
        right in shallow_value(),
    ) {
        let left_key = encode_value(&left).expect("left should encode");
        let right_key = encode_value(&right).expect("right should encode");

        prop_assert_eq!(collate_json(&left_key, &right_key), left.collate(&right));
    }

    #[test]
    fn string_order_follows_code_points(left in "\\PC{0,10}", right in "\\PC{0,10}") {
        let left_key = encode_value(&Value::text(left.clone())).expect("left should encode");
        let right_key = encode_value(&Value::text(right.clone())).expect("right should encode");

        prop_assert_eq!(collate_json(&left_key, &right_key), left.cmp(&right));
    }
}

#[test]
fn entries_carry_the_expected_tags() {
    assert_eq!(encode_value(&Value::Null).expect("encode"), json!([64]));
    assert_eq!(encode_value(&Value::Bool(true)).expect("encode"), json!([96, true]));
    assert_eq!(encode_value(&Value::from(1.5)).expect("encode"), json!([128, 1.5]));
    assert_eq!(
        encode_value(&Value::text("hé")).expect("encode"),
        json!([160, [104, 233]])
    );
    assert_eq!(
        encode_value(&Value::Array(vec![Value::from(1), Value::text("x")])).expect("encode"),
        json!([192, [1.0, "x"]])
    );
    assert_eq!(
        encode_value(&Value::object([("b", Value::Null), ("a", Value::Bool(false))]))
            .expect("encode"),
        json!([224, [["a", "b"], [[96, false], [64]]]])
    );
}

#[test]
fn missing_encodes_as_null() {
    assert_eq!(encode_value(&Value::missing()).expect("encode"), json!([64]));
    assert_eq!(roundtrip(&Value::missing()), Value::Null);
}

#[test]
fn kinds_order_null_bool_number_string_array_object() {
    let ladder = [
        Value::Null,
        Value::Bool(false),
        Value::Bool(true),
        Value::from(-5),
        Value::from(10),
        Value::text(""),
        Value::text("a"),
        Value::Array(Vec::new()),
        Value::Array(vec![Value::Null]),
        Value::object(Vec::<(String, Value)>::new()),
    ];

    for pair in ladder.windows(2) {
        assert_encoded_order(&pair[0], &pair[1], Ordering::Less);
    }
    assert_encoded_order(&Value::text("z"), &Value::from(1.0e300), Ordering::Greater);
}

#[test]
fn non_ascii_strings_order_by_code_point() {
    assert_encoded_order(&Value::text("z"), &Value::text("é"), Ordering::Less);
    assert_encoded_order(&Value::text("é"), &Value::text("😀"), Ordering::Less);
    assert_eq!(roundtrip(&Value::text("naïve 😀")), Value::text("naïve 😀"));
}

#[test]
fn object_field_insertion_order_is_irrelevant() {
    let mut forward = BTreeMap::new();
    forward.insert("x".to_string(), Value::from(1));
    forward.insert("y".to_string(), Value::from(2));
    let backward = Value::object([("y", Value::from(2)), ("x", Value::from(1))]);

    assert_eq!(
        encode_value(&Value::Object(forward)).expect("encode"),
        encode_value(&backward).expect("encode")
    );
}

#[test]
fn upper_sentinel_sorts_after_every_kind() {
    let sentinel = upper_sentinel();
    let largest = encode_value(&Value::object([("~", Value::text("~"))])).expect("encode");

    assert_eq!(collate_json(&largest, &sentinel), Ordering::Less);
    assert!(matches!(
        decode_value(&sentinel),
        Err(KeyCodecError::UnknownTag { .. })
    ));
}

#[test]
fn non_finite_numbers_are_rejected() {
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(matches!(
            encode_value(&Value::Number(value)),
            Err(KeyCodecError::NonFiniteNumber { .. })
        ));
    }
    assert!(matches!(
        encode_value(&Value::Array(vec![Value::Number(f64::NAN)])),
        Err(KeyCodecError::NonFiniteNumber { .. })
    ));
}

#[test]
fn float_tags_and_code_points_decode() {
    assert_eq!(
        decode_value(&json!([160.0, [104.0, 105.0]])).expect("decode"),
        Value::text("hi")
    );
}

#[test]
fn malformed_entries_are_rejected() {
    let cases = [
        (json!("plain"), "not an array"),
        (json!([]), "missing tag"),
        (json!(["160", [104]]), "tag not a number"),
        (json!([7, 1]), "unknown tag"),
        (json!([64, null]), "null arity"),
        (json!([96]), "boolean arity"),
        (json!([96, 1]), "boolean payload"),
        (json!([128, "1"]), "number payload"),
        (json!([160, "hi"]), "string payload"),
        (json!([160, [-1]]), "negative code point"),
        (json!([160, [55296]]), "surrogate code point"),
        (json!([192, {}]), "array payload"),
        (json!([224, [["a"]]]), "object shape"),
        (json!([224, [["a", "b"], [[64]]]]), "object parity"),
        (json!([224, [[1], [[64]]]]), "object name kind"),
        (json!([224, [["b", "a"], [[64], [64]]]]), "object name order"),
        (json!([224, [["a"], [[999]]]]), "object nested value"),
    ];

    for (entry, label) in cases {
        assert!(decode_value(&entry).is_err(), "{label} should be rejected");
    }
}

#[test]
fn malformed_errors_are_specific() {
    assert_eq!(
        decode_value(&json!([64, null])),
        Err(KeyCodecError::Arity {
            kind: "null",
            expected: 1,
            found: 2,
        })
    );
    assert_eq!(
        decode_value(&json!([224, [["a", "b"], [[64]]]])),
        Err(KeyCodecError::ObjectParity {
            names: 2,
            values: 1,
        })
    );
    assert!(matches!(
        decode_composite_key(&json!({"k": 1})),
        Err(KeyCodecError::NotAnArray { .. })
    ));
}
