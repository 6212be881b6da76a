//! Module: db::key::compound
//! Responsibility: object payloads as a name list plus a parallel value list.
//! Boundary: names are sorted so field insertion order never reaches the key.

use crate::{
    db::key::{KeyCodecError, decode_value, encode_value},
    value::Value,
};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

// BTreeMap iteration is already name-sorted.
pub(super) fn encode_object(fields: &BTreeMap<String, Value>) -> Result<JsonValue, KeyCodecError> {
    let names: Vec<JsonValue> = fields.keys().cloned().map(JsonValue::String).collect();
    let values = fields
        .values()
        .map(encode_value)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(JsonValue::Array(vec![
        JsonValue::Array(names),
        JsonValue::Array(values),
    ]))
}

pub(super) fn decode_object(payload: &JsonValue) -> Result<BTreeMap<String, Value>, KeyCodecError> {
    let JsonValue::Array(parts) = payload else {
        return Err(KeyCodecError::PayloadKind {
            kind: "object",
            expected: "a compound array",
        });
    };
    let [names, values] = parts.as_slice() else {
        return Err(KeyCodecError::ObjectShape { found: parts.len() });
    };
    let (JsonValue::Array(names), JsonValue::Array(values)) = (names, values) else {
        return Err(KeyCodecError::PayloadKind {
            kind: "object",
            expected: "a name list and a value list",
        });
    };
    if names.len() != values.len() {
        return Err(KeyCodecError::ObjectParity {
            names: names.len(),
            values: values.len(),
        });
    }

    let mut fields = BTreeMap::new();
    let mut previous: Option<&str> = None;
    for (index, (name, value)) in names.iter().zip(values).enumerate() {
        let JsonValue::String(name) = name else {
            return Err(KeyCodecError::ObjectNameNotString { index });
        };
        // Canonical keys carry strictly ascending names; anything else
        // would not survive a re-encode unchanged.
        if previous.is_some_and(|prev| prev >= name.as_str()) {
            return Err(KeyCodecError::ObjectNamesUnsorted { index });
        }
        previous = Some(name);

        // Recurse: nested values are themselves tagged entries.
        fields.insert(name.clone(), decode_value(value)?);
    }

    Ok(fields)
}
