//! Module: db::key
//! Responsibility: order-preserving conversion between values and view keys.
//! Does not own: range lowering or view request assembly.
//! Boundary: pure functions; no I/O and no state.
//!
//! A physical key entry is a JSON array whose first element is a type tag.
//! Tags are spaced bands so that the view engine's elementwise collation
//! orders entries by value kind before payload:
//!
//! null → `[64]`, boolean → `[96, b]`, number → `[128, n]`,
//! string → `[160, [code points]]`, array → `[192, [plain elements]]`,
//! object → `[224, [[sorted names], [encoded values]]]`.

mod compound;
mod error;
mod text;

#[cfg(test)]
mod tests;

use crate::value::{CompositeValue, Value};
use serde_json::{Number, Value as JsonValue, json};

pub use error::KeyCodecError;

pub const TYPE_NULL: u8 = 64;
pub const TYPE_BOOLEAN: u8 = 96;
pub const TYPE_NUMBER: u8 = 128;
pub const TYPE_STRING: u8 = 160;
pub const TYPE_ARRAY: u8 = 192;
pub const TYPE_OBJECT: u8 = 224;

/// Tag above every value band; an entry `[255]` sorts after any encoded entry.
pub const TYPE_UPPER_SENTINEL: u8 = 255;

const TYPE_TAGS: [u8; 6] = [
    TYPE_NULL,
    TYPE_BOOLEAN,
    TYPE_NUMBER,
    TYPE_STRING,
    TYPE_ARRAY,
    TYPE_OBJECT,
];

/// Encode one value as a tagged physical key entry.
///
/// `Missing` is never persisted and encodes exactly like `null`.
pub fn encode_value(value: &Value) -> Result<JsonValue, KeyCodecError> {
    let entry = match value {
        Value::Missing(_) | Value::Null => json!([TYPE_NULL]),
        Value::Bool(v) => json!([TYPE_BOOLEAN, v]),
        Value::Number(v) => {
            let number = finite_number(*v)?;
            json!([TYPE_NUMBER, number])
        }
        Value::String(v) => json!([TYPE_STRING, text::encode_code_points(v)]),
        Value::Array(items) => {
            let elements = plain_elements(items)?;
            json!([TYPE_ARRAY, elements])
        }
        Value::Object(fields) => {
            let compound = compound::encode_object(fields)?;
            json!([TYPE_OBJECT, compound])
        }
    };

    Ok(entry)
}

/// Encode a composite key as an array of physical key entries.
pub fn encode_composite_key(values: &[Value]) -> Result<JsonValue, KeyCodecError> {
    values
        .iter()
        .map(encode_value)
        .collect::<Result<Vec<_>, _>>()
        .map(JsonValue::Array)
}

/// Key entry that sorts after every encoded value.
///
/// Appended to a composite prefix it bounds a scan to keys extending that
/// prefix; it never decodes.
#[must_use]
pub fn upper_sentinel() -> JsonValue {
    json!([TYPE_UPPER_SENTINEL])
}

/// Decode one tagged physical key entry.
pub fn decode_value(entry: &JsonValue) -> Result<Value, KeyCodecError> {
    let JsonValue::Array(parts) = entry else {
        return Err(KeyCodecError::NotAnArray {
            context: "key entry",
        });
    };
    let Some(tag) = parts.first() else {
        return Err(KeyCodecError::MissingTag);
    };

    // Phase 1: resolve the tag band.
    let tag = decode_tag(tag)?;

    // Phase 2: validate arity, then decode the payload for that band.
    if tag == TYPE_NULL {
        expect_arity("null", parts.len(), 1)?;
        return Ok(Value::Null);
    }

    let payload = &parts[1..];
    match tag {
        TYPE_BOOLEAN => {
            expect_arity("boolean", parts.len(), 2)?;
            payload[0]
                .as_bool()
                .map(Value::Bool)
                .ok_or(KeyCodecError::PayloadKind {
                    kind: "boolean",
                    expected: "a boolean",
                })
        }
        TYPE_NUMBER => {
            expect_arity("number", parts.len(), 2)?;
            payload[0]
                .as_f64()
                .map(Value::Number)
                .ok_or(KeyCodecError::PayloadKind {
                    kind: "number",
                    expected: "a number",
                })
        }
        TYPE_STRING => {
            expect_arity("string", parts.len(), 2)?;
            text::decode_code_points(&payload[0]).map(Value::String)
        }
        TYPE_ARRAY => {
            expect_arity("array", parts.len(), 2)?;
            match &payload[0] {
                JsonValue::Array(items) => {
                    Ok(Value::Array(items.iter().map(Value::from_json).collect()))
                }
                _ => Err(KeyCodecError::PayloadKind {
                    kind: "array",
                    expected: "an array",
                }),
            }
        }
        TYPE_OBJECT => {
            expect_arity("object", parts.len(), 2)?;
            compound::decode_object(&payload[0]).map(Value::Object)
        }
        other => Err(KeyCodecError::UnknownTag {
            tag: other.to_string(),
        }),
    }
}

/// Decode a composite physical key into its component values.
pub fn decode_composite_key(key: &JsonValue) -> Result<CompositeValue, KeyCodecError> {
    let JsonValue::Array(entries) = key else {
        return Err(KeyCodecError::NotAnArray {
            context: "composite view key",
        });
    };

    entries.iter().map(decode_value).collect()
}

fn decode_tag(tag: &JsonValue) -> Result<u8, KeyCodecError> {
    let JsonValue::Number(number) = tag else {
        return Err(KeyCodecError::TagNotNumber);
    };

    // View engines may hand integral tags back as floats.
    let raw = number.as_f64();
    TYPE_TAGS
        .into_iter()
        .find(|tag| raw == Some(f64::from(*tag)))
        .ok_or_else(|| KeyCodecError::UnknownTag {
            tag: number.to_string(),
        })
}

const fn expect_arity(
    kind: &'static str,
    found: usize,
    expected: usize,
) -> Result<(), KeyCodecError> {
    if found == expected {
        Ok(())
    } else {
        Err(KeyCodecError::Arity {
            kind,
            expected,
            found,
        })
    }
}

fn finite_number(value: f64) -> Result<Number, KeyCodecError> {
    Number::from_f64(value).ok_or(KeyCodecError::NonFiniteNumber { value })
}

// Array elements travel as plain JSON; reject payloads JSON cannot carry so
// the projection stays reversible.
fn plain_elements(items: &[Value]) -> Result<JsonValue, KeyCodecError> {
    items
        .iter()
        .map(plain_json)
        .collect::<Result<Vec<_>, _>>()
        .map(JsonValue::Array)
}

fn plain_json(value: &Value) -> Result<JsonValue, KeyCodecError> {
    match value {
        Value::Number(v) => finite_number(*v).map(JsonValue::Number),
        Value::Array(items) => plain_elements(items),
        Value::Object(fields) => fields
            .iter()
            .map(|(name, value)| plain_json(value).map(|json| (name.clone(), json)))
            .collect::<Result<serde_json::Map<_, _>, _>>()
            .map(JsonValue::Object),
        other => Ok(other.actual()),
    }
}
