//! Module: db::key::text
//! Responsibility: string payloads as arrays of Unicode code points.
//! Boundary: numeric elements collate like code points in the view engine,
//! which keeps string order independent of the engine's text collation.

use crate::db::key::KeyCodecError;
use serde_json::Value as JsonValue;

pub(super) fn encode_code_points(text: &str) -> Vec<u32> {
    text.chars().map(u32::from).collect()
}

pub(super) fn decode_code_points(payload: &JsonValue) -> Result<String, KeyCodecError> {
    let JsonValue::Array(points) = payload else {
        return Err(KeyCodecError::PayloadKind {
            kind: "string",
            expected: "an array of code points",
        });
    };

    points.iter().map(decode_code_point).collect()
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn decode_code_point(point: &JsonValue) -> Result<char, KeyCodecError> {
    let invalid = || KeyCodecError::InvalidCodePoint {
        value: point.to_string(),
    };

    // Accept integral floats; anything else is corruption.
    let raw = match point {
        JsonValue::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
                .map(|f| f as u64)
        }),
        _ => None,
    }
    .ok_or_else(invalid)?;

    u32::try_from(raw)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(invalid)
}
