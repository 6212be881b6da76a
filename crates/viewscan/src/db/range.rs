//! Module: db::range
//! Responsibility: logical scan boundaries and their lowering to view options.
//! Does not own: pagination (cursor advance belongs to the walker).
//! Boundary: index handles lower every scan through this module.
//!
//! The view engine only answers inclusive `(key, docid)` ranges. An excluded
//! bound keeps its key and pins the document-id tiebreak past every real
//! identifier: `startkey_docid = MAX` skips rows equal to the low key and
//! `endkey_docid = MIN` skips rows equal to the high key.

use crate::{
    db::{
        key::{KeyCodecError, encode_composite_key, upper_sentinel},
        view::{MIN_DOC_ID, ViewOptions, max_doc_id},
    },
    value::{CompositeValue, Value},
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

///
/// RangeInclusion
///
/// Which present bounds of a range are part of the range.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum RangeInclusion {
    Neither,
    Low,
    High,
    #[default]
    Both,
}

impl RangeInclusion {
    #[must_use]
    pub const fn includes_low(self) -> bool {
        matches!(self, Self::Low | Self::Both)
    }

    #[must_use]
    pub const fn includes_high(self) -> bool {
        matches!(self, Self::High | Self::Both)
    }
}

///
/// Range
///
/// Scan boundaries over composite index keys. An absent bound leaves that
/// side of the scan open.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Range {
    pub low: Option<CompositeValue>,
    pub high: Option<CompositeValue>,
    pub inclusion: RangeInclusion,
}

impl Range {
    #[must_use]
    pub const fn new(
        low: Option<CompositeValue>,
        high: Option<CompositeValue>,
        inclusion: RangeInclusion,
    ) -> Self {
        Self {
            low,
            high,
            inclusion,
        }
    }

    /// Unbounded range covering every key.
    #[must_use]
    pub const fn all() -> Self {
        Self::new(None, None, RangeInclusion::Both)
    }

    /// Range between two single-component bounds.
    #[must_use]
    pub fn between(
        low: impl Into<Value>,
        high: impl Into<Value>,
        inclusion: RangeInclusion,
    ) -> Self {
        Self::new(
            Some(CompositeValue::from(low.into())),
            Some(CompositeValue::from(high.into())),
            inclusion,
        )
    }

    /// Lower this range into view request options.
    pub fn to_view_options(&self) -> Result<ViewOptions, KeyCodecError> {
        self.to_view_options_with_prefix(&[])
    }

    /// Lower this range into view request options under an exact-match prefix.
    ///
    /// With a prefix, an absent low bound starts at the prefix itself and an
    /// absent high bound ends just past every key extending the prefix.
    pub fn to_view_options_with_prefix(
        &self,
        prefix: &[Value],
    ) -> Result<ViewOptions, KeyCodecError> {
        let mut options = ViewOptions::default();

        match &self.low {
            Some(low) => {
                options.startkey = Some(prefixed_key(prefix, low)?);
                if !self.inclusion.includes_low() {
                    options.startkey_docid = Some(max_doc_id().to_string());
                }
            }
            None if !prefix.is_empty() => {
                options.startkey = Some(encode_composite_key(prefix)?);
            }
            None => {}
        }

        match &self.high {
            Some(high) => {
                options.endkey = Some(prefixed_key(prefix, high)?);
                if !self.inclusion.includes_high() {
                    options.endkey_docid = Some(MIN_DOC_ID.to_string());
                }
            }
            None if !prefix.is_empty() => {
                options.endkey = Some(prefix_upper_key(prefix)?);
            }
            None => {}
        }

        Ok(options)
    }
}

/// View options selecting every key that extends `prefix`.
pub fn prefix_view_options(prefix: &[Value]) -> Result<ViewOptions, KeyCodecError> {
    Range::all().to_view_options_with_prefix(prefix)
}

fn prefixed_key(prefix: &[Value], bound: &[Value]) -> Result<JsonValue, KeyCodecError> {
    let values: Vec<Value> = prefix.iter().chain(bound.iter()).cloned().collect();

    encode_composite_key(&values)
}

fn prefix_upper_key(prefix: &[Value]) -> Result<JsonValue, KeyCodecError> {
    let mut key = encode_composite_key(prefix)?;
    if let JsonValue::Array(entries) = &mut key {
        entries.push(upper_sentinel());
    }

    Ok(key)
}

///
/// TESTS
///
