use crate::error::ScanError;
use thiserror::Error as ThisError;

///
/// KeyCodecError
///
/// Physical view-key encode/decode failures for one key entry.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum KeyCodecError {
    #[error("number {value} has no JSON representation")]
    NonFiniteNumber { value: f64 },

    #[error("{context} must be an array")]
    NotAnArray { context: &'static str },

    #[error("key entry must start with a type tag")]
    MissingTag,

    #[error("key entry type tag must be a number")]
    TagNotNumber,

    #[error("unknown key entry type tag {tag}")]
    UnknownTag { tag: String },

    #[error("{kind} key entry must have length {expected}, found {found}")]
    Arity {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{kind} key entry payload must be {expected}")]
    PayloadKind {
        kind: &'static str,
        expected: &'static str,
    },

    #[error("string key entry contains invalid code point {value}")]
    InvalidCodePoint { value: String },

    #[error("compound object must carry exactly a name list and a value list, found {found} parts")]
    ObjectShape { found: usize },

    #[error("compound object has {names} names but {values} values")]
    ObjectParity { names: usize, values: usize },

    #[error("compound object contains non-string name at position {index}")]
    ObjectNameNotString { index: usize },

    #[error("compound object names are not strictly sorted at position {index}")]
    ObjectNamesUnsorted { index: usize },
}

impl From<KeyCodecError> for ScanError {
    fn from(err: KeyCodecError) -> Self {
        Self::codec_decode(format!("view key codec failure: {err}"))
    }
}
