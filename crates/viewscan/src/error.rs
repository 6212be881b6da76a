use std::fmt;
use thiserror::Error as ThisError;

///
/// ScanError
///
/// Structured runtime error with a stable classification.
/// Every failure that leaves a scan does so as a `ScanError` on the
/// warning or error channel of its response.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct ScanError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl ScanError {
    /// Construct a ScanError from its parts.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a codec-origin decode error.
    pub(crate) fn codec_decode(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Decode, ErrorOrigin::Codec, message)
    }

    /// Construct a view-origin transport error.
    pub(crate) fn view_transport(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Transport, ErrorOrigin::View, message)
    }

    /// Construct a walker-origin internal error.
    pub(crate) fn walker_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Walker, message)
    }

    /// Construct a walker-origin decode error for one malformed row.
    pub(crate) fn walker_row_decode(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Decode, ErrorOrigin::Walker, message)
    }

    /// Construct a walker-origin cancellation error.
    pub(crate) fn walker_cancelled() -> Self {
        Self::new(
            ErrorClass::Cancelled,
            ErrorOrigin::Walker,
            "scan cancelled by consumer",
        )
    }

    /// Construct an index-origin unsupported error.
    pub(crate) fn index_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Index, message)
    }

    /// Construct an index-origin internal error.
    pub(crate) fn index_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Index, message)
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self.class, ErrorClass::Transport)
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self.class, ErrorClass::Cancelled)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Decode,
    Transport,
    Internal,
    Unsupported,
    Cancelled,
    Invalid,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Decode => "decode",
            Self::Transport => "transport",
            Self::Internal => "internal",
            Self::Unsupported => "unsupported",
            Self::Cancelled => "cancelled",
            Self::Invalid => "invalid",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Codec,
    View,
    Walker,
    Index,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Codec => "codec",
            Self::View => "view",
            Self::Walker => "walker",
            Self::Index => "index",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_class_prefixes_origin_and_class() {
        let err = ScanError::view_transport("connection refused");

        assert_eq!(
            err.display_with_class(),
            "view:transport: connection refused"
        );
        assert!(err.is_transport());
        assert!(!err.is_cancelled());
    }
}
