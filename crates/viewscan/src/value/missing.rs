use std::fmt;

///
/// MissingValue
///
/// Marker for an absent field or array position. Carries an optional
/// description of which path was absent; the annotation never affects
/// equality or ordering.
///

#[derive(Clone, Debug, Default)]
pub struct MissingValue {
    path: Option<String>,
}

impl MissingValue {
    #[must_use]
    pub const fn new() -> Self {
        Self { path: None }
    }

    /// Missing object field `name`.
    #[must_use]
    pub fn field(name: &str) -> Self {
        Self {
            path: Some(name.to_string()),
        }
    }

    /// Missing array position `index`.
    #[must_use]
    pub fn index(index: usize) -> Self {
        Self {
            path: Some(index.to_string()),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl fmt::Display for MissingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path.as_deref() {
            Some(path) if !path.is_empty() => write!(f, "Missing field or index {path}."),
            _ => write!(f, "Missing field or index."),
        }
    }
}
